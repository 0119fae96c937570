use anyhow::{anyhow, Result};
use select::document::Document;
use select::node::Node;
use select::predicate::{Class, Name, Predicate, Text};

use crate::beach::{self, BeachRecord, FieldValue, Measurement};

/// Class tagging every value cell on Náyade pages.
pub const MARKER_CLASS: &str = "valorCampoI";

/// Label heading the block that holds the X and Y coordinate cells.
pub const UTM_ANCHOR: &str = "Coordenadas UTM";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// `codZona=<id>`
    Detail,
    /// `pestanya=3&codZona=<id>`
    Samples,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    /// n-th marker cell of the whole page.
    Offset(usize),
    /// n-th marker cell under the grandparent of the text node equal to `anchor`.
    Anchored { anchor: &'static str, index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub column: &'static str,
    pub page: PageKind,
    pub locator: Locator,
}

const fn detail(column: &'static str, offset: usize) -> FieldSpec {
    FieldSpec {
        column,
        page: PageKind::Detail,
        locator: Locator::Offset(offset),
    }
}

const fn utm(column: &'static str, index: usize) -> FieldSpec {
    FieldSpec {
        column,
        page: PageKind::Detail,
        locator: Locator::Anchored {
            anchor: UTM_ANCHOR,
            index,
        },
    }
}

const fn samples(column: &'static str, offset: usize) -> FieldSpec {
    FieldSpec {
        column,
        page: PageKind::Samples,
        locator: Locator::Offset(offset),
    }
}

/// A zone without a name is a hole in the registry numbering.
pub const NAME_FIELD: FieldSpec = detail(beach::NAME, 5);

pub const FIELDS: [FieldSpec; 11] = [
    detail(beach::COMMUNITY, 0),
    detail(beach::PROVINCE, 1),
    detail(beach::MUNICIPALITY, 2),
    NAME_FIELD,
    detail(beach::SAMPLING_POINT, 18),
    utm(beach::UTM_X, 0),
    utm(beach::UTM_Y, 1),
    samples(beach::SAMPLE_DATE, 0),
    samples(beach::E_COLI, 1),
    samples(beach::ENTEROCOCCUS, 2),
    samples(beach::OBSERVATIONS, 3),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Beach(BeachRecord),
    Vacant,
}

pub struct Page {
    document: Document,
}

impl Page {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Document::from(html),
        }
    }

    pub fn field(&self, spec: &FieldSpec) -> Result<FieldValue> {
        match spec.locator {
            Locator::Offset(n) => Ok(self
                .document
                .find(marker_cell())
                .nth(n)
                .map(cell_value)
                .unwrap_or(FieldValue::NotFound)),
            Locator::Anchored { anchor, index } => {
                let region = anchor_region(&self.document, anchor).ok_or_else(|| {
                    anyhow!("Missing anchor {anchor:?} for field {}", spec.column)
                })?;
                let cell = region.find(marker_cell()).nth(index).ok_or_else(|| {
                    anyhow!(
                        "Missing cell {index} under anchor {anchor:?} for field {}",
                        spec.column
                    )
                })?;
                Ok(cell_value(cell))
            }
        }
    }

    /// Every measurement of a samples tab, read as consecutive groups of four marker cells.
    /// A trailing incomplete group is padded with [`FieldValue::NotFound`].
    pub fn measurements(&self) -> Vec<Measurement> {
        let cells = self.document.find(marker_cell()).collect::<Vec<_>>();
        cells
            .chunks(4)
            .map(|group| {
                [0, 1, 2, 3].map(|i| {
                    group
                        .get(i)
                        .cloned()
                        .map(cell_value)
                        .unwrap_or(FieldValue::NotFound)
                })
            })
            .collect()
    }
}

fn marker_cell() -> impl Predicate {
    Name("td").and(Class(MARKER_CLASS))
}

fn anchor_region<'a>(document: &'a Document, anchor: &str) -> Option<Node<'a>> {
    document
        .find(Text)
        .find(|node| node.as_text().map(str::trim) == Some(anchor))
        .and_then(|label| label.parent())
        .and_then(|label| label.parent())
}

fn cell_value(cell: Node) -> FieldValue {
    let text = cell.text();
    if text.is_empty() {
        FieldValue::EmptyText
    } else {
        FieldValue::Present(text)
    }
}

/// Reads one zone out of its detail and samples pages.
///
/// The name is the only guarded field: without it the zone is [`Extraction::Vacant`].
/// Other positional cells that are absent become [`FieldValue::NotFound`], while a
/// missing coordinates block is an error since it means the page layout changed.
pub fn extract(detail_html: &str, samples_html: &str, adopted_by: &str) -> Result<Extraction> {
    let detail = Page::parse(detail_html);

    if !detail.field(&NAME_FIELD)?.is_present() {
        return Ok(Extraction::Vacant);
    }

    let samples = Page::parse(samples_html);

    let mut record = BeachRecord::default();
    for spec in FIELDS.iter() {
        let page = match spec.page {
            PageKind::Detail => &detail,
            PageKind::Samples => &samples,
        };
        record.insert(spec.column, page.field(spec)?);
        if spec.column == beach::SAMPLING_POINT {
            record.insert(beach::ADOPTED_BY, FieldValue::Present(adopted_by.to_string()));
        }
    }
    record.set_measurements(samples.measurements());

    Ok(Extraction::Beach(record))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> String {
        values
            .iter()
            .map(|v| format!("<tr><td class=\"nombreCampo\">x:</td><td class=\"valorCampoI\">{v}</td></tr>"))
            .collect()
    }

    #[test]
    fn offset_addresses_marker_cells_only() {
        let html = format!(
            "<table>{}<tr><td class=\"other\">noise</td></tr>{}</table>",
            cells(&["a", "b"]),
            cells(&["c"])
        );
        let page = Page::parse(&html);
        let at = |n| page.field(&detail("c", n)).unwrap();
        assert_eq!(at(0), FieldValue::Present("a".into()));
        assert_eq!(at(2), FieldValue::Present("c".into()));
        assert_eq!(at(3), FieldValue::NotFound);
    }

    #[test]
    fn empty_cell_is_not_absent_cell() {
        let page = Page::parse(&format!("<table>{}</table>", cells(&["", "  "])));
        assert_eq!(page.field(&detail("c", 0)).unwrap(), FieldValue::EmptyText);
        assert_eq!(
            page.field(&detail("c", 1)).unwrap(),
            FieldValue::Present("  ".into())
        );
    }

    #[test]
    fn anchored_reads_cells_of_the_anchor_block() {
        let html = format!(
            "<table>{}</table>\
             <div><p>Coordenadas UTM</p>\
             <table><tr><td class=\"valorCampoI\">372950</td><td class=\"valorCampoI\">4064520</td></tr></table>\
             </div>",
            cells(&["before"])
        );
        let page = Page::parse(&html);
        assert_eq!(
            page.field(&utm(beach::UTM_X, 0)).unwrap(),
            FieldValue::Present("372950".into())
        );
        assert_eq!(
            page.field(&utm(beach::UTM_Y, 1)).unwrap(),
            FieldValue::Present("4064520".into())
        );
    }

    #[test]
    fn missing_anchor_is_an_error() {
        let page = Page::parse(&format!("<table>{}</table>", cells(&["a"])));
        let err = page.field(&utm(beach::UTM_X, 0)).unwrap_err();
        assert!(err.to_string().contains("Coordenadas UTM"));
    }

    #[test]
    fn samples_tab_groups_four_cells_per_measurement() {
        let page = Page::parse(&format!(
            "<table>{}</table>",
            cells(&["08/08/2013", "15", "10", "", "01/08/2013", "20"])
        ));
        let measurements = page.measurements();
        assert_eq!(measurements.len(), 2);
        assert_eq!(measurements[0][0], FieldValue::Present("08/08/2013".into()));
        assert_eq!(measurements[0][3], FieldValue::EmptyText);
        assert_eq!(measurements[1][1], FieldValue::Present("20".into()));
        assert_eq!(measurements[1][2], FieldValue::NotFound);
        assert_eq!(measurements[1][3], FieldValue::NotFound);
    }

    #[test]
    fn nameless_zone_is_vacant() {
        let detail = format!("<table>{}</table>", cells(&["", "", "", "", "", ""]));
        assert_eq!(extract(&detail, "", "me").unwrap(), Extraction::Vacant);
        assert_eq!(extract("<html></html>", "", "me").unwrap(), Extraction::Vacant);
    }

    #[test]
    fn name_is_offset_five() {
        assert_eq!(NAME_FIELD.locator, Locator::Offset(5));
        assert!(FIELDS.contains(&NAME_FIELD));
    }
}
