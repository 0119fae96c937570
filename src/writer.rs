use std::fs;
use std::io;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use csv::StringRecord;
use tempfile::NamedTempFile;

use crate::beach::{BeachRecord, FieldValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvFormat {
    pub delimiter: char,
    pub quote: char,
    pub terminator: CsvTerminator,
}

/// Layout of the published data file.
pub const OUTPUT_FORMAT: CsvFormat = CsvFormat {
    delimiter: ';',
    quote: '|',
    terminator: CsvTerminator::CRLF,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvTerminator {
    CRLF,
    Any(char),
}

impl From<CsvTerminator> for csv::Terminator {
    fn from(source: CsvTerminator) -> Self {
        match source {
            CsvTerminator::CRLF => Self::CRLF,
            CsvTerminator::Any(c) => Self::Any(c as u8),
        }
    }
}

impl From<&CsvFormat> for csv::WriterBuilder {
    fn from(c: &CsvFormat) -> Self {
        let mut builder = csv::WriterBuilder::new();
        builder.delimiter(c.delimiter as u8);
        builder.quote(c.quote as u8);
        builder.terminator(c.terminator.into());
        builder
    }
}

/// Column order of the template, taken from its header row only.
pub fn read_template<P: AsRef<Path>>(path: P) -> Result<StringRecord> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Couldn't open template {}", path.display()))?;
    let columns = rdr
        .headers()
        .with_context(|| format!("Couldn't read template {}", path.display()))?
        .clone();
    if columns.is_empty() {
        bail!("Template {} has no header row", path.display());
    }
    Ok(columns)
}

/// Rejects records carrying a column the template doesn't name.
pub fn check_columns(columns: &StringRecord, beaches: &[BeachRecord]) -> Result<()> {
    let mut unknown: Vec<&str> = vec![];
    for column in beaches.iter().flat_map(BeachRecord::columns) {
        if !columns.iter().any(|c| c == column) && !unknown.contains(&column) {
            unknown.push(column);
        }
    }
    if !unknown.is_empty() {
        bail!("Template lacks columns: {}", unknown.join(", "));
    }
    Ok(())
}

pub fn write_rows<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    columns: &StringRecord,
    beaches: &[BeachRecord],
) -> csv::Result<()> {
    wtr.write_record(columns)?;
    for beach in beaches {
        wtr.write_record(columns.iter().map(|column| {
            beach
                .get(column)
                .and_then(FieldValue::as_str)
                .unwrap_or_default()
        }))?;
    }
    Ok(())
}

/// Writes `beaches` to `path` in template column order.
///
/// Rows go to a temporary file next to `path` which replaces it only once
/// everything is flushed, so a failed run leaves the previous file in place.
pub fn write_beaches<P: AsRef<Path>>(
    path: P,
    columns: &StringRecord,
    beaches: &[BeachRecord],
) -> Result<()> {
    let path = path.as_ref();
    check_columns(columns, beaches)?;

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("Couldn't create {}", dir.display()))?;

    let tmp = NamedTempFile::new_in(dir)?;
    let mut wtr = csv::WriterBuilder::from(&OUTPUT_FORMAT).from_writer(tmp);
    write_rows(&mut wtr, columns, beaches)
        .with_context(|| format!("Couldn't write {}", path.display()))?;
    let tmp = wtr
        .into_inner()
        .map_err(|e| anyhow!("Couldn't flush {} got: {}", path.display(), e.error()))?;
    tmp.persist(path)
        .with_context(|| format!("Couldn't replace {}", path.display()))?;

    Ok(())
}
