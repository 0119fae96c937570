use csv::StringRecord;
use lazy_static::lazy_static;

pub const COMMUNITY: &str = "Comunidad";
pub const PROVINCE: &str = "Provincia";
pub const MUNICIPALITY: &str = "Municipio";
pub const NAME: &str = "Nombre";
pub const SAMPLING_POINT: &str = "punto_muestreo";
pub const ADOPTED_BY: &str = "adoptada_por";
pub const UTM_X: &str = "utm_x";
pub const UTM_Y: &str = "utm_y";
pub const SAMPLE_DATE: &str = "fecha_toma";
pub const E_COLI: &str = "escherichia_coli";
pub const ENTEROCOCCUS: &str = "enterococo";
pub const OBSERVATIONS: &str = "observaciones";

/// Columns filled by one measurement of the samples tab, in page order.
pub const SAMPLE_COLUMNS: [&str; 4] = [SAMPLE_DATE, E_COLI, ENTEROCOCCUS, OBSERVATIONS];

lazy_static! {
    /// Every column a beach record carries, in the order of the published template.
    pub static ref BEACH_HEADERS: StringRecord = StringRecord::from(vec![
        COMMUNITY,
        PROVINCE,
        MUNICIPALITY,
        NAME,
        SAMPLING_POINT,
        ADOPTED_BY,
        UTM_X,
        UTM_Y,
        SAMPLE_DATE,
        E_COLI,
        ENTEROCOCCUS,
        OBSERVATIONS,
    ]);
}

/// What a field descriptor resolved to in a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// The cell exists and has text, possibly only whitespace.
    Present(String),
    /// The cell exists but holds no text at all.
    EmptyText,
    /// No cell at the expected place.
    NotFound,
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Present(s) => Some(s),
            Self::EmptyText | Self::NotFound => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }
}

/// Strips leading and trailing whitespace, inner text is kept as is.
pub fn normalize_text(s: &str) -> String {
    s.trim().to_string()
}

/// One row of the samples tab, values in [`SAMPLE_COLUMNS`] order.
pub type Measurement = [FieldValue; 4];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeachRecord {
    fields: Vec<(&'static str, FieldValue)>,
    measurements: Vec<Measurement>,
}

impl BeachRecord {
    /// Sets `column`, replacing any previous value.
    pub fn insert(&mut self, column: &'static str, value: FieldValue) {
        match self.fields.iter_mut().find(|(c, _)| *c == column) {
            Some((_, v)) => *v = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| v)
    }

    pub fn name(&self) -> Option<&str> {
        self.get(NAME).and_then(FieldValue::as_str)
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(c, _)| *c)
    }

    pub fn set_measurements(&mut self, measurements: Vec<Measurement>) {
        self.measurements = measurements;
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// One record per measurement, the sample columns overwritten by that measurement.
    pub fn history(&self) -> impl Iterator<Item = BeachRecord> + '_ {
        self.measurements.iter().map(move |measurement| {
            let mut row = BeachRecord {
                fields: self.fields.clone(),
                measurements: vec![],
            };
            for (column, value) in SAMPLE_COLUMNS.iter().zip(measurement) {
                row.insert(*column, value.clone());
            }
            row
        })
    }

    /// Normalizes present values in place and returns the columns that hold no value.
    ///
    /// Only the record's own fields are reported, older measurements are trimmed silently.
    pub fn normalize(&mut self) -> Vec<&'static str> {
        let mut missing = vec![];
        for (column, value) in self.fields.iter_mut() {
            match value {
                FieldValue::Present(s) => *s = normalize_text(s),
                FieldValue::EmptyText | FieldValue::NotFound => missing.push(*column),
            }
        }
        for value in self.measurements.iter_mut().flatten() {
            if let FieldValue::Present(s) = value {
                *s = normalize_text(s);
            }
        }
        missing
    }
}
