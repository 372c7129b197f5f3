use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

const NAIVE_DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y%m%dT%H%M%S",
    "%Y%m%d%H%M%S",
];

// `%#z` takes `+07`, `+0700` and `+07:00`.
const OFFSET_DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%#z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y/%m/%d %H:%M:%S%#z",
    "%Y%m%dT%H%M%S%#z",
];

// Month first, then day first when the month-first reading is impossible.
const SLASHED_DATETIME_FORMATS: [&str; 4] = [
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S%.f",
];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y"];

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Failed to read {path:?}: {source}")]
    Gdal {
        path: PathBuf,
        source: gdal::errors::GdalError,
    },
    #[error("Field {0} is not present in the layer")]
    MissingField(String),
    #[error("Field {field} holds {value}, which is not {expected}")]
    FieldType {
        field: String,
        value: String,
        expected: &'static str,
    },
    #[error("Field {field} has an unsupported type ({kind})")]
    UnsupportedField { field: String, kind: String },
}

/// A single attribute value, as stored in the source file.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Real(f64),
    String(String),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Real(v) => write!(f, "{}", v),
            FieldValue::String(v) => write!(f, "{:?}", v),
            FieldValue::Date(v) => write!(f, "{}", v),
            FieldValue::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
        }
    }
}

/// One feature of a vector layer: named attributes (`None` for null) and the
/// geometry as WKT.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VectorRecord {
    pub attributes: HashMap<String, Option<FieldValue>>,
    pub geometry: Option<String>,
}

impl VectorRecord {
    pub fn new(geometry: Option<&str>) -> Self {
        Self {
            attributes: HashMap::new(),
            geometry: geometry.map(str::to_string),
        }
    }

    pub fn with(mut self, field: &str, value: Option<FieldValue>) -> Self {
        self.attributes.insert(field.to_string(), value);
        self
    }

    fn value(&self, field: &str) -> Result<Option<&FieldValue>, ReadError> {
        self.attributes
            .get(field)
            .map(Option::as_ref)
            .ok_or_else(|| ReadError::MissingField(field.to_string()))
    }

    pub fn real(&self, field: &str) -> Result<Option<f64>, ReadError> {
        match self.value(field)? {
            None => Ok(None),
            Some(FieldValue::Integer(v)) => Ok(Some(*v as f64)),
            Some(FieldValue::Real(v)) => Ok(Some(*v)),
            Some(FieldValue::String(s)) if s.trim().is_empty() => Ok(None),
            Some(value @ FieldValue::String(s)) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| type_error(field, value, "a number")),
            Some(value) => Err(type_error(field, value, "a number")),
        }
    }

    /// Text form of any attribute. Whole-valued reals print without a
    /// fractional part, so an MMSI stored as a double stays an identifier.
    pub fn text(&self, field: &str) -> Result<Option<String>, ReadError> {
        let text = match self.value(field)? {
            None => return Ok(None),
            Some(FieldValue::String(s)) => s.clone(),
            Some(FieldValue::Integer(v)) => v.to_string(),
            Some(FieldValue::Real(v)) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 => {
                format!("{}", *v as i64)
            }
            Some(FieldValue::Real(v)) => v.to_string(),
            Some(FieldValue::Date(v)) => v.to_string(),
            Some(FieldValue::DateTime(v)) => v.to_rfc3339(),
        };

        Ok(Some(text))
    }

    /// Timestamp normalised to UTC. Values without an offset are taken as UTC.
    pub fn timestamp(&self, field: &str) -> Result<Option<DateTime<Utc>>, ReadError> {
        match self.value(field)? {
            None => Ok(None),
            Some(FieldValue::DateTime(v)) => Ok(Some(v.with_timezone(&Utc))),
            Some(FieldValue::Date(v)) => Ok(v.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc())),
            Some(FieldValue::String(s)) if s.trim().is_empty() => Ok(None),
            Some(value @ FieldValue::String(s)) => parse_timestamp(s)
                .map(Some)
                .ok_or_else(|| type_error(field, value, "a date/time")),
            Some(value) => Err(type_error(field, value, "a date/time")),
        }
    }
}

fn type_error(field: &str, value: &FieldValue, expected: &'static str) -> ReadError {
    ReadError::FieldType {
        field: field.to_string(),
        value: value.to_string(),
        expected,
    }
}

pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = OFFSET_DATETIME_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(value, format).ok())
    {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(naive) = value.strip_suffix(['Z', 'z']) {
        return parse_naive(naive).map(|dt| dt.and_utc());
    }

    parse_naive(value).map(|dt| dt.and_utc())
}

fn parse_naive(value: &str) -> Option<NaiveDateTime> {
    NAIVE_DATETIME_FORMATS
        .iter()
        .chain(SLASHED_DATETIME_FORMATS.iter())
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
