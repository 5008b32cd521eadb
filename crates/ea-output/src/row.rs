//! Plain data types written by output backends.

use std::collections::BTreeMap;
use std::fmt;

/// A recorded value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Float(f64),
    Text(String),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Float(_) => ValueKind::Float,
            Value::Text(_) => ValueKind::Text,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Text(_) => None,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// The type every value of one data point has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Float,
    Text,
}

/// One value of one source at one timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordRow {
    pub data_point: String,
    /// Stable external id of the source (dwelling or person id).
    pub source_id:  u32,
    pub unix_secs:  i64,
    pub value:      Value,
}

/// Run-level key/value pairs written alongside the records.
pub type Metadata = BTreeMap<String, String>;
