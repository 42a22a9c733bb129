//! Value, record and report types
//!
//! A dataset row is a [`Record`]: an insertion-ordered mapping from column
//! name to [`ScalarValue`]. Column order is preserved because substitution
//! processes fields in the record's natural key order.

use std::fmt;

use chrono::{NaiveDateTime, NaiveTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A scalar cell value as produced by a dataset loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScalarValue {
    /// Empty cell
    Null,
    /// Boolean cell
    Bool(bool),
    /// Integer cell
    Integer(i64),
    /// Floating point cell
    Float(f64),
    /// Text cell
    Text(String),
    /// Date or datetime cell
    DateTime(NaiveDateTime),
}

impl ScalarValue {
    /// Whether this value is the empty cell
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Canonical stringification used when a value replaces a placeholder.
///
/// `Null` renders as the empty string; dates at midnight render without the
/// time component. The rendering is deterministic so that generating the
/// same batch twice yields byte-identical documents.
impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
            Self::DateTime(dt) => {
                if dt.time() == NaiveTime::MIN {
                    write!(f, "{}", dt.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S"))
                }
            }
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for ScalarValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for ScalarValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for ScalarValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// One row of input data: a field-name-to-value mapping in column order.
///
/// Records are immutable once handed to the generator; one record is
/// consumed per generated document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    fields: IndexMap<String, ScalarValue>,
}

impl Record {
    /// Create an empty record
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing any previous value under the same name
    pub fn insert(&mut self, name: impl Into<String>, value: ScalarValue) {
        self.fields.insert(name.into(), value);
    }

    /// Look up a field by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ScalarValue> {
        self.fields.get(name)
    }

    /// Iterate fields in column order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ScalarValue)> {
        self.fields.iter()
    }

    /// Field names in column order
    pub fn field_names(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    /// Number of fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, ScalarValue)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, ScalarValue)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// A per-row generation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowFailure {
    /// 1-based row index, as reported to users
    pub row: usize,
    /// Human-readable error message
    pub message: String,
}

impl fmt::Display for RowFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fila {}: {}", self.row, self.message)
    }
}

/// Aggregate outcome of one batch run.
///
/// Always reports generated, errored and total counts, even when nothing
/// was generated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Number of documents successfully written to the archive
    pub generated: usize,
    /// Total number of records processed
    pub total: usize,
    /// Per-row failures, in row order
    pub failures: Vec<RowFailure>,
}

impl BatchReport {
    /// Number of rows that errored
    #[must_use]
    pub fn errored(&self) -> usize {
        self.failures.len()
    }
}
