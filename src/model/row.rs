//! Row values as read from the database.
//!
//! A [`RawRow`] keeps the column order the query produced. Normalizing it
//! yields a [`NormalizedRow`] whose keys are sorted, so two rows with the
//! same content always serialize to the same bytes.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A single column value.
///
/// Only JSON-representable scalars are allowed. Anything else (blobs,
/// non-finite reals) is rejected by the source before a row is built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) => write!(f, "{r}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Lookup of a column value by name, shared by raw and normalized rows.
pub trait RowValues {
    /// Value of `column`, or `None` if the row has no such column.
    fn value(&self, column: &str) -> Option<&Scalar>;
}

/// A row in query order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    columns: Vec<(String, Scalar)>,
}

impl RawRow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. A repeated name shadows the earlier one.
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<Scalar>) {
        self.columns.push((column.into(), value.into()));
    }

    /// Builder-style [`RawRow::push`].
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.push(column, value);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Sort keys lexicographically, keeping values as they are.
    #[must_use]
    pub fn normalize(self) -> NormalizedRow {
        NormalizedRow {
            columns: self.columns.into_iter().collect(),
        }
    }
}

impl RowValues for RawRow {
    fn value(&self, column: &str) -> Option<&Scalar> {
        self.columns
            .iter()
            .rev()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }
}

impl FromIterator<(String, Scalar)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (String, Scalar)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

/// A row with keys in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedRow {
    columns: BTreeMap<String, Scalar>,
}

impl NormalizedRow {
    /// Column names in serialization order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Pretty-printed JSON with a trailing newline, as written to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

impl RowValues for NormalizedRow {
    fn value(&self, column: &str) -> Option<&Scalar> {
        self.columns.get(column)
    }
}
