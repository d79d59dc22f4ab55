//! Primary-key discovery and row identity strings.
//!
//! A row's identity is `col1=val1;col2=val2` over the table's primary-key
//! columns in sorted order. It is the basis of the row's file name, so it
//! must not depend on the order columns arrive in.

use std::fmt;

use thiserror::Error;

use crate::model::{ColumnMetadata, RowValues};

/// A row lacks a value for one of the key columns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing primary key column {0}")]
pub struct MissingKeyColumn(pub String);

/// Sorted, deduplicated primary-key column names of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimaryKeySpec {
    columns: Vec<String>,
}

impl PrimaryKeySpec {
    /// Build from column metadata, keeping only primary-key columns.
    #[must_use]
    pub fn from_columns(columns: &[ColumnMetadata]) -> Self {
        Self::from_names(
            columns
                .iter()
                .filter(|c| c.primary_key)
                .map(|c| c.name.clone()),
        )
    }

    /// Build from column names directly.
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut columns: Vec<String> = names.into_iter().map(Into::into).collect();
        columns.sort();
        columns.dedup();
        Self { columns }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// A table without a primary key maps every row to the same identity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Identity string of `row` under this key.
    ///
    /// # Errors
    ///
    /// Returns [`MissingKeyColumn`] if the row has no value for a key column.
    pub fn identity<R: RowValues + ?Sized>(
        &self,
        row: &R,
    ) -> Result<RowIdentity, MissingKeyColumn> {
        let mut parts = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            let value = row
                .value(column)
                .ok_or_else(|| MissingKeyColumn(column.clone()))?;
            parts.push(format!("{column}={value}"));
        }
        Ok(RowIdentity(parts.join(";")))
    }
}

/// Deterministic identity of a row, e.g. `id=1` or `org=3;user=alice`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIdentity(String);

impl RowIdentity {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowIdentity {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
