//! The query side of a snapshot: something that can hand over a table.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::model::RawRow;
use crate::snapshot::PrimaryKeySpec;

/// All rows of a table plus its primary key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableData {
    pub primary_key: PrimaryKeySpec,
    pub rows: Vec<RawRow>,
}

/// Loads a whole table.
///
/// Implementations return rows in the order the database produced them;
/// when two rows share a key, the later one wins on disk.
pub trait TableSource {
    /// Load every row of `table` along with its primary-key columns.
    ///
    /// # Errors
    ///
    /// Returns an error on connection or query failure, or when a column
    /// holds a value that cannot be represented as a [`crate::model::Scalar`].
    fn load_table(&self, table: &str) -> Result<TableData>;
}

/// Tables held in memory. Useful for tests and for feeding rows that did
/// not come from SQL.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: HashMap<String, TableData>,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a table.
    pub fn insert(&mut self, table: impl Into<String>, data: TableData) {
        self.tables.insert(table.into(), data);
    }

    /// Builder-style [`MemorySource::insert`].
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>, data: TableData) -> Self {
        self.insert(table, data);
        self
    }
}

impl TableSource for MemorySource {
    fn load_table(&self, table: &str) -> Result<TableData> {
        self.tables
            .get(table)
            .cloned()
            .ok_or_else(|| Error::TableNotFound {
                table: table.to_string(),
            })
    }
}
