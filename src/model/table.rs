//! Table-level types: column metadata and snapshot requests.

use std::path::PathBuf;

/// A column as reported alongside query results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMetadata {
    pub name: String,
    pub primary_key: bool,
}

impl ColumnMetadata {
    #[must_use]
    pub fn new(name: impl Into<String>, primary_key: bool) -> Self {
        Self {
            name: name.into(),
            primary_key,
        }
    }
}

/// One table to snapshot and where its directory lives.
///
/// The table name is expected to be a validated identifier; see
/// [`crate::config::validate_table_name`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSnapshotRequest {
    pub table: String,
    pub base_dir: PathBuf,
}

impl TableSnapshotRequest {
    #[must_use]
    pub fn new(table: impl Into<String>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            table: table.into(),
            base_dir: base_dir.into(),
        }
    }

    /// `<base_dir>/<table>`
    #[must_use]
    pub fn table_dir(&self) -> PathBuf {
        self.base_dir.join(&self.table)
    }
}
