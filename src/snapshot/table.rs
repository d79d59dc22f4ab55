//! Per-table reconciliation.
//!
//! # Snapshot Mode
//!
//! A table directory represents the current state of the table: one file
//! per row, named after the row's primary key. Git (or whatever else the
//! directory lives in) tracks the history.
//!
//! # Reconciliation
//!
//! 1. Scan the directory for existing `.json` files (the stale candidates)
//! 2. Load the table and write every row, claiming its file name
//! 3. Delete whatever was not claimed
//!
//! There is no rollback. An I/O error part way through leaves some rows
//! written and some stale files still present; re-running converges.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::TableSnapshotRequest;
use crate::snapshot::file::{atomic_write, has_content, list_snapshot_files};
use crate::snapshot::file_name::encode;
use crate::snapshot::types::TableStats;
use crate::storage::TableSource;

/// Snapshot files found in a table directory at the start of a run.
///
/// Rows claim names as they are written; what is left afterwards is stale.
#[derive(Debug, Default)]
pub struct DirectoryState {
    candidates: HashSet<String>,
}

impl DirectoryState {
    /// Scan `dir` for existing snapshot files.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn scan(dir: &Path) -> Result<Self> {
        Ok(Self {
            candidates: list_snapshot_files(dir)?,
        })
    }

    /// Mark `name` as backed by a current row. Returns whether the file
    /// existed before this run.
    pub fn claim(&mut self, name: &str) -> bool {
        self.candidates.remove(name)
    }

    /// Names not claimed by any row, sorted for stable deletion order.
    #[must_use]
    pub fn into_stale(self) -> Vec<String> {
        let mut stale: Vec<_> = self.candidates.into_iter().collect();
        stale.sort();
        stale
    }
}

/// Reconciles one table directory with the table's rows.
pub struct TableSnapshotter<'a> {
    source: &'a dyn TableSource,
    skip_unchanged: bool,
}

impl<'a> TableSnapshotter<'a> {
    /// Create a snapshotter reading from `source`.
    ///
    /// Every row is rewritten on each run unless
    /// [`TableSnapshotter::skip_unchanged`] is enabled.
    #[must_use]
    pub fn new(source: &'a dyn TableSource) -> Self {
        Self {
            source,
            skip_unchanged: false,
        }
    }

    /// Leave files whose content already matches untouched.
    #[must_use]
    pub fn skip_unchanged(mut self, skip: bool) -> Self {
        self.skip_unchanged = skip;
        self
    }

    /// Bring `<base_dir>/<table>` in line with the table's current rows.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory cannot be created or read
    /// - The table cannot be loaded
    /// - A row lacks a primary key column
    /// - A file cannot be written or deleted
    pub fn snapshot(&self, request: &TableSnapshotRequest) -> Result<TableStats> {
        let table = request.table.as_str();
        let dir = request.table_dir();

        fs::create_dir_all(&dir).map_err(Error::fs(&dir))?;
        let mut state = DirectoryState::scan(&dir)?;

        let data = self.source.load_table(table)?;
        if data.primary_key.is_empty() && !data.rows.is_empty() {
            tracing::warn!(
                table,
                rows = data.rows.len(),
                "Table has no primary key; all rows share one file"
            );
        }

        let mut stats = TableStats::new(table);
        stats.rows = data.rows.len();

        for row in data.rows {
            let identity = data
                .primary_key
                .identity(&row)
                .map_err(|missing| Error::MissingKeyColumn {
                    table: table.to_string(),
                    column: missing.0,
                })?;
            let file_name = encode(&identity);
            let existed = state.claim(&file_name);

            let content = row.normalize().to_json()?;
            let path = dir.join(&file_name);

            if self.skip_unchanged && existed && has_content(&path, &content) {
                tracing::trace!(table, file = %file_name, "Unchanged");
                stats.unchanged += 1;
                continue;
            }

            atomic_write(&path, &content)?;
            tracing::debug!(table, file = %file_name, "Wrote row");
            stats.written += 1;
        }

        for name in state.into_stale() {
            let path = dir.join(&name);
            fs::remove_file(&path).map_err(Error::fs(&path))?;
            tracing::debug!(table, file = %name, "Removed stale file");
            stats.deleted += 1;
        }

        tracing::info!(
            table,
            rows = stats.rows,
            written = stats.written,
            unchanged = stats.unchanged,
            deleted = stats.deleted,
            "Table snapshot complete"
        );

        Ok(stats)
    }
}
