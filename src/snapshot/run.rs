//! Sequential snapshot of every configured table.

use colored::Colorize;

use crate::error::Result;
use crate::model::TableSnapshotRequest;
use crate::snapshot::table::TableSnapshotter;
use crate::snapshot::types::{RunSummary, TableStats};
use crate::storage::TableSource;

/// Snapshot each table in order, stopping at the first error.
///
/// Tables finished before the failing one keep their new state. A progress
/// line (`* <table> .. <rows>`) is printed per table.
///
/// # Errors
///
/// Returns the first error any table produced.
pub fn run(
    source: &dyn TableSource,
    requests: &[TableSnapshotRequest],
    skip_unchanged: bool,
) -> Result<RunSummary> {
    let snapshotter = TableSnapshotter::new(source).skip_unchanged(skip_unchanged);
    let mut summary = RunSummary::default();

    for request in requests {
        let stats = snapshotter.snapshot(request)?;
        print_table_line(&stats);
        summary.tables.push(stats);
    }

    Ok(summary)
}

fn print_table_line(stats: &TableStats) {
    println!("* {} .. {}", stats.table.bold(), stats.rows);
}

/// Print the end-of-run totals.
pub fn print_summary(summary: &RunSummary) {
    let tables = summary.tables.len();
    let plural = if tables == 1 { "" } else { "s" };
    println!(
        "{} table{plural}, {} rows, {} stale files removed",
        tables,
        summary.total_rows(),
        summary.total_deleted()
    );
}
