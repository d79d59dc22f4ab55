//! Table → directory snapshots.
//!
//! Each table is written to `<data_path>/<table>/` as one pretty-printed
//! JSON file per row:
//!
//! - **Rows**: keys sorted so identical rows serialize identically
//! - **Keys**: `col=val;col=val` over the sorted primary-key columns
//! - **File names**: the key, made safe for a single path segment
//! - **Reconciliation**: write every row, then delete unclaimed files
//!
//! # Example
//!
//! ```ignore
//! use table_snapshot::snapshot::{run, TableSnapshotter};
//!
//! let source = SqliteSource::new("app.db");
//! let stats = TableSnapshotter::new(&source).snapshot(&request)?;
//!
//! let summary = run(&source, &requests, false)?;
//! ```

mod file;
mod file_name;
mod key;
mod run;
mod table;
mod types;

pub use file::{atomic_write, list_snapshot_files};
pub use file_name::{encode, is_snapshot_file, MAX_STEM_LEN, SNAPSHOT_EXTENSION};
pub use key::{MissingKeyColumn, PrimaryKeySpec, RowIdentity};
pub use run::{print_summary, run};
pub use table::{DirectoryState, TableSnapshotter};
pub use types::{RunSummary, TableStats};
