//! Data models for table-snapshot.
//!
//! - Scalar, RawRow, NormalizedRow
//! - ColumnMetadata
//! - TableSnapshotRequest

pub mod row;
pub mod table;

pub use row::{NormalizedRow, RawRow, RowValues, Scalar};
pub use table::{ColumnMetadata, TableSnapshotRequest};
