//! Table sources for table-snapshot.
//!
//! # Submodules
//!
//! - [`source`] - The `TableSource` trait and an in-memory source
//! - [`sqlite`] - SQLite-backed source

pub mod source;
pub mod sqlite;

pub use source::{MemorySource, TableData, TableSource};
pub use sqlite::SqliteSource;
