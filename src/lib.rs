//! table-snapshot - database tables as git-friendly JSON directories
//!
//! Every configured table is written to `<dataPath>/<table>/` as one JSON
//! file per row, named after the row's primary key. Re-running rewrites
//! current rows and deletes files whose rows are gone.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - Configuration file loading
//! - [`model`] - Row and table types
//! - [`storage`] - Table sources (SQLite, in-memory)
//! - [`snapshot`] - Key derivation, file naming and reconciliation
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod snapshot;
pub mod storage;

pub use error::{Error, Result};
