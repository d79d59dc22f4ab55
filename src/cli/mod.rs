//! CLI definition and the snapshot command.

use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::error::Result;
use crate::snapshot::{print_summary, run};
use crate::storage::SqliteSource;
use clap::Parser;
use std::path::{Path, PathBuf};

/// Snapshot database tables into one JSON file per row
#[derive(Parser, Debug)]
#[command(name = "table-snapshot", author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
}

/// Load the configuration and snapshot every configured table.
///
/// # Errors
///
/// Returns the first configuration, query, or filesystem error.
pub fn execute(cli: &Cli) -> Result<()> {
    let config = Config::load(&cli.config)?;

    let ignored = config.ignored_connection_keys();
    if !ignored.is_empty() {
        tracing::warn!(
            keys = ?ignored,
            "Connection settings are ignored by the SQLite source"
        );
    }

    let config_dir = config_dir(&cli.config);
    let source = SqliteSource::new(config.database_path(config_dir)?);
    let requests = config.requests()?;

    tracing::info!(
        db = %source.path().display(),
        tables = requests.len(),
        "Starting snapshot run"
    );

    let summary = run(&source, &requests, config.skip_unchanged)?;
    print_summary(&summary);

    Ok(())
}

/// Directory relative database paths are resolved against.
fn config_dir(config: &Path) -> &Path {
    config
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_config_path() {
        let cli = Cli::parse_from(["table-snapshot"]);
        assert_eq!(cli.config, PathBuf::from("config.json"));
    }

    #[test]
    fn test_explicit_config_path() {
        let cli = Cli::parse_from(["table-snapshot", "/etc/snap.json"]);
        assert_eq!(cli.config, PathBuf::from("/etc/snap.json"));
    }

    #[test]
    fn test_rejects_flags() {
        assert!(Cli::try_parse_from(["table-snapshot", "--force"]).is_err());
    }

    #[test]
    fn test_config_dir() {
        assert_eq!(config_dir(Path::new("config.json")), Path::new("."));
        assert_eq!(config_dir(Path::new("/etc/snap.json")), Path::new("/etc"));
    }
}
