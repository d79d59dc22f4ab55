//! Configuration loading.
//!
//! The configuration is a JSON file (default `config.json`):
//!
//! ```json
//! {
//!   "database": "app.db",
//!   "dataPath": "$HOME/snapshots",
//!   "tables": ["users", "roles"]
//! }
//! ```
//!
//! It is read once in `main` and passed down explicitly.

use crate::error::{Error, Result};
use crate::model::TableSnapshotRequest;

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file used when none is given on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Output directory used when `dataPath` is not set.
pub const DEFAULT_DATA_PATH: &str = "data";

/// Environment variable consulted when `database` is not set.
pub const DATABASE_ENV: &str = "TABLE_SNAPSHOT_DB";

/// Parsed configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Network connection settings. Accepted so configs written for a
    /// server database still load; the SQLite source does not use them.
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,

    /// SQLite database file. Relative paths resolve against the directory
    /// of the config file.
    pub database: Option<String>,

    /// Base output directory. Supports `$HOME` and `${HOME}`.
    pub data_path: Option<String>,

    /// Tables to snapshot, in order.
    pub tables: Vec<String>,

    /// Leave files whose content is already current untouched.
    #[serde(default)]
    pub skip_unchanged: bool,
}

impl Config {
    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns a config error if the file is missing, unreadable, not valid
    /// JSON, or lists an invalid table name.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;

        Self::parse(&content)
    }

    /// Parse and validate configuration JSON.
    ///
    /// # Errors
    ///
    /// Returns a config error on malformed JSON or an invalid table name.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {e}")))?;

        for table in &config.tables {
            validate_table_name(table)?;
        }

        Ok(config)
    }

    /// Base output directory with `$HOME` expanded.
    ///
    /// # Errors
    ///
    /// Returns a config error if `$HOME` is used but no home directory exists.
    pub fn data_path(&self) -> Result<PathBuf> {
        let raw = self.data_path.as_deref().unwrap_or(DEFAULT_DATA_PATH);
        expand_home(raw).map(PathBuf::from)
    }

    /// Database file, resolved against `config_dir` when relative.
    ///
    /// Priority:
    /// 1. `database` in the config file
    /// 2. `TABLE_SNAPSHOT_DB` environment variable
    ///
    /// # Errors
    ///
    /// Returns a config error if neither is set.
    pub fn database_path(&self, config_dir: &Path) -> Result<PathBuf> {
        let raw = match &self.database {
            Some(db) => db.clone(),
            None => std::env::var(DATABASE_ENV)
                .ok()
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    Error::Config(format!(
                        "No database configured: set `database` or {DATABASE_ENV}"
                    ))
                })?,
        };

        let path = PathBuf::from(expand_home(&raw)?);
        if path.is_relative() {
            Ok(config_dir.join(path))
        } else {
            Ok(path)
        }
    }

    /// One request per configured table, all under [`Config::data_path`].
    ///
    /// # Errors
    ///
    /// Returns a config error if the data path cannot be resolved.
    pub fn requests(&self) -> Result<Vec<TableSnapshotRequest>> {
        let base = self.data_path()?;
        Ok(self
            .tables
            .iter()
            .map(|table| TableSnapshotRequest::new(table.clone(), base.clone()))
            .collect())
    }

    /// Connection keys that are set but have no effect on a SQLite source.
    #[must_use]
    pub fn ignored_connection_keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.host.is_some() {
            keys.push("host");
        }
        if self.port.is_some() {
            keys.push("port");
        }
        if self.user.is_some() {
            keys.push("user");
        }
        if self.password.is_some() {
            keys.push("password");
        }
        keys
    }
}

/// Check that `name` is a plain SQL identifier.
///
/// Table names end up both in SQL and as a directory name, so only
/// `[A-Za-z_][A-Za-z0-9_]*` is accepted.
///
/// # Errors
///
/// Returns a config error describing the offending name.
pub fn validate_table_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid table name {name:?}: expected letters, digits and underscores"
        )))
    }
}

/// Replace `${HOME}` and `$HOME` with the user's home directory.
fn expand_home(input: &str) -> Result<String> {
    if !input.contains("$HOME") && !input.contains("${HOME}") {
        return Ok(input.to_string());
    }
    let home = directories::BaseDirs::new()
        .map(|b| b.home_dir().to_path_buf())
        .ok_or_else(|| Error::Config("Could not determine home directory".into()))?;
    Ok(expand_home_with(input, &home))
}

fn expand_home_with(input: &str, home: &Path) -> String {
    let home = home.to_string_lossy();
    input.replace("${HOME}", &home).replace("$HOME", &home)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(
            r#"{
                "host": "localhost",
                "port": 3306,
                "user": "root",
                "password": "secret",
                "database": "app.db",
                "dataPath": "out",
                "tables": ["users", "roles"],
                "skipUnchanged": true
            }"#,
        )
        .unwrap();

        assert_eq!(config.tables, vec!["users", "roles"]);
        assert_eq!(config.port, Some(3306));
        assert!(config.skip_unchanged);
        assert_eq!(
            config.ignored_connection_keys(),
            vec!["host", "port", "user", "password"]
        );
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = Config::parse(r#"{"tables": ["users"]}"#).unwrap();

        assert!(!config.skip_unchanged);
        assert!(config.ignored_connection_keys().is_empty());
        assert_eq!(config.data_path().unwrap(), PathBuf::from("data"));
    }

    #[test]
    fn test_parse_requires_tables() {
        let err = Config::parse(r#"{"database": "app.db"}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_parse_malformed() {
        let err = Config::parse("{not json").unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_parse_rejects_bad_table_name() {
        let err = Config::parse(r#"{"tables": ["users; DROP TABLE users"]}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_validate_table_name() {
        assert!(validate_table_name("users").is_ok());
        assert!(validate_table_name("_audit_log2").is_ok());
        assert!(validate_table_name("").is_err());
        assert!(validate_table_name("2fast").is_err());
        assert!(validate_table_name("..").is_err());
        assert!(validate_table_name("a/b").is_err());
        assert!(validate_table_name("a-b").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = Config::load(&temp_dir.path().join("config.json")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"database": "app.db", "tables": ["users"]}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(
            config.database_path(temp_dir.path()).unwrap(),
            temp_dir.path().join("app.db")
        );
    }

    #[test]
    fn test_absolute_database_path_kept() {
        let config = Config {
            database: Some("/var/db/app.db".into()),
            ..Config::default()
        };
        assert_eq!(
            config.database_path(Path::new("/etc")).unwrap(),
            PathBuf::from("/var/db/app.db")
        );
    }

    #[test]
    fn test_expand_home_with() {
        let home = Path::new("/home/op");
        assert_eq!(expand_home_with("$HOME/data", home), "/home/op/data");
        assert_eq!(expand_home_with("${HOME}/data", home), "/home/op/data");
        assert_eq!(
            expand_home_with("$HOME/a/${HOME}", home),
            "/home/op/a//home/op"
        );
        assert_eq!(expand_home_with("/srv/data", home), "/srv/data");
    }

    #[test]
    fn test_expand_home_without_placeholder() {
        assert_eq!(expand_home("relative/data").unwrap(), "relative/data");
    }

    #[test]
    fn test_requests_use_data_path() {
        let config = Config {
            data_path: Some("/srv/snapshots".into()),
            tables: vec!["users".into(), "roles".into()],
            ..Config::default()
        };

        let requests = config.requests().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].table, "roles");
        assert_eq!(
            requests[0].table_dir(),
            PathBuf::from("/srv/snapshots/users")
        );
    }
}
