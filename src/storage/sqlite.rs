//! SQLite table source.
//!
//! Each `load_table` call opens its own read-only connection and drops it
//! before returning, on success or failure. Nothing is pooled across tables.

use crate::error::{Error, Result};
use crate::model::{ColumnMetadata, RawRow, Scalar};
use crate::snapshot::PrimaryKeySpec;
use crate::storage::source::{TableData, TableSource};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Reads tables from a SQLite database file.
#[derive(Debug, Clone)]
pub struct SqliteSource {
    path: PathBuf,
}

impl SqliteSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self, table: &str) -> Result<Connection> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(query_error(table))?;
        conn.busy_timeout(Duration::from_secs(5))
            .map_err(query_error(table))?;
        Ok(conn)
    }
}

impl TableSource for SqliteSource {
    fn load_table(&self, table: &str) -> Result<TableData> {
        let conn = self.connect(table)?;

        let columns = table_columns(&conn, table)?;
        if columns.is_empty() {
            return Err(Error::TableNotFound {
                table: table.to_string(),
            });
        }
        let primary_key = PrimaryKeySpec::from_columns(&columns);

        let rows = select_all(&conn, table)?;
        tracing::debug!(table, rows = rows.len(), db = %self.path.display(), "Loaded table");

        Ok(TableData { primary_key, rows })
    }
}

/// Column metadata from `PRAGMA table_info`. Empty if the table does not exist.
fn table_columns(conn: &Connection, table: &str) -> Result<Vec<ColumnMetadata>> {
    let sql = format!("PRAGMA table_info({})", quote_ident(table));
    let mut stmt = conn.prepare(&sql).map_err(query_error(table))?;
    let columns = stmt
        .query_map([], |row| {
            let name: String = row.get(1)?;
            let pk: i64 = row.get(5)?;
            Ok(ColumnMetadata::new(name, pk > 0))
        })
        .map_err(query_error(table))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(query_error(table))?;
    Ok(columns)
}

fn select_all(conn: &Connection, table: &str) -> Result<Vec<RawRow>> {
    let sql = format!("SELECT * FROM {}", quote_ident(table));
    let mut stmt = conn.prepare(&sql).map_err(query_error(table))?;
    let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let mut rows = stmt.query([]).map_err(query_error(table))?;
    let mut out = Vec::new();
    while let Some(row) = rows.next().map_err(query_error(table))? {
        let mut raw = RawRow::new();
        for (idx, name) in names.iter().enumerate() {
            let value = row.get_ref(idx).map_err(query_error(table))?;
            raw.push(name.clone(), to_scalar(table, name, value)?);
        }
        out.push(raw);
    }
    Ok(out)
}

fn to_scalar(table: &str, column: &str, value: ValueRef<'_>) -> Result<Scalar> {
    let unsupported = |kind| Error::UnsupportedValue {
        table: table.to_string(),
        column: column.to_string(),
        kind,
    };
    match value {
        ValueRef::Null => Ok(Scalar::Null),
        ValueRef::Integer(i) => Ok(Scalar::Integer(i)),
        ValueRef::Real(r) if r.is_finite() => Ok(Scalar::Real(r)),
        ValueRef::Real(_) => Err(unsupported("non-finite real")),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .map(Scalar::from)
            .map_err(|_| unsupported("non-UTF-8 text")),
        ValueRef::Blob(_) => Err(unsupported("blob")),
    }
}

/// Double-quote an identifier for SQL.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn query_error(table: &str) -> impl Fn(rusqlite::Error) -> Error + '_ {
    move |source| Error::Query {
        table: table.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RowValues;
    use tempfile::TempDir;

    fn create_db(dir: &TempDir, sql: &str) -> PathBuf {
        let path = dir.path().join("test.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(sql).unwrap();
        path
    }

    #[test]
    fn test_load_table_with_primary_key() {
        let dir = TempDir::new().unwrap();
        let path = create_db(
            &dir,
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);
             INSERT INTO users VALUES (1, 'a'), (2, 'b');",
        );

        let data = SqliteSource::new(&path).load_table("users").unwrap();
        assert_eq!(data.primary_key.columns(), ["id"]);
        assert_eq!(data.rows.len(), 2);
        assert_eq!(data.rows[0].value("id"), Some(&Scalar::Integer(1)));
        assert_eq!(data.rows[1].value("name"), Some(&Scalar::from("b")));
    }

    #[test]
    fn test_composite_primary_key_is_sorted() {
        let dir = TempDir::new().unwrap();
        let path = create_db(
            &dir,
            "CREATE TABLE members (user TEXT, org INTEGER, role TEXT, PRIMARY KEY (user, org));",
        );

        let data = SqliteSource::new(&path).load_table("members").unwrap();
        assert_eq!(data.primary_key.columns(), ["org", "user"]);
        assert!(data.rows.is_empty());
    }

    #[test]
    fn test_table_without_primary_key() {
        let dir = TempDir::new().unwrap();
        let path = create_db(&dir, "CREATE TABLE log (msg TEXT); INSERT INTO log VALUES ('x');");

        let data = SqliteSource::new(&path).load_table("log").unwrap();
        assert!(data.primary_key.is_empty());
        assert_eq!(data.rows.len(), 1);
    }

    #[test]
    fn test_scalar_mapping() {
        let dir = TempDir::new().unwrap();
        let path = create_db(
            &dir,
            "CREATE TABLE t (id INTEGER PRIMARY KEY, r REAL, s TEXT, n TEXT);
             INSERT INTO t VALUES (1, 1.5, 'hi', NULL);",
        );

        let data = SqliteSource::new(&path).load_table("t").unwrap();
        let row = &data.rows[0];
        assert_eq!(row.value("r"), Some(&Scalar::Real(1.5)));
        assert_eq!(row.value("s"), Some(&Scalar::from("hi")));
        assert_eq!(row.value("n"), Some(&Scalar::Null));
    }

    #[test]
    fn test_blob_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = create_db(
            &dir,
            "CREATE TABLE files (id INTEGER PRIMARY KEY, data BLOB);
             INSERT INTO files VALUES (1, x'00ff');",
        );

        let err = SqliteSource::new(&path).load_table("files").unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedValue { ref column, kind: "blob", .. } if column == "data"
        ));
    }

    #[test]
    fn test_missing_table() {
        let dir = TempDir::new().unwrap();
        let path = create_db(&dir, "CREATE TABLE users (id INTEGER PRIMARY KEY);");

        let err = SqliteSource::new(&path).load_table("nope").unwrap_err();
        assert!(matches!(err, Error::TableNotFound { .. }));
    }

    #[test]
    fn test_missing_database_file() {
        let dir = TempDir::new().unwrap();
        let source = SqliteSource::new(dir.path().join("absent.db"));

        let err = source.load_table("users").unwrap_err();
        assert!(matches!(err, Error::Query { .. }));
        assert!(!dir.path().join("absent.db").exists());
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("users"), "\"users\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }
}
