//! File operations for snapshot directories.
//!
//! - Atomic writes: write to a sibling temp file, sync, then rename
//! - Directory scans for existing snapshot files

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::snapshot::file_name::is_snapshot_file;

/// Write content to a file atomically.
///
/// This function:
/// 1. Writes content to a temporary file (same path with `.tmp` appended)
/// 2. Calls `fsync` to ensure data is on disk
/// 3. Atomically renames the temp file to the target path
///
/// If any step fails, the original file (if any) remains untouched.
///
/// # Errors
///
/// Returns an error if any file operation fails.
pub fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let temp_path = temp_path(path);

    {
        let file = File::create(&temp_path).map_err(Error::fs(&temp_path))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(content.as_bytes())
            .map_err(Error::fs(&temp_path))?;
        writer.flush().map_err(Error::fs(&temp_path))?;
        writer.get_ref().sync_all().map_err(Error::fs(&temp_path))?;
    }

    fs::rename(&temp_path, path).map_err(Error::fs(path))?;

    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Names of the snapshot files currently in `dir`.
///
/// Subdirectories and names that are not valid UTF-8 are skipped; this tool
/// never creates either.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn list_snapshot_files(dir: &Path) -> Result<HashSet<String>> {
    let mut names = HashSet::new();
    for entry in fs::read_dir(dir).map_err(Error::fs(dir))? {
        let entry = entry.map_err(Error::fs(dir))?;
        let file_type = entry.file_type().map_err(Error::fs(entry.path()))?;
        if file_type.is_dir() {
            continue;
        }
        if let Ok(name) = entry.file_name().into_string() {
            if is_snapshot_file(&name) {
                names.insert(name);
            }
        }
    }
    Ok(names)
}

/// Whether `path` already holds exactly `content`.
///
/// A missing or unreadable file counts as different.
#[must_use]
pub fn has_content(path: &Path, content: &str) -> bool {
    fs::read(path).is_ok_and(|existing| existing == content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("id=1.json");

        atomic_write(&path, "{}\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{}\n");
        assert!(!temp_dir.path().join("id=1.json.tmp").exists());
    }

    #[test]
    fn test_atomic_write_replaces_whole_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("id=1.json");
        fs::write(&path, "a much longer previous content\n").unwrap();

        atomic_write(&path, "short\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "short\n");
    }

    #[test]
    fn test_atomic_write_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent").join("id=1.json");

        let err = atomic_write(&path, "{}").unwrap_err();
        assert!(matches!(err, Error::FileSystem { .. }));
    }

    #[test]
    fn test_list_snapshot_files_filters() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("id=1.json"), "{}").unwrap();
        fs::write(temp_dir.path().join("id=2.json"), "{}").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "x").unwrap();
        fs::write(temp_dir.path().join("id=3.json.tmp"), "x").unwrap();
        fs::create_dir(temp_dir.path().join("nested.json")).unwrap();

        let names = list_snapshot_files(temp_dir.path()).unwrap();
        let mut names: Vec<_> = names.into_iter().collect();
        names.sort();
        assert_eq!(names, vec!["id=1.json", "id=2.json"]);
    }

    #[test]
    fn test_list_snapshot_files_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let result = list_snapshot_files(&temp_dir.path().join("absent"));
        assert!(matches!(result, Err(Error::FileSystem { .. })));
    }

    #[test]
    fn test_has_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("id=1.json");

        assert!(!has_content(&path, "{}"));
        fs::write(&path, "{}").unwrap();
        assert!(has_content(&path, "{}"));
        assert!(!has_content(&path, "{ }"));
    }
}
