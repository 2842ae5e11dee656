use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tempfile::NamedTempFile;

use crate::parse::{join_lines, skeleton, split_lines};

/// Error type for outline file operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not create mind map directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// The directory of per-day outline files, `<root>/<YYYY-MM-DD>.txt`.
#[derive(Debug, Clone)]
pub struct OutlineStore {
    root: PathBuf,
}

impl OutlineStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        OutlineStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the outline file for `date`
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.root.join(format!("{}.txt", date.format("%Y-%m-%d")))
    }

    pub fn exists(&self, date: NaiveDate) -> bool {
        self.path_for(date).is_file()
    }

    /// Create the root directory (rwxr-xr-x) if it is missing
    pub fn ensure_root(&self) -> Result<(), StoreError> {
        if self.root.is_dir() {
            return Ok(());
        }
        create_dir_all(&self.root).map_err(|e| StoreError::CreateDir {
            path: self.root.clone(),
            source: e,
        })
    }

    /// Write the empty skeleton for `date`
    pub fn create(&self, date: NaiveDate) -> Result<(), StoreError> {
        let path = self.path_for(date);
        atomic_write(&path, skeleton(date).as_bytes()).map_err(|e| StoreError::Write { path, source: e })
    }

    pub fn read_to_string(&self, date: NaiveDate) -> Result<String, StoreError> {
        let path = self.path_for(date);
        fs::read_to_string(&path).map_err(|e| StoreError::Read { path, source: e })
    }

    pub fn read_lines(&self, date: NaiveDate) -> Result<Vec<String>, StoreError> {
        self.read_to_string(date).map(|content| split_lines(&content))
    }

    /// Replace the file for `date` with `lines`.
    ///
    /// Goes through a temp file and rename so that an editor reading the
    /// file never sees it half-written.
    pub fn write_lines(&self, date: NaiveDate, lines: &[String]) -> Result<(), StoreError> {
        let path = self.path_for(date);
        atomic_write(&path, join_lines(lines).as_bytes()).map_err(|e| StoreError::Write { path, source: e })
    }

    /// Dates that have an outline file, oldest first
    pub fn list_dates(&self) -> Result<Vec<NaiveDate>, StoreError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::Read {
                    path: self.root.clone(),
                    source: e,
                });
            }
        };

        let mut dates: Vec<NaiveDate> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                    return None;
                }
                let stem = path.file_stem()?.to_str()?;
                NaiveDate::parse_from_str(stem, "%Y-%m-%d").ok()
            })
            .collect();
        dates.sort();
        Ok(dates)
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(unix)]
fn create_dir_all(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o755).create(path)
}

#[cfg(not(unix))]
fn create_dir_all(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 12).unwrap()
    }

    #[test]
    fn path_is_named_by_date() {
        let store = OutlineStore::new("/tmp/mm");
        assert_eq!(store.path_for(day()), PathBuf::from("/tmp/mm/2025-06-12.txt"));
    }

    #[test]
    fn ensure_root_creates_nested_dirs() {
        let tmp = TempDir::new().unwrap();
        let store = OutlineStore::new(tmp.path().join("a").join("b"));
        store.ensure_root().unwrap();
        assert!(store.root().is_dir());
        // Second call is a no-op
        store.ensure_root().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn root_dir_mode_is_755() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = TempDir::new().unwrap();
        let store = OutlineStore::new(tmp.path().join("mm"));
        store.ensure_root().unwrap();
        let mode = fs::metadata(store.root()).unwrap().permissions().mode() & 0o777;
        // umask can only clear bits
        assert_eq!(mode & !0o755, 0);
        assert_eq!(mode & 0o700, 0o700);
    }

    #[test]
    fn create_writes_skeleton() {
        let tmp = TempDir::new().unwrap();
        let store = OutlineStore::new(tmp.path());
        assert!(!store.exists(day()));
        store.create(day()).unwrap();
        assert!(store.exists(day()));
        assert_eq!(
            store.read_to_string(day()).unwrap(),
            "2025-06-12\n\tPersonal\n\tWork\n"
        );
    }

    #[test]
    fn write_then_read_lines() {
        let tmp = TempDir::new().unwrap();
        let store = OutlineStore::new(tmp.path());
        let lines = vec!["2025-06-12".to_string(), "\tWork".to_string(), "\t\tTask".to_string()];
        store.write_lines(day(), &lines).unwrap();
        assert_eq!(store.read_lines(day()).unwrap(), lines);
        assert_eq!(store.read_to_string(day()).unwrap(), "2025-06-12\n\tWork\n\t\tTask\n");
    }

    #[test]
    fn read_missing_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let store = OutlineStore::new(tmp.path());
        let err = store.read_lines(day()).unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
        assert!(err.to_string().contains("2025-06-12.txt"));
    }

    #[test]
    fn write_into_missing_dir_is_error() {
        let tmp = TempDir::new().unwrap();
        let store = OutlineStore::new(tmp.path().join("missing"));
        assert!(matches!(store.create(day()), Err(StoreError::Write { .. })));
    }

    #[test]
    fn list_dates_sorted_and_filtered() {
        let tmp = TempDir::new().unwrap();
        let store = OutlineStore::new(tmp.path());
        store.create(NaiveDate::from_ymd_opt(2025, 6, 13).unwrap()).unwrap();
        store.create(day()).unwrap();
        fs::write(tmp.path().join("notes.txt"), "x").unwrap();
        fs::write(tmp.path().join("2025-06-14.md"), "x").unwrap();
        assert_eq!(
            store.list_dates().unwrap(),
            vec![day(), NaiveDate::from_ymd_opt(2025, 6, 13).unwrap()]
        );
    }

    #[test]
    fn list_dates_missing_root_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = OutlineStore::new(tmp.path().join("nope"));
        assert!(store.list_dates().unwrap().is_empty());
    }
}
