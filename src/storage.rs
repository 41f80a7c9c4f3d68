use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A string-to-string key-value store that outlives the process
pub(crate) trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError>;
}

/// Key-value storage kept in a JSON object file.  The whole file is read
/// when opened and rewritten on every change.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct FileStorage {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open the storage backed by the file at `path`.
    ///
    /// A missing file is an empty storage.  So is a file that cannot be read
    /// or parsed, in which case a warning is logged and the file's contents
    /// will be replaced on the next write.
    pub(crate) fn open(path: PathBuf) -> FileStorage {
        let items = match fs::read_to_string(&path) {
            Ok(src) => match serde_json::from_str(&src) {
                Ok(items) => items,
                Err(e) => {
                    log::warn!("Ignoring malformed storage file {}: {e}", path.display());
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No storage file at {}; starting empty", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                log::warn!("Failed to read storage file {}: {e}", path.display());
                BTreeMap::new()
            }
        };
        FileStorage { path, items }
    }

    fn flush(&self) -> Result<(), StorageError> {
        let data = serde_json::to_string_pretty(&self.items)?;
        // Write to a sibling file and rename it into place; the storage file
        // itself is never left half-written.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data).map_err(|source| StorageError::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.items.insert(key.to_owned(), value);
        self.flush()
    }
}

#[derive(Debug, Error)]
pub(crate) enum StorageError {
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize storage contents")]
    Serialize(#[from] serde_json::Error),
}

/// Storage that lives only as long as the value does
#[cfg(test)]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct MemoryStorage(BTreeMap<String, String>);

#[cfg(test)]
impl MemoryStorage {
    pub(crate) fn with_item(key: &str, value: &str) -> MemoryStorage {
        let mut storage = MemoryStorage::default();
        storage.0.insert(key.to_owned(), value.to_owned());
        storage
    }
}

#[cfg(test)]
impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.0.insert(key.to_owned(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let tmpdir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(tmpdir.path().join("storage.json"));
        assert_eq!(storage.get_item("glassTodoTheme"), None);
    }

    #[test]
    fn test_write_then_reopen() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("storage.json");
        let mut storage = FileStorage::open(path.clone());
        storage.set_item("glassTodoTheme", "dark".into()).unwrap();
        storage.set_item("other", "{}".into()).unwrap();
        let reopened = FileStorage::open(path);
        assert_eq!(reopened.get_item("glassTodoTheme").as_deref(), Some("dark"));
        assert_eq!(reopened.get_item("other").as_deref(), Some("{}"));
        assert_eq!(reopened, storage);
    }

    #[test]
    fn test_malformed_file_is_empty_and_replaced() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("storage.json");
        fs::write(&path, "{not json").unwrap();
        let mut storage = FileStorage::open(path.clone());
        assert_eq!(storage.get_item("glassTodoTheme"), None);
        storage.set_item("glassTodoTheme", "light".into()).unwrap();
        let reopened = FileStorage::open(path);
        assert_eq!(reopened.get_item("glassTodoTheme").as_deref(), Some("light"));
    }

    #[test]
    fn test_write_failure_is_reported() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("missing-dir").join("storage.json");
        let mut storage = FileStorage::open(path);
        let r = storage.set_item("glassTodoTheme", "dark".into());
        assert!(matches!(r, Err(StorageError::Write { .. })));
    }
}
