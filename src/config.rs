use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the per-user data directory
const APP_DIR: &str = "daytasks";

/// Used when the platform has no notion of a local data directory
const FALLBACK_DIR: &str = ".daytasks";

const STORAGE_FILE: &str = "storage.json";

const LOG_FILE: &str = "daytasks.log";

/// Where the program keeps its files
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Config {
    data_dir: PathBuf,
}

impl Config {
    /// Use `data_dir` if given, else the platform's local data directory
    pub(crate) fn new(data_dir: Option<PathBuf>) -> Config {
        let data_dir = data_dir
            .or_else(|| dirs::data_local_dir().map(|d| d.join(APP_DIR)))
            .unwrap_or_else(|| PathBuf::from(FALLBACK_DIR));
        Config { data_dir }
    }

    pub(crate) fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub(crate) fn ensure_data_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.data_dir)
    }

    pub(crate) fn storage_path(&self) -> PathBuf {
        self.data_dir.join(STORAGE_FILE)
    }

    pub(crate) fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_dir() {
        let config = Config::new(Some(PathBuf::from("/srv/tasks")));
        assert_eq!(config.data_dir(), Path::new("/srv/tasks"));
        assert_eq!(config.storage_path(), Path::new("/srv/tasks/storage.json"));
        assert_eq!(config.log_path(), Path::new("/srv/tasks/daytasks.log"));
    }

    #[test]
    fn test_default_dir_is_named_for_app() {
        let config = Config::new(None);
        assert!(config.data_dir().ends_with(APP_DIR) || config.data_dir().ends_with(FALLBACK_DIR));
    }

    #[test]
    fn test_ensure_data_dir() {
        let tmpdir = tempfile::tempdir().unwrap();
        let config = Config::new(Some(tmpdir.path().join("a").join("b")));
        config.ensure_data_dir().unwrap();
        assert!(config.data_dir().is_dir());
    }
}
