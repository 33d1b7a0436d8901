use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::{validate_key, KeyValueStore, StorageError};

/// One file per key inside a data directory.
///
/// Writes go to a uniquely named temp file that is then renamed over the
/// target, so readers never observe a half-written value.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp_path = self.root.join(format!(".{}.{}.tmp", key, Uuid::new_v4()));
        if let Err(err) = fs::write(&tmp_path, value) {
            let _ = fs::remove_file(&tmp_path);
            return Err(err.into());
        }
        if let Err(err) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(err.into());
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_key_reads_as_none() {
        let dir = tempdir().unwrap();
        let store = FileKeyValueStore::open(dir.path()).unwrap();
        assert_eq!(store.get_item("employee_data").unwrap(), None);
    }

    #[test]
    fn set_then_get_returns_latest_value() {
        let dir = tempdir().unwrap();
        let store = FileKeyValueStore::open(dir.path()).unwrap();

        store.set_item("isAuthenticated", "true").unwrap();
        store.set_item("isAuthenticated", "false").unwrap();

        assert_eq!(store.get_item("isAuthenticated").unwrap().as_deref(), Some("false"));
    }

    #[test]
    fn writes_leave_no_temp_files_behind() {
        let dir = tempdir().unwrap();
        let store = FileKeyValueStore::open(dir.path()).unwrap();
        store.set_item("employee_data", "[]").unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["employee_data".to_string()]);
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = FileKeyValueStore::open(dir.path()).unwrap();
        store.set_item("isAuthenticated", "true").unwrap();

        store.remove_item("isAuthenticated").unwrap();
        store.remove_item("isAuthenticated").unwrap();

        assert_eq!(store.get_item("isAuthenticated").unwrap(), None);
    }

    #[test]
    fn open_creates_nested_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("data").join("portal");
        let store = FileKeyValueStore::open(&nested).unwrap();
        assert!(store.root().is_dir());
    }

    #[test]
    fn rejects_path_like_keys() {
        let dir = tempdir().unwrap();
        let store = FileKeyValueStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.set_item("../outside", "x"),
            Err(StorageError::InvalidKey(_))
        ));
    }
}
