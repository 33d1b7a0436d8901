//! Key-value persistence for the portal.
//!
//! Everything the portal keeps lives under a handful of string keys, each
//! holding one string value. The employee collection is one JSON blob under
//! a single key; the session flag is another key.

pub mod employee_store;
mod file_store;
mod memory_store;

use std::error::Error;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

pub use employee_store::{EmployeeStore, SaveOutcome};
pub use file_store::FileKeyValueStore;
pub use memory_store::MemoryKeyValueStore;

#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Serialize(serde_json::Error),
    InvalidKey(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(err) => write!(f, "storage io failed: {}", err),
            StorageError::Serialize(err) => write!(f, "failed to serialize value: {}", err),
            StorageError::InvalidKey(key) => write!(f, "invalid storage key `{}`", key),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StorageError::Io(err) => Some(err),
            StorageError::Serialize(err) => Some(err),
            StorageError::InvalidKey(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialize(err)
    }
}

/// String-keyed slot storage, shaped after a browser's local storage.
///
/// `set_item` must be atomic from a reader's point of view: a concurrent
/// `get_item` sees either the previous value or the new one.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Keys double as file names, so only `[A-Za-z0-9_-]` is accepted.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

pub fn open_store(data_dir: &Path) -> Result<Arc<dyn KeyValueStore>, StorageError> {
    let store = FileKeyValueStore::open(data_dir)?;
    Ok(Arc::new(store))
}
