//! The employee collection, kept as one JSON array under [`EMPLOYEE_DATA_KEY`].
//!
//! Every operation loads the whole array, mutates it, and writes the whole
//! array back. Writers are serialized; readers rely on the key-value store's
//! atomic replace.

use log::{info, warn};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use super::{KeyValueStore, StorageError};
use crate::models::employee::Employee;

pub const EMPLOYEE_DATA_KEY: &str = "employee_data";

/// What [`EmployeeStore::upsert`] did with the record.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Created(Employee),
    Updated(Employee),
}

impl SaveOutcome {
    pub fn employee(&self) -> &Employee {
        match self {
            SaveOutcome::Created(employee) | SaveOutcome::Updated(employee) => employee,
        }
    }

    pub fn into_employee(self) -> Employee {
        match self {
            SaveOutcome::Created(employee) | SaveOutcome::Updated(employee) => employee,
        }
    }
}

/// One element of the stored array. Elements that do not decode as an
/// [`Employee`] are hidden from readers but written back untouched.
enum Entry {
    Record(Employee),
    Unreadable(Value),
}

impl Entry {
    fn id(&self) -> Option<&str> {
        match self {
            Entry::Record(employee) => employee.id.as_deref(),
            Entry::Unreadable(value) => value.get("id").and_then(Value::as_str),
        }
    }

    fn into_record(self) -> Option<Employee> {
        match self {
            Entry::Record(employee) => Some(employee),
            Entry::Unreadable(_) => None,
        }
    }
}

pub struct EmployeeStore {
    kv: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl EmployeeStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            write_lock: Mutex::new(()),
        }
    }

    /// Returns every stored employee.
    ///
    /// A missing, unreadable or unparseable blob reads as an empty
    /// collection; the failure is logged and never surfaced. Individual
    /// entries of the wrong shape are skipped.
    pub fn list_all(&self) -> Vec<Employee> {
        self.load().into_iter().filter_map(Entry::into_record).collect()
    }

    pub fn find(&self, id: &str) -> Option<Employee> {
        self.list_all()
            .into_iter()
            .find(|employee| employee.id.as_deref() == Some(id))
    }

    pub fn is_empty(&self) -> bool {
        self.list_all().is_empty()
    }

    /// Replaces the entry with the same `id`, or appends.
    ///
    /// A record without an id (or with a blank one) gets a fresh UUID. A
    /// record carrying an id the store has never seen is appended as-is.
    pub fn upsert(&self, mut record: Employee) -> Result<SaveOutcome, StorageError> {
        let _guard = self.lock_writes();
        let mut entries = self.load();

        let requested_id = record.id.clone().filter(|id| !id.trim().is_empty());
        let replaced = match requested_id {
            Some(id) => match entries.iter().position(|entry| entry.id() == Some(id.as_str())) {
                Some(index) => {
                    entries[index] = Entry::Record(record.clone());
                    true
                }
                None => {
                    entries.push(Entry::Record(record.clone()));
                    false
                }
            },
            None => {
                record.id = Some(fresh_id(&entries));
                entries.push(Entry::Record(record.clone()));
                false
            }
        };

        self.persist(&entries)?;
        info!("saved employee {}", record.id.as_deref().unwrap_or_default());
        if replaced {
            Ok(SaveOutcome::Updated(record))
        } else {
            Ok(SaveOutcome::Created(record))
        }
    }

    /// Removing an unknown id leaves the stored blob untouched.
    pub fn remove(&self, id: &str) -> Result<(), StorageError> {
        let _guard = self.lock_writes();
        let mut entries = self.load();
        let before = entries.len();
        entries.retain(|entry| entry.id() != Some(id));

        if entries.len() == before {
            return Ok(());
        }

        self.persist(&entries)?;
        info!("deleted employee {}", id);
        Ok(())
    }

    fn load(&self) -> Vec<Entry> {
        let raw = match self.kv.get_item(EMPLOYEE_DATA_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!("failed to read employee data, treating as empty: {}", err);
                return Vec::new();
            }
        };

        let values = match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(values) => values,
            Err(err) => {
                warn!("employee data is corrupt, treating as empty: {}", err);
                return Vec::new();
            }
        };

        values
            .into_iter()
            .map(|value| match Employee::deserialize(&value) {
                Ok(employee) => Entry::Record(employee),
                Err(err) => {
                    warn!("skipping unreadable employee entry: {}", err);
                    Entry::Unreadable(value)
                }
            })
            .collect()
    }

    fn persist(&self, entries: &[Entry]) -> Result<(), StorageError> {
        let values = entries
            .iter()
            .map(|entry| match entry {
                Entry::Record(employee) => serde_json::to_value(employee),
                Entry::Unreadable(value) => Ok(value.clone()),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let raw = serde_json::to_string(&values)?;
        self.kv.set_item(EMPLOYEE_DATA_KEY, &raw)
    }

    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn fresh_id(existing: &[Entry]) -> String {
    let taken: HashSet<&str> = existing.iter().filter_map(Entry::id).collect();
    loop {
        let candidate = Uuid::new_v4().to_string();
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
    }
}
