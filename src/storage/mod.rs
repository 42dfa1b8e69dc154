//! Key-value persistence for the annotation stores.
//!
//! Every store keeps its canonical state in memory and writes the whole
//! serialized value under its own key after each mutation. The backend only
//! needs to get and set whole string values and survive a restart.

mod file_store;

pub use file_store::FileStore;

use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// String-keyed whole-value storage, shaped like `eframe::Storage`.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, if any.
    fn get_string(&self, key: &str) -> Option<String>;

    /// Replaces the value stored under `key`.
    fn set_string(&mut self, key: &str, value: String);

    /// Makes all previous writes durable.
    fn flush(&mut self) -> Result<(), StorageError>;
}

/// Storage handle shared by the stores of one workspace.
///
/// The stores run on a single thread of control; each mutation borrows the
/// handle only for the duration of its own write.
pub type SharedStorage = Rc<RefCell<dyn KeyValueStore>>;

/// Volatile store used by tests and scratch sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a fresh memory store into a shared handle.
    pub fn shared() -> SharedStorage {
        Rc::new(RefCell::new(Self::new()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.data.get(key).cloned()
    }

    fn set_string(&mut self, key: &str, value: String) {
        self.data.insert(key.to_string(), value);
    }

    fn flush(&mut self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Loads a JSON-encoded value, falling back to `T::default()`.
pub fn load_value<T>(storage: &dyn KeyValueStore, key: &str) -> T
where
    T: for<'de> Deserialize<'de> + Default,
{
    load_value_or(storage, key, T::default())
}

/// Loads a JSON-encoded value, falling back to `default` when the key is
/// missing or its value does not decode.
pub fn load_value_or<T>(storage: &dyn KeyValueStore, key: &str, default: T) -> T
where
    T: for<'de> Deserialize<'de>,
{
    match try_load_value(storage, key) {
        Some(value) => value,
        None => default,
    }
}

/// Attempts to load a JSON-encoded value, returning None if missing or invalid.
pub fn try_load_value<T>(storage: &dyn KeyValueStore, key: &str) -> Option<T>
where
    T: for<'de> Deserialize<'de>,
{
    let json_str = storage.get_string(key)?;
    match serde_json::from_str(&json_str) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring undecodable value under {:?}: {}", key, e);
            None
        }
    }
}

/// JSON-encodes `value` under `key` and flushes the backend.
///
/// Persistence failures are logged; the in-memory state stays authoritative.
pub fn save_value<T>(storage: &SharedStorage, key: &str, value: &T)
where
    T: Serialize + ?Sized,
{
    let json_str = match serde_json::to_string(value) {
        Ok(s) => s,
        Err(e) => {
            log::error!("Failed to serialize {:?}: {}", key, e);
            return;
        }
    };

    let mut storage = storage.borrow_mut();
    storage.set_string(key, json_str);
    if let Err(e) = storage.flush() {
        log::error!("Failed to persist {:?}: {}", key, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_simple() {
        let storage = MemoryStore::shared();

        save_value(&storage, "test_key", &42i32);

        let loaded: i32 = load_value(&*storage.borrow(), "test_key");
        assert_eq!(loaded, 42);
    }

    #[test]
    fn test_load_with_default() {
        let storage = MemoryStore::new();

        let loaded: Vec<String> = load_value(&storage, "missing_key");
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_undecodable_value_falls_back() {
        let mut storage = MemoryStore::new();
        storage.set_string("points", "{not json".to_string());

        let loaded: Vec<i32> = load_value_or(&storage, "points", vec![1, 2]);
        assert_eq!(loaded, vec![1, 2]);
    }

    #[test]
    fn test_try_load_value() {
        let storage = MemoryStore::shared();

        let result: Option<i32> = try_load_value(&*storage.borrow(), "missing");
        assert_eq!(result, None);

        save_value(&storage, "test", &123i32);
        let result: Option<i32> = try_load_value(&*storage.borrow(), "test");
        assert_eq!(result, Some(123));
    }
}
