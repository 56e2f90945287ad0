//! In-process key-value store.
//!
//! Used when no durable store is wanted (an in-memory session) and by tests
//! that need to simulate a full or disabled store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use ireno_core::storage::{KeyValueStore, StoreWriteError};

/// A `HashMap` behind a mutex, with an optional size budget.
///
/// Usage is counted the way browsers count local storage: the length of
/// every key plus the length of its value.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
    capacity_bytes: Option<usize>,
    disabled: AtomicBool,
    write_attempts: AtomicUsize,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects writes once `capacity_bytes` would be exceeded.
    pub fn with_capacity_bytes(capacity_bytes: usize) -> Self {
        Self {
            capacity_bytes: Some(capacity_bytes),
            ..Self::default()
        }
    }

    /// A store that refuses every write, like storage disabled by policy.
    pub fn disabled() -> Self {
        let store = Self::default();
        store.disabled.store(true, Ordering::SeqCst);
        store
    }

    /// Seeds a value without going through the capacity check.
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries().insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries().contains_key(key)
    }

    /// Number of `write` calls made so far, successful or not.
    pub fn write_attempts(&self) -> usize {
        self.write_attempts.load(Ordering::SeqCst)
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn read(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreWriteError> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        if self.disabled.load(Ordering::SeqCst) {
            return Err(StoreWriteError::Unavailable("store is disabled".into()));
        }

        let mut entries = self.entries();
        if let Some(capacity) = self.capacity_bytes {
            let used: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = key.len() + value.len();
            if used + needed > capacity {
                return Err(StoreWriteError::QuotaExceeded(format!(
                    "{} bytes needed, {} of {} bytes in use",
                    needed, used, capacity
                )));
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries().remove(key);
    }
}
