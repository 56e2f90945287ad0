//! Key-value store trait and its write error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Throwaway key used by [`KeyValueStore::probe`].
pub const PROBE_KEY: &str = "__ireno_probe__";

/// Why a write did not happen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreWriteError {
    /// The store is out of space. Freeing something and retrying may help.
    #[error("storage quota exceeded: {0}")]
    QuotaExceeded(String),
    /// The store is disabled or cannot be reached.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// Any other I/O failure.
    #[error("storage write failed: {0}")]
    Io(String),
}

impl StoreWriteError {
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded(_))
    }
}

/// A string-only persistent key-value store.
///
/// Implementations must never panic and never surface read or remove
/// failures: a failed read is reported as a missing key, a failed remove is
/// logged and ignored. Writes report failure to the caller so it can decide
/// on a retry policy; adapters themselves never retry.
pub trait KeyValueStore: Send + Sync {
    fn read(&self, key: &str) -> Option<String>;

    fn write(&self, key: &str, value: &str) -> Result<(), StoreWriteError>;

    fn remove(&self, key: &str);

    /// Checks that the store accepts writes by writing and removing a
    /// throwaway key.
    fn probe(&self) -> bool {
        match self.write(PROBE_KEY, "1") {
            Ok(()) => {
                self.remove(PROBE_KEY);
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "storage probe failed");
                false
            }
        }
    }
}

/// Key names used for the persisted state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageKeys {
    /// Key holding the whole-state blob.
    pub state_key: String,
    /// Key written by earlier releases. Removed to reclaim space when a
    /// write hits the quota.
    pub legacy_key: String,
}

impl StorageKeys {
    pub const DEFAULT_STATE_KEY: &'static str = "ireno-assistant-state";
    pub const DEFAULT_LEGACY_KEY: &'static str = "ireno-chat-history";
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            state_key: Self::DEFAULT_STATE_KEY.to_string(),
            legacy_key: Self::DEFAULT_LEGACY_KEY.to_string(),
        }
    }
}
