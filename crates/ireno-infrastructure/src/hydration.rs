//! Startup hydration of the application state.
//!
//! Reads the persisted blob through a [`KeyValueStore`], validates it with
//! the codec and merges it over the defaults. Every failure path ends in the
//! defaults; nothing here returns an error.

use ireno_core::state::{AppState, DecodeError, decode, merge};
use ireno_core::storage::{KeyValueStore, StorageKeys};

/// Where the hydrated state came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HydrationSource {
    /// The store failed its probe; persistence is off for this session.
    StoreUnavailable,
    /// Nothing was stored under the state key.
    Empty,
    /// The stored blob was unusable and has been removed.
    Discarded(DecodeError),
    /// The stored blob was merged over the defaults.
    Restored,
}

/// Result of [`hydrate`].
#[derive(Debug, Clone)]
pub struct Hydrated {
    pub state: AppState,
    pub source: HydrationSource,
}

impl Hydrated {
    /// Whether the store accepted writes at startup.
    pub fn store_available(&self) -> bool {
        self.source != HydrationSource::StoreUnavailable
    }
}

/// Produces the initial state, reporting how it was obtained.
///
/// 1. Store probe fails: defaults.
/// 2. No blob under the state key: defaults.
/// 3. Blob is not JSON or not an object: the key is removed and defaults
///    are used.
/// 4. Otherwise: the blob merged over the defaults. Fields that no longer
///    fit keep their default value.
pub fn hydrate(store: &dyn KeyValueStore, keys: &StorageKeys, default: AppState) -> Hydrated {
    if !store.probe() {
        tracing::warn!("persistent storage unavailable, running in memory only");
        return Hydrated {
            state: default,
            source: HydrationSource::StoreUnavailable,
        };
    }

    let Some(blob) = store.read(&keys.state_key) else {
        tracing::debug!(key = %keys.state_key, "no persisted state found");
        return Hydrated {
            state: default,
            source: HydrationSource::Empty,
        };
    };

    match decode(&blob) {
        Ok(persisted) => {
            let state = merge(&default, persisted);
            tracing::info!(
                conversations = state.conversations.len(),
                "restored persisted state"
            );
            Hydrated {
                state,
                source: HydrationSource::Restored,
            }
        }
        Err(e) => {
            tracing::warn!(key = %keys.state_key, error = %e, "discarding unusable persisted state");
            store.remove(&keys.state_key);
            Hydrated {
                state: default,
                source: HydrationSource::Discarded(e),
            }
        }
    }
}

/// Produces the initial state from the store, falling back to `default`.
pub fn initialize_state(
    store: &dyn KeyValueStore,
    keys: &StorageKeys,
    default: AppState,
) -> AppState {
    hydrate(store, keys, default).state
}
