//! Best-effort persistence of settled states.
//!
//! [`PersistenceEffect`] performs one synchronous write cycle.
//! [`BackgroundPersistence`] runs those cycles on a blocking writer task so
//! that dispatching a transition never waits on the disk.

use std::sync::Arc;

use ireno_core::state::{AppState, StateListener, encode};
use ireno_core::storage::{KeyValueStore, StorageKeys, StoreWriteError};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;

/// Outcome of one persistence cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Saved on the retry after removing the legacy key.
    SavedAfterCleanup,
    /// Persistence is disabled for this session.
    Skipped,
    /// The write was dropped; the in-memory state is unaffected.
    Dropped,
}

/// Writes every settled state to the store as one blob.
///
/// Registered with the conversation store as a [`StateListener`]. A write
/// that hits the quota triggers removal of the legacy key and exactly one
/// retry. Any other failure is logged and dropped; the next settled state
/// simply tries again.
pub struct PersistenceEffect {
    store: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
    enabled: bool,
}

impl PersistenceEffect {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        Self {
            store,
            keys,
            enabled: true,
        }
    }

    /// An effect that never writes, for sessions whose store failed its
    /// probe.
    pub fn disabled(store: Arc<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        Self {
            store,
            keys,
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Runs one persistence cycle for `state`.
    pub fn save(&self, state: &AppState) -> SaveOutcome {
        if !self.enabled {
            return SaveOutcome::Skipped;
        }

        let blob = match encode(state) {
            Ok(blob) => blob,
            Err(e) => {
                tracing::error!(error = %e, "failed to encode state, write dropped");
                return SaveOutcome::Dropped;
            }
        };

        match self.store.write(&self.keys.state_key, &blob) {
            Ok(()) => SaveOutcome::Saved,
            Err(StoreWriteError::QuotaExceeded(reason)) => {
                tracing::warn!(
                    %reason,
                    legacy_key = %self.keys.legacy_key,
                    "storage quota exceeded, removing legacy data and retrying"
                );
                self.store.remove(&self.keys.legacy_key);
                match self.store.write(&self.keys.state_key, &blob) {
                    Ok(()) => SaveOutcome::SavedAfterCleanup,
                    Err(e) => {
                        tracing::error!(error = %e, "retry after cleanup failed, write dropped");
                        SaveOutcome::Dropped
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to persist state, write dropped");
                SaveOutcome::Dropped
            }
        }
    }
}

impl StateListener for PersistenceEffect {
    fn on_state(&self, state: &AppState) {
        let outcome = self.save(state);
        tracing::trace!(?outcome, "persistence cycle finished");
    }
}

/// Listener that queues settled states for a single background writer.
///
/// Writes stay sequential: one writer task drains the queue in order. When
/// several states are queued only the newest is written, since every write
/// replaces the whole blob.
pub struct BackgroundPersistence {
    sender: UnboundedSender<AppState>,
}

/// Handle on the writer task started by [`BackgroundPersistence::spawn`].
pub struct PersistenceWorker {
    handle: JoinHandle<()>,
}

impl BackgroundPersistence {
    /// Starts the writer on the tokio blocking pool.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(effect: PersistenceEffect) -> (Self, PersistenceWorker) {
        let (sender, mut receiver) = mpsc::unbounded_channel::<AppState>();
        let handle = tokio::task::spawn_blocking(move || {
            while let Some(mut state) = receiver.blocking_recv() {
                while let Ok(newer) = receiver.try_recv() {
                    state = newer;
                }
                let outcome = effect.save(&state);
                tracing::trace!(?outcome, "persistence cycle finished");
            }
            tracing::debug!("persistence writer stopped");
        });
        (Self { sender }, PersistenceWorker { handle })
    }
}

impl StateListener for BackgroundPersistence {
    fn on_state(&self, state: &AppState) {
        if self.sender.send(state.clone()).is_err() {
            tracing::warn!("persistence writer is gone, state not saved");
        }
    }
}

impl PersistenceWorker {
    /// Waits until every queued state has been written.
    ///
    /// Completes once the matching [`BackgroundPersistence`] is dropped.
    pub async fn finish(self) {
        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, "persistence writer failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKeyValueStore;
    use ireno_core::conversation::{Conversation, Message};
    use ireno_core::state::{Action, transition};

    fn busy_state() -> AppState {
        let state = transition(
            &AppState::default(),
            Action::AddConversation(Conversation::new("1", "Zones")),
        );
        transition(
            &state,
            Action::AddMessage {
                conversation_id: "1".to_string(),
                message: Message::user("Which zone has the most offline collectors?"),
            },
        )
    }

    fn blob_len(state: &AppState, keys: &StorageKeys) -> usize {
        keys.state_key.len() + encode(state).unwrap().len()
    }

    #[test]
    fn test_saves_state_blob() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let keys = StorageKeys::default();
        let effect = PersistenceEffect::new(store.clone(), keys.clone());

        let state = busy_state();
        assert_eq!(effect.save(&state), SaveOutcome::Saved);
        assert_eq!(store.read(&keys.state_key), Some(encode(&state).unwrap()));
    }

    #[test]
    fn test_quota_removes_legacy_key_and_retries_once() {
        let keys = StorageKeys::default();
        let state = busy_state();
        let store = Arc::new(MemoryKeyValueStore::with_capacity_bytes(blob_len(&state, &keys)));
        store.insert_raw(&keys.legacy_key, "x".repeat(512));

        let effect = PersistenceEffect::new(store.clone(), keys.clone());
        assert_eq!(effect.save(&state), SaveOutcome::SavedAfterCleanup);
        assert!(!store.contains_key(&keys.legacy_key));
        assert_eq!(store.write_attempts(), 2);
    }

    #[test]
    fn test_failed_retry_is_dropped_silently() {
        let keys = StorageKeys::default();
        let state = busy_state();
        let store = Arc::new(MemoryKeyValueStore::with_capacity_bytes(16));
        store.insert_raw(&keys.legacy_key, "old");

        let effect = PersistenceEffect::new(store.clone(), keys.clone());
        let before = state.clone();
        effect.on_state(&state);

        assert_eq!(store.write_attempts(), 2);
        assert!(!store.contains_key(&keys.state_key));
        assert!(!store.contains_key(&keys.legacy_key));
        assert_eq!(state, before);
    }

    #[test]
    fn test_other_failures_do_not_retry() {
        let store = Arc::new(MemoryKeyValueStore::disabled());
        let effect = PersistenceEffect::new(store.clone(), StorageKeys::default());
        assert_eq!(effect.save(&busy_state()), SaveOutcome::Dropped);
        assert_eq!(store.write_attempts(), 1);
    }

    #[test]
    fn test_disabled_effect_skips() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let effect = PersistenceEffect::disabled(store.clone(), StorageKeys::default());
        assert_eq!(effect.save(&busy_state()), SaveOutcome::Skipped);
        assert_eq!(store.write_attempts(), 0);
    }

    #[tokio::test]
    async fn test_background_writer_saves_newest_state() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let keys = StorageKeys::default();
        let (listener, worker) =
            BackgroundPersistence::spawn(PersistenceEffect::new(store.clone(), keys.clone()));

        let first = busy_state();
        let second = transition(&first, Action::SetTyping(true));
        listener.on_state(&first);
        listener.on_state(&second);
        drop(listener);
        worker.finish().await;

        assert_eq!(store.read(&keys.state_key), Some(encode(&second).unwrap()));
        assert!((1..=2).contains(&store.write_attempts()));
    }

    #[tokio::test]
    async fn test_background_writer_keeps_quota_retry() {
        let keys = StorageKeys::default();
        let state = busy_state();
        let store = Arc::new(MemoryKeyValueStore::with_capacity_bytes(blob_len(&state, &keys)));
        store.insert_raw(&keys.legacy_key, "x".repeat(512));

        let (listener, worker) =
            BackgroundPersistence::spawn(PersistenceEffect::new(store.clone(), keys.clone()));
        listener.on_state(&state);
        drop(listener);
        worker.finish().await;

        assert!(!store.contains_key(&keys.legacy_key));
        assert_eq!(store.read(&keys.state_key), Some(encode(&state).unwrap()));
    }
}
