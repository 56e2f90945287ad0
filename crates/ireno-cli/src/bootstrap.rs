//! Startup wiring.
//!
//! Every component is constructed here, once, and handed to the commands:
//! the durable store, the hydrated conversation store with its background
//! persistence writer, the HTTP backend and the chat service on top.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use ireno_application::{ChatService, ConversationStore};
use ireno_core::config::AppConfig;
use ireno_core::state::{Action, AppState, transition};
use ireno_core::storage::KeyValueStore;
use ireno_infrastructure::paths::IrenoPaths;
use ireno_infrastructure::{
    BackgroundPersistence, FileKeyValueStore, HydrationSource, MemoryKeyValueStore,
    PersistenceEffect, PersistenceWorker, hydrate,
};
use ireno_interaction::HttpChatBackend;
use tokio::sync::Mutex;

/// Where the durable store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// Nothing survives the process.
    InMemory,
    Directory(PathBuf),
}

impl StoreLocation {
    /// The configured store directory, or the platform default.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let dir = match &config.storage.directory {
            Some(dir) => PathBuf::from(dir),
            None => IrenoPaths::store_dir().context("Failed to resolve store directory")?,
        };
        Ok(Self::Directory(dir))
    }

    fn open(&self, config: &AppConfig) -> Arc<dyn KeyValueStore> {
        match self {
            StoreLocation::InMemory => Arc::new(MemoryKeyValueStore::new()),
            StoreLocation::Directory(dir) => {
                Arc::new(FileKeyValueStore::new(dir).with_quota(config.storage.quota_bytes))
            }
        }
    }
}

/// The assembled application.
pub struct App {
    pub config: AppConfig,
    pub service: ChatService,
    /// How the initial state was obtained.
    pub hydration: HydrationSource,
    persistence: PersistenceWorker,
}

impl App {
    pub fn build(config: AppConfig, location: &StoreLocation) -> Result<Self> {
        let kv = location.open(&config);
        let keys = config.storage.keys();

        let hydrated = hydrate(kv.as_ref(), &keys, AppState::default());
        let effect = if hydrated.store_available() {
            PersistenceEffect::new(kv, keys)
        } else {
            PersistenceEffect::disabled(kv, keys)
        };
        tracing::info!(
            source = ?hydrated.source,
            persistence = effect.is_enabled(),
            "state initialized"
        );

        // A request cannot survive a restart.
        let initial = if hydrated.state.is_typing {
            transition(&hydrated.state, Action::SetTyping(false))
        } else {
            hydrated.state
        };

        let (listener, persistence) = BackgroundPersistence::spawn(effect);
        let mut store = ConversationStore::new(initial);
        store.subscribe(Arc::new(listener));

        let backend = HttpChatBackend::from_settings(&config.backend)
            .context("Failed to create backend client")?;
        tracing::debug!(base_url = backend.base_url(), "backend client ready");

        let service = ChatService::new(Arc::new(Mutex::new(store)), Arc::new(backend));
        Ok(Self {
            config,
            service,
            hydration: hydrated.source,
            persistence,
        })
    }

    /// Drops the service and waits for pending state writes.
    pub async fn shutdown(self) {
        let Self {
            service,
            persistence,
            ..
        } = self;
        drop(service);
        persistence.finish().await;
    }

    /// Whether settled states are being written to the store.
    pub fn persistence_enabled(&self) -> bool {
        self.hydration != HydrationSource::StoreUnavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_state_round_trips_through_directory_store() {
        let temp_dir = TempDir::new().unwrap();
        let location = StoreLocation::Directory(temp_dir.path().to_path_buf());

        let app = App::build(AppConfig::default(), &location).unwrap();
        assert_eq!(app.hydration, HydrationSource::Empty);
        assert!(app.persistence_enabled());
        app.service.login("analyst", "Dana").await.unwrap();
        let id = app.service.new_chat().await;
        app.shutdown().await;

        let app = App::build(AppConfig::default(), &location).unwrap();
        assert_eq!(app.hydration, HydrationSource::Restored);
        let state = app.service.snapshot().await;
        assert_eq!(state.active_conversation_id.as_deref(), Some(id.as_str()));
        assert_eq!(state.user.unwrap().display_name, "Dana");
    }

    #[tokio::test]
    async fn test_stale_typing_flag_is_cleared() {
        let temp_dir = TempDir::new().unwrap();
        let keys = AppConfig::default().storage.keys();
        let kv = FileKeyValueStore::new(temp_dir.path());
        let typing = transition(&AppState::default(), Action::SetTyping(true));
        kv.write(&keys.state_key, &ireno_core::state::encode(&typing).unwrap())
            .unwrap();

        let location = StoreLocation::Directory(temp_dir.path().to_path_buf());
        let app = App::build(AppConfig::default(), &location).unwrap();
        assert_eq!(app.hydration, HydrationSource::Restored);
        assert!(!app.service.snapshot().await.is_typing);
        app.shutdown().await;
    }

    #[tokio::test]
    async fn test_in_memory_store_starts_empty() {
        let app = App::build(AppConfig::default(), &StoreLocation::InMemory).unwrap();
        assert_eq!(app.hydration, HydrationSource::Empty);
        assert!(app.service.snapshot().await.conversations.is_empty());
    }
}
