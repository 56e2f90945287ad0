pub mod config_service;
pub mod export_writer;
pub mod hydration;
pub mod paths;
pub mod persistence;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::export_writer::{ExportOutcome, write_export};
pub use crate::hydration::{Hydrated, HydrationSource, hydrate, initialize_state};
pub use crate::persistence::{
    BackgroundPersistence, PersistenceEffect, PersistenceWorker, SaveOutcome,
};
pub use crate::storage::{FileKeyValueStore, MemoryKeyValueStore};
