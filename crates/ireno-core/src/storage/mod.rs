//! Durable key-value store interface.
//!
//! The store holds strings under string keys, the way browser local storage
//! does. Implementations live in the infrastructure crate.

mod store;

pub use store::{KeyValueStore, PROBE_KEY, StorageKeys, StoreWriteError};
