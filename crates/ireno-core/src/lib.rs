//! Domain layer of the IRENO Smart Assistant.
//!
//! Holds the application state tree, the pure reducer that drives it, the
//! codec and hydration merge used for persistence, and the traits through
//! which the outer layers plug in storage and the chat backend. Nothing in
//! this crate performs I/O.

pub mod backend;
pub mod catalog;
pub mod config;
pub mod conversation;
pub mod error;
pub mod export;
pub mod state;
pub mod storage;
pub mod user;

// Re-export common error type
pub use error::IrenoError;
