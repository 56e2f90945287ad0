//! Application layer for the IRENO assistant.
//!
//! This crate provides the use cases that coordinate the pure state machine
//! in `ireno-core` with the chat backend and the durable store.

pub mod chat_service;
pub mod conversation_store;

pub use chat_service::{ChatService, FALLBACK_ASSISTANT_MESSAGE, Reply, SubmitOutcome};
pub use conversation_store::ConversationStore;
