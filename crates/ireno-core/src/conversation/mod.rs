//! Conversation domain module.
//!
//! # Module Structure
//!
//! - `message`: chat message types (`MessageRole`, `Message`)
//! - `model`: the conversation entity and its partial update (`Conversation`, `ConversationPatch`)

mod message;
mod model;

pub use message::{CHART_MARKER, Message, MessageRole};
pub use model::{Conversation, ConversationPatch, generate_conversation_id, title_from_message};
