//! State transitions.

use strum::IntoStaticStr;

use super::model::Theme;
use crate::conversation::{Conversation, ConversationPatch, Message};
use crate::user::User;

/// A single mutation request for the application state.
///
/// Every variant is handled by [`transition`](super::transition); none of
/// them fail. Requests that do not match anything (an unknown conversation
/// id, for example) leave the state unchanged.
#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
pub enum Action {
    /// Replaces the signed-in user.
    SetUser(User),
    /// Clears the user, every conversation and the active selection.
    LogoutUser,
    SetTheme(Theme),
    ToggleSidebar,
    /// Prepends a conversation and makes it active.
    ///
    /// The caller guarantees the id is not already present.
    AddConversation(Conversation),
    /// Selects a conversation by id, or clears the selection.
    SetActiveConversation(Option<String>),
    /// Appends a message to the conversation with the given id.
    AddMessage {
        conversation_id: String,
        message: Message,
    },
    SetTyping(bool),
    /// Removes a conversation; clears the selection if it was active.
    DeleteConversation(String),
    /// Shallow-merges metadata into the conversation with the given id.
    UpdateConversation {
        id: String,
        patch: ConversationPatch,
    },
    ClearAllConversations,
}

impl Action {
    /// Variant name, for logs.
    pub fn name(&self) -> &'static str {
        self.into()
    }
}
