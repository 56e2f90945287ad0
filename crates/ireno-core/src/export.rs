//! Conversation export document.
//!
//! The export carries conversation metadata and messages only; UI
//! preferences, the session and the catalogs stay out of it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::conversation::{Conversation, Message};
use crate::state::AppState;

/// Prefix of every export file name.
pub const EXPORT_FILE_PREFIX: &str = "ireno-chat-export";

/// One conversation as it appears in an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedConversation {
    pub id: String,
    pub title: String,
    pub created_at: String,
    pub updated_at: String,
    pub pinned: bool,
    pub messages: Vec<Message>,
}

impl From<&Conversation> for ExportedConversation {
    fn from(conversation: &Conversation) -> Self {
        Self {
            id: conversation.id.clone(),
            title: conversation.title.clone(),
            created_at: conversation.created_at.clone(),
            updated_at: conversation.updated_at.clone(),
            pinned: conversation.pinned,
            messages: conversation.messages.clone(),
        }
    }
}

/// The downloadable export document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub exported_at: String,
    pub conversation_count: usize,
    pub conversations: Vec<ExportedConversation>,
}

impl ExportDocument {
    /// Builds the export for `state`, or `None` if there is nothing to export.
    pub fn from_state(state: &AppState, exported_at: DateTime<Utc>) -> Option<Self> {
        if state.conversations.is_empty() {
            return None;
        }

        let conversations: Vec<ExportedConversation> =
            state.conversations.iter().map(Into::into).collect();
        Some(Self {
            exported_at: exported_at.to_rfc3339(),
            conversation_count: conversations.len(),
            conversations,
        })
    }
}

/// File name for an export made on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{}-{}.json", EXPORT_FILE_PREFIX, date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Action, transition};

    #[test]
    fn test_file_name_is_date_based() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(export_file_name(date), "ireno-chat-export-2026-03-07.json");
    }

    #[test]
    fn test_empty_state_has_nothing_to_export() {
        assert!(ExportDocument::from_state(&AppState::default(), Utc::now()).is_none());
    }

    #[test]
    fn test_export_excludes_preferences_and_catalogs() {
        let state = transition(
            &AppState::default(),
            Action::AddConversation(Conversation::new("1", "Zones")),
        );
        let doc = ExportDocument::from_state(&state, Utc::now()).unwrap();
        assert_eq!(doc.conversation_count, 1);
        assert_eq!(doc.conversations[0].title, "Zones");

        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("theme").is_none());
        assert!(json.get("userRoles").is_none());
        assert!(json.get("user").is_none());
    }
}
