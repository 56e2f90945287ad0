//! Conversation domain model.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::message::Message;

/// Titles derived from a first message are cut to this many characters.
const MAX_DERIVED_TITLE_CHARS: usize = 40;

/// A conversation between the operator and the assistant.
///
/// Messages are kept in append order. The conversation id is assigned by the
/// caller and must be unique within the state's collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Creation time (RFC 3339)
    pub created_at: String,
    /// Last modification time (RFC 3339)
    pub updated_at: String,
    #[serde(default)]
    pub pinned: bool,
}

impl Conversation {
    /// Creates an empty, unpinned conversation stamped with the current time.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            id: id.into(),
            title: title.into(),
            messages: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
            pinned: false,
        }
    }

    /// The most recent message, if any.
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Partial update applied by `Action::UpdateConversation`.
///
/// Only the fields that are `Some` are written; messages are never touched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl ConversationPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn pinned(pinned: bool) -> Self {
        Self {
            pinned: Some(pinned),
            ..Self::default()
        }
    }

    /// Shallow-merges the present fields into `conversation`.
    pub fn apply_to(&self, conversation: &mut Conversation) {
        if let Some(title) = &self.title {
            conversation.title = title.clone();
        }
        if let Some(pinned) = self.pinned {
            conversation.pinned = pinned;
        }
        if let Some(updated_at) = &self.updated_at {
            conversation.updated_at = updated_at.clone();
        }
    }
}

/// Generates a conversation id from the current time.
///
/// The millisecond timestamp keeps ids roughly sortable; the random suffix
/// keeps two conversations created in the same millisecond apart.
pub fn generate_conversation_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", Utc::now().timestamp_millis(), &suffix[..8])
}

/// Derives a conversation title from the first user message.
pub fn title_from_message(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= MAX_DERIVED_TITLE_CHARS {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(MAX_DERIVED_TITLE_CHARS).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_conversation_is_empty() {
        let conv = Conversation::new("1", "T");
        assert!(conv.messages.is_empty());
        assert!(!conv.pinned);
        assert_eq!(conv.created_at, conv.updated_at);
        assert!(conv.last_message().is_none());
    }

    #[test]
    fn test_patch_only_touches_present_fields() {
        let mut conv = Conversation::new("1", "Original");
        conv.messages.push(Message::user("hi"));

        ConversationPatch::pinned(true).apply_to(&mut conv);
        assert!(conv.pinned);
        assert_eq!(conv.title, "Original");
        assert_eq!(conv.messages.len(), 1);

        ConversationPatch::title("Renamed").apply_to(&mut conv);
        assert_eq!(conv.title, "Renamed");
        assert!(conv.pinned);
    }

    #[test]
    fn test_missing_optional_fields_default_on_decode() {
        let json = r#"{"id":"1","title":"T","createdAt":"a","updatedAt":"b"}"#;
        let conv: Conversation = serde_json::from_str(json).unwrap();
        assert!(conv.messages.is_empty());
        assert!(!conv.pinned);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = generate_conversation_id();
        let b = generate_conversation_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_title_from_message() {
        assert_eq!(title_from_message("  Brooklyn status  "), "Brooklyn status");

        let long = "Which zone has the highest percentage of offline collectors today?";
        let title = title_from_message(long);
        assert!(title.ends_with("..."));
        assert!(title.chars().count() <= MAX_DERIVED_TITLE_CHARS + 3);
    }
}
