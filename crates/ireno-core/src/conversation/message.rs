//! Chat message types.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Literal token an assistant reply embeds to ask the UI for a chart.
pub const CHART_MARKER: &str = "[CHART]";

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageRole {
    /// Message typed by the operator.
    User,
    /// Reply from the assistant backend (or a synthesized fallback).
    Assistant,
}

/// A single message in a conversation.
///
/// Messages are immutable once appended; there is no edit operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    /// Creation time (RFC 3339).
    pub timestamp: String,
}

impl Message {
    /// Creates a message with a fresh id and the current time.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// Whether the content carries the chart-trigger marker.
    pub fn requests_chart(&self) -> bool {
        self.content.contains(CHART_MARKER)
    }

    /// Content with every chart marker stripped, for display.
    pub fn display_content(&self) -> String {
        self.content.replace(CHART_MARKER, "").trim().to_string()
    }
}
