//! Catalog domain models.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A selectable operator role shown on the login screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleOption {
    /// Stable role identifier stored on `User::role`.
    pub id: String,
    pub label: String,
    pub description: String,
    pub avatar_glyph: String,
}

impl RoleOption {
    fn new(id: &str, label: &str, description: &str, avatar_glyph: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            avatar_glyph: avatar_glyph.to_string(),
        }
    }
}

/// Grouping used to order quick prompts in the start screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PromptCategory {
    Status,
    Zones,
    Procedures,
}

/// A canned question that starts a new conversation in one click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickPrompt {
    pub id: String,
    /// Short label; also used as the new conversation's title.
    pub title: String,
    /// Text sent to the backend as the first user message.
    pub prompt: String,
    pub category: PromptCategory,
}

impl QuickPrompt {
    fn new(id: &str, title: &str, prompt: &str, category: PromptCategory) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            prompt: prompt.to_string(),
            category,
        }
    }
}

/// Roles available at login.
pub fn default_user_roles() -> Vec<RoleOption> {
    vec![
        RoleOption::new(
            "operations-manager",
            "Operations Manager",
            "Network health overview and zone comparisons",
            "M",
        ),
        RoleOption::new(
            "field-engineer",
            "Field Engineer",
            "Collector diagnostics and communication history",
            "E",
        ),
        RoleOption::new(
            "control-room-operator",
            "Control Room Operator",
            "Live collector status and standard operating procedures",
            "O",
        ),
        RoleOption::new(
            "analyst",
            "Data Analyst",
            "Uptime trends and offline distribution charts",
            "A",
        ),
    ]
}

/// Quick-start prompts shown on an empty conversation.
pub fn default_quick_prompts() -> Vec<QuickPrompt> {
    vec![
        QuickPrompt::new(
            "collector-status",
            "Collector status",
            "What is the current status of all collectors?",
            PromptCategory::Status,
        ),
        QuickPrompt::new(
            "offline-chart",
            "Online vs offline chart",
            "Show me a chart of online versus offline collectors",
            PromptCategory::Status,
        ),
        QuickPrompt::new(
            "worst-zone",
            "Worst zone",
            "Which zone has the highest percentage of offline collectors?",
            PromptCategory::Zones,
        ),
        QuickPrompt::new(
            "brooklyn-comms",
            "Brooklyn communication times",
            "What are the last communication times for offline collectors in Brooklyn?",
            PromptCategory::Zones,
        ),
        QuickPrompt::new(
            "outage-sop",
            "Outage procedure",
            "What is the standard operating procedure for a collector outage?",
            PromptCategory::Procedures,
        ),
    ]
}
