//! Application state model.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::catalog::{QuickPrompt, RoleOption, default_quick_prompts, default_user_roles};
use crate::conversation::Conversation;
use crate::user::User;

/// Color scheme of the UI.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// The whole application state tree.
///
/// This is what the reducer transforms and what gets persisted as a single
/// blob. The open conversation is tracked by id only; the conversation
/// itself is always looked up in `conversations`, so there is a single copy
/// of every message.
///
/// `user_roles` and `quick_prompts` are code-owned catalogs. They are
/// serialized with the rest of the tree but restored from defaults on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Signed-in user, `None` when logged out.
    pub user: Option<User>,
    pub theme: Theme,
    pub sidebar_open: bool,
    /// Conversations, newest first.
    pub conversations: Vec<Conversation>,
    /// Id of the conversation currently shown.
    pub active_conversation_id: Option<String>,
    /// A chat request is outstanding.
    pub is_typing: bool,
    pub user_roles: Vec<RoleOption>,
    pub quick_prompts: Vec<QuickPrompt>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_default_catalogs()
    }
}

impl AppState {
    /// Fresh state carrying the catalogs shipped with this build.
    pub fn with_default_catalogs() -> Self {
        Self {
            user: None,
            theme: Theme::Light,
            sidebar_open: true,
            conversations: Vec::new(),
            active_conversation_id: None,
            is_typing: false,
            user_roles: default_user_roles(),
            quick_prompts: default_quick_prompts(),
        }
    }

    /// The conversation currently shown, resolved by id.
    ///
    /// Returns `None` when nothing is selected or the id no longer matches a
    /// conversation in the collection.
    pub fn active_conversation(&self) -> Option<&Conversation> {
        let id = self.active_conversation_id.as_deref()?;
        self.conversation(id)
    }

    pub fn conversation(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn role(&self, role_id: &str) -> Option<&RoleOption> {
        self.user_roles.iter().find(|r| r.id == role_id)
    }

    pub fn quick_prompt(&self, prompt_id: &str) -> Option<&QuickPrompt> {
        self.quick_prompts.iter().find(|p| p.id == prompt_id)
    }

    /// Conversations in sidebar order: pinned first, otherwise newest first.
    pub fn sidebar_conversations(&self) -> Vec<&Conversation> {
        let mut ordered: Vec<&Conversation> = self.conversations.iter().collect();
        // stable sort keeps newest-first within each group
        ordered.sort_by_key(|c| !c.pinned);
        ordered
    }
}
