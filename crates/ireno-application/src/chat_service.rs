//! Chat use cases.
//!
//! `ChatService` coordinates the [`ConversationStore`] with the remote
//! [`ChatBackend`]. It holds the store behind a `tokio` mutex and never keeps
//! the lock across a backend call, so the state stays readable while a
//! request is outstanding.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use ireno_core::backend::{
    ChartPayload, ChatBackend, HealthStatus, SopSearchRequest, SopSearchResponse, SystemStatus,
};
use ireno_core::conversation::{
    Conversation, ConversationPatch, Message, generate_conversation_id, title_from_message,
};
use ireno_core::error::{IrenoError, Result};
use ireno_core::state::{Action, AppState, Theme};
use ireno_core::user::User;
use ireno_infrastructure::export_writer::{ExportOutcome, write_export};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::conversation_store::ConversationStore;

/// Assistant text appended when the backend cannot be reached or answers
/// with an error.
pub const FALLBACK_ASSISTANT_MESSAGE: &str = "I apologize, but I'm experiencing technical difficulties. Please try asking about IRENO collector status, zone information, or system health.";

/// Title of a conversation opened with "new chat".
pub const NEW_CHAT_TITLE: &str = "New Chat";

/// The assistant's side of one completed submission.
#[derive(Debug, Clone)]
pub struct Reply {
    /// Conversation the exchange was appended to.
    pub conversation_id: String,
    /// The appended assistant message (the fallback text on failure).
    pub message: Message,
    /// Chart fetched because the reply carried the chart marker.
    pub chart: Option<ChartPayload>,
    /// The backend failure that produced a fallback reply.
    pub backend_error: Option<IrenoError>,
}

impl Reply {
    pub fn is_fallback(&self) -> bool {
        self.backend_error.is_some()
    }
}

/// Result of [`ChatService::submit`].
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The input was blank; nothing happened.
    Empty,
    /// A request is already outstanding; the input was rejected.
    Busy,
    Replied(Reply),
}

/// Where a submission lands.
enum Target {
    /// The active conversation, or a new one titled after the message.
    Active,
    /// Always a new conversation with this title.
    New(String),
}

/// Application service for chatting with the assistant.
pub struct ChatService {
    store: Arc<Mutex<ConversationStore>>,
    backend: Arc<dyn ChatBackend>,
}

impl ChatService {
    pub fn new(store: Arc<Mutex<ConversationStore>>, backend: Arc<dyn ChatBackend>) -> Self {
        Self { store, backend }
    }

    /// A copy of the current state.
    pub async fn snapshot(&self) -> AppState {
        self.store.lock().await.state().clone()
    }

    // ============================================================================
    // Session
    // ============================================================================

    /// Signs in with one of the catalog roles.
    ///
    /// A blank display name falls back to the role label.
    pub async fn login(&self, role_id: &str, display_name: &str) -> Result<User> {
        let mut store = self.store.lock().await;
        let role = store
            .state()
            .role(role_id)
            .cloned()
            .ok_or_else(|| IrenoError::not_found("role", role_id))?;

        let name = match display_name.trim() {
            "" => role.label.clone(),
            name => name.to_string(),
        };
        let user = User::from_role(Uuid::new_v4().to_string(), name, &role);
        store.dispatch(Action::SetUser(user.clone()));
        tracing::info!(role = %role.id, "user logged in");
        Ok(user)
    }

    /// Signs out, dropping every conversation.
    pub async fn logout(&self) {
        self.store.lock().await.dispatch(Action::LogoutUser);
        tracing::info!("user logged out");
    }

    // ============================================================================
    // Preferences
    // ============================================================================

    pub async fn set_theme(&self, theme: Theme) {
        self.store.lock().await.dispatch(Action::SetTheme(theme));
    }

    /// Flips the theme and returns the new one.
    pub async fn toggle_theme(&self) -> Theme {
        let mut store = self.store.lock().await;
        let theme = store.state().theme.toggled();
        store.dispatch(Action::SetTheme(theme)).theme
    }

    /// Flips the sidebar and returns whether it is now open.
    pub async fn toggle_sidebar(&self) -> bool {
        self.store
            .lock()
            .await
            .dispatch(Action::ToggleSidebar)
            .sidebar_open
    }

    // ============================================================================
    // Conversations
    // ============================================================================

    /// Opens an empty conversation and makes it active. Returns its id.
    pub async fn new_chat(&self) -> String {
        let conversation = Conversation::new(generate_conversation_id(), NEW_CHAT_TITLE);
        let id = conversation.id.clone();
        self.store
            .lock()
            .await
            .dispatch(Action::AddConversation(conversation));
        id
    }

    /// Selects a conversation by id, or clears the selection with `None`.
    pub async fn select(&self, id: Option<&str>) -> Result<()> {
        let mut store = self.store.lock().await;
        if let Some(id) = id {
            if store.state().conversation(id).is_none() {
                return Err(IrenoError::not_found("conversation", id));
            }
        }
        store.dispatch(Action::SetActiveConversation(id.map(str::to_string)));
        Ok(())
    }

    pub async fn rename(&self, id: &str, title: &str) -> Result<()> {
        let patch = ConversationPatch {
            title: Some(title.trim().to_string()),
            updated_at: Some(Utc::now().to_rfc3339()),
            ..ConversationPatch::default()
        };
        self.update(id, patch).await
    }

    /// Flips the pinned flag and returns the new value.
    pub async fn toggle_pin(&self, id: &str) -> Result<bool> {
        let mut store = self.store.lock().await;
        let pinned = store
            .state()
            .conversation(id)
            .map(|c| !c.pinned)
            .ok_or_else(|| IrenoError::not_found("conversation", id))?;
        store.dispatch(Action::UpdateConversation {
            id: id.to_string(),
            patch: ConversationPatch::pinned(pinned),
        });
        Ok(pinned)
    }

    async fn update(&self, id: &str, patch: ConversationPatch) -> Result<()> {
        let mut store = self.store.lock().await;
        if store.state().conversation(id).is_none() {
            return Err(IrenoError::not_found("conversation", id));
        }
        store.dispatch(Action::UpdateConversation {
            id: id.to_string(),
            patch,
        });
        Ok(())
    }

    /// Removes a conversation. Unknown ids are ignored.
    pub async fn delete(&self, id: &str) {
        self.store
            .lock()
            .await
            .dispatch(Action::DeleteConversation(id.to_string()));
    }

    /// Removes every conversation and asks the backend to forget the
    /// dialogue. The backend reset is best effort.
    pub async fn clear_all(&self) {
        self.store
            .lock()
            .await
            .dispatch(Action::ClearAllConversations);

        if let Err(e) = self.backend.reset_memory().await {
            tracing::warn!(error = %e, "backend memory reset failed");
        }
    }

    // ============================================================================
    // Chat
    // ============================================================================

    /// Sends `text` in the active conversation, creating one titled after
    /// the message if none is active.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        self.run_submission(text, Target::Active).await
    }

    /// Opens a new conversation from a quick-start prompt and sends it.
    pub async fn start_from_prompt(&self, prompt_id: &str) -> Result<SubmitOutcome> {
        let prompt = self
            .store
            .lock()
            .await
            .state()
            .quick_prompt(prompt_id)
            .cloned()
            .ok_or_else(|| IrenoError::not_found("quick prompt", prompt_id))?;

        Ok(self
            .run_submission(&prompt.prompt, Target::New(prompt.title))
            .await)
    }

    async fn run_submission(&self, text: &str, target: Target) -> SubmitOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SubmitOutcome::Empty;
        }

        let conversation_id = {
            let mut store = self.store.lock().await;
            if store.state().is_typing {
                tracing::debug!("submission rejected, a request is outstanding");
                return SubmitOutcome::Busy;
            }

            let existing = match &target {
                Target::Active => store.state().active_conversation().map(|c| c.id.clone()),
                Target::New(_) => None,
            };
            let conversation_id = match existing {
                Some(id) => id,
                None => {
                    let title = match target {
                        Target::New(title) => title,
                        Target::Active => title_from_message(text),
                    };
                    let conversation = Conversation::new(generate_conversation_id(), title);
                    let id = conversation.id.clone();
                    store.dispatch(Action::AddConversation(conversation));
                    id
                }
            };

            store.dispatch(Action::AddMessage {
                conversation_id: conversation_id.clone(),
                message: Message::user(text),
            });
            store.dispatch(Action::SetTyping(true));
            conversation_id
        };

        let (content, backend_error) = match self.backend.send_message(text).await {
            Ok(content) => (content, None),
            Err(e) => {
                tracing::error!(error = %e, "chat request failed, using fallback reply");
                (FALLBACK_ASSISTANT_MESSAGE.to_string(), Some(e))
            }
        };
        let message = Message::assistant(content);

        let chart = if message.requests_chart() {
            match self.backend.fetch_chart().await {
                Ok(chart) => Some(chart),
                Err(e) => {
                    tracing::warn!(error = %e, "chart fetch failed");
                    None
                }
            }
        } else {
            None
        };

        {
            let mut store = self.store.lock().await;
            store.dispatch(Action::AddMessage {
                conversation_id: conversation_id.clone(),
                message: message.clone(),
            });
            store.dispatch(Action::SetTyping(false));
        }

        SubmitOutcome::Replied(Reply {
            conversation_id,
            message,
            chart,
            backend_error,
        })
    }

    // ============================================================================
    // Backend passthrough
    // ============================================================================

    pub async fn search_documents(&self, request: &SopSearchRequest) -> Result<SopSearchResponse> {
        self.backend.search_documents(request).await
    }

    pub async fn system_status(&self) -> Result<SystemStatus> {
        self.backend.system_status().await
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        self.backend.health().await
    }

    // ============================================================================
    // Export
    // ============================================================================

    /// Writes the conversations to a dated JSON file in `dir`.
    pub async fn export(&self, dir: &Path) -> Result<ExportOutcome> {
        let state = self.snapshot().await;
        write_export(&state, dir, Utc::now())
    }
}
