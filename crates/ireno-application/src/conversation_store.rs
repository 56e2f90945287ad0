//! The conversation store: current state plus its listeners.

use std::sync::Arc;

use ireno_core::state::{Action, AppState, StateListener, transition};

/// Owns the application state and applies every transition to it.
///
/// The store is built once at startup and handed to whoever needs it; there
/// is no global instance. Each call to [`dispatch`](Self::dispatch) settles
/// exactly one new state and notifies every listener once, in subscription
/// order.
pub struct ConversationStore {
    state: AppState,
    listeners: Vec<Arc<dyn StateListener>>,
}

impl ConversationStore {
    pub fn new(initial: AppState) -> Self {
        Self {
            state: initial,
            listeners: Vec::new(),
        }
    }

    /// The current settled state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Registers a listener for every subsequent settled state.
    pub fn subscribe(&mut self, listener: Arc<dyn StateListener>) {
        self.listeners.push(listener);
    }

    /// Applies `action` and notifies listeners with the resulting state.
    pub fn dispatch(&mut self, action: Action) -> &AppState {
        let name = action.name();
        self.state = transition(&self.state, action);
        tracing::debug!(
            action = name,
            conversations = self.state.conversations.len(),
            active = ?self.state.active_conversation_id,
            "state settled"
        );

        for listener in &self.listeners {
            listener.on_state(&self.state);
        }
        &self.state
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ireno_core::conversation::Conversation;
    use ireno_core::state::Theme;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingListener {
        seen: Mutex<Vec<AppState>>,
    }

    impl StateListener for RecordingListener {
        fn on_state(&self, state: &AppState) {
            self.seen.lock().unwrap().push(state.clone());
        }
    }

    #[test]
    fn test_dispatch_notifies_each_listener_once() {
        let first = Arc::new(RecordingListener::default());
        let second = Arc::new(RecordingListener::default());
        let mut store = ConversationStore::default();
        store.subscribe(first.clone());
        store.subscribe(second.clone());

        store.dispatch(Action::SetTheme(Theme::Dark));
        store.dispatch(Action::AddConversation(Conversation::new("1", "Zones")));

        let seen = first.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].theme, Theme::Dark);
        assert_eq!(seen[1].active_conversation_id.as_deref(), Some("1"));
        assert_eq!(second.seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_listener_sees_settled_state() {
        let listener = Arc::new(RecordingListener::default());
        let mut store = ConversationStore::default();
        store.subscribe(listener.clone());

        let settled = store.dispatch(Action::ToggleSidebar).clone();
        assert_eq!(listener.seen.lock().unwrap().last(), Some(&settled));
        assert_eq!(store.state(), &settled);
    }

    #[test]
    fn test_no_listeners_before_subscription() {
        let mut store = ConversationStore::default();
        store.dispatch(Action::SetTyping(true));

        let listener = Arc::new(RecordingListener::default());
        store.subscribe(listener.clone());
        assert!(listener.seen.lock().unwrap().is_empty());
        assert!(store.state().is_typing);
    }
}
