//! The pure state transition function.

use super::action::Action;
use super::model::AppState;

/// Applies `action` to `state` and returns the resulting state.
///
/// The input is never modified. There is no I/O here; persistence observes
/// the returned state separately.
pub fn transition(state: &AppState, action: Action) -> AppState {
    let mut next = state.clone();

    match action {
        Action::SetUser(user) => {
            next.user = Some(user);
        }
        Action::LogoutUser => {
            next.user = None;
            next.conversations.clear();
            next.active_conversation_id = None;
        }
        Action::SetTheme(theme) => {
            next.theme = theme;
        }
        Action::ToggleSidebar => {
            next.sidebar_open = !next.sidebar_open;
        }
        Action::AddConversation(conversation) => {
            next.active_conversation_id = Some(conversation.id.clone());
            next.conversations.insert(0, conversation);
        }
        Action::SetActiveConversation(id) => {
            next.active_conversation_id = id;
        }
        Action::AddMessage {
            conversation_id,
            message,
        } => {
            if let Some(conversation) = next
                .conversations
                .iter_mut()
                .find(|c| c.id == conversation_id)
            {
                conversation.updated_at = message.timestamp.clone();
                conversation.messages.push(message);
            }
        }
        Action::SetTyping(typing) => {
            next.is_typing = typing;
        }
        Action::DeleteConversation(id) => {
            next.conversations.retain(|c| c.id != id);
            if next.active_conversation_id.as_deref() == Some(id.as_str()) {
                next.active_conversation_id = None;
            }
        }
        Action::UpdateConversation { id, patch } => {
            if let Some(conversation) = next.conversations.iter_mut().find(|c| c.id == id) {
                patch.apply_to(conversation);
            }
        }
        Action::ClearAllConversations => {
            next.conversations.clear();
            next.active_conversation_id = None;
        }
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{Conversation, ConversationPatch, Message};
    use crate::state::Theme;
    use crate::user::User;

    fn user() -> User {
        User {
            id: "u-1".to_string(),
            display_name: "Dana".to_string(),
            role: "field-engineer".to_string(),
            avatar_glyph: "E".to_string(),
        }
    }

    fn state_with(ids: &[&str]) -> AppState {
        // AddConversation prepends, so add in reverse to get `ids` order
        ids.iter().rev().fold(AppState::default(), |state, id| {
            transition(&state, Action::AddConversation(Conversation::new(*id, *id)))
        })
    }

    #[test]
    fn test_set_user_and_logout() {
        let state = transition(&AppState::default(), Action::SetUser(user()));
        assert_eq!(state.user, Some(user()));

        let state = transition(
            &state,
            Action::AddConversation(Conversation::new("1", "T")),
        );
        let state = transition(&state, Action::LogoutUser);
        assert!(state.user.is_none());
        assert!(state.conversations.is_empty());
        assert!(state.active_conversation_id.is_none());
    }

    #[test]
    fn test_theme_and_sidebar() {
        let state = transition(&AppState::default(), Action::SetTheme(Theme::Dark));
        assert_eq!(state.theme, Theme::Dark);

        let toggled = transition(&state, Action::ToggleSidebar);
        assert_eq!(toggled.sidebar_open, !state.sidebar_open);
        let back = transition(&toggled, Action::ToggleSidebar);
        assert_eq!(back.sidebar_open, state.sidebar_open);
    }

    #[test]
    fn test_add_conversation_prepends_and_activates() {
        let state = state_with(&["2", "1"]);
        let state = transition(&state, Action::AddConversation(Conversation::new("3", "T")));

        let ids: Vec<&str> = state.conversations.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "2", "1"]);
        assert_eq!(state.active_conversation_id.as_deref(), Some("3"));
    }

    #[test]
    fn test_add_message_scenario() {
        let state = transition(
            &AppState::default(),
            Action::AddConversation(Conversation::new("1", "T")),
        );
        let message = Message {
            id: "m1".to_string(),
            role: crate::conversation::MessageRole::User,
            content: "hi".to_string(),
            timestamp: "2026-01-01T00:00:00+00:00".to_string(),
        };
        let state = transition(
            &state,
            Action::AddMessage {
                conversation_id: "1".to_string(),
                message: message.clone(),
            },
        );

        let conv = state.conversation("1").unwrap();
        assert_eq!(conv.messages, vec![message.clone()]);
        assert_eq!(conv.updated_at, message.timestamp);
        let active = state.active_conversation().unwrap();
        assert_eq!(active.messages, vec![message]);
    }

    #[test]
    fn test_add_message_unknown_conversation_is_noop() {
        let state = state_with(&["1"]);
        let next = transition(
            &state,
            Action::AddMessage {
                conversation_id: "nope".to_string(),
                message: Message::user("lost"),
            },
        );
        assert_eq!(next, state);
    }

    #[test]
    fn test_delete_non_active_keeps_active() {
        // "1" is active and "2" exists
        let state = transition(
            &state_with(&["2"]),
            Action::AddConversation(Conversation::new("1", "One")),
        );
        assert_eq!(state.active_conversation_id.as_deref(), Some("1"));

        let state = transition(&state, Action::DeleteConversation("2".to_string()));
        assert_eq!(state.active_conversation_id.as_deref(), Some("1"));
        let ids: Vec<&str> = state.conversations.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1"]);
    }

    #[test]
    fn test_delete_active_clears_selection() {
        let state = state_with(&["2", "1"]);
        let state = transition(
            &state,
            Action::SetActiveConversation(Some("1".to_string())),
        );
        let state = transition(&state, Action::DeleteConversation("1".to_string()));
        assert!(state.active_conversation_id.is_none());
        assert!(state.conversation("1").is_none());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let state = state_with(&["2", "1"]);
        let once = transition(&state, Action::DeleteConversation("1".to_string()));
        let twice = transition(&once, Action::DeleteConversation("1".to_string()));
        assert_eq!(once, twice);

        let missing = transition(&state, Action::DeleteConversation("zzz".to_string()));
        assert_eq!(missing, state);
    }

    #[test]
    fn test_update_conversation_visible_through_active() {
        let state = state_with(&["1"]);
        let state = transition(
            &state,
            Action::UpdateConversation {
                id: "1".to_string(),
                patch: ConversationPatch::title("Renamed"),
            },
        );
        assert_eq!(state.conversation("1").unwrap().title, "Renamed");
        assert_eq!(state.active_conversation().unwrap().title, "Renamed");
    }

    #[test]
    fn test_clear_all() {
        let state = state_with(&["2", "1"]);
        let state = transition(&state, Action::ClearAllConversations);
        assert!(state.conversations.is_empty());
        assert!(state.active_conversation_id.is_none());
    }

    #[test]
    fn test_set_typing_does_not_modify_input() {
        let state = AppState::default();
        let typing = transition(&state, Action::SetTyping(true));
        assert!(typing.is_typing);
        assert!(!state.is_typing);
    }
}
