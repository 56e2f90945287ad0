//! Property tests for the conversation reducer.

use ireno_core::conversation::{Conversation, Message};
use ireno_core::state::{Action, AppState, decode, encode, merge, transition};
use proptest::prelude::*;

fn add_message(state: &AppState, conversation_id: &str, content: &str) -> AppState {
    transition(
        state,
        Action::AddMessage {
            conversation_id: conversation_id.to_string(),
            message: Message::user(content),
        },
    )
}

proptest! {
    #[test]
    fn add_message_is_append_only(contents in prop::collection::vec("[a-z ]{0,12}", 0..20)) {
        let mut state = transition(
            &AppState::default(),
            Action::AddConversation(Conversation::new("1", "T")),
        );
        for content in &contents {
            state = add_message(&state, "1", content);
        }

        let stored: Vec<&str> = state
            .conversation("1")
            .unwrap()
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        let expected: Vec<&str> = contents.iter().map(String::as_str).collect();
        prop_assert_eq!(&stored, &expected);

        let active = state.active_conversation().unwrap();
        prop_assert_eq!(active.messages.len(), contents.len());
    }

    #[test]
    fn messages_only_land_in_their_conversation(targets in prop::collection::vec(prop::bool::ANY, 0..20)) {
        let mut state = AppState::default();
        state = transition(&state, Action::AddConversation(Conversation::new("a", "A")));
        state = transition(&state, Action::AddConversation(Conversation::new("b", "B")));

        for (i, to_a) in targets.iter().enumerate() {
            let id = if *to_a { "a" } else { "b" };
            state = add_message(&state, id, &i.to_string());
        }

        let to_a = targets.iter().filter(|t| **t).count();
        prop_assert_eq!(state.conversation("a").unwrap().messages.len(), to_a);
        prop_assert_eq!(state.conversation("b").unwrap().messages.len(), targets.len() - to_a);
    }

    #[test]
    fn persisted_state_survives_round_trip(
        titles in prop::collection::vec("[A-Za-z]{1,10}", 1..6),
        sidebar_toggles in 0usize..3,
    ) {
        let default = AppState::default();
        let mut state = default.clone();
        for (i, title) in titles.iter().enumerate() {
            state = transition(&state, Action::AddConversation(Conversation::new(i.to_string(), title.clone())));
            state = add_message(&state, &i.to_string(), title);
        }
        for _ in 0..sidebar_toggles {
            state = transition(&state, Action::ToggleSidebar);
        }

        let merged = merge(&default, decode(&encode(&state).unwrap()).unwrap());
        prop_assert_eq!(merged, state);
    }
}
