//! Hydration merge.

use serde_json::{Map, Value};

use super::model::AppState;

/// Top-level fields that are always taken from the defaults.
pub const CATALOG_FIELDS: [&str; 2] = ["userRoles", "quickPrompts"];

/// Reconciles freshly built defaults with a previously persisted state.
///
/// Starts from `default` and overlays every top-level field present in
/// `persisted` (persisted values win). The catalog fields are never
/// overlaid, so a stale catalog in storage can never shadow the one shipped
/// with the running build.
///
/// Fields missing from `persisted` keep their default value and unknown
/// fields are ignored, so additive schema changes need no migration. A
/// persisted field whose shape no longer fits the state model is dropped on
/// its own and keeps its default value; the other fields still load.
pub fn merge(default: &AppState, persisted: Map<String, Value>) -> AppState {
    let mut merged = match serde_json::to_value(default) {
        Ok(Value::Object(map)) => map,
        _ => return default.clone(),
    };

    for (key, value) in persisted {
        if CATALOG_FIELDS.contains(&key.as_str()) || !merged.contains_key(&key) {
            continue;
        }

        let previous = merged.insert(key.clone(), value);
        if let Err(e) = serde_json::from_value::<AppState>(Value::Object(merged.clone())) {
            tracing::warn!(field = %key, error = %e, "persisted field does not fit, using default");
            if let Some(previous) = previous {
                merged.insert(key, previous);
            }
        }
    }

    serde_json::from_value(Value::Object(merged)).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "merged state does not fit, using defaults");
        default.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RoleOption;
    use crate::conversation::{Conversation, Message};
    use crate::state::{Action, Theme, decode, encode, transition};
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_round_trip_with_catalog_override() {
        let default = AppState::default();
        let mut state = transition(&default, Action::SetTheme(Theme::Dark));
        state = transition(&state, Action::AddConversation(Conversation::new("1", "T")));
        state = transition(
            &state,
            Action::AddMessage {
                conversation_id: "1".to_string(),
                message: Message::user("hi"),
            },
        );
        // a catalog that differs from what this build ships
        state.user_roles = vec![RoleOption {
            id: "legacy".to_string(),
            label: "Legacy".to_string(),
            description: String::new(),
            avatar_glyph: "L".to_string(),
        }];

        let merged = merge(&default, decode(&encode(&state).unwrap()).unwrap());

        let mut expected = state.clone();
        expected.user_roles = default.user_roles.clone();
        expected.quick_prompts = default.quick_prompts.clone();
        assert_eq!(merged, expected);
    }

    #[test]
    fn test_tampered_catalog_is_ignored() {
        let default = AppState::default();
        let persisted = object(json!({
            "userRoles": "tampered",
            "quickPrompts": [{"bogus": true}],
            "theme": "dark"
        }));

        let merged = merge(&default, persisted);
        assert_eq!(merged.user_roles, default.user_roles);
        assert_eq!(merged.quick_prompts, default.quick_prompts);
        assert_eq!(merged.theme, Theme::Dark);
    }

    #[test]
    fn test_missing_fields_come_from_defaults() {
        let default = AppState::default();
        let merged = merge(&default, object(json!({"sidebarOpen": false})));
        assert!(!merged.sidebar_open);
        assert_eq!(merged.theme, default.theme);
        assert!(merged.conversations.is_empty());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let default = AppState::default();
        let merged = merge(&default, object(json!({"legacyFlag": 1})));
        assert_eq!(merged, default);
    }

    #[test]
    fn test_unknown_theme_keeps_conversations() {
        let default = AppState::default();
        let mut state = transition(&default, Action::AddConversation(Conversation::new("1", "T")));
        state = transition(
            &state,
            Action::AddMessage {
                conversation_id: "1".to_string(),
                message: Message::user("hi"),
            },
        );
        let mut persisted = decode(&encode(&state).unwrap()).unwrap();
        persisted.insert("theme".to_string(), json!("system"));
        persisted.insert("sidebarOpen".to_string(), json!(false));

        let merged = merge(&default, persisted);
        assert_eq!(merged.theme, default.theme);
        assert!(!merged.sidebar_open);
        assert_eq!(merged.conversations, state.conversations);
        assert_eq!(merged.active_conversation_id.as_deref(), Some("1"));
    }

    #[test]
    fn test_misshapen_conversations_fall_back_alone() {
        let default = AppState::default();
        let merged = merge(
            &default,
            object(json!({"conversations": "oops", "theme": "dark"})),
        );
        assert!(merged.conversations.is_empty());
        assert_eq!(merged.theme, Theme::Dark);
    }
}
