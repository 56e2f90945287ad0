//! Blob codec for the persisted state.
//!
//! Encoding is a full JSON serialization of [`AppState`]. Decoding only goes
//! as far as a JSON object; turning that object into a state is the job of
//! [`merge`](super::merge), which needs the defaults to fill gaps.

use serde_json::{Map, Value};
use thiserror::Error;

use super::model::AppState;

/// Failure to turn a state into a blob.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode state: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// The persisted blob is unusable.
///
/// Callers treat every variant the same way: discard the blob and start
/// from defaults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The blob is not valid JSON.
    #[error("persisted state is not valid JSON: {0}")]
    Parse(String),
    /// The blob parsed, but the top level is not an object.
    #[error("persisted state is a JSON {0}, expected an object")]
    NotAnObject(&'static str),
}

/// Serializes the whole state tree into one blob.
pub fn encode(state: &AppState) -> Result<String, CodecError> {
    Ok(serde_json::to_string(state)?)
}

/// Parses a blob into its top-level object.
pub fn decode(blob: &str) -> Result<Map<String, Value>, DecodeError> {
    let value: Value =
        serde_json::from_str(blob).map_err(|e| DecodeError::Parse(e.to_string()))?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(DecodeError::NotAnObject(json_kind(&other))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_rejects_non_json() {
        assert!(matches!(decode("not json"), Err(DecodeError::Parse(_))));
        assert!(matches!(decode(""), Err(DecodeError::Parse(_))));
    }

    #[test]
    fn test_decode_rejects_non_objects() {
        assert_eq!(decode("null"), Err(DecodeError::NotAnObject("null")));
        assert_eq!(decode("42"), Err(DecodeError::NotAnObject("number")));
        assert_eq!(decode("\"state\""), Err(DecodeError::NotAnObject("string")));
        assert_eq!(decode("[1,2]"), Err(DecodeError::NotAnObject("array")));
    }

    #[test]
    fn test_encode_uses_persisted_field_names() {
        let blob = encode(&AppState::default()).unwrap();
        let map = decode(&blob).unwrap();
        for key in [
            "user",
            "theme",
            "sidebarOpen",
            "conversations",
            "activeConversationId",
            "isTyping",
            "userRoles",
            "quickPrompts",
        ] {
            assert!(map.contains_key(key), "missing {key}");
        }
    }
}
