//! Writes conversation exports to disk.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use ireno_core::error::Result;
use ireno_core::export::{ExportDocument, export_file_name};
use ireno_core::state::AppState;

/// Result of [`write_export`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The document was written to this path.
    Written(PathBuf),
    /// The state holds no conversations; no file was produced.
    NothingToExport,
}

/// Writes the conversations in `state` as a pretty-printed JSON document
/// into `dir`, naming the file after the date of `now`.
///
/// An existing export from the same day is overwritten.
pub fn write_export(state: &AppState, dir: &Path, now: DateTime<Utc>) -> Result<ExportOutcome> {
    let Some(document) = ExportDocument::from_state(state, now) else {
        tracing::info!("no conversations to export");
        return Ok(ExportOutcome::NothingToExport);
    };

    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(now.date_naive()));
    let content = serde_json::to_string_pretty(&document)?;
    fs::write(&path, content)?;

    tracing::info!(
        path = %path.display(),
        conversations = document.conversation_count,
        "exported conversations"
    );
    Ok(ExportOutcome::Written(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ireno_core::conversation::{Conversation, Message};
    use ireno_core::state::{Action, transition};
    use tempfile::TempDir;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap()
    }

    #[test]
    fn test_nothing_to_export_writes_no_file() {
        let temp_dir = TempDir::new().unwrap();
        let outcome = write_export(&AppState::default(), temp_dir.path(), fixed_now()).unwrap();

        assert_eq!(outcome, ExportOutcome::NothingToExport);
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_writes_dated_json_document() {
        let temp_dir = TempDir::new().unwrap();
        let state = transition(
            &AppState::default(),
            Action::AddConversation(Conversation::new("1", "Brooklyn comms")),
        );
        let state = transition(
            &state,
            Action::AddMessage {
                conversation_id: "1".to_string(),
                message: Message::user("Any comms issues in Brooklyn?"),
            },
        );

        let outcome = write_export(&state, &temp_dir.path().join("out"), fixed_now()).unwrap();
        let ExportOutcome::Written(path) = outcome else {
            panic!("expected a written export");
        };
        assert!(path.ends_with("out/ireno-chat-export-2026-10-19.json"));

        let document: ExportDocument =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(document.conversation_count, 1);
        assert_eq!(document.conversations[0].messages.len(), 1);
        assert_eq!(document.exported_at, fixed_now().to_rfc3339());
    }
}
