//! User domain model.

use serde::{Deserialize, Serialize};

use crate::catalog::RoleOption;

/// The signed-in operator.
///
/// Set on login and cleared on logout. The session has no lifecycle of its
/// own; it lives and dies with the application state tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub display_name: String,
    /// Role identifier, matching a `RoleOption::id` from the role catalog.
    pub role: String,
    /// Single glyph shown as the user's avatar.
    pub avatar_glyph: String,
}

impl User {
    /// Builds a user for the given role, taking the avatar glyph from the role.
    pub fn from_role(
        id: impl Into<String>,
        display_name: impl Into<String>,
        role: &RoleOption,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            role: role.id.clone(),
            avatar_glyph: role.avatar_glyph.clone(),
        }
    }
}
