//! Observer interface for settled states.

use super::model::AppState;

/// Receives every settled state, once per completed transition.
///
/// Listeners are registered once at startup with the conversation store.
/// They must not fail: whatever they do with the state (persisting it,
/// rendering it) is best effort and never feeds back into the transition.
pub trait StateListener: Send + Sync {
    fn on_state(&self, state: &AppState);
}
