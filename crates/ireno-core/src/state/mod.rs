//! Application state domain module.
//!
//! # Module Structure
//!
//! - `model`: the whole state tree (`AppState`, `Theme`)
//! - `action`: every transition the state accepts (`Action`)
//! - `reducer`: the pure transition function
//! - `codec`: blob encoding and shape-checked decoding
//! - `merge`: hydration merge with catalog protection
//! - `listener`: observer interface for settled states

mod action;
mod codec;
mod listener;
mod merge;
mod model;
mod reducer;

pub use action::Action;
pub use codec::{CodecError, DecodeError, decode, encode};
pub use listener::StateListener;
pub use merge::{CATALOG_FIELDS, merge};
pub use model::{AppState, Theme};
pub use reducer::transition;
