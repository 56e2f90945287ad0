//! User session domain module.
//!
//! - `model`: the signed-in user (`User`)

mod model;

pub use model::User;
