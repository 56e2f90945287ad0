//! Code-owned reference catalogs.
//!
//! Roles and quick-start prompts ship with the binary. They are written into
//! the persisted blob along with everything else but are always restored from
//! these defaults on load, so an updated catalog is never shadowed by a stale
//! copy in storage.

mod model;

pub use model::{
    PromptCategory, QuickPrompt, RoleOption, default_quick_prompts, default_user_roles,
};
