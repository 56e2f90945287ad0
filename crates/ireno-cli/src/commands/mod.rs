pub mod chat;
pub mod config;
pub mod conversations;
pub mod export;
pub mod search;
pub mod status;
