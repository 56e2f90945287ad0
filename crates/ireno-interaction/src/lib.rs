//! Client side of the IRENO assistant backend.

pub mod http_backend;

pub use crate::http_backend::HttpChatBackend;
