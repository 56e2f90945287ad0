//! Chat backend domain module.
//!
//! The backend is an external collaborator: it answers chat messages,
//! serves chart data, searches SOP documents and reports its own status.
//! This module holds the payload types and the trait the application layer
//! talks to; the HTTP implementation lives in `ireno-interaction`.
//!
//! - `model`: request and response payloads
//! - `client`: the `ChatBackend` trait

mod client;
mod model;

pub use client::ChatBackend;
pub use model::{
    ChartPayload, ChartPoint, ChatRequest, ChatResponse, HealthStatus, SearchType,
    SopSearchRequest, SopSearchResponse, SopSearchResult, SystemStatus,
};
