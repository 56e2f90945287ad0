//! Chat backend trait.

use async_trait::async_trait;

use super::model::{ChartPayload, HealthStatus, SopSearchRequest, SopSearchResponse, SystemStatus};
use crate::error::Result;

/// Remote assistant backend.
///
/// Every method maps transport failures, non-success statuses and malformed
/// payloads to `IrenoError::Backend`. Callers in the application layer turn
/// those into user-facing fallbacks; nothing here retries.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Sends one user message and returns the assistant's reply text.
    async fn send_message(&self, message: &str) -> Result<String>;

    /// Fetches the chart shown when a reply carries the chart marker.
    async fn fetch_chart(&self) -> Result<ChartPayload>;

    /// Keyword search over the SOP document store.
    async fn search_documents(&self, request: &SopSearchRequest) -> Result<SopSearchResponse>;

    /// Clears the backend's conversational memory.
    async fn reset_memory(&self) -> Result<()>;

    async fn system_status(&self) -> Result<SystemStatus>;

    async fn health(&self) -> Result<HealthStatus>;
}
