//! HttpChatBackend - REST client for the assistant backend.
//!
//! Talks JSON over HTTP to the Flask service that fronts the collector data
//! and the SOP document store. Every failure surfaces as
//! `IrenoError::Backend`; no request is retried.

use std::time::Duration;

use async_trait::async_trait;
use ireno_core::backend::{
    ChartPayload, ChatBackend, ChatRequest, ChatResponse, HealthStatus, SopSearchRequest,
    SopSearchResponse, SystemStatus,
};
use ireno_core::config::BackendSettings;
use ireno_core::error::{IrenoError, Result};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

const CHAT_PATH: &str = "/api/chat";
const CHARTS_PATH: &str = "/api/charts";
const SOP_SEARCH_PATH: &str = "/api/sop-search";
const RESET_MEMORY_PATH: &str = "/api/reset-memory";
const SYSTEM_STATUS_PATH: &str = "/api/system-status";
const HEALTH_PATH: &str = "/health";

/// [`ChatBackend`] implementation over `reqwest`.
#[derive(Clone)]
pub struct HttpChatBackend {
    client: Client,
    base_url: String,
}

impl HttpChatBackend {
    /// Creates a backend for `base_url` with the given per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| IrenoError::backend(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Creates a backend from the `[backend]` config section.
    pub fn from_settings(settings: &BackendSettings) -> Result<Self> {
        Self::new(
            settings.base_url.clone(),
            Duration::from_secs(settings.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> Result<Response> {
        tracing::debug!(path, "GET");
        self.client
            .get(self.url(path))
            .send()
            .await
            .map_err(|err| map_transport_error(path, err))
    }

    async fn post<B: serde::Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        tracing::debug!(path, "POST");
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|err| map_transport_error(path, err))
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn send_message(&self, message: &str) -> Result<String> {
        let request = ChatRequest {
            message: message.to_string(),
        };
        let response = self.post(CHAT_PATH, &request).await?;
        let parsed: ChatResponse = parse_success(CHAT_PATH, response).await?;
        Ok(parsed.response)
    }

    async fn fetch_chart(&self) -> Result<ChartPayload> {
        let response = self.get(CHARTS_PATH).await?;
        parse_success(CHARTS_PATH, response).await
    }

    async fn search_documents(&self, request: &SopSearchRequest) -> Result<SopSearchResponse> {
        let response = self.post(SOP_SEARCH_PATH, request).await?;
        parse_success(SOP_SEARCH_PATH, response).await
    }

    async fn reset_memory(&self) -> Result<()> {
        let response = self
            .post(RESET_MEMORY_PATH, &serde_json::json!({}))
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_error(RESET_MEMORY_PATH, status, &body));
        }
        Ok(())
    }

    async fn system_status(&self) -> Result<SystemStatus> {
        let response = self.get(SYSTEM_STATUS_PATH).await?;
        parse_success(SYSTEM_STATUS_PATH, response).await
    }

    async fn health(&self) -> Result<HealthStatus> {
        let response = self.get(HEALTH_PATH).await?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| map_transport_error(HEALTH_PATH, err))?;

        // An unhealthy backend answers 500 with a status body.
        if status.is_success() || status.is_server_error() {
            if let Ok(health) = serde_json::from_str::<HealthStatus>(&body) {
                return Ok(health);
            }
        }
        if !status.is_success() {
            return Err(map_http_error(HEALTH_PATH, status, &body));
        }
        Err(IrenoError::backend(format!(
            "Failed to parse {HEALTH_PATH} response"
        )))
    }
}

/// Decodes a 2xx JSON body, mapping everything else to a backend error.
async fn parse_success<T: DeserializeOwned>(path: &str, response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(map_http_error(path, status, &body));
    }

    response.json::<T>().await.map_err(|err| {
        IrenoError::backend_status(
            status.as_u16(),
            format!("Failed to parse {path} response: {err}"),
        )
    })
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

fn map_http_error(path: &str, status: StatusCode, body: &str) -> IrenoError {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .unwrap_or_else(|| body.trim().to_string());

    tracing::warn!(path, status = status.as_u16(), %detail, "backend returned an error status");
    IrenoError::backend_status(status.as_u16(), format!("{path} returned {status}: {detail}"))
}

fn map_transport_error(path: &str, err: reqwest::Error) -> IrenoError {
    let kind = if err.is_timeout() {
        "timed out"
    } else if err.is_connect() {
        "could not connect"
    } else {
        "failed"
    };
    tracing::warn!(path, error = %err, "backend request {kind}");
    IrenoError::backend(format!("Request to {path} {kind}: {err}"))
}
