//! Backend payload types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Reply of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// One slice or bar of a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub name: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

/// Reply of `GET /api/charts`.
///
/// Accepts both the snake_case shape and the camelCase one served by the
/// collector dashboard backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPayload {
    #[serde(alias = "chartData")]
    pub chart_data: Vec<ChartPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, alias = "chartType", skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<String>,
    #[serde(default, alias = "totalCollectors", skip_serializing_if = "Option::is_none")]
    pub total_collectors: Option<u64>,
    #[serde(default, alias = "onlineCollectors", skip_serializing_if = "Option::is_none")]
    pub online_collectors: Option<u64>,
    #[serde(default, alias = "offlineCollectors", skip_serializing_if = "Option::is_none")]
    pub offline_collectors: Option<u64>,
    #[serde(default, alias = "uptimePercentage", skip_serializing_if = "Option::is_none")]
    pub uptime_percentage: Option<f64>,
}

impl ChartPayload {
    /// Sum of all point values.
    pub fn total(&self) -> f64 {
        self.chart_data.iter().map(|p| p.value).sum()
    }
}

/// SOP search mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SearchType {
    /// Plain keyword snippets.
    #[default]
    Basic,
    /// Scored snippets with highlights and surrounding context.
    Advanced,
}

/// Body of `POST /api/sop-search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SopSearchRequest {
    pub query: String,
    pub max_results: usize,
    pub search_type: SearchType,
}

impl SopSearchRequest {
    pub const DEFAULT_MAX_RESULTS: usize = 15;

    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_results: Self::DEFAULT_MAX_RESULTS,
            search_type: SearchType::Basic,
        }
    }

    pub fn with_search_type(mut self, search_type: SearchType) -> Self {
        self.search_type = search_type;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

/// One search hit. Basic searches fill `snippet`, `result_number` and
/// `match_type`; advanced searches add score, source and context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SopSearchResult {
    pub snippet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_after: Option<String>,
}

/// Reply of `POST /api/sop-search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SopSearchResponse {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub search_type: SearchType,
    #[serde(default)]
    pub results: Vec<SopSearchResult>,
    #[serde(default)]
    pub total_found: usize,
    #[serde(default)]
    pub message: Option<String>,
}

/// Reply of `GET /api/system-status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub chat_system: String,
    pub data_source: String,
    pub total_collectors: u64,
    pub zones_available: u32,
}

/// Reply of the health endpoint: a status word plus whatever details the
/// backend chooses to report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chart_payload_accepts_dashboard_shape() {
        let payload: ChartPayload = serde_json::from_value(json!({
            "chartData": [
                {"name": "Online", "value": 391, "fill": "#10B981", "percentage": 94.2},
                {"name": "Offline", "value": 24, "fill": "#EF4444", "percentage": 5.8}
            ],
            "totalCollectors": 415,
            "uptimePercentage": 94.2
        }))
        .unwrap();
        assert_eq!(payload.chart_data.len(), 2);
        assert_eq!(payload.total_collectors, Some(415));
        assert_eq!(payload.total(), 415.0);
        assert!(payload.title.is_none());
    }

    #[test]
    fn test_chart_payload_accepts_snake_case_shape() {
        let payload: ChartPayload = serde_json::from_value(json!({
            "chart_data": [{"name": "Brooklyn", "value": 8}],
            "title": "Offline by zone",
            "chart_type": "bar"
        }))
        .unwrap();
        assert_eq!(payload.chart_type.as_deref(), Some("bar"));
        assert_eq!(payload.title.as_deref(), Some("Offline by zone"));
    }

    #[test]
    fn test_search_request_serializes_lowercase_type() {
        let request = SopSearchRequest::new("outage").with_search_type(SearchType::Advanced);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["search_type"], "advanced");
        assert_eq!(json["max_results"], 15);
    }

    #[test]
    fn test_health_keeps_details() {
        let health: HealthStatus = serde_json::from_value(json!({
            "status": "healthy",
            "azure_storage_status": "connected"
        }))
        .unwrap();
        assert!(health.is_healthy());
        assert_eq!(health.details["azure_storage_status"], "connected");
    }
}
