use serde::{Deserialize, Serialize};

/// Session id sent to the backend when the caller has no session of its own.
pub const DEFAULT_SESSION_ID: &str = "default";

/// A natural-language query scoped to one taxpayer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub query: String,
    pub taxpayer_id: String,
    pub session_id: String,
}

impl QueryRequest {
    pub fn new(
        query: impl Into<String>,
        taxpayer_id: impl Into<String>,
        session_id: Option<String>,
    ) -> Self {
        Self {
            query: query.into(),
            taxpayer_id: taxpayer_id.into(),
            session_id: session_id.unwrap_or_else(|| DEFAULT_SESSION_ID.to_string()),
        }
    }
}

/// The backend's answer to a query.
///
/// The query-processing contract is opaque to this client, so decoding is
/// deliberately lenient: everything beyond `response` is optional, result
/// rows stay untyped JSON, and a missing `response` decodes as empty (the
/// caller substitutes fallback text).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub sql_query: Option<String>,
    #[serde(default)]
    pub data: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub execution_time_ms: Option<u64>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<jiff::Timestamp>,
}
