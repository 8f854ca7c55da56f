//! Edge event envelope types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::http::response::Redirect;
use crate::query::QueryParams;
use crate::routing::NormalizedRequest;

/// Inbound event; only the request is used.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EdgeEvent {
    pub request: EdgeRequest,
}

/// `{ "value": ... }` wrapper used for headers and query parameters.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EdgeValue {
    pub value: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EdgeValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            extra: Map::new(),
        }
    }
}

/// Viewer request as delivered by the edge runtime.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EdgeRequest {
    /// Path without the query string.
    pub uri: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub querystring: Option<IndexMap<String, EdgeValue>>,

    #[serde(default)]
    pub headers: IndexMap<String, EdgeValue>,

    /// Everything else (method, client IP, cookies, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EdgeRequest {
    pub fn host(&self) -> &str {
        self.headers.get("host").map(|h| h.value.as_str()).unwrap_or("")
    }

    pub fn query(&self) -> QueryParams {
        self.querystring
            .iter()
            .flatten()
            .map(|(key, param)| (key.clone(), param.value.clone()))
            .collect()
    }

    pub fn normalize(&self) -> NormalizedRequest {
        NormalizedRequest::new(self.host(), self.uri.clone(), self.query())
    }
}

/// Redirect response object returned to the edge runtime.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeResponse {
    pub status_code: u16,
    pub status_description: String,
    pub headers: IndexMap<String, EdgeValue>,
}

impl From<Redirect> for EdgeResponse {
    fn from(redirect: Redirect) -> Self {
        let mut headers = IndexMap::new();
        headers.insert("location".to_string(), EdgeValue::new(redirect.location.clone()));
        Self {
            status_code: redirect.status_code(),
            status_description: redirect.status_text().to_string(),
            headers,
        }
    }
}

/// What the edge runtime receives back.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EdgeOutcome {
    Response(EdgeResponse),
    /// No redirect; the original request, unchanged.
    Request(EdgeRequest),
}
