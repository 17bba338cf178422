//! API request/response types.

use serde::{Deserialize, Serialize};

/// Inbound quiz request. Fields are optional so validation can answer with
/// the right status per missing/mismatched field.
#[derive(Debug, Clone, Deserialize)]
pub struct QuizRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub email: String,
}

/// Structured error body returned for rejected or failed requests.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            kind: None,
        }
    }

    pub fn with_kind(error: impl Into<String>, kind: &'static str) -> Self {
        Self {
            error: error.into(),
            kind: Some(kind),
        }
    }
}
