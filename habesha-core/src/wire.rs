//! Error bodies as clients see them
//!
//! The API answers failures with `{ "error": { "code", "message", "fields"? } }`.
//! Both the CLI client and the browser read the message out of that shape.

use serde::Deserialize;

use crate::validation::FormErrors;

/// Shown when neither the body nor the transport explains a failure
pub const UNKNOWN_API_ERROR: &str = "An unknown API error occurred.";

#[derive(Debug, Deserialize)]
struct Envelope {
    error: ErrorDetail,
}

/// The `error` object of a failed response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub fields: Option<FormErrors>,
}

/// Parse an error body; `None` when it is not the API's error shape
pub fn parse_error_body(body: &str) -> Option<ErrorDetail> {
    serde_json::from_str::<Envelope>(body).ok().map(|e| e.error)
}

/// Pick the message to show for a failed request.
///
/// Prefers the server's message, then the transport error, then a
/// generic fallback.
pub fn failure_message(body: Option<&str>, transport: Option<&str>) -> String {
    body.and_then(parse_error_body)
        .map(|detail| detail.message)
        .filter(|m| !m.trim().is_empty())
        .or_else(|| {
            transport
                .map(str::to_string)
                .filter(|m| !m.trim().is_empty())
        })
        .unwrap_or_else(|| UNKNOWN_API_ERROR.to_string())
}
