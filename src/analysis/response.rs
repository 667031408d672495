use crate::client::RawResponse;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// A remote response that could not be turned into structured data
#[derive(Debug, Clone, Error)]
#[error("Malformed response: {reason}")]
pub struct MalformedResponse {
    pub reason: String,
    /// The payload as received, kept for diagnostics
    pub raw: String,
}

impl MalformedResponse {
    pub(crate) fn new(reason: impl Into<String>, raw: impl Into<String>) -> Self {
        let error = Self {
            reason: reason.into(),
            raw: raw.into(),
        };
        warn!(reason = %error.reason, raw = %error.raw, "Could not coerce analysis response");
        error
    }
}

/// Coerces a remote response into a JSON value
///
/// Structured responses pass through unchanged. Text responses are searched
/// for the leftmost `{` and the rightmost `}` and the span between them,
/// inclusive, is parsed as JSON. Multiple separate objects in one response
/// therefore produce a span that does not parse.
pub fn coerce(raw: RawResponse) -> Result<Value, MalformedResponse> {
    match raw {
        RawResponse::Structured(value) => Ok(value),
        RawResponse::Text(text) => {
            let json_str = extract_json_object(&text).ok_or_else(|| {
                MalformedResponse::new("No JSON object found in response", text.as_str())
            })?;

            debug!("Parsing embedded JSON ({} of {} chars)", json_str.len(), text.len());

            serde_json::from_str(json_str)
                .map_err(|e| MalformedResponse::new(format!("Invalid JSON: {}", e), text.as_str()))
        }
    }
}

/// Returns the leftmost-`{` to rightmost-`}` span of `text`, if any
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if start < end {
        Some(&text[start..=end])
    } else {
        None
    }
}
