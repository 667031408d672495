//! Wire types for the analysis service

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of a successful content extraction
///
/// The body is opaque to the pipeline; only the success of the call matters,
/// because the service keeps the extracted page for subsequent analyses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageContent {
    pub body: Value,
}

impl PageContent {
    pub fn new(body: Value) -> Self {
        Self { body }
    }
}

/// Answer returned by an analysis call, before coercion
#[derive(Debug, Clone, PartialEq)]
pub enum RawResponse {
    Text(String),
    Structured(Value),
}

impl RawResponse {
    pub fn text(content: impl Into<String>) -> Self {
        RawResponse::Text(content.into())
    }

    pub fn structured(value: Value) -> Self {
        RawResponse::Structured(value)
    }
}

impl From<Value> for RawResponse {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => RawResponse::Text(text),
            other => RawResponse::Structured(other),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ParseWebsiteRequest<'a> {
    pub url: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct LlmCallRequest<'a> {
    pub query: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LlmCallResponse {
    pub answer: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_response_from_string_answer() {
        assert_eq!(
            RawResponse::from(json!("plain text")),
            RawResponse::Text("plain text".to_string())
        );
    }

    #[test]
    fn test_raw_response_from_object_answer() {
        let value = json!({"grade": "A"});
        assert_eq!(
            RawResponse::from(value.clone()),
            RawResponse::Structured(value)
        );
    }

    #[test]
    fn test_request_bodies() {
        let body = serde_json::to_value(LlmCallRequest { query: "q" }).unwrap();
        assert_eq!(body, json!({"query": "q"}));

        let body = serde_json::to_value(ParseWebsiteRequest {
            url: "https://example.com",
        })
        .unwrap();
        assert_eq!(body, json!({"url": "https://example.com"}));
    }
}
