//! Errors produced by the remote call adapter
//!
//! Every transport or remote failure of a call is folded into one error type
//! per call kind, so callers only ever deal with a single error channel.

use thiserror::Error;

/// Message used when the extraction service gives no reason of its own
pub const EXTRACTION_FALLBACK_MESSAGE: &str = "Failed to parse website";

/// The content extraction call failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Content extraction failed: {message}")]
pub struct ExtractionError {
    pub message: String,
}

impl ExtractionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Uses the server-supplied message when there is one
    pub fn from_server_message(message: Option<String>) -> Self {
        match message {
            Some(message) if !message.trim().is_empty() => Self::new(message),
            _ => Self::fallback(),
        }
    }

    pub fn fallback() -> Self {
        Self::new(EXTRACTION_FALLBACK_MESSAGE)
    }
}

/// An analysis call failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Analysis call failed{}: {body}", status_suffix(.status))]
pub struct AnalysisCallError {
    /// HTTP status, absent for transport failures
    pub status: Option<u16>,
    /// Raw response body, or the transport error text
    pub body: String,
}

impl AnalysisCallError {
    pub fn new(status: Option<u16>, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(None, message)
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({})", s)).unwrap_or_default()
}
