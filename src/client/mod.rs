//! Remote call adapter
//!
//! This module provides a trait-based abstraction over the analysis service,
//! allowing the HTTP implementation and the scripted mock to be used
//! interchangeably by the pipeline.

mod client;
pub mod error;
mod http;
mod mock;
mod types;

pub use client::AnalysisClient;
pub use error::{AnalysisCallError, ExtractionError, EXTRACTION_FALLBACK_MESSAGE};
pub use http::HttpAnalysisClient;
pub use mock::{MockAnalysisClient, MockResponse};
pub use types::{PageContent, RawResponse};
