//! HTTP client for the product analysis service
//!
//! Talks to two endpoints:
//!
//! - `POST {base}/parse-website` with `{"url": ...}`
//! - `POST {base}/llm-call` with `{"query": ...}`, answering `{"answer": ...}`
//!
//! # Example
//!
//! ```no_run
//! use foodlens::client::{AnalysisClient, HttpAnalysisClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpAnalysisClient::new("http://localhost:8000");
//! client.extract_content("https://example.com/product/42").await?;
//! let answer = client.run_analysis("Classify the product", "{\"category\": string}").await?;
//! println!("{:?}", answer);
//! # Ok(())
//! # }
//! ```

use super::client::AnalysisClient;
use super::error::{AnalysisCallError, ExtractionError};
use super::types::{
    ErrorBody, LlmCallRequest, LlmCallResponse, PageContent, ParseWebsiteRequest, RawResponse,
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, error, warn};

pub struct HttpAnalysisClient {
    base_url: String,
    http_client: Client,
}

impl HttpAnalysisClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Uses a preconfigured `reqwest` client
    pub fn with_client(base_url: impl Into<String>, http_client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http_client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl AnalysisClient for HttpAnalysisClient {
    async fn extract_content(&self, url: &str) -> Result<PageContent, ExtractionError> {
        let endpoint = self.endpoint("parse-website");
        debug!("Requesting content extraction for {} via {}", url, endpoint);

        let start = Instant::now();
        let response = self
            .http_client
            .post(&endpoint)
            .json(&ParseWebsiteRequest { url })
            .send()
            .await
            .map_err(|e| {
                error!("Content extraction request failed: {}", e);
                ExtractionError::fallback()
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read content extraction response: {}", e);
            ExtractionError::fallback()
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error);
            warn!(
                status = status.as_u16(),
                "Content extraction rejected: {}",
                message.as_deref().unwrap_or("<no message>")
            );
            return Err(ExtractionError::from_server_message(message));
        }

        debug!(
            "Content extraction completed in {:?} ({} bytes)",
            start.elapsed(),
            body.len()
        );

        let body = serde_json::from_str(&body).unwrap_or(Value::String(body));
        Ok(PageContent::new(body))
    }

    async fn query(&self, query: &str) -> Result<RawResponse, AnalysisCallError> {
        let endpoint = self.endpoint("llm-call");
        debug!("Sending analysis query ({} chars)", query.len());

        let start = Instant::now();
        let response = self
            .http_client
            .post(&endpoint)
            .json(&LlmCallRequest { query })
            .send()
            .await
            .map_err(|e| {
                error!("Analysis request failed: {}", e);
                AnalysisCallError::transport(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalysisCallError::new(Some(status.as_u16()), e.to_string()))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Analysis call rejected");
            return Err(AnalysisCallError::new(Some(status.as_u16()), body));
        }

        debug!("Analysis call completed in {:?}", start.elapsed());

        match serde_json::from_str::<LlmCallResponse>(&body) {
            Ok(LlmCallResponse {
                answer: Some(answer),
            }) => Ok(RawResponse::from(answer)),
            _ => {
                warn!("Analysis response has no answer field");
                Err(AnalysisCallError::new(Some(status.as_u16()), body))
            }
        }
    }

    fn name(&self) -> &str {
        "http"
    }
}

impl std::fmt::Debug for HttpAnalysisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAnalysisClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}
