use super::client::AnalysisClient;
use super::error::{AnalysisCallError, ExtractionError};
use super::types::{PageContent, RawResponse};
use crate::analysis::{find_step, StepKey};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Scripted analysis client for tests
///
/// Analysis steps run concurrently, so responses are keyed by the query they
/// answer rather than queued in call order. Every call is recorded.
pub struct MockAnalysisClient {
    extraction: Mutex<Result<PageContent, ExtractionError>>,
    responses: Mutex<HashMap<String, MockResponse>>,
    fallback: Mutex<Option<MockResponse>>,
    extraction_calls: Mutex<Vec<String>>,
    queries: Mutex<Vec<String>>,
    name: String,
}

#[derive(Debug, Clone)]
pub struct MockResponse {
    pub outcome: Result<RawResponse, AnalysisCallError>,
    pub delay: Option<Duration>,
}

impl MockResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            outcome: Ok(RawResponse::text(content)),
            delay: None,
        }
    }

    pub fn structured(value: serde_json::Value) -> Self {
        Self {
            outcome: Ok(RawResponse::Structured(value)),
            delay: None,
        }
    }

    pub fn error(error: AnalysisCallError) -> Self {
        Self {
            outcome: Err(error),
            delay: None,
        }
    }

    /// A transport failure as produced by a timed-out request
    pub fn timeout() -> Self {
        Self::error(AnalysisCallError::transport("operation timed out"))
    }

    /// Delays the response, to exercise out-of-order completion
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl MockAnalysisClient {
    pub fn new() -> Self {
        Self::with_name("MockAnalysis")
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            extraction: Mutex::new(Ok(PageContent::default())),
            responses: Mutex::new(HashMap::new()),
            fallback: Mutex::new(None),
            extraction_calls: Mutex::new(Vec::new()),
            queries: Mutex::new(Vec::new()),
            name: name.into(),
        }
    }

    pub fn fail_extraction(&self, error: ExtractionError) {
        *self.extraction.lock().unwrap() = Err(error);
    }

    /// Scripts the answer to a fully composed query
    pub fn add_response(&self, query: impl Into<String>, response: MockResponse) {
        self.responses.lock().unwrap().insert(query.into(), response);
    }

    /// Scripts the answer for a catalog step
    pub fn respond_to(&self, key: StepKey, response: MockResponse) {
        if let Some(step) = find_step(key) {
            self.add_response(step.query(), response);
        }
    }

    /// Answer used for queries with no scripted response
    pub fn set_fallback(&self, response: MockResponse) {
        *self.fallback.lock().unwrap() = Some(response);
    }

    pub fn extraction_calls(&self) -> Vec<String> {
        self.extraction_calls.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.extraction_calls.lock().unwrap().len() + self.queries.lock().unwrap().len()
    }
}

impl Default for MockAnalysisClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnalysisClient for MockAnalysisClient {
    async fn extract_content(&self, url: &str) -> Result<PageContent, ExtractionError> {
        self.extraction_calls.lock().unwrap().push(url.to_string());
        let outcome = self.extraction.lock().unwrap().clone();
        outcome
    }

    async fn query(&self, query: &str) -> Result<RawResponse, AnalysisCallError> {
        self.queries.lock().unwrap().push(query.to_string());

        let scripted = self.responses.lock().unwrap().get(query).cloned();
        let response = scripted
            .or_else(|| self.fallback.lock().unwrap().clone())
            .ok_or_else(|| {
                AnalysisCallError::transport("MockAnalysisClient: no response scripted for query")
            })?;

        if let Some(delay) = response.delay {
            tokio::time::sleep(delay).await;
        }

        response.outcome
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for MockAnalysisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockAnalysisClient")
            .field("name", &self.name)
            .field("scripted_responses", &self.responses.lock().unwrap().len())
            .finish()
    }
}
