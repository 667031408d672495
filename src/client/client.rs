use super::error::{AnalysisCallError, ExtractionError};
use super::types::{PageContent, RawResponse};
use crate::analysis::compose_query;
use async_trait::async_trait;

/// Outbound calls to the product analysis service
///
/// Implementations make exactly one attempt per call and impose no timeout of
/// their own beyond the transport's.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    /// Asks the service to fetch and extract the product page at `url`
    async fn extract_content(&self, url: &str) -> Result<PageContent, ExtractionError>;

    /// Sends a fully composed analysis query
    async fn query(&self, query: &str) -> Result<RawResponse, AnalysisCallError>;

    /// Sends an instruction with its expected schema description appended
    async fn run_analysis(
        &self,
        instruction: &str,
        schema: &str,
    ) -> Result<RawResponse, AnalysisCallError> {
        self.query(&compose_query(instruction, schema)).await
    }

    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct EchoClient {
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AnalysisClient for EchoClient {
        async fn extract_content(&self, _url: &str) -> Result<PageContent, ExtractionError> {
            Ok(PageContent::default())
        }

        async fn query(&self, query: &str) -> Result<RawResponse, AnalysisCallError> {
            self.queries.lock().unwrap().push(query.to_string());
            Ok(RawResponse::text(query))
        }

        fn name(&self) -> &str {
            "EchoClient"
        }
    }

    #[tokio::test]
    async fn test_run_analysis_composes_query() {
        let client = EchoClient::default();
        let response = client.run_analysis("Grade it", "{\"grade\": string}").await.unwrap();

        assert_eq!(
            response,
            RawResponse::text("Grade it\n\n{\"grade\": string}")
        );
        assert_eq!(client.queries.lock().unwrap().len(), 1);
        assert_eq!(client.name(), "EchoClient");
    }
}
