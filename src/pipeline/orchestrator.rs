use super::error::{PipelineError, StepError};
use super::run::{PipelineRun, RunState};
use crate::analysis::{
    coerce, AnalysisStep, CompositeReport, StepKey, StepResult,
    EXTRACTION_STAGE, STEP_CATALOG,
};
use crate::client::AnalysisClient;
use crate::progress::{NoOpHandler, ProgressHandler};
use futures_util::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Runs the product analysis: content extraction, then every catalog step
/// concurrently, then merges whatever succeeded
pub struct AnalysisPipeline {
    client: Arc<dyn AnalysisClient>,
    progress_handler: Arc<dyn ProgressHandler>,
}

impl AnalysisPipeline {
    pub fn new(client: Arc<dyn AnalysisClient>) -> Self {
        Self {
            client,
            progress_handler: Arc::new(NoOpHandler),
        }
    }

    pub fn with_progress(mut self, handler: Arc<dyn ProgressHandler>) -> Self {
        self.progress_handler = handler;
        self
    }

    pub fn steps(&self) -> &'static [AnalysisStep] {
        &STEP_CATALOG
    }

    /// Analyzes the product at `url` in a fresh [`PipelineRun`]
    pub async fn run(&self, url: &str) -> Result<CompositeReport, PipelineError> {
        let run = PipelineRun::new(STEP_CATALOG.len(), self.progress_handler.clone());
        self.execute(&run, url).await
    }

    /// Analyzes the product at `url`, recording state in `run`
    ///
    /// A run context can only be used once; passing a run that has already
    /// started is rejected as invalid input.
    pub async fn execute(
        &self,
        run: &PipelineRun,
        url: &str,
    ) -> Result<CompositeReport, PipelineError> {
        if let Err(state) = run.begin() {
            return Err(PipelineError::InvalidInput(format!(
                "pipeline run {} has already been used (state: {})",
                run.id(),
                state
            )));
        }

        if url.trim().is_empty() {
            warn!("Rejecting analysis request with empty product URL");
            run.fail();
            return Err(PipelineError::InvalidInput(
                "product URL must not be empty".to_string(),
            ));
        }

        let span = info_span!("pipeline_run", run_id = %run.id(), client = self.client.name());
        self.execute_inner(run, url).instrument(span).await
    }

    async fn execute_inner(
        &self,
        run: &PipelineRun,
        url: &str,
    ) -> Result<CompositeReport, PipelineError> {
        let start = Instant::now();
        info!(url = %url, "Starting product analysis");

        run.start(EXTRACTION_STAGE);

        if let Err(e) = self.client.extract_content(url).await {
            error!("Content extraction failed: {}", e);
            run.fail();
            return Err(PipelineError::Extraction(e));
        }
        debug!("Content extraction complete in {:?}", start.elapsed());

        run.transition(RunState::Analyzing);
        run.advance();

        let mut pending: FuturesUnordered<_> = STEP_CATALOG
            .iter()
            .map(|step| self.analyze_step(run, step))
            .collect();

        let mut report = CompositeReport::new();
        let mut failures = Vec::new();

        while let Some((key, outcome)) = pending.next().await {
            run.advance();
            match outcome {
                Ok(result) => {
                    debug!(step = %key, "Analysis step succeeded");
                    report.insert(result);
                }
                Err(e) => {
                    warn!(step = %key, error = %e, "Analysis step failed, leaving it out of the report");
                    failures.push((key, e));
                }
            }
        }

        if report.is_empty() {
            error!(
                "All {} analysis steps failed after {:?}",
                failures.len(),
                start.elapsed()
            );
            run.fail();
            return Err(PipelineError::AllStepsFailed { failures });
        }

        run.complete();
        info!(
            succeeded = report.len(),
            failed = failures.len(),
            total_time_ms = start.elapsed().as_millis() as u64,
            "Product analysis complete"
        );

        Ok(report)
    }

    async fn analyze_step(
        &self,
        run: &PipelineRun,
        step: &AnalysisStep,
    ) -> (StepKey, Result<StepResult, StepError>) {
        run.set_stage(step.stage_label);
        let step_start = Instant::now();

        let outcome = self.perform_step(step).await;

        debug!(
            step = %step.key,
            success = outcome.is_ok(),
            duration_ms = step_start.elapsed().as_millis() as u64,
            "Analysis step settled"
        );
        (step.key, outcome)
    }

    async fn perform_step(&self, step: &AnalysisStep) -> Result<StepResult, StepError> {
        let raw = self
            .client
            .run_analysis(step.instruction, step.schema)
            .await?;
        let value = coerce(raw)?;

        Ok(StepResult::decode(step.key, value))
    }
}

impl std::fmt::Debug for AnalysisPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisPipeline")
            .field("client", &self.client.name())
            .field("steps", &STEP_CATALOG.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{find_step, FoodCategory, Grade};
    use crate::client::{
        AnalysisCallError, ExtractionError, MockAnalysisClient, MockResponse,
    };
    use crate::progress::RecordingHandler;
    use serde_json::json;
    use std::time::Duration;

    fn pipeline_with(client: Arc<MockAnalysisClient>) -> (AnalysisPipeline, Arc<RecordingHandler>) {
        let recorder = Arc::new(RecordingHandler::new());
        let pipeline = AnalysisPipeline::new(client).with_progress(recorder.clone());
        (pipeline, recorder)
    }

    fn script_all_successes(client: &MockAnalysisClient) {
        client.respond_to(
            StepKey::FoodPreference,
            MockResponse::text(r#"{"category": "veg", "description": "No animal products"}"#),
        );
        client.respond_to(
            StepKey::HealthGrade,
            MockResponse::structured(json!({
                "grade": "B",
                "title": "Good choice",
                "description": "Mostly whole ingredients",
                "factors": ["high fibre", "added sugar"]
            })),
        );
        client.respond_to(
            StepKey::RiskAssessment,
            MockResponse::text(
                r#"Here you go: {"riskScore": 30, "riskLevel": "low", "description": "Low risk"}"#,
            ),
        );
        client.respond_to(
            StepKey::AllergenAnalysis,
            MockResponse::structured(json!({
                "hasAllergens": true,
                "alerts": [{"allergen": "soy", "severity": "medium", "description": "Soy lecithin", "icon": "🌱"}]
            })),
        );
        client.respond_to(
            StepKey::NutritionFacts,
            MockResponse::text(
                r#"{"servingSize": "40g", "nutrients": {"calories": 160, "protein": "4g"}}"#,
            ),
        );
    }

    #[tokio::test]
    async fn test_all_steps_succeed() {
        let client = Arc::new(MockAnalysisClient::new());
        script_all_successes(&client);
        let (pipeline, recorder) = pipeline_with(client.clone());

        let report = pipeline.run("https://example.com/p1").await.unwrap();

        assert_eq!(report.len(), 5);
        assert_eq!(report.food_preference().unwrap().category, FoodCategory::Veg);
        assert_eq!(report.health_grade().unwrap().grade, Grade::B);
        assert_eq!(report.nutrition_facts().unwrap().serving_size, "40g");
        assert_eq!(recorder.last_progress(), Some(100));
        assert_eq!(client.extraction_calls(), vec!["https://example.com/p1"]);
        assert_eq!(client.queries().len(), 5);
    }

    #[tokio::test]
    async fn test_empty_url_is_rejected_before_any_call() {
        let client = Arc::new(MockAnalysisClient::new());
        let (pipeline, recorder) = pipeline_with(client.clone());

        let err = pipeline.run("").await.unwrap_err();

        assert!(matches!(err, PipelineError::InvalidInput(_)));
        assert_eq!(client.total_calls(), 0);
        assert!(recorder.events().is_empty());

        let err = pipeline.run("   ").await.unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput(_)));
        assert_eq!(client.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_extraction_failure_stops_before_fan_out() {
        let client = Arc::new(MockAnalysisClient::new());
        script_all_successes(&client);
        client.fail_extraction(ExtractionError::new("Page not reachable"));
        let (pipeline, recorder) = pipeline_with(client.clone());

        let run = PipelineRun::new(STEP_CATALOG.len(), recorder.clone());
        let err = pipeline
            .execute(&run, "https://example.com/p1")
            .await
            .unwrap_err();

        match err {
            PipelineError::Extraction(e) => assert_eq!(e.message, "Page not reachable"),
            other => panic!("Expected Extraction error, got {:?}", other),
        }
        assert!(client.queries().is_empty());
        assert_eq!(run.state(), RunState::Failed);
        assert_eq!(run.stage(), EXTRACTION_STAGE);
        assert_eq!(recorder.progress_values(), vec![0]);
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_successful_keys() {
        let client = Arc::new(MockAnalysisClient::new());
        client.respond_to(
            StepKey::FoodPreference,
            MockResponse::text(r#"{"category": "egg", "description": "Contains egg"}"#),
        );
        client.respond_to(
            StepKey::HealthGrade,
            MockResponse::text("I'm sorry, I cannot grade this product."),
        );
        client.respond_to(
            StepKey::RiskAssessment,
            MockResponse::error(AnalysisCallError::new(Some(500), "internal error")),
        );
        client.respond_to(StepKey::AllergenAnalysis, MockResponse::timeout());
        client.respond_to(
            StepKey::NutritionFacts,
            MockResponse::structured(json!({"servingSize": "1 bar", "nutrients": {}})),
        );
        let (pipeline, _) = pipeline_with(client.clone());

        let report = pipeline.run("https://example.com/p2").await.unwrap();

        let keys: Vec<StepKey> = report.keys().collect();
        assert_eq!(keys, vec![StepKey::FoodPreference, StepKey::NutritionFacts]);
        assert!(!report.contains(StepKey::HealthGrade));
    }

    #[tokio::test]
    async fn test_off_schema_answers_are_still_reported() {
        let client = Arc::new(MockAnalysisClient::new());
        client.respond_to(
            StepKey::HealthGrade,
            MockResponse::structured(json!({"factors": "not a list"})),
        );
        client.respond_to(
            StepKey::RiskAssessment,
            MockResponse::structured(json!({"riskScore": "30"})),
        );
        client.respond_to(
            StepKey::FoodPreference,
            MockResponse::structured(json!({"category": "veg"})),
        );
        let (pipeline, _) = pipeline_with(client);

        let report = pipeline.run("https://example.com/p3").await.unwrap();

        assert_eq!(
            report.keys().collect::<Vec<_>>(),
            vec![
                StepKey::FoodPreference,
                StepKey::HealthGrade,
                StepKey::RiskAssessment
            ]
        );
        assert_eq!(
            report.health_grade().map(|g| g.factors.clone()),
            Some(vec!["not a list".to_string()])
        );
        assert_eq!(report.risk_assessment().map(|r| r.risk_score), Some(30.0));
    }

    #[tokio::test]
    async fn test_all_steps_fail() {
        let client = Arc::new(MockAnalysisClient::new());
        client.set_fallback(MockResponse::timeout());
        let (pipeline, recorder) = pipeline_with(client.clone());

        let run = PipelineRun::new(STEP_CATALOG.len(), recorder.clone());
        let err = pipeline
            .execute(&run, "https://example.com/p4")
            .await
            .unwrap_err();

        match err {
            PipelineError::AllStepsFailed { failures } => {
                assert_eq!(failures.len(), STEP_CATALOG.len());
                assert!(failures
                    .iter()
                    .all(|(_, e)| matches!(e, StepError::AnalysisCall(_))));
            }
            other => panic!("Expected AllStepsFailed, got {:?}", other),
        }
        assert_eq!(client.extraction_calls().len(), 1);
        assert_eq!(run.state(), RunState::Failed);
        assert!(recorder.progress_values().iter().all(|p| *p < 100));
    }

    #[tokio::test]
    async fn test_progress_is_monotonic_with_out_of_order_completion() {
        let client = Arc::new(MockAnalysisClient::new());
        client.respond_to(
            StepKey::FoodPreference,
            MockResponse::text(r#"{"category": "veg", "description": ""}"#)
                .after(Duration::from_millis(40)),
        );
        client.respond_to(
            StepKey::HealthGrade,
            MockResponse::timeout().after(Duration::from_millis(5)),
        );
        client.respond_to(
            StepKey::RiskAssessment,
            MockResponse::text(r#"{"riskScore": 70, "riskLevel": "high", "description": ""}"#)
                .after(Duration::from_millis(20)),
        );
        let (pipeline, recorder) = pipeline_with(client);

        let run = PipelineRun::new(STEP_CATALOG.len(), recorder.clone());
        let report = pipeline.execute(&run, "https://example.com/p5").await.unwrap();

        assert_eq!(report.len(), 2);
        let progress = recorder.progress_values();
        assert!(progress.windows(2).all(|w| w[0] <= w[1]), "{:?}", progress);
        assert_eq!(progress, vec![0, 16, 32, 48, 64, 80, 96, 100]);
        assert_eq!(run.state(), RunState::Completed);
        assert_eq!(run.progress(), 100);
    }

    #[tokio::test]
    async fn test_stage_labels_come_from_catalog() {
        let client = Arc::new(MockAnalysisClient::new());
        script_all_successes(&client);
        let (pipeline, recorder) = pipeline_with(client);

        let run = PipelineRun::new(STEP_CATALOG.len(), recorder.clone());
        pipeline.execute(&run, "https://example.com/p6").await.unwrap();

        let stages = recorder.stages();
        assert_eq!(stages.first().map(String::as_str), Some(EXTRACTION_STAGE));
        assert_eq!(stages.len(), STEP_CATALOG.len() + 1);
        assert!(STEP_CATALOG.iter().any(|s| s.stage_label == run.stage()));
    }

    #[tokio::test]
    async fn test_run_context_cannot_be_reused() {
        let client = Arc::new(MockAnalysisClient::new());
        script_all_successes(&client);
        let (pipeline, _) = pipeline_with(client.clone());

        let run = PipelineRun::new(STEP_CATALOG.len(), Arc::new(NoOpHandler));
        pipeline.execute(&run, "https://example.com/p7").await.unwrap();

        let err = pipeline
            .execute(&run, "https://example.com/p7")
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput(_)));
        assert_eq!(client.extraction_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_executes_on_one_run_have_one_winner() {
        let client = Arc::new(MockAnalysisClient::new());
        script_all_successes(&client);
        let (pipeline, _) = pipeline_with(client.clone());

        let run = PipelineRun::new(STEP_CATALOG.len(), Arc::new(NoOpHandler));
        let (first, second) = tokio::join!(
            pipeline.execute(&run, "https://example.com/p8"),
            pipeline.execute(&run, "https://example.com/p8"),
        );

        let outcomes = [first, second];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes
            .iter()
            .any(|r| matches!(r, Err(PipelineError::InvalidInput(_)))));
        assert_eq!(client.extraction_calls().len(), 1);
        assert_eq!(run.state(), RunState::Completed);
    }

    #[tokio::test]
    async fn test_queries_are_verbatim_catalog_queries() {
        let client = Arc::new(MockAnalysisClient::new());
        script_all_successes(&client);
        let (pipeline, _) = pipeline_with(client.clone());

        pipeline.run("https://example.com/p8").await.unwrap();

        let mut sent = client.queries();
        sent.sort();
        let mut expected: Vec<String> = StepKey::ALL
            .iter()
            .map(|key| find_step(*key).unwrap().query())
            .collect();
        expected.sort();
        assert_eq!(sent, expected);
    }
}
