use crate::analysis::{MalformedResponse, StepKey};
use crate::client::{AnalysisCallError, ExtractionError};
use thiserror::Error;

/// Why a single analysis step produced no result
///
/// Step errors never reach the caller individually; they are logged and the
/// step is left out of the report.
#[derive(Debug, Clone, Error)]
pub enum StepError {
    #[error(transparent)]
    AnalysisCall(#[from] AnalysisCallError),

    #[error(transparent)]
    MalformedResponse(#[from] MalformedResponse),
}

/// Terminal failure of a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("All {} analysis steps failed", .failures.len())]
    AllStepsFailed { failures: Vec<(StepKey, StepError)> },
}

impl PipelineError {
    /// Short machine-friendly name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::InvalidInput(_) => "invalid_input",
            PipelineError::Extraction(_) => "extraction_error",
            PipelineError::AllStepsFailed { .. } => "all_steps_failed",
        }
    }
}
