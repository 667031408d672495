pub mod error;
pub mod orchestrator;
pub mod run;

pub use error::{PipelineError, StepError};
pub use orchestrator::AnalysisPipeline;
pub use run::{PipelineRun, RunState};
