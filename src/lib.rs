//! foodlens - product analysis pipeline for food product pages
//!
//! Given a product URL, foodlens asks a remote analysis service to extract
//! the page content, then runs a fixed catalog of independent analyses
//! concurrently and merges whatever succeeded into one report.
//!
//! # Core Concepts
//!
//! - **Analysis Client**: Trait over the remote service, with an HTTP
//!   implementation and a scripted mock for tests
//! - **Step Catalog**: Five analyses (food preference, health grade, risk
//!   assessment, allergens, nutrition facts), each an instruction plus a
//!   response schema
//! - **Pipeline Run**: Per-run progress and stage label, reported through a
//!   [`ProgressHandler`]
//! - **Composite Report**: Results of every step that succeeded, keyed by step
//!
//! # Example Usage
//!
//! ```no_run
//! use foodlens::{AnalysisPipeline, HttpAnalysisClient, StepKey};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), foodlens::PipelineError> {
//! let client = Arc::new(HttpAnalysisClient::new("http://localhost:8000"));
//! let pipeline = AnalysisPipeline::new(client);
//!
//! let report = pipeline.run("https://example.com/p1").await?;
//! if let Some(grade) = report.health_grade() {
//!     println!("Health grade: {:?}", grade.grade);
//! }
//! assert!(report.len() <= StepKey::ALL.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`analysis`]: Step catalog, typed results and response coercion
//! - [`client`]: Remote call adapter
//! - [`pipeline`]: Orchestrator, run state and errors
//! - [`progress`]: Progress and stage reporting

pub mod analysis;
pub mod cli;
pub mod client;
pub mod config;
pub mod pipeline;
pub mod progress;
pub mod util;

pub use analysis::{
    coerce, AnalysisStep, CompositeReport, MalformedResponse, StepKey, StepResult, STEP_CATALOG,
};
pub use client::{
    AnalysisCallError, AnalysisClient, ExtractionError, HttpAnalysisClient, MockAnalysisClient,
    MockResponse, PageContent, RawResponse,
};
pub use config::{ConfigError, FoodlensConfig};
pub use pipeline::{AnalysisPipeline, PipelineError, PipelineRun, RunState, StepError};
pub use progress::{LoggingHandler, NoOpHandler, ProgressHandler, RecordingHandler};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
