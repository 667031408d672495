//! Analysis steps, their typed results and response coercion

pub mod catalog;
mod lenient;
pub mod response;
pub mod types;

pub use catalog::{compose_query, find_step, AnalysisStep, EXTRACTION_STAGE, STEP_CATALOG};
pub use response::{coerce, extract_json_object, MalformedResponse};
pub use types::{
    AllergenAlert, AllergenAnalysis, CompositeReport, FoodCategory, FoodPreference, Grade,
    HealthGrade, NutrientValue, NutritionFacts, RiskAssessment, RiskLevel, Severity, StepKey,
    StepResult,
};
