//! Output formatting for multiple formats
//!
//! Renders analysis reports and the step catalog as JSON, YAML, or
//! human-readable text.
//!
//! # Example
//!
//! ```
//! use foodlens::cli::output::{OutputFormat, OutputFormatter};
//! use foodlens::CompositeReport;
//!
//! let formatter = OutputFormatter::new(OutputFormat::Json);
//! let output = formatter.format(&CompositeReport::new()).unwrap();
//! assert_eq!(output, "{}");
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::{
    AllergenAnalysis, AnalysisStep, CompositeReport, FoodPreference, HealthGrade, NutritionFacts,
    RiskAssessment, StepResult, STEP_CATALOG,
};

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// Report plus the run metadata shown alongside it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEnvelope<'a> {
    pub url: &'a str,
    pub analyzed_at: DateTime<Utc>,
    pub report: &'a CompositeReport,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StepListing<'a> {
    key: &'a str,
    stage_label: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<String>,
}

/// Output formatter for analysis reports
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, report: &CompositeReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report)
                .context("Failed to serialize report to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(report).context("Failed to serialize report to YAML")
            }
            OutputFormat::Human => Ok(self.format_human(report)),
        }
    }

    /// Formats a report together with the analyzed URL and timestamp
    pub fn format_envelope(&self, envelope: &ReportEnvelope<'_>) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(envelope)
                .context("Failed to serialize report envelope to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(envelope)
                .context("Failed to serialize report envelope to YAML"),
            OutputFormat::Human => {
                let mut output = format!("Product:  {}\n", envelope.url);
                output.push_str(&format!(
                    "Analyzed: {}\n\n",
                    envelope.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC")
                ));
                output.push_str(&self.format_human(envelope.report));
                Ok(output)
            }
        }
    }

    /// Formats the step catalog; `verbose` includes each full query
    pub fn format_steps(&self, steps: &[AnalysisStep], verbose: bool) -> Result<String> {
        let listings: Vec<StepListing<'_>> = steps
            .iter()
            .map(|step| StepListing {
                key: step.key.as_str(),
                stage_label: step.stage_label,
                query: verbose.then(|| step.query()),
            })
            .collect();

        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&listings)
                .context("Failed to serialize steps to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(&listings).context("Failed to serialize steps to YAML")
            }
            OutputFormat::Human => {
                let mut output = String::from("Analysis Steps\n");
                output.push_str(RULE);
                output.push_str("\n\n");
                for (i, listing) in listings.iter().enumerate() {
                    output.push_str(&format!(
                        "{}. {:<18} {}\n",
                        i + 1,
                        listing.key,
                        listing.stage_label
                    ));
                    if let Some(ref query) = listing.query {
                        for line in query.lines() {
                            output.push_str(&format!("     {}\n", line));
                        }
                        output.push('\n');
                    }
                }
                Ok(output)
            }
        }
    }

    fn format_human(&self, report: &CompositeReport) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\u{2713} Product Analysis ({} of {} analyses)\n",
            report.len(),
            STEP_CATALOG.len()
        ));
        output.push_str(RULE);
        output.push_str("\n\n");

        for (_, result) in report.iter() {
            match result {
                StepResult::FoodPreference(v) => push_food_preference(&mut output, v),
                StepResult::HealthGrade(v) => push_health_grade(&mut output, v),
                StepResult::RiskAssessment(v) => push_risk(&mut output, v),
                StepResult::AllergenAnalysis(v) => push_allergens(&mut output, v),
                StepResult::NutritionFacts(v) => push_nutrition(&mut output, v),
            }
            output.push('\n');
        }

        output
    }
}

fn push_food_preference(output: &mut String, value: &FoodPreference) {
    let category = serde_json::to_value(value.category)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default();
    output.push_str("Food Preference:\n");
    output.push_str(&format!("\u{251C}\u{2500} Category: {}\n", category));
    output.push_str(&format!("\u{2514}\u{2500} {}\n", value.description));
}

fn push_health_grade(output: &mut String, value: &HealthGrade) {
    output.push_str(&format!("Health Grade: {:?}", value.grade));
    if !value.title.is_empty() {
        output.push_str(&format!(" ({})", value.title));
    }
    output.push('\n');
    output.push_str(&format!("\u{251C}\u{2500} {}\n", value.description));
    if value.factors.is_empty() {
        output.push_str("\u{2514}\u{2500} Factors: (none listed)\n");
    } else {
        output.push_str("\u{2514}\u{2500} Factors:\n");
        for factor in &value.factors {
            output.push_str(&format!("   - {}\n", factor));
        }
    }
}

fn push_risk(output: &mut String, value: &RiskAssessment) {
    output.push_str("Risk Assessment:\n");
    output.push_str(&format!(
        "\u{251C}\u{2500} Score: {}/100 ({:?})\n",
        value.risk_score, value.risk_level
    ));
    output.push_str(&format!("\u{2514}\u{2500} {}\n", value.description));
}

fn push_allergens(output: &mut String, value: &AllergenAnalysis) {
    if !value.has_allergens || value.alerts.is_empty() {
        output.push_str("Allergens: none detected\n");
        return;
    }

    output.push_str("\u{26A0} Allergens:\n");
    for (i, alert) in value.alerts.iter().enumerate() {
        let connector = if i == value.alerts.len() - 1 {
            "\u{2514}"
        } else {
            "\u{251C}"
        };
        output.push_str(&format!(
            "{}\u{2500} {} {} [{:?}] {}\n",
            connector, alert.icon, alert.allergen, alert.severity, alert.description
        ));
    }
}

fn push_nutrition(output: &mut String, value: &NutritionFacts) {
    output.push_str("Nutrition Facts");
    if !value.serving_size.is_empty() {
        output.push_str(&format!(" (per {})", value.serving_size));
    }
    output.push_str(":\n");
    for (name, amount) in &value.nutrients {
        output.push_str(&format!("  {:<16} {}\n", name, amount));
    }
}
