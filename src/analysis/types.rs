//! Typed analysis results
//!
//! Each catalog step produces one of the shapes defined here. Field names on
//! the wire are camelCase, matching the schema descriptions sent to the
//! analysis service. Decoding never rejects an answer: missing fields fall
//! back to their defaults, unrecognised enumeration values decode to
//! `Unknown`, and fields of the wrong JSON type are converted where possible
//! (`"30"` for a score, `"false"` for a flag) and defaulted otherwise.

use super::lenient;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Stable identifier of an analysis step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepKey {
    FoodPreference,
    HealthGrade,
    RiskAssessment,
    AllergenAnalysis,
    NutritionFacts,
}

impl StepKey {
    pub const ALL: [StepKey; 5] = [
        StepKey::FoodPreference,
        StepKey::HealthGrade,
        StepKey::RiskAssessment,
        StepKey::AllergenAnalysis,
        StepKey::NutritionFacts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepKey::FoodPreference => "foodPreference",
            StepKey::HealthGrade => "healthGrade",
            StepKey::RiskAssessment => "riskAssessment",
            StepKey::AllergenAnalysis => "allergenAnalysis",
            StepKey::NutritionFacts => "nutritionFacts",
        }
    }
}

impl fmt::Display for StepKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StepKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("Unknown step key: {}", s))
    }
}

/// Dietary classification of a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FoodCategory {
    #[serde(rename = "veg")]
    Veg,
    #[serde(rename = "non-veg")]
    NonVeg,
    #[serde(rename = "egg")]
    Egg,
    #[default]
    #[serde(rename = "unknown", other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodPreference {
    #[serde(deserialize_with = "lenient::enumeration")]
    pub category: FoodCategory,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
}

/// Letter grade, A (best) through E (worst)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
    #[default]
    #[serde(rename = "unknown", other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthGrade {
    #[serde(deserialize_with = "lenient::enumeration")]
    pub grade: Grade,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub factors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RiskAssessment {
    /// 1 to 100, higher is riskier
    #[serde(deserialize_with = "lenient::number")]
    pub risk_score: f64,
    #[serde(deserialize_with = "lenient::enumeration")]
    pub risk_level: RiskLevel,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
}

/// Allergen severity shares its vocabulary with [`RiskLevel`]
pub type Severity = RiskLevel;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AllergenAlert {
    #[serde(deserialize_with = "lenient::string")]
    pub allergen: String,
    #[serde(deserialize_with = "lenient::enumeration")]
    pub severity: Severity,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(deserialize_with = "lenient::string")]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AllergenAnalysis {
    #[serde(deserialize_with = "lenient::boolean")]
    pub has_allergens: bool,
    #[serde(deserialize_with = "lenient::object_list")]
    pub alerts: Vec<AllergenAlert>,
}

/// A nutrient amount, usually a bare number or a string with units ("12g")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NutrientValue {
    Number(serde_json::Number),
    Text(String),
    /// The model reported the nutrient without an amount
    Null,
    Other(serde_json::Value),
}

impl From<serde_json::Value> for NutrientValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(n) => NutrientValue::Number(n),
            serde_json::Value::String(s) => NutrientValue::Text(s),
            serde_json::Value::Null => NutrientValue::Null,
            other => NutrientValue::Other(other),
        }
    }
}

impl fmt::Display for NutrientValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NutrientValue::Number(n) => write!(f, "{}", n),
            NutrientValue::Text(s) => f.write_str(s),
            NutrientValue::Null => f.write_str("-"),
            NutrientValue::Other(v) => write!(f, "{}", v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NutritionFacts {
    #[serde(deserialize_with = "lenient::string")]
    pub serving_size: String,
    #[serde(deserialize_with = "lenient::nutrients")]
    pub nutrients: BTreeMap<String, NutrientValue>,
}

/// Result of one successful analysis step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StepResult {
    FoodPreference(FoodPreference),
    HealthGrade(HealthGrade),
    RiskAssessment(RiskAssessment),
    AllergenAnalysis(AllergenAnalysis),
    NutritionFacts(NutritionFacts),
}

impl StepResult {
    pub fn key(&self) -> StepKey {
        match self {
            StepResult::FoodPreference(_) => StepKey::FoodPreference,
            StepResult::HealthGrade(_) => StepKey::HealthGrade,
            StepResult::RiskAssessment(_) => StepKey::RiskAssessment,
            StepResult::AllergenAnalysis(_) => StepKey::AllergenAnalysis,
            StepResult::NutritionFacts(_) => StepKey::NutritionFacts,
        }
    }

    /// Reads a coerced JSON value as the shape belonging to `key`
    ///
    /// Never fails: the answer is accepted as the model gave it, and anything
    /// that does not fit the shape falls back to defaults. A value that is not
    /// an object decodes to the all-default shape.
    pub fn decode(key: StepKey, value: serde_json::Value) -> Self {
        match key {
            StepKey::FoodPreference => StepResult::FoodPreference(lenient::from_object(value)),
            StepKey::HealthGrade => StepResult::HealthGrade(lenient::from_object(value)),
            StepKey::RiskAssessment => StepResult::RiskAssessment(lenient::from_object(value)),
            StepKey::AllergenAnalysis => StepResult::AllergenAnalysis(lenient::from_object(value)),
            StepKey::NutritionFacts => StepResult::NutritionFacts(lenient::from_object(value)),
        }
    }
}

/// Merged results of every step that succeeded
///
/// A key is present only if its step succeeded. Reports handed to callers by
/// the pipeline are never empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CompositeReport {
    results: BTreeMap<StepKey, StepResult>,
}

impl CompositeReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, result: StepResult) {
        self.results.insert(result.key(), result);
    }

    pub fn get(&self, key: StepKey) -> Option<&StepResult> {
        self.results.get(&key)
    }

    pub fn contains(&self, key: StepKey) -> bool {
        self.results.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = StepKey> + '_ {
        self.results.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StepKey, &StepResult)> {
        self.results.iter().map(|(k, v)| (*k, v))
    }

    pub fn food_preference(&self) -> Option<&FoodPreference> {
        match self.get(StepKey::FoodPreference) {
            Some(StepResult::FoodPreference(v)) => Some(v),
            _ => None,
        }
    }

    pub fn health_grade(&self) -> Option<&HealthGrade> {
        match self.get(StepKey::HealthGrade) {
            Some(StepResult::HealthGrade(v)) => Some(v),
            _ => None,
        }
    }

    pub fn risk_assessment(&self) -> Option<&RiskAssessment> {
        match self.get(StepKey::RiskAssessment) {
            Some(StepResult::RiskAssessment(v)) => Some(v),
            _ => None,
        }
    }

    pub fn allergen_analysis(&self) -> Option<&AllergenAnalysis> {
        match self.get(StepKey::AllergenAnalysis) {
            Some(StepResult::AllergenAnalysis(v)) => Some(v),
            _ => None,
        }
    }

    pub fn nutrition_facts(&self) -> Option<&NutritionFacts> {
        match self.get(StepKey::NutritionFacts) {
            Some(StepResult::NutritionFacts(v)) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_step_key_round_trips_through_str() {
        for key in StepKey::ALL {
            assert_eq!(key.as_str().parse::<StepKey>().unwrap(), key);
        }
        assert!("calories".parse::<StepKey>().is_err());
    }

    #[test]
    fn test_step_key_serializes_camel_case() {
        let value = serde_json::to_value(StepKey::AllergenAnalysis).unwrap();
        assert_eq!(value, json!("allergenAnalysis"));
    }

    #[test]
    fn test_decode_food_preference() {
        let result = StepResult::decode(
            StepKey::FoodPreference,
            json!({"category": "non-veg", "description": "Contains chicken"}),
        );

        assert_eq!(
            result,
            StepResult::FoodPreference(FoodPreference {
                category: FoodCategory::NonVeg,
                description: "Contains chicken".to_string(),
            })
        );
    }

    #[test]
    fn test_decode_is_lenient_about_missing_and_unknown_values() {
        let result =
            StepResult::decode(StepKey::HealthGrade, json!({"grade": "F", "title": "Poor"}));

        match result {
            StepResult::HealthGrade(grade) => {
                assert_eq!(grade.grade, Grade::Unknown);
                assert_eq!(grade.title, "Poor");
                assert!(grade.factors.is_empty());
            }
            other => panic!("Expected HealthGrade, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_accepts_off_schema_types() {
        let StepResult::HealthGrade(grade) = StepResult::decode(
            StepKey::HealthGrade,
            json!({"grade": "b", "factors": "not a list"}),
        ) else {
            panic!("Expected HealthGrade");
        };
        assert_eq!(grade.grade, Grade::B);
        assert_eq!(grade.factors, vec!["not a list".to_string()]);

        let StepResult::RiskAssessment(risk) = StepResult::decode(
            StepKey::RiskAssessment,
            json!({"riskScore": "30", "riskLevel": "Low", "description": null}),
        ) else {
            panic!("Expected RiskAssessment");
        };
        assert_eq!(risk.risk_score, 30.0);
        assert_eq!(risk.risk_level, RiskLevel::Low);
        assert_eq!(risk.description, "");

        let StepResult::AllergenAnalysis(allergens) = StepResult::decode(
            StepKey::AllergenAnalysis,
            json!({"hasAllergens": "false", "alerts": [{"allergen": "milk", "severity": 3}, "soy"]}),
        ) else {
            panic!("Expected AllergenAnalysis");
        };
        assert!(!allergens.has_allergens);
        assert_eq!(allergens.alerts.len(), 1);
        assert_eq!(allergens.alerts[0].allergen, "milk");
        assert_eq!(allergens.alerts[0].severity, RiskLevel::Unknown);
    }

    #[test]
    fn test_decode_non_object_gives_default_shape() {
        assert_eq!(
            StepResult::decode(StepKey::RiskAssessment, json!(["low"])),
            StepResult::RiskAssessment(RiskAssessment::default())
        );
    }

    #[test]
    fn test_decode_risk_assessment_camel_case() {
        let result = StepResult::decode(
            StepKey::RiskAssessment,
            json!({"riskScore": 42, "riskLevel": "medium", "description": "Moderate sugar"}),
        );

        match result {
            StepResult::RiskAssessment(risk) => {
                assert_eq!(risk.risk_score, 42.0);
                assert_eq!(risk.risk_level, RiskLevel::Medium);
            }
            other => panic!("Expected RiskAssessment, got {:?}", other),
        }
    }

    #[test]
    fn test_nutrients_accept_any_value() {
        let result = StepResult::decode(
            StepKey::NutritionFacts,
            json!({
                "servingSize": "30g",
                "nutrients": {"calories": 120, "sugar": "8g", "fiber": null, "vitamins": ["C"]}
            }),
        );

        let StepResult::NutritionFacts(facts) = result else {
            panic!("Expected NutritionFacts");
        };
        assert_eq!(facts.serving_size, "30g");
        assert_eq!(facts.nutrients["calories"].to_string(), "120");
        assert_eq!(
            facts.nutrients["sugar"],
            NutrientValue::Text("8g".to_string())
        );
        assert_eq!(facts.nutrients["fiber"], NutrientValue::Null);
        assert_eq!(facts.nutrients["vitamins"].to_string(), r#"["C"]"#);
    }

    #[test]
    fn test_report_serializes_as_keyed_map() {
        let mut report = CompositeReport::new();
        report.insert(StepResult::FoodPreference(FoodPreference {
            category: FoodCategory::Veg,
            description: "Plant based".to_string(),
        }));

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            json!({"foodPreference": {"category": "veg", "description": "Plant based"}})
        );
        assert!(report.food_preference().is_some());
        assert!(report.health_grade().is_none());
        assert_eq!(report.len(), 1);
    }
}
