//! The fixed set of analyses run against every product page
//!
//! Instructions and schema descriptions are sent verbatim to the analysis
//! service, so their text is part of the external contract. Order only decides
//! the sequence of stage labels; the steps are otherwise independent.

use super::types::StepKey;

/// Stage label shown while the product page is being extracted
pub const EXTRACTION_STAGE: &str = "Extracting product information";

/// One independently requested remote analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisStep {
    pub key: StepKey,
    pub instruction: &'static str,
    pub schema: &'static str,
    pub stage_label: &'static str,
}

impl AnalysisStep {
    /// The query transmitted for this step: instruction, blank line, schema
    pub fn query(&self) -> String {
        compose_query(self.instruction, self.schema)
    }
}

/// Joins an instruction and its expected schema description into one query
pub fn compose_query(instruction: &str, schema: &str) -> String {
    format!("{}\n\n{}", instruction, schema)
}

pub const STEP_CATALOG: [AnalysisStep; 5] = [
    AnalysisStep {
        key: StepKey::FoodPreference,
        instruction: "Based on the ingredients of the product, classify it as vegetarian (veg), \
                      non-vegetarian (non-veg) or containing egg (egg). Briefly explain which \
                      ingredients determined the classification.",
        schema: r#"Respond only with a JSON object of the form:
{"category": "veg" | "non-veg" | "egg", "description": string}"#,
        stage_label: "Classifying food preference",
    },
    AnalysisStep {
        key: StepKey::HealthGrade,
        instruction: "Assign the product an overall health grade from A (healthiest) to E \
                      (least healthy) considering its nutritional profile, processing level and \
                      additives. Give a short title, a rationale and the key factors behind the \
                      grade.",
        schema: r#"Respond only with a JSON object of the form:
{"grade": "A" | "B" | "C" | "D" | "E", "title": string, "description": string, "factors": string[]}"#,
        stage_label: "Calculating health grade",
    },
    AnalysisStep {
        key: StepKey::RiskAssessment,
        instruction: "Assess the health risk of regularly consuming this product. Give a numeric \
                      risk score from 1 (lowest risk) to 100 (highest risk), a risk level, and a \
                      short explanation.",
        schema: r#"Respond only with a JSON object of the form:
{"riskScore": number, "riskLevel": "low" | "medium" | "high", "description": string}"#,
        stage_label: "Assessing health risks",
    },
    AnalysisStep {
        key: StepKey::AllergenAnalysis,
        instruction: "Identify common allergens present in the product (for example milk, eggs, \
                      peanuts, tree nuts, soy, wheat/gluten, fish, shellfish, sesame). For each \
                      allergen give its severity, a short description and a single emoji icon.",
        schema: r#"Respond only with a JSON object of the form:
{"hasAllergens": boolean, "alerts": [{"allergen": string, "severity": "high" | "medium" | "low", "description": string, "icon": string}]}"#,
        stage_label: "Checking for allergens",
    },
    AnalysisStep {
        key: StepKey::NutritionFacts,
        instruction: "Extract the nutrition facts of the product per serving, including the \
                      serving size and each listed nutrient with its amount.",
        schema: r#"Respond only with a JSON object of the form:
{"servingSize": string, "nutrients": {"<nutrient name>": string | number}}"#,
        stage_label: "Extracting nutrition facts",
    },
];

/// Looks up a catalog entry by key
pub fn find_step(key: StepKey) -> Option<&'static AnalysisStep> {
    STEP_CATALOG.iter().find(|step| step.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_keys_are_unique_and_complete() {
        let keys: HashSet<StepKey> = STEP_CATALOG.iter().map(|s| s.key).collect();
        assert_eq!(keys.len(), STEP_CATALOG.len());
        for key in StepKey::ALL {
            assert!(keys.contains(&key), "missing catalog entry for {}", key);
        }
    }

    #[test]
    fn test_catalog_order() {
        let order: Vec<&str> = STEP_CATALOG.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(
            order,
            vec![
                "foodPreference",
                "healthGrade",
                "riskAssessment",
                "allergenAnalysis",
                "nutritionFacts"
            ]
        );
    }

    #[test]
    fn test_compose_query_appends_schema_after_blank_line() {
        assert_eq!(compose_query("Do it", "{}"), "Do it\n\n{}");

        let step = find_step(StepKey::RiskAssessment).unwrap();
        let query = step.query();
        assert!(query.starts_with(step.instruction));
        assert!(query.ends_with(step.schema));
        assert!(query.contains("\n\n"));
    }

    #[test]
    fn test_schemas_name_their_fields() {
        let expectations = [
            (StepKey::FoodPreference, "\"category\""),
            (StepKey::HealthGrade, "\"factors\""),
            (StepKey::RiskAssessment, "\"riskScore\""),
            (StepKey::AllergenAnalysis, "\"hasAllergens\""),
            (StepKey::NutritionFacts, "\"servingSize\""),
        ];
        for (key, field) in expectations {
            assert!(find_step(key).unwrap().schema.contains(field));
        }
    }

    #[test]
    fn test_stage_labels_are_distinct() {
        let labels: HashSet<&str> = STEP_CATALOG.iter().map(|s| s.stage_label).collect();
        assert_eq!(labels.len(), STEP_CATALOG.len());
        assert!(!labels.contains(EXTRACTION_STAGE));
    }
}
