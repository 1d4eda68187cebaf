//! Top-level schema of an analysis and the default shape of every field.
//!
//! The table is the single source of truth for which fields a normalized
//! [`AnalysisResult`](crate::domain::model::AnalysisResult) is guaranteed to
//! carry. Normalization walks it in order and backfills whatever the provider
//! left out.

use serde_json::{Map, Value};

/// Marker field added to a fallback analysis.
pub const ERROR_FIELD: &str = "error";

/// Value of [`ERROR_FIELD`] when the provider payload could not be parsed.
pub const PARSE_FAILURE_SENTINEL: &str = "Failed to parse AI response";

/// `report_date` of a fallback analysis.
pub const UNPARSED_REPORT_DATE: &str = "Unable to parse";

pub const DISCLAIMER: &str = "This personalized nutrition plan is for informational purposes only and is based on the provided medical report. Please consult with a registered dietitian or healthcare professional before making significant dietary changes, especially if you have existing health conditions or are taking medications.";

/// Fallback value for a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultShape {
    EmptyList,
    EmptyObject,
    Text(&'static str),
    Object(&'static [(&'static str, DefaultShape)]),
}

impl DefaultShape {
    pub fn to_value(&self) -> Value {
        match self {
            DefaultShape::EmptyList => Value::Array(Vec::new()),
            DefaultShape::EmptyObject => Value::Object(Map::new()),
            DefaultShape::Text(text) => Value::String((*text).to_string()),
            DefaultShape::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(name, shape)| ((*name).to_string(), shape.to_value()))
                    .collect(),
            ),
        }
    }
}

use self::DefaultShape::{EmptyList, EmptyObject, Object, Text};

const SUMMARY: &[(&str, DefaultShape)] = &[
    ("key_concerns", EmptyList),
    ("nutrition_focus_areas", EmptyList),
];

const NUTRITIONAL_PROFILE: &[(&str, DefaultShape)] = &[
    ("identified_deficiencies", EmptyList),
    ("nutrients_to_monitor", EmptyList),
    ("nutrients_at_good_levels", EmptyList),
];

const PERSONALIZED_MACROS: &[(&str, DefaultShape)] = &[
    (
        "daily_calories",
        Object(&[
            ("recommended", Text("2000-2200")),
            ("rationale", Text("Standard recommendation")),
        ]),
    ),
    (
        "protein",
        Object(&[
            ("grams_per_day", Text("50-60g")),
            ("percentage_of_calories", Text("20%")),
        ]),
    ),
    (
        "carbohydrates",
        Object(&[
            ("grams_per_day", Text("250-300g")),
            ("percentage_of_calories", Text("50%")),
        ]),
    ),
    (
        "fats",
        Object(&[
            ("grams_per_day", Text("65-75g")),
            ("percentage_of_calories", Text("30%")),
        ]),
    ),
    ("fiber", Object(&[("grams_per_day", Text("25-30g"))])),
];

const DIETARY_RECOMMENDATIONS: &[(&str, DefaultShape)] = &[
    ("foods_to_eat", EmptyList),
    ("foods_to_avoid", EmptyList),
    ("superfoods_for_you", EmptyList),
];

/// Grocery categories that hold item lists, in display order.
pub const GROCERY_CATEGORIES: &[&str] = &[
    "proteins",
    "vegetables",
    "fruits",
    "grains_and_legumes",
    "dairy_and_alternatives",
    "healthy_fats_and_oils",
    "herbs_spices_and_condiments",
    "beverages",
];

const GROCERY_LIST: &[(&str, DefaultShape)] = &[
    ("proteins", EmptyList),
    ("vegetables", EmptyList),
    ("fruits", EmptyList),
    ("grains_and_legumes", EmptyList),
    ("dairy_and_alternatives", EmptyList),
    ("healthy_fats_and_oils", EmptyList),
    ("herbs_spices_and_condiments", EmptyList),
    ("beverages", EmptyList),
];

const QUICK_REFERENCE_CARD: &[(&str, DefaultShape)] = &[
    ("daily_must_haves", EmptyList),
    ("weekly_goals", EmptyList),
    ("foods_never_to_eat", EmptyList),
    ("golden_rules", EmptyList),
];

/// Every guaranteed top-level field with its default, in canonical order.
pub static ANALYSIS_SCHEMA: &[(&str, DefaultShape)] = &[
    ("extracted_markers", EmptyObject),
    ("summary", Object(SUMMARY)),
    ("nutritional_profile", Object(NUTRITIONAL_PROFILE)),
    ("personalized_macros", Object(PERSONALIZED_MACROS)),
    ("abnormal_markers_analysis", EmptyList),
    ("dietary_recommendations", Object(DIETARY_RECOMMENDATIONS)),
    (
        "weekly_meal_plan",
        Object(&[("overview", Text("No meal plan generated"))]),
    ),
    ("recipes", EmptyList),
    ("grocery_list", Object(GROCERY_LIST)),
    (
        "eating_schedule",
        Object(&[
            ("schedule", EmptyList),
            ("overview", Text("No schedule generated")),
        ]),
    ),
    (
        "hydration_guide",
        Object(&[("daily_water_intake", Text("2-3 liters"))]),
    ),
    ("lifestyle_recommendations", EmptyList),
    ("supplement_suggestions", EmptyList),
    ("food_medicine_interactions", EmptyList),
    ("follow_up_tests", EmptyList),
    ("specialist_referrals", EmptyList),
    ("warning_signs", EmptyList),
    ("progress_tracking", EmptyObject),
    ("positive_findings", EmptyList),
    ("general_nutrition_tips", EmptyList),
    ("quick_reference_card", Object(QUICK_REFERENCE_CARD)),
    ("disclaimer", Text(DISCLAIMER)),
    ("report_date", Text("Not specified")),
    ("patient_info", EmptyObject),
];

pub fn field_names() -> impl Iterator<Item = &'static str> {
    ANALYSIS_SCHEMA.iter().map(|(name, _)| *name)
}

pub fn default_for(field: &str) -> Option<Value> {
    ANALYSIS_SCHEMA
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, shape)| shape.to_value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn test_schema_has_no_duplicate_fields() {
        let names: Vec<&str> = field_names().collect();
        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(names.len(), unique.len());
        assert_eq!(names.len(), 24);
        assert!(!names.contains(&ERROR_FIELD));
    }

    #[test]
    fn test_nested_default_materializes() {
        assert_eq!(
            default_for("hydration_guide").unwrap(),
            json!({"daily_water_intake": "2-3 liters"})
        );
        assert_eq!(
            default_for("personalized_macros").unwrap()["daily_calories"]["recommended"],
            json!("2000-2200")
        );
        assert_eq!(default_for("recipes").unwrap(), json!([]));
        assert!(default_for("not_a_field").is_none());
    }

    #[test]
    fn test_grocery_default_matches_category_list() {
        let grocery = default_for("grocery_list").unwrap();
        let keys: Vec<&str> = grocery
            .as_object()
            .unwrap()
            .keys()
            .map(|k| k.as_str())
            .collect();
        assert_eq!(keys, GROCERY_CATEGORIES);
    }
}
