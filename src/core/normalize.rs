use crate::domain::model::AnalysisResult;
use crate::domain::schema::{
    ANALYSIS_SCHEMA, ERROR_FIELD, PARSE_FAILURE_SENTINEL, UNPARSED_REPORT_DATE,
};
use crate::utils::error::AnalysisError;
use serde_json::{Map, Value};

/// Outcome of [`parse_and_normalize`]. Both arms carry a schema-complete result.
#[derive(Debug)]
pub enum NormalizeOutcome {
    Parsed(AnalysisResult),
    Fallback {
        result: AnalysisResult,
        error: AnalysisError,
    },
}

impl NormalizeOutcome {
    pub fn result(&self) -> &AnalysisResult {
        match self {
            NormalizeOutcome::Parsed(result) => result,
            NormalizeOutcome::Fallback { result, .. } => result,
        }
    }

    pub fn into_result(self) -> AnalysisResult {
        match self {
            NormalizeOutcome::Parsed(result) => result,
            NormalizeOutcome::Fallback { result, .. } => result,
        }
    }

    pub fn error(&self) -> Option<&AnalysisError> {
        match self {
            NormalizeOutcome::Parsed(_) => None,
            NormalizeOutcome::Fallback { error, .. } => Some(error),
        }
    }
}

/// Backfill every absent top-level field. `null` counts as absent; anything
/// else the provider sent stays as it is, nested shapes included.
pub fn normalize(mut fields: Map<String, Value>) -> AnalysisResult {
    for (name, shape) in ANALYSIS_SCHEMA {
        let missing = fields.get(*name).map(Value::is_null).unwrap_or(true);
        if missing {
            tracing::debug!("Backfilling missing field: {}", name);
            fields.insert((*name).to_string(), shape.to_value());
        }
    }
    AnalysisResult::from_map(fields)
}

/// Schema defaults plus the parse-failure marker.
pub fn fallback_result() -> AnalysisResult {
    let mut result = normalize(Map::new()).into_map();
    result.insert(
        "report_date".to_string(),
        Value::String(UNPARSED_REPORT_DATE.to_string()),
    );
    result.insert(
        ERROR_FIELD.to_string(),
        Value::String(PARSE_FAILURE_SENTINEL.to_string()),
    );
    AnalysisResult::from_map(result)
}

pub fn parse_and_normalize(payload: &str) -> NormalizeOutcome {
    let message = match serde_json::from_str::<Value>(payload) {
        Ok(Value::Object(fields)) => return NormalizeOutcome::Parsed(normalize(fields)),
        Ok(other) => format!("expected a JSON object, got {}", json_type_name(&other)),
        Err(e) => e.to_string(),
    };

    NormalizeOutcome::Fallback {
        result: fallback_result(),
        error: AnalysisError::MalformedResponse { message },
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::field_names;
    use serde_json::json;

    fn parsed(payload: &str) -> AnalysisResult {
        match parse_and_normalize(payload) {
            NormalizeOutcome::Parsed(result) => result,
            NormalizeOutcome::Fallback { error, .. } => panic!("unexpected fallback: {}", error),
        }
    }

    #[test]
    fn test_empty_object_gets_every_field() {
        let result = parsed("{}");
        for field in field_names() {
            assert!(result.contains(field), "missing {}", field);
        }
        assert!(!result.contains(ERROR_FIELD));
        assert_eq!(
            result.get("nutritional_profile").unwrap(),
            &json!({
                "identified_deficiencies": [],
                "nutrients_to_monitor": [],
                "nutrients_at_good_levels": []
            })
        );
        assert_eq!(
            result.get("grocery_list").unwrap(),
            &json!({
                "proteins": [],
                "vegetables": [],
                "fruits": [],
                "grains_and_legumes": [],
                "dairy_and_alternatives": [],
                "healthy_fats_and_oils": [],
                "herbs_spices_and_condiments": [],
                "beverages": []
            })
        );
    }

    #[test]
    fn test_present_fields_are_not_touched() {
        let result = parsed(r#"{"extracted_markers": {"Glucose": {"value": 95}}}"#);
        assert_eq!(result.get("extracted_markers").unwrap()["Glucose"]["value"], json!(95));
        assert_eq!(result.get("recipes").unwrap(), &json!([]));
        assert_eq!(
            result.get("hydration_guide").unwrap(),
            &json!({"daily_water_intake": "2-3 liters"})
        );
    }

    #[test]
    fn test_wrong_nested_shape_is_trusted() {
        let result = parsed(r#"{"recipes": "none today", "summary": 3}"#);
        assert_eq!(result.get("recipes").unwrap(), &json!("none today"));
        assert_eq!(result.get("summary").unwrap(), &json!(3));
    }

    #[test]
    fn test_null_counts_as_absent() {
        let result = parsed(r#"{"warning_signs": null, "positive_findings": false}"#);
        assert_eq!(result.get("warning_signs").unwrap(), &json!([]));
        assert_eq!(result.get("positive_findings").unwrap(), &json!(false));
    }

    #[test]
    fn test_normalizing_twice_is_a_no_op() {
        let once = parsed(r#"{"report_date": "2024-03-01", "extra": {"x": 1}}"#);
        let twice = normalize(once.as_map().clone());
        assert_eq!(once, twice);
        assert_eq!(twice.get("extra").unwrap(), &json!({"x": 1}));
    }

    #[test]
    fn test_unparsable_payload_falls_back() {
        let outcome = parse_and_normalize("not json");
        assert!(matches!(
            outcome.error(),
            Some(AnalysisError::MalformedResponse { .. })
        ));
        let result = outcome.into_result();
        assert!(result.is_fallback());
        assert_eq!(result.error_marker(), Some(PARSE_FAILURE_SENTINEL));
        assert_eq!(result.get("report_date").unwrap(), &json!("Unable to parse"));
        for field in field_names() {
            assert!(result.contains(field));
        }
    }

    #[test]
    fn test_top_level_array_falls_back() {
        let outcome = parse_and_normalize("[1, 2, 3]");
        match outcome.error() {
            Some(AnalysisError::MalformedResponse { message }) => {
                assert!(message.contains("an array"))
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(outcome.result().is_fallback());
    }
}
