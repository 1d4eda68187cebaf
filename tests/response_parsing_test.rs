use nutri_report::domain::schema::{field_names, DISCLAIMER, PARSE_FAILURE_SENTINEL};
use nutri_report::{parse_and_normalize, strip_fences, NormalizeOutcome};
use serde_json::json;

fn parse_reply(raw: &str) -> NormalizeOutcome {
    parse_and_normalize(&strip_fences(raw))
}

#[test]
fn test_fenced_reply_with_prose_is_parsed() {
    let raw = "Sure! Based on the report:\n\n```JSON\n{\"summary\": {\"overall_health_status\": \"Good\"}}\n```\nLet me know if you need more.";

    let outcome = parse_reply(raw);

    assert!(outcome.error().is_none());
    assert_eq!(
        outcome.result().get("summary"),
        Some(&json!({"overall_health_status": "Good"}))
    );
}

#[test]
fn test_bare_fence_with_other_language_tag_is_parsed() {
    let outcome = parse_reply("```javascript\n{\"recipes\": [{\"name\": \"Oat bowl\"}]}\n```");

    assert!(outcome.error().is_none());
    assert_eq!(outcome.result().get("recipes"), Some(&json!([{"name": "Oat bowl"}])));
}

#[test]
fn test_unfenced_object_is_parsed_and_extra_keys_kept() {
    let outcome = parse_reply("{\"confidence\": 0.8, \"positive_findings\": []}");

    let result = outcome.into_result();
    assert_eq!(result.get("confidence"), Some(&json!(0.8)));
    assert_eq!(result.get("positive_findings"), Some(&json!([])));
    assert_eq!(result.get("disclaimer"), Some(&json!(DISCLAIMER)));
    for field in field_names() {
        assert!(result.contains(field));
    }
}

#[test]
fn test_truncated_reply_falls_back() {
    let outcome = parse_reply("```json\n{\"extracted_markers\": {\"LDL\": {\"value\": 16");

    assert!(matches!(outcome, NormalizeOutcome::Fallback { .. }));
    let result = outcome.into_result();
    assert_eq!(result.error_marker(), Some(PARSE_FAILURE_SENTINEL));
    assert_eq!(result.get("extracted_markers"), Some(&json!({})));
    assert_eq!(result.get("report_date"), Some(&json!("Unable to parse")));
}

#[test]
fn test_falsy_values_survive_normalization() {
    let outcome = parse_reply(
        r#"{"report_date": "", "patient_info": {"age": 0}, "recipes": false, "weekly_meal_plan": null}"#,
    );

    let result = outcome.into_result();
    assert_eq!(result.get("report_date"), Some(&json!("")));
    assert_eq!(result.get("patient_info"), Some(&json!({"age": 0})));
    assert_eq!(result.get("recipes"), Some(&json!(false)));
    assert_eq!(
        result.get("weekly_meal_plan"),
        Some(&json!({"overview": "No meal plan generated"}))
    );
}

#[test]
fn test_serialized_result_is_a_flat_object() {
    let result = parse_reply("{}").into_result();

    let value = serde_json::to_value(&result).unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.len(), field_names().count());
    assert!(!object.contains_key("error"));
}
