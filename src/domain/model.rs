use crate::domain::schema::{self, ERROR_FIELD, GROCERY_CATEGORIES};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Text recovered from an uploaded report by OCR or PDF extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub text: String,
}

impl ExtractionRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Unparsed text returned by the generative provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawModelResponse {
    pub text: String,
    pub model: String,
}

/// Normalized analysis: an ordered JSON object that carries every field of
/// [`schema::ANALYSIS_SCHEMA`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisResult {
    fields: Map<String, Value>,
}

impl AnalysisResult {
    pub(crate) fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// 解析失敗時的 sentinel
    pub fn error_marker(&self) -> Option<&str> {
        self.fields.get(ERROR_FIELD).and_then(Value::as_str)
    }

    pub fn is_fallback(&self) -> bool {
        self.error_marker() == Some(schema::PARSE_FAILURE_SENTINEL)
    }

    /// Grocery categories whose value is a non-empty list, in schema order
    /// followed by any extra list-valued categories the provider added.
    pub fn grocery_sections(&self) -> Vec<(&str, &Vec<Value>)> {
        let Some(list) = self.fields.get("grocery_list").and_then(Value::as_object) else {
            return Vec::new();
        };

        let mut sections: Vec<(&str, &Vec<Value>)> = GROCERY_CATEGORIES
            .iter()
            .filter_map(|name| {
                list.get(*name)
                    .and_then(Value::as_array)
                    .filter(|items| !items.is_empty())
                    .map(|items| (*name, items))
            })
            .collect();

        for (name, value) in list {
            if GROCERY_CATEGORIES.contains(&name.as_str()) || name == "foods_to_avoid_buying" {
                continue;
            }
            // budget_friendly_swaps 等非商品清單略過
            if let Some(items) = value.as_array().filter(|items| !items.is_empty()) {
                if items.iter().all(|item| item.get("item").is_some()) {
                    sections.push((name.as_str(), items));
                }
            }
        }

        sections
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub(crate) fn into_map(self) -> Map<String, Value> {
        self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

/// Reply handed to the export/UI collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub analysis: AnalysisResult,
    pub model: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    #[serde(rename = "txt")]
    Text,
    Csv,
}

impl ExportFormat {
    pub const NAMES: &'static [&'static str] = &["json", "txt", "csv"];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "txt" | "text" => Some(ExportFormat::Text),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }
}
