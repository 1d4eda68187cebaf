use crate::utils::error::{AnalysisError, Result};
use std::path::Path;

pub const REPORT_PLACEHOLDER: &str = "{{report_text}}";

/// Connectivity check sent by `probe_provider`.
pub const PROBE_PROMPT: &str = "Say 'AI is working' in JSON format with a status field";

const BUILTIN_TEMPLATE: &str = include_str!("../../prompts/nutrition_analysis.txt");

/// Instruction text sent to the provider, with the report interpolated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    pub fn builtin() -> Self {
        Self {
            text: BUILTIN_TEMPLATE.to_string(),
        }
    }

    pub fn from_text(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if !text.contains(REPORT_PLACEHOLDER) {
            return Err(AnalysisError::ConfigValidationError {
                field: "prompt.template_file".to_string(),
                message: format!("template must contain {}", REPORT_PLACEHOLDER),
            });
        }
        Ok(Self { text })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AnalysisError::IoError)?;
        Self::from_text(content)
    }

    /// `prompt_file` 為 None 時使用內建範本
    pub fn load(prompt_file: Option<&str>) -> Result<Self> {
        match prompt_file {
            Some(path) => {
                tracing::debug!("Loading prompt template from: {}", path);
                Self::from_file(path)
            }
            None => Ok(Self::builtin()),
        }
    }

    pub fn render(&self, report_text: &str) -> String {
        self.text.replace(REPORT_PLACEHOLDER, report_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builtin_template_interpolates_report() {
        let template = PromptTemplate::builtin();
        let prompt = template.render("Hemoglobin 11.2 g/dL");
        assert!(prompt.contains("Hemoglobin 11.2 g/dL"));
        assert!(!prompt.contains(REPORT_PLACEHOLDER));
        assert!(prompt.contains("\"grocery_list\""));
    }

    #[test]
    fn test_template_without_placeholder_is_rejected() {
        let err = PromptTemplate::from_text("Analyze this report").unwrap_err();
        assert!(matches!(err, AnalysisError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_template_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"Report:\n{{report_text}}\nJSON only.").unwrap();

        let template = PromptTemplate::load(file.path().to_str()).unwrap();
        assert_eq!(template.render("TSH 5.1"), "Report:\nTSH 5.1\nJSON only.");
    }

    #[test]
    fn test_missing_template_file() {
        let err = PromptTemplate::load(Some("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, AnalysisError::IoError(_)));
    }
}
