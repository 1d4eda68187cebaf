use crate::domain::model::ExportFormat;
use crate::utils::error::{AnalysisError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(AnalysisError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(AnalysisError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(AnalysisError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(AnalysisError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(AnalysisError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// 金鑰不可為空，且不可留著未替換的 `${VAR}`
pub fn validate_api_key(field_name: &str, key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(AnalysisError::MissingConfigError {
            field: field_name.to_string(),
        });
    }
    if key.starts_with("${") && key.ends_with('}') {
        return Err(AnalysisError::ConfigValidationError {
            field: field_name.to_string(),
            message: format!("environment variable {} is not set", key),
        });
    }
    Ok(())
}

/// Model identifiers end up in the request path, so only a safe charset is accepted.
pub fn validate_model_id(field_name: &str, model: &str) -> Result<()> {
    let valid = !model.is_empty()
        && model
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'));
    if !valid {
        return Err(AnalysisError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: model.to_string(),
            reason: "Model id may only contain letters, digits, '-', '.' and '_'".to_string(),
        });
    }
    Ok(())
}

pub fn validate_output_formats(field_name: &str, formats: &[String]) -> Result<Vec<ExportFormat>> {
    if formats.is_empty() {
        return Err(AnalysisError::MissingConfigError {
            field: field_name.to_string(),
        });
    }

    let mut parsed = Vec::with_capacity(formats.len());
    for format in formats {
        match ExportFormat::parse(format) {
            Some(f) => {
                if !parsed.contains(&f) {
                    parsed.push(f);
                }
            }
            None => {
                return Err(AnalysisError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: format.clone(),
                    reason: format!(
                        "Unsupported format. Valid formats: {}",
                        ExportFormat::NAMES.join(", ")
                    ),
                });
            }
        }
    }
    Ok(parsed)
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(AnalysisError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("provider.endpoint", "https://example.com").is_ok());
        assert!(validate_url("provider.endpoint", "http://127.0.0.1:8080").is_ok());
        assert!(validate_url("provider.endpoint", "").is_err());
        assert!(validate_url("provider.endpoint", "invalid-url").is_err());
        assert!(validate_url("provider.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_api_key() {
        assert!(validate_api_key("provider.api_key", "AIzaSy123").is_ok());
        assert!(matches!(
            validate_api_key("provider.api_key", "  "),
            Err(AnalysisError::MissingConfigError { .. })
        ));
        assert!(matches!(
            validate_api_key("provider.api_key", "${GEMINI_API_KEY}"),
            Err(AnalysisError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_validate_model_id() {
        assert!(validate_model_id("provider.model", "gemini-2.5-flash").is_ok());
        assert!(validate_model_id("provider.model", "").is_err());
        assert!(validate_model_id("provider.model", "../admin").is_err());
        assert!(validate_model_id("provider.model", "gemini pro").is_err());
    }

    #[test]
    fn test_validate_output_formats() {
        let formats = vec!["json".to_string(), "CSV".to_string(), "json".to_string()];
        let parsed = validate_output_formats("export.output_formats", &formats).unwrap();
        assert_eq!(parsed, vec![ExportFormat::Json, ExportFormat::Csv]);

        let invalid = vec!["pdf".to_string()];
        assert!(validate_output_formats("export.output_formats", &invalid).is_err());
        assert!(validate_output_formats("export.output_formats", &[]).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("provider.timeout_seconds", 120u64, 1, 600).is_ok());
        assert!(validate_range("provider.timeout_seconds", 0u64, 1, 600).is_err());
        assert!(validate_range("provider.timeout_seconds", 601u64, 1, 600).is_err());
    }
}
