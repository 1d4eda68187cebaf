use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Provider rejected credentials: {message}")]
    Auth { message: String },

    #[error("Provider rate limit or quota exceeded: {message}")]
    RateLimit { message: String },

    #[error("Provider refused content: {message}")]
    ContentPolicy { message: String },

    #[error("Model '{model}' is not available: {message}")]
    ModelUnavailable { model: String, message: String },

    #[error("Provider request failed: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("Malformed provider response: {message}")]
    MalformedResponse { message: String },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        AnalysisError::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// 錯誤種類，對應呼叫端需要區分的訊息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    Auth,
    RateLimit,
    ContentPolicy,
    ModelUnavailable,
    Transport,
    MalformedResponse,
    Config,
    Io,
    Export,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Provider,
    Response,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AnalysisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::InvalidInput { .. } => ErrorKind::InvalidInput,
            AnalysisError::Auth { .. } => ErrorKind::Auth,
            AnalysisError::RateLimit { .. } => ErrorKind::RateLimit,
            AnalysisError::ContentPolicy { .. } => ErrorKind::ContentPolicy,
            AnalysisError::ModelUnavailable { .. } => ErrorKind::ModelUnavailable,
            AnalysisError::Transport { .. } => ErrorKind::Transport,
            AnalysisError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            AnalysisError::ConfigValidationError { .. }
            | AnalysisError::InvalidConfigValueError { .. }
            | AnalysisError::MissingConfigError { .. } => ErrorKind::Config,
            AnalysisError::IoError(_) => ErrorKind::Io,
            AnalysisError::ZipError(_)
            | AnalysisError::CsvError(_)
            | AnalysisError::SerializationError(_) => ErrorKind::Export,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self.kind() {
            ErrorKind::InvalidInput => ErrorCategory::Input,
            ErrorKind::Auth
            | ErrorKind::RateLimit
            | ErrorKind::ContentPolicy
            | ErrorKind::ModelUnavailable
            | ErrorKind::Transport => ErrorCategory::Provider,
            ErrorKind::MalformedResponse => ErrorCategory::Response,
            ErrorKind::Config => ErrorCategory::Configuration,
            ErrorKind::Io | ErrorKind::Export => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.kind() {
            // 已由 fallback 吸收
            ErrorKind::MalformedResponse => ErrorSeverity::Low,
            ErrorKind::RateLimit | ErrorKind::Transport => ErrorSeverity::Medium,
            ErrorKind::InvalidInput
            | ErrorKind::ContentPolicy
            | ErrorKind::ModelUnavailable
            | ErrorKind::Config => ErrorSeverity::High,
            ErrorKind::Auth | ErrorKind::Io | ErrorKind::Export => ErrorSeverity::Critical,
        }
    }

    /// HTTP status a web collaborator should answer with.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::InvalidInput | ErrorKind::ContentPolicy => 400,
            ErrorKind::Auth => 401,
            ErrorKind::ModelUnavailable => 404,
            ErrorKind::RateLimit => 429,
            ErrorKind::Transport => 502,
            ErrorKind::MalformedResponse
            | ErrorKind::Config
            | ErrorKind::Io
            | ErrorKind::Export => 500,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AnalysisError::InvalidInput { .. } => "No report text provided".to_string(),
            AnalysisError::Auth { .. } => "Invalid API key".to_string(),
            AnalysisError::RateLimit { .. } => "Rate limit or quota exceeded".to_string(),
            AnalysisError::ContentPolicy { .. } => "Content blocked by safety filters".to_string(),
            AnalysisError::ModelUnavailable { model, .. } => {
                format!("Model '{}' is not available", model)
            }
            AnalysisError::Transport { .. } => "Failed to analyze report".to_string(),
            AnalysisError::MalformedResponse { .. } => {
                "The AI response could not be read; showing an empty plan".to_string()
            }
            AnalysisError::ConfigValidationError { field, .. }
            | AnalysisError::InvalidConfigValueError { field, .. }
            | AnalysisError::MissingConfigError { field } => {
                format!("Configuration problem in '{}': {}", field, self)
            }
            _ => format!("Failed to save results: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self.kind() {
            ErrorKind::InvalidInput => {
                "Extract text from the report first; the input must not be empty".to_string()
            }
            ErrorKind::Auth => {
                "Check the API key (GEMINI_API_KEY or provider.api_key)".to_string()
            }
            ErrorKind::RateLimit => "Wait a moment and try again, or check the quota".to_string(),
            ErrorKind::ContentPolicy => {
                "Remove unrelated or sensitive content from the report text".to_string()
            }
            ErrorKind::ModelUnavailable => format!(
                "Try a different model, e.g. {}",
                crate::adapters::gemini::SUGGESTED_MODELS.join(", ")
            ),
            ErrorKind::Transport => {
                "Check network connectivity and the provider endpoint".to_string()
            }
            ErrorKind::MalformedResponse => "Run the analysis again".to_string(),
            ErrorKind::Config => "Fix the configuration value and retry".to_string(),
            ErrorKind::Io | ErrorKind::Export => {
                "Check that the output directory exists and is writable".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kinds_map_to_distinct_status_codes() {
        let auth = AnalysisError::Auth {
            message: "API_KEY_INVALID".to_string(),
        };
        let rate = AnalysisError::RateLimit {
            message: "quota".to_string(),
        };
        let safety = AnalysisError::ContentPolicy {
            message: "SAFETY".to_string(),
        };
        let model = AnalysisError::ModelUnavailable {
            model: "gemini-x".to_string(),
            message: "not found".to_string(),
        };

        assert_eq!(auth.status_code(), 401);
        assert_eq!(rate.status_code(), 429);
        assert_eq!(safety.status_code(), 400);
        assert_eq!(model.status_code(), 404);
        assert_eq!(auth.category(), ErrorCategory::Provider);
        assert_eq!(auth.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_malformed_response_is_low_severity() {
        let err = AnalysisError::MalformedResponse {
            message: "expected value".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
        assert_eq!(err.severity(), ErrorSeverity::Low);
    }

    #[test]
    fn test_model_suggestion_lists_models() {
        let err = AnalysisError::ModelUnavailable {
            model: "gemini-x".to_string(),
            message: "404".to_string(),
        };
        assert!(err.recovery_suggestion().contains("gemini-2.5-flash"));
        assert!(err.user_friendly_message().contains("gemini-x"));
    }
}
