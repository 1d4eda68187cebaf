use crate::domain::model::RawModelResponse;
use crate::domain::ports::{ConfigProvider, GenerativeProvider};
use crate::utils::error::{AnalysisError, Result};
use crate::utils::logger::mask_secret;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Shown when the configured model is not served.
pub const SUGGESTED_MODELS: &[&str] = &["gemini-2.5-flash", "gemini-1.5-pro", "gemini-1.5-flash"];

const SAFETY_FINISH_REASONS: &[&str] = &["SAFETY", "PROHIBITED_CONTENT", "BLOCKLIST", "SPII"];

/// Gemini `generateContent` over HTTPS.
pub struct GeminiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    timeout: Duration,
    client: Client,
}

impl GeminiProvider {
    pub fn new(endpoint: &str, model: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            timeout,
            client,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.api_endpoint(),
            config.model(),
            config.api_key(),
            config.request_timeout(),
        )
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        )
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    status: Option<String>,
}

#[async_trait]
impl GenerativeProvider for GeminiProvider {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<RawModelResponse> {
        let url = self.generate_url();
        tracing::debug!(
            "POST {} (key: {}, timeout: {:?})",
            url,
            mask_secret(&self.api_key),
            self.timeout
        );

        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Provider response status: {}", status);
        let text = response.text().await?;

        if !status.is_success() {
            let err = classify_failure(status.as_u16(), &text, &self.model);
            tracing::error!("❌ Provider error ({:?}): {}", err.kind(), err);
            return Err(err);
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&text).map_err(|e| AnalysisError::Transport {
                status: Some(status.as_u16()),
                message: format!("unexpected provider reply: {}", e),
            })?;

        Ok(RawModelResponse {
            text: candidate_text(parsed)?,
            model: self.model.clone(),
        })
    }
}

/// Map a non-success reply to an error kind. The provider reports bad keys as
/// 400 `INVALID_ARGUMENT`, so the body is consulted before the status code.
pub(crate) fn classify_failure(status: u16, body: &str, model: &str) -> AnalysisError {
    let api_error = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error);
    let provider_status = api_error
        .as_ref()
        .and_then(|e| e.status.clone())
        .unwrap_or_default();
    let message = api_error
        .and_then(|e| e.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {}: {}", status, truncate(body, 200)));
    let lowered = body.to_ascii_lowercase();

    if matches!(status, 401 | 403)
        || matches!(provider_status.as_str(), "UNAUTHENTICATED" | "PERMISSION_DENIED")
        || body.contains("API_KEY_INVALID")
        || lowered.contains("api key not valid")
    {
        AnalysisError::Auth { message }
    } else if status == 429
        || provider_status == "RESOURCE_EXHAUSTED"
        || lowered.contains("quota")
        || lowered.contains("rate limit")
    {
        AnalysisError::RateLimit { message }
    } else if body.contains("SAFETY") {
        AnalysisError::ContentPolicy { message }
    } else if status == 404 || provider_status == "NOT_FOUND" {
        AnalysisError::ModelUnavailable {
            model: model.to_string(),
            message,
        }
    } else {
        AnalysisError::Transport {
            status: Some(status),
            message,
        }
    }
}

fn candidate_text(response: GenerateContentResponse) -> Result<String> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(AnalysisError::ContentPolicy {
            message: format!("prompt blocked: {}", reason),
        });
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(AnalysisError::Transport {
            status: None,
            message: "provider returned no candidates".to_string(),
        });
    };

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|part| !part.thought)
        .filter_map(|part| part.text)
        .collect();

    if !text.is_empty() {
        return Ok(text);
    }

    let finish_reason = candidate.finish_reason.unwrap_or_default();
    if SAFETY_FINISH_REASONS.contains(&finish_reason.as_str()) {
        Err(AnalysisError::ContentPolicy {
            message: format!("response blocked: {}", finish_reason),
        })
    } else {
        Err(AnalysisError::Transport {
            status: None,
            message: format!("provider returned empty text (finish reason: {})", finish_reason),
        })
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}
