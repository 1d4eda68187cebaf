use crate::core::prompt::{PromptTemplate, PROBE_PROMPT};
use crate::domain::model::{ExtractionRequest, RawModelResponse};
use crate::domain::ports::GenerativeProvider;
use crate::utils::error::{AnalysisError, Result};

/// Sends the instruction template with the report text to the provider.
pub struct ResponseAcquirer<P: GenerativeProvider> {
    provider: P,
    template: PromptTemplate,
}

impl<P: GenerativeProvider> ResponseAcquirer<P> {
    pub fn new(provider: P, template: PromptTemplate) -> Self {
        Self { provider, template }
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    pub async fn acquire(&self, request: &ExtractionRequest) -> Result<RawModelResponse> {
        if request.is_blank() {
            return Err(AnalysisError::InvalidInput {
                message: "extraction text is empty".to_string(),
            });
        }

        tracing::info!("📝 Text length: {} characters", request.text.chars().count());
        let prompt = self.template.render(&request.text);

        tracing::info!("🤖 Calling {} for nutrition analysis...", self.provider.model());
        let response = self.provider.generate(&prompt).await?;
        tracing::info!("✅ Provider response received ({} bytes)", response.text.len());

        Ok(response)
    }

    pub async fn probe(&self) -> Result<RawModelResponse> {
        tracing::info!("🧪 Probing {}", self.provider.model());
        self.provider.generate(PROBE_PROMPT).await
    }
}
