pub mod toml_config;

use crate::adapters::gemini::{GeminiProvider, DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::core::acquire::ResponseAcquirer;
use crate::core::engine::AnalysisEngine;
use crate::core::prompt::PromptTemplate;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 120;
pub const MAX_TIMEOUT_SECONDS: u64 = 600;
pub const DEFAULT_OUTPUT_PATH: &str = "./output";

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "nutri-report"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Turn extracted medical report text into a personalized nutrition plan")
)]
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// File holding the extracted report text ("-" reads stdin)
    #[cfg_attr(feature = "cli", arg(default_value = "-"))]
    pub input: String,

    #[cfg_attr(feature = "cli", arg(long, env = "NUTRI_API_ENDPOINT", default_value = DEFAULT_ENDPOINT))]
    pub api_endpoint: String,

    #[cfg_attr(feature = "cli", arg(long, env = "NUTRI_MODEL", default_value = DEFAULT_MODEL))]
    pub model: String,

    #[cfg_attr(
        feature = "cli",
        arg(long, env = "GEMINI_API_KEY", hide_env_values = true, default_value = "")
    )]
    pub api_key: String,

    #[cfg_attr(
        feature = "cli",
        arg(long, env = "NUTRI_TIMEOUT_SECONDS", default_value_t = DEFAULT_TIMEOUT_SECONDS)
    )]
    pub timeout_seconds: u64,

    /// Replacement instruction template; must contain {{report_text}}
    #[cfg_attr(feature = "cli", arg(long))]
    pub prompt_file: Option<String>,

    #[cfg_attr(feature = "cli", arg(long, default_value = DEFAULT_OUTPUT_PATH))]
    pub output_path: String,

    /// json, txt, csv
    #[cfg_attr(feature = "cli", arg(long, value_delimiter = ',', default_value = "json"))]
    pub output_formats: Vec<String>,

    /// Write all outputs into a single zip file
    #[cfg_attr(feature = "cli", arg(long))]
    pub bundle: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable verbose output"))]
    pub verbose: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Log CPU and memory per phase"))]
    pub monitor: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Emit logs as JSON lines"))]
    pub json_logs: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            input: "-".to_string(),
            api_endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            prompt_file: None,
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            output_formats: vec!["json".to_string()],
            bundle: false,
            verbose: false,
            monitor: false,
            json_logs: false,
        }
    }
}

impl ConfigProvider for CliConfig {
    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn api_key(&self) -> &str {
        &self.api_key
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn prompt_file(&self) -> Option<&str> {
        self.prompt_file.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.output_formats
    }

    fn bundle(&self) -> bool {
        self.bundle
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider_settings(self)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_output_formats("output_formats", &self.output_formats)?;
        Ok(())
    }
}

/// Wire the HTTP provider and prompt template named by `config` into an engine.
pub fn build_engine<C: ConfigProvider>(
    config: &C,
    monitor_enabled: bool,
) -> Result<AnalysisEngine<GeminiProvider>> {
    let provider = GeminiProvider::from_config(config)?;
    let template = PromptTemplate::load(config.prompt_file())?;
    Ok(AnalysisEngine::new_with_monitoring(
        ResponseAcquirer::new(provider, template),
        monitor_enabled,
    ))
}

/// Shared by every config source.
pub fn validate_provider_settings<C: ConfigProvider>(config: &C) -> Result<()> {
    validation::validate_url("api_endpoint", config.api_endpoint())?;
    validation::validate_model_id("model", config.model())?;
    validation::validate_api_key("api_key", config.api_key())?;
    validation::validate_range(
        "timeout_seconds",
        config.request_timeout().as_secs(),
        1,
        MAX_TIMEOUT_SECONDS,
    )?;
    if let Some(path) = config.prompt_file() {
        validation::validate_path("prompt_file", path)?;
    }
    Ok(())
}
