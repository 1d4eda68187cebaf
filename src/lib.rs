pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{gemini::GeminiProvider, storage::LocalStorage};
pub use config::{toml_config::TomlConfig, CliConfig};
pub use core::{
    acquire::ResponseAcquirer,
    engine::AnalysisEngine,
    export::{ExportOptions, ReportExporter},
    fence::strip_fences,
    normalize::{normalize, parse_and_normalize, NormalizeOutcome},
    prompt::PromptTemplate,
};
pub use domain::model::{AnalysisReport, AnalysisResult, ExtractionRequest};
pub use utils::error::{AnalysisError, Result};
