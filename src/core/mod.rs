pub mod acquire;
pub mod engine;
pub mod export;
pub mod fence;
pub mod normalize;
pub mod prompt;

pub use crate::domain::model::{AnalysisReport, AnalysisResult, ExtractionRequest, RawModelResponse};
pub use crate::domain::ports::{ConfigProvider, GenerativeProvider, Storage};
pub use crate::utils::error::Result;
