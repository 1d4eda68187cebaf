// Adapters layer: concrete implementations for external systems (provider HTTP, local storage).

pub mod gemini;
pub mod storage;
