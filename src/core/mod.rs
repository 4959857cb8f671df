mod config;
pub use config::{AppConfig, GeminiConfig, GenerationBackend};
