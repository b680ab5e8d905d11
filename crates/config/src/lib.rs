//! Configuration for the phone concierge
//!
//! Supports loading configuration from:
//! - YAML/TOML files (config/default.yaml)
//! - Environment variables (PHONE_CONCIERGE__ prefix)
//!
//! The business knowledge record and the derived system instruction are
//! loaded once at startup and stay immutable for the process lifetime.

pub mod knowledge;
pub mod prompt;
pub mod settings;

pub use knowledge::KnowledgeRecord;
pub use prompt::build_system_instruction;
pub use settings::{load_settings, LlmSettings, ServerConfig, Settings, VoiceLines};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
