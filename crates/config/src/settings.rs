//! Main settings module

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Completion backend configuration
    #[serde(default)]
    pub llm: LlmSettings,

    /// Path to the business knowledge file (JSON)
    #[serde(default = "default_knowledge_path")]
    pub knowledge_path: String,

    /// Caller-facing voice lines
    #[serde(default)]
    pub voice: VoiceLines,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

/// Completion backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    /// OpenAI-compatible chat completions endpoint
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    /// API key, read from OPENAI_API_KEY unless set in the config file
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_llm_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_api_key() -> String {
    std::env::var("OPENAI_API_KEY").unwrap_or_default()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            api_key: default_api_key(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_knowledge_path() -> String {
    "config/business.json".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            llm: LlmSettings::default(),
            knowledge_path: default_knowledge_path(),
            voice: VoiceLines::default(),
        }
    }
}

/// Fixed caller-facing lines spoken by the TwiML layer
///
/// Kept in config rather than string literals so the voice can be tuned
/// without touching handler code. Defaults match the shipped behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceLines {
    /// Open-ended prompt spoken inside the first gather
    #[serde(default = "default_opening_prompt")]
    pub opening_prompt: String,

    /// Continuation prompt spoken after each answered turn
    #[serde(default = "default_continuation_prompt")]
    pub continuation_prompt: String,

    /// Apology when no speech was heard
    #[serde(default = "default_no_speech_apology")]
    pub no_speech_apology: String,

    /// Apology when the completion backend fails
    #[serde(default = "default_trouble_apology")]
    pub trouble_apology: String,
}

fn default_opening_prompt() -> String {
    "How can I help you today?".to_string()
}

fn default_continuation_prompt() -> String {
    "You can ask another question, or say that's all.".to_string()
}

fn default_no_speech_apology() -> String {
    "Sorry, I didn't hear anything. Let's try again.".to_string()
}

fn default_trouble_apology() -> String {
    "I'm sorry, I'm having trouble answering right now. Please call back in a little while.".to_string()
}

impl Default for VoiceLines {
    fn default() -> Self {
        Self {
            opening_prompt: default_opening_prompt(),
            continuation_prompt: default_continuation_prompt(),
            no_speech_apology: default_no_speech_apology(),
            trouble_apology: default_trouble_apology(),
        }
    }
}

impl Settings {
    /// Validate settings
    ///
    /// The API key is the one startup-fatal requirement: without it every
    /// caller turn would fail, so refuse to start at all.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.api_key.is_empty() {
            return Err(ConfigError::MissingField(
                "llm.api_key (set OPENAI_API_KEY)".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "llm.temperature".to_string(),
                message: format!("Must be between 0.0 and 2.0, got {}", self.llm.temperature),
            });
        }

        if self.llm.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.timeout_secs".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

/// Load settings from files and environment
///
/// Priority: env vars > config/default.yaml > defaults
pub fn load_settings() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            Environment::with_prefix("PHONE_CONCIERGE")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.llm.model, "gpt-4o-mini");
        assert_eq!(settings.knowledge_path, "config/business.json");
        assert!(!settings.voice.continuation_prompt.is_empty());
    }

    #[test]
    fn test_validation_rejects_missing_api_key() {
        let mut settings = Settings::default();
        settings.llm.api_key = String::new();
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::MissingField(_))
        ));
    }

    #[test]
    fn test_validation_rejects_bad_temperature() {
        let mut settings = Settings::default();
        settings.llm.api_key = "sk-test".to_string();
        settings.llm.temperature = 5.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validation_accepts_sane_settings() {
        let mut settings = Settings::default();
        settings.llm.api_key = "sk-test".to_string();
        assert!(settings.validate().is_ok());
    }
}
