//! Completion client
//!
//! One blocking-per-request exchange with a hosted chat-completion API.
//! The `CompletionClient` trait is the seam between the network client and
//! the webhook handlers: handlers see `Result<String, LlmError>` and branch
//! exhaustively, never an unwinding exception.

pub mod client;

pub use client::OpenAiClient;

use async_trait::async_trait;
use thiserror::Error;

/// Completion errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Network(err.to_string())
    }
}

/// A single request/response exchange with a chat-completion backend
///
/// `system_instruction` is the fixed instruction computed at startup;
/// `utterance` is the provider-transcribed caller speech for this turn.
/// Returns the generated reply text, trimmed and non-empty.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        system_instruction: &str,
        utterance: &str,
    ) -> Result<String, LlmError>;
}
