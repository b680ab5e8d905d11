//! OpenAI-compatible chat completions client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use phone_concierge_config::LlmSettings;

use crate::{CompletionClient, LlmError};

/// Sent instead of an empty utterance so the model still has a user turn
const EMPTY_UTTERANCE_PLACEHOLDER: &str = "(the caller was silent)";

/// Spoken when the backend returns no usable text
const BLANK_REPLY_FALLBACK: &str =
    "I'm sorry, could you tell me again what you need help with?";

/// Client for an OpenAI-compatible chat completions endpoint
///
/// Stateless per call: fixed model and temperature, one request per caller
/// utterance, no retry and no backoff. A failure is returned to the handler
/// layer, which voices the apology.
pub struct OpenAiClient {
    client: Client,
    settings: LlmSettings,
}

impl OpenAiClient {
    /// Create a new client
    pub fn new(settings: LlmSettings) -> Result<Self, LlmError> {
        if settings.api_key.is_empty() {
            return Err(LlmError::Configuration("API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| {
                LlmError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, settings })
    }

    /// Full URL for the chat completions endpoint
    fn chat_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.endpoint.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        system_instruction: &str,
        utterance: &str,
    ) -> Result<String, LlmError> {
        let utterance = effective_utterance(utterance);

        let request = ChatRequest {
            model: self.settings.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_instruction.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: utterance.to_string(),
                },
            ],
            temperature: Some(self.settings.temperature),
        };

        let response = self
            .client
            .post(self.chat_url())
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {}: {}", status, error_text)));
        }

        let response: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        Ok(extract_reply(&response))
    }
}

/// Substitute the placeholder when the transcript is blank
///
/// The handler layer already short-circuits empty transcripts, but the
/// model must never see an empty user turn regardless of caller.
fn effective_utterance(utterance: &str) -> &str {
    if utterance.trim().is_empty() {
        EMPTY_UTTERANCE_PLACEHOLDER
    } else {
        utterance
    }
}

/// Pull the first choice's trimmed text, with the fixed re-ask fallback
fn extract_reply(response: &ChatResponse) -> String {
    let text = response
        .choices
        .first()
        .map(|c| c.message.content.trim())
        .unwrap_or("");

    if text.is_empty() {
        tracing::warn!("Completion returned no usable text, substituting fallback prompt");
        BLANK_REPLY_FALLBACK.to_string()
    } else {
        text.to_string()
    }
}

// OpenAI chat completions wire types

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> LlmSettings {
        LlmSettings {
            endpoint: "https://api.openai.com/v1/".to_string(),
            api_key: "sk-test".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            timeout_secs: 30,
        }
    }

    #[test]
    fn test_chat_url_trims_trailing_slash() {
        let client = OpenAiClient::new(settings()).unwrap();
        assert_eq!(client.chat_url(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn test_rejects_empty_api_key() {
        let mut s = settings();
        s.api_key = String::new();
        assert!(matches!(
            OpenAiClient::new(s),
            Err(LlmError::Configuration(_))
        ));
    }

    #[test]
    fn test_blank_utterance_becomes_placeholder() {
        assert_eq!(effective_utterance(""), EMPTY_UTTERANCE_PLACEHOLDER);
        assert_eq!(effective_utterance("   "), EMPTY_UTTERANCE_PLACEHOLDER);
        assert_eq!(effective_utterance("\n\t"), EMPTY_UTTERANCE_PLACEHOLDER);
    }

    #[test]
    fn test_spoken_utterance_passes_through() {
        assert_eq!(
            effective_utterance("What time do you open?"),
            "What time do you open?"
        );
    }

    #[test]
    fn test_extract_reply_trims_text() {
        let response: ChatResponse = serde_json::from_str(
            r#"{ "choices": [{ "message": { "role": "assistant", "content": "  We open at 5 PM!  " } }] }"#,
        )
        .unwrap();
        assert_eq!(extract_reply(&response), "We open at 5 PM!");
    }

    #[test]
    fn test_extract_reply_falls_back_on_blank_text() {
        let response: ChatResponse = serde_json::from_str(
            r#"{ "choices": [{ "message": { "role": "assistant", "content": "   " } }] }"#,
        )
        .unwrap();
        assert_eq!(extract_reply(&response), BLANK_REPLY_FALLBACK);
    }

    #[test]
    fn test_extract_reply_falls_back_on_no_choices() {
        let response: ChatResponse = serde_json::from_str(r#"{ "choices": [] }"#).unwrap();
        assert_eq!(extract_reply(&response), BLANK_REPLY_FALLBACK);
    }

    #[test]
    fn test_request_serializes_system_then_user() {
        let request = ChatRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: "instruction".to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: "What time do you open?".to_string(),
                },
            ],
            temperature: Some(0.7),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "What time do you open?");
        assert_eq!(json["model"], "gpt-4o-mini");
    }
}
