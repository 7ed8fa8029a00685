//! Together.ai provider using the OpenAI-compatible Chat Completions API.
//!
//! Works against any endpoint that speaks `POST {base}/chat/completions`
//! with bearer auth and returns `choices[0].message.content`.

use async_trait::async_trait;
use log::info;
use serde::{Deserialize, Serialize};

use super::{normalize_base_url, post_json};
use crate::inference::types::{ChatTurn, transcript_with_system};
use crate::inference::{CompletionProvider, CompletionRequest, ProviderError};

// ============================================================================
// Chat Completions API Types
// ============================================================================

#[derive(Serialize, Debug)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatTurn>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize, Debug)]
struct ChoiceMessage {
    content: Option<String>,
}

/// `{"error": {"message": ..., "code": ...}}`
#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize, Debug)]
struct ErrorDetail {
    message: Option<String>,
    code: Option<serde_json::Value>,
}

const INVALID_KEY_MESSAGE: &str = "Invalid API key. Please provide a valid API key.";

fn error_message(body: &str) -> Option<String> {
    let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
    if envelope
        .error
        .code
        .as_ref()
        .and_then(|c| c.as_str())
        == Some("invalid_api_key")
    {
        return Some(INVALID_KEY_MESSAGE.to_string());
    }
    envelope.error.message
}

fn extract_content(body: &str) -> Result<String, ProviderError> {
    let response: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::Parse(format!("invalid completion response: {e}")))?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| ProviderError::Parse("response has no choices[0].message.content".into()))
}

// ============================================================================
// Provider Implementation
// ============================================================================

pub struct TogetherProvider {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl TogetherProvider {
    /// Creates a new Together provider.
    ///
    /// # Arguments
    /// * `api_key` - Together API key
    /// * `base_url` - Optional custom base URL (defaults to Together's API)
    /// * `model` - Model identifier, e.g. `meta-llama/Llama-3-8b-chat-hf`
    pub fn new(api_key: String, base_url: Option<String>, model: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: normalize_base_url(
                base_url.unwrap_or_else(|| "https://api.together.xyz/v1".to_string()),
            ),
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CompletionProvider for TogetherProvider {
    fn name(&self) -> &str {
        "together"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: transcript_with_system(request.system_prompt, request.history, request.text),
            temperature: request.params.temperature,
            max_tokens: request.params.max_tokens,
        };

        info!(
            "Together request: model={}, message_count={}",
            self.model,
            body.messages.len()
        );

        let http = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key);
        let text = post_json(http, &body, "Together", error_message).await?;
        extract_content(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::{Author, Message};
    use crate::inference::types::Role;

    #[test]
    fn test_request_serializes_openai_shape() {
        let history = vec![Message::new(1, Author::Assistant, "Hello!")];
        let body = ChatCompletionRequest {
            model: "m",
            messages: transcript_with_system("sys", &history, "hi"),
            temperature: 0.7,
            max_tokens: 800,
        };
        let json: serde_json::Value = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "m");
        assert_eq!(json["max_tokens"], 800);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "assistant");
        assert_eq!(json["messages"][2]["content"], "hi");
        assert_eq!(body.messages[2].role, Role::User);
    }

    #[test]
    fn test_extract_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"Hi there"}}]}"#;
        assert_eq!(extract_content(body).unwrap(), "Hi there");
    }

    #[test]
    fn test_extract_content_without_choices_is_parse_error() {
        assert!(matches!(
            extract_content(r#"{"choices":[]}"#),
            Err(ProviderError::Parse(_))
        ));
        assert!(matches!(
            extract_content("not json"),
            Err(ProviderError::Parse(_))
        ));
    }

    #[test]
    fn test_invalid_api_key_gets_friendly_message() {
        let body = r#"{"error":{"message":"bad key sk-...","code":"invalid_api_key"}}"#;
        assert_eq!(error_message(body).as_deref(), Some(INVALID_KEY_MESSAGE));
    }

    #[test]
    fn test_error_message_extracted_from_envelope() {
        let body = r#"{"error":{"message":"model not found","code":404}}"#;
        assert_eq!(error_message(body).as_deref(), Some("model not found"));
        assert_eq!(error_message("<html>oops</html>"), None);
    }
}
