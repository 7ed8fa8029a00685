//! Google Gemini provider using `models/{model}:generateContent`.
//!
//! Gemini authenticates with a `key` query parameter rather than a bearer
//! token, calls the assistant role `model`, and takes the system prompt as a
//! separate `systemInstruction`.

use async_trait::async_trait;
use log::info;
use serde::{Deserialize, Serialize};

use super::{normalize_base_url, post_json};
use crate::inference::types::{Role, transcript};
use crate::inference::{CompletionProvider, CompletionRequest, ProviderError};

// ============================================================================
// generateContent API Types
// ============================================================================

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    system_instruction: Content,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Debug)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize, Debug)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<Content>,
}

fn gemini_role(role: Role) -> &'static str {
    match role {
        Role::Assistant => "model",
        Role::User | Role::System => "user",
    }
}

fn text_content(role: Option<&str>, text: impl Into<String>) -> Content {
    Content {
        role: role.map(str::to_string),
        parts: vec![Part {
            text: Some(text.into()),
        }],
    }
}

/// `{"error": {"code": 400, "message": "...", "status": "INVALID_ARGUMENT"}}`
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

fn extract_text(body: &str) -> Result<String, ProviderError> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::Parse(format!("invalid generateContent response: {e}")))?;
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or_else(|| {
            ProviderError::Parse("response has no candidates[0].content.parts[0].text".into())
        })
}

// ============================================================================
// Provider Implementation
// ============================================================================

pub struct GeminiProvider {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: String, base_url: Option<String>, model: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: normalize_base_url(base_url.unwrap_or_else(|| {
                "https://generativelanguage.googleapis.com/v1beta".to_string()
            })),
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }

    fn build_request(&self, request: &CompletionRequest<'_>) -> GenerateContentRequest {
        GenerateContentRequest {
            // Gemini wants the conversation to open with a user turn; the
            // seeded greeting is dropped.
            contents: transcript(request.history, request.text)
                .into_iter()
                .skip_while(|turn| turn.role == Role::Assistant)
                .map(|turn| text_content(Some(gemini_role(turn.role)), turn.content))
                .collect(),
            system_instruction: text_content(None, request.system_prompt),
            generation_config: GenerationConfig {
                temperature: request.params.temperature,
                max_output_tokens: request.params.max_tokens,
            },
        }
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        let body = self.build_request(&request);

        // The URL carries the key, so only the model is logged.
        info!(
            "Gemini request: model={}, content_count={}",
            self.model,
            body.contents.len()
        );

        let http = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, self.model
            ))
            .query(&[("key", self.api_key.as_str())]);
        let text = post_json(http, &body, "Gemini", error_message).await?;
        extract_text(&text)
    }
}
