//! Hugging Face Inference API provider.
//!
//! `POST {base}/models/{model}` with the conversation wrapped in `inputs`.
//! The reply arrives as `{"generated_text": ...}` or, for some backends, as a
//! one-element array of the same.

use async_trait::async_trait;
use log::info;
use serde::{Deserialize, Serialize};

use super::{normalize_base_url, post_json};
use crate::inference::types::{ChatTurn, transcript};
use crate::inference::{CompletionProvider, CompletionRequest, ProviderError};

#[derive(Serialize, Debug)]
struct InferenceRequest<'a> {
    inputs: Inputs<'a>,
    parameters: Parameters,
}

#[derive(Serialize, Debug)]
struct Inputs<'a> {
    system: &'a str,
    messages: Vec<ChatTurn>,
}

#[derive(Serialize, Debug)]
struct Parameters {
    temperature: f32,
    max_new_tokens: u32,
}

#[derive(Deserialize, Debug)]
struct Generated {
    generated_text: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum InferenceResponse {
    Single(Generated),
    Batch(Vec<Generated>),
}

/// `{"error": "..."}` or `{"error": ["...", ...]}`
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("error")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        ),
        _ => None,
    }
}

fn extract_text(body: &str) -> Result<String, ProviderError> {
    let response: InferenceResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::Parse(format!("invalid inference response: {e}")))?;
    let generated = match response {
        InferenceResponse::Single(g) => Some(g),
        InferenceResponse::Batch(items) => items.into_iter().next(),
    };
    generated
        .and_then(|g| g.generated_text)
        .ok_or_else(|| ProviderError::Parse("response has no generated_text".into()))
}

pub struct HuggingFaceProvider {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl HuggingFaceProvider {
    pub fn new(api_key: String, base_url: Option<String>, model: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: normalize_base_url(
                base_url.unwrap_or_else(|| "https://api-inference.huggingface.co".to_string()),
            ),
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CompletionProvider for HuggingFaceProvider {
    fn name(&self) -> &str {
        "huggingface"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        let body = InferenceRequest {
            inputs: Inputs {
                system: request.system_prompt,
                messages: transcript(request.history, request.text),
            },
            parameters: Parameters {
                temperature: request.params.temperature,
                max_new_tokens: request.params.max_tokens,
            },
        };

        info!(
            "Hugging Face request: model={}, message_count={}",
            self.model,
            body.inputs.messages.len()
        );

        let http = self
            .client
            .post(format!("{}/models/{}", self.base_url, self.model))
            .bearer_auth(&self.api_key);
        let text = post_json(http, &body, "Hugging Face", error_message).await?;
        extract_text(&text)
    }
}
