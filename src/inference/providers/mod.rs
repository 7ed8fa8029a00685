//! Concrete completion providers and the HTTP plumbing they share.

mod gemini;
mod huggingface;
mod together;

pub use gemini::GeminiProvider;
pub use huggingface::HuggingFaceProvider;
pub use together::TogetherProvider;

use std::sync::Arc;

use log::{debug, warn};
use serde::Serialize;

use crate::ProviderKind;
use crate::core::config::{ConfigError, ProviderSettings};
use crate::inference::{CompletionProvider, ProviderError};

/// Build a provider of `kind` from resolved settings.
pub fn build_provider(
    kind: ProviderKind,
    settings: &ProviderSettings,
) -> Result<Arc<dyn CompletionProvider>, ConfigError> {
    let api_key = settings
        .api_key
        .clone()
        .ok_or(ConfigError::MissingApiKey(kind))?;
    let base_url = Some(settings.base_url.clone());
    let model = settings.model.clone();

    Ok(match kind {
        ProviderKind::Together => Arc::new(TogetherProvider::new(api_key, base_url, model)),
        ProviderKind::HuggingFace => Arc::new(HuggingFaceProvider::new(api_key, base_url, model)),
        ProviderKind::Gemini => Arc::new(GeminiProvider::new(api_key, base_url, model)),
    })
}

/// Sends `body` as JSON and returns the raw response text.
///
/// A non-2xx reply becomes `ProviderError::Api`; `error_message` gets a chance
/// to pull a readable message out of the error body, otherwise the body itself
/// is used.
pub(crate) async fn post_json(
    request: reqwest::RequestBuilder,
    body: &impl Serialize,
    provider: &str,
    error_message: fn(&str) -> Option<String>,
) -> Result<String, ProviderError> {
    let json_body = serde_json::to_string(body)
        .map_err(|e| ProviderError::Parse(format!("Request serialization failed: {e}")))?;
    debug!("Raw {} request: {}", provider, json_body);

    let response = request
        .header("Content-Type", "application/json")
        .body(json_body)
        .send()
        .await
        .map_err(|e| ProviderError::Network(e.to_string()))?;

    let status = response.status();
    debug!("{} response status: {}", provider, status);

    let text = response
        .text()
        .await
        .map_err(|e| ProviderError::Network(e.to_string()))?;

    if !status.is_success() {
        warn!("{} API error: {} - {}", provider, status.as_u16(), text);
        let message = error_message(&text).unwrap_or_else(|| {
            if text.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                text
            }
        });
        return Err(ProviderError::Api {
            status: status.as_u16(),
            message,
        });
    }

    debug!("Raw {} response: {}", provider, text);
    Ok(text)
}

/// Strips a trailing slash so endpoint paths can be appended with `format!`.
pub(crate) fn normalize_base_url(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}
