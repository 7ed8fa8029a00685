use std::fmt;

use async_trait::async_trait;

use super::types::GenerationParams;
use crate::core::message::Message;

/// Errors that can occur during provider operations.
/// Every variant is treated the same by the fallback logic: one hop, no retry.
#[derive(Debug)]
pub enum ProviderError {
    /// Provider misconfigured (missing API key, bad URL).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// API returned an error response.
    Api { status: u16, message: String },
    /// Response body did not have the expected shape.
    Parse(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Config(msg) => write!(f, "config error: {msg}"),
            ProviderError::Network(msg) => write!(f, "network error: {msg}"),
            ProviderError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ProviderError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Everything a provider needs to answer one user turn.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub system_prompt: &'a str,
    /// Turns before the new user message, oldest first.
    pub history: &'a [Message],
    /// The new user message.
    pub text: &'a str,
    pub params: GenerationParams,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Model identifier sent with each request.
    fn model(&self) -> &str;

    /// Requests a single, complete reply for the given turn.
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError>;
}
