//! Lucky library exports for testing

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub mod core;
pub mod inference;
pub mod relay;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// Remote completion APIs Lucky knows how to talk to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Together.ai or any other OpenAI-compatible `/chat/completions` endpoint
    #[default]
    Together,
    /// Hugging Face Inference API
    #[value(name = "huggingface")]
    HuggingFace,
    /// Google Gemini `generateContent`
    Gemini,
}

impl ProviderKind {
    pub fn label(self) -> &'static str {
        match self {
            ProviderKind::Together => "together",
            ProviderKind::HuggingFace => "huggingface",
            ProviderKind::Gemini => "gemini",
        }
    }

    /// Parses the names accepted in config files and env vars.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "together" | "openai" => Some(ProviderKind::Together),
            "huggingface" | "hf" => Some(ProviderKind::HuggingFace),
            "gemini" => Some(ProviderKind::Gemini),
            _ => None,
        }
    }
}

/// Input capabilities the chat box can be configured with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Text,
    Attachment,
    Voice,
}
