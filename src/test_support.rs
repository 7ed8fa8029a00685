//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::state::App;
use crate::inference::{
    ChatSettings, CompletionProvider, CompletionRequest, GenerationParams, ProviderChain,
    ProviderError,
};

/// A provider that answers every request the same way and records what it
/// was asked: `(history contents, text)` per call.
pub struct ScriptedProvider {
    name: String,
    reply: Result<String, u16>,
    seen: Mutex<Vec<(Vec<String>, String)>>,
}

impl ScriptedProvider {
    pub fn ok(name: &str, reply: &str) -> Self {
        Self {
            name: name.to_string(),
            reply: Ok(reply.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Fails every request with an API error of the given status.
    pub fn failing(name: &str, status: u16) -> Self {
        Self {
            name: name.to_string(),
            reply: Err(status),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(Vec<String>, String)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        "test-model"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        self.seen.lock().unwrap().push((
            request.history.iter().map(|m| m.content.clone()).collect(),
            request.text.to_string(),
        ));
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(ProviderError::Api {
                status: *status,
                message: "scripted failure".to_string(),
            }),
        }
    }
}

pub fn settings() -> ChatSettings {
    ChatSettings {
        system_prompt: "You are a test.".to_string(),
        params: GenerationParams::default(),
    }
}

/// Creates a test App with a primary-only chain.
pub fn test_app() -> App {
    App::new(
        ProviderChain::new(Arc::new(ScriptedProvider::ok("primary", "ok")), None),
        settings(),
        "Hello! test greeting",
    )
}

/// Creates a test App whose chain has a fallback.
pub fn test_app_with_fallback() -> App {
    App::new(
        ProviderChain::new(
            Arc::new(ScriptedProvider::failing("primary", 500)),
            Some(Arc::new(ScriptedProvider::ok("fallback", "from fallback"))),
        ),
        settings(),
        "Hello! test greeting",
    )
}
