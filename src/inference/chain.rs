//! # Provider Chain
//!
//! A primary provider and an optional fallback. The chain itself never
//! decides to fall back: [`complete_turn`] runs the one provider the reducer
//! asked for and reports the outcome as an [`Action`]. The reducer then
//! chooses whether to spawn the fallback request.
//!
//! ```text
//! Effect::SpawnRequest(TurnRequest { target: Primary, .. })
//!   → complete_turn → RequestFailed { target: Primary }
//!   → update() → Effect::SpawnRequest(TurnRequest { target: Fallback, .. })
//!   → complete_turn → ResponseReceived
//! ```

use std::fmt;
use std::sync::Arc;

use log::{info, warn};

use super::types::GenerationParams;
use super::{CompletionProvider, CompletionRequest};
use crate::core::action::{Action, TurnRequest};
use crate::core::config::{ConfigError, ResolvedConfig};
use crate::inference::providers::build_provider;

/// Which end of the chain a request is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Primary,
    Fallback,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Primary => write!(f, "primary"),
            Target::Fallback => write!(f, "fallback"),
        }
    }
}

#[derive(Clone)]
pub struct ProviderChain {
    pub primary: Arc<dyn CompletionProvider>,
    pub fallback: Option<Arc<dyn CompletionProvider>>,
}

impl ProviderChain {
    pub fn new(
        primary: Arc<dyn CompletionProvider>,
        fallback: Option<Arc<dyn CompletionProvider>>,
    ) -> Self {
        Self { primary, fallback }
    }

    /// Builds the chain from config. A primary without credentials is an
    /// error; a fallback without credentials is dropped with a warning.
    pub fn from_config(config: &ResolvedConfig) -> Result<Self, ConfigError> {
        let primary = build_provider(config.primary, config.provider(config.primary))?;
        let fallback = match config.fallback {
            Some(kind) => match build_provider(kind, config.provider(kind)) {
                Ok(provider) => Some(provider),
                Err(e) => {
                    warn!("Fallback provider disabled: {}", e);
                    None
                }
            },
            None => None,
        };
        info!(
            "Provider chain: primary={} ({}), fallback={}",
            primary.name(),
            primary.model(),
            fallback
                .as_ref()
                .map(|f| format!("{} ({})", f.name(), f.model()))
                .unwrap_or_else(|| "none".to_string())
        );
        Ok(Self { primary, fallback })
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    pub fn get(&self, target: Target) -> Option<&Arc<dyn CompletionProvider>> {
        match target {
            Target::Primary => Some(&self.primary),
            Target::Fallback => self.fallback.as_ref(),
        }
    }
}

/// Prompt and sampling settings applied to every turn.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub system_prompt: String,
    pub params: GenerationParams,
}

/// Runs one request against the provider named by `request.target` and turns
/// the outcome into the action the reducer expects.
pub async fn complete_turn(
    chain: &ProviderChain,
    settings: &ChatSettings,
    request: TurnRequest,
) -> Action {
    let Some(provider) = chain.get(request.target) else {
        warn!("No {} provider configured", request.target);
        return Action::RequestFailed {
            session: request.session,
            target: request.target,
            error: format!("no {} provider configured", request.target),
        };
    };

    info!(
        "Requesting completion from {} provider {} (history={})",
        request.target,
        provider.name(),
        request.history.len()
    );

    let completion = CompletionRequest {
        system_prompt: &settings.system_prompt,
        history: &request.history,
        text: &request.text,
        params: settings.params,
    };

    match provider.complete(completion).await {
        Ok(text) => {
            info!("{} replied with {} bytes", provider.name(), text.len());
            Action::ResponseReceived {
                session: request.session,
                text,
            }
        }
        Err(e) => {
            warn!("{} provider {} failed: {}", request.target, provider.name(), e);
            Action::RequestFailed {
                session: request.session,
                target: request.target,
                error: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedProvider, settings};

    fn request(target: Target) -> TurnRequest {
        TurnRequest {
            session: 3,
            target,
            history: Vec::new(),
            text: "hi".to_string(),
        }
    }

    #[test]
    fn test_complete_turn_success() {
        let chain = ProviderChain::new(Arc::new(ScriptedProvider::ok("p", "hello")), None);
        let action = tokio_test::block_on(complete_turn(&chain, &settings(), request(Target::Primary)));
        assert_eq!(
            action,
            Action::ResponseReceived {
                session: 3,
                text: "hello".to_string()
            }
        );
    }

    #[test]
    fn test_complete_turn_failure_reports_target() {
        let chain = ProviderChain::new(
            Arc::new(ScriptedProvider::ok("p", "unused")),
            Some(Arc::new(ScriptedProvider::failing("f", 503))),
        );
        let action = tokio_test::block_on(complete_turn(&chain, &settings(), request(Target::Fallback)));
        match action {
            Action::RequestFailed { session, target, error } => {
                assert_eq!(session, 3);
                assert_eq!(target, Target::Fallback);
                assert!(error.contains("503"));
            }
            other => panic!("expected RequestFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_complete_turn_without_fallback_fails() {
        let chain = ProviderChain::new(Arc::new(ScriptedProvider::ok("p", "x")), None);
        let action = tokio_test::block_on(complete_turn(&chain, &settings(), request(Target::Fallback)));
        assert!(matches!(
            action,
            Action::RequestFailed { target: Target::Fallback, .. }
        ));
    }

    #[test]
    fn test_provider_receives_history_and_text() {
        let provider = Arc::new(ScriptedProvider::ok("p", "ok"));
        let chain = ProviderChain::new(provider.clone(), None);
        let mut turn = request(Target::Primary);
        turn.history = vec![crate::core::message::Message::new(
            1,
            crate::core::message::Author::Assistant,
            "greeting",
        )];
        tokio_test::block_on(complete_turn(&chain, &settings(), turn));

        let seen = provider.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, vec!["greeting".to_string()]);
        assert_eq!(seen[0].1, "hi");
    }
}
