pub mod chain;
pub mod provider;
pub mod providers;
pub mod types;

pub use chain::{ChatSettings, ProviderChain, Target, complete_turn};
pub use provider::{CompletionProvider, CompletionRequest, ProviderError};
pub use providers::{GeminiProvider, HuggingFaceProvider, TogetherProvider, build_provider};
pub use types::{ChatTurn, GenerationParams, Role};
