//! # Application State
//!
//! Core business state for Lucky. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── store: MessageStore             // the conversation
//! ├── providers: ProviderChain        // primary + optional fallback
//! ├── settings: ChatSettings          // system prompt, sampling
//! ├── greeting: String                // seeded assistant turn
//! ├── phase: Phase                    // idle / awaiting response / awaiting fallback
//! ├── session: u64                    // bumped by "new chat"
//! ├── in_flight: Option<TurnRequest>  // kept for the fallback hop
//! ├── staged_attachment: Option<Attachment>
//! ├── pending_transcript: Option<String>
//! ├── toast: Option<Toast>
//! └── status_message: String
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use crate::core::action::TurnRequest;
use crate::core::config::ResolvedConfig;
use crate::core::message::{Author, Message, MessageStore};
use crate::inference::{ChatSettings, ProviderChain};
use crate::relay::Attachment;

/// Where the conversation is in its request cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingResponse,
    AwaitingFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

/// Short-lived notification shown over the conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub title: String,
    pub body: String,
    pub level: ToastLevel,
}

impl Toast {
    pub fn new(level: ToastLevel, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            level,
        }
    }
}

pub struct App {
    pub store: MessageStore,
    pub providers: ProviderChain,
    pub settings: ChatSettings,
    pub greeting: String,
    pub phase: Phase,
    /// Generation counter; replies tagged with an older value are dropped.
    pub session: u64,
    /// The request currently awaiting a reply.
    pub in_flight: Option<TurnRequest>,
    /// Uploaded file waiting to ride along with the next submission.
    pub staged_attachment: Option<Attachment>,
    /// Dictated text waiting to be inserted into the input box.
    pub pending_transcript: Option<String>,
    pub toast: Option<Toast>,
    /// Bumped every time a toast is shown, so a repeat of the same toast
    /// counts as new.
    pub toast_seq: u64,
    pub status_message: String,
}

impl App {
    pub fn new(providers: ProviderChain, settings: ChatSettings, greeting: impl Into<String>) -> Self {
        let greeting = greeting.into();
        let mut app = Self {
            store: MessageStore::new(),
            providers,
            settings,
            greeting,
            phase: Phase::Idle,
            session: 0,
            in_flight: None,
            staged_attachment: None,
            pending_transcript: None,
            toast: None,
            toast_seq: 0,
            status_message: String::from("Welcome to Lucky!"),
        };
        let seed = app.greeting_seed();
        app.store.reset(seed);
        app
    }

    pub fn from_config(providers: ProviderChain, config: &ResolvedConfig) -> Self {
        let settings = ChatSettings {
            system_prompt: config.system_prompt.clone(),
            params: config.params,
        };
        Self::new(providers, settings, config.greeting.clone())
    }

    pub fn show_toast(&mut self, toast: Toast) {
        self.toast = Some(toast);
        self.toast_seq += 1;
    }

    /// True while a request is in flight; submissions are rejected.
    pub fn pending(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// The messages a fresh conversation starts with.
    pub fn greeting_seed(&mut self) -> Vec<Message> {
        if self.greeting.is_empty() {
            return Vec::new();
        }
        let id = self.store.next_id();
        vec![Message::new(id, Author::Assistant, self.greeting.clone())]
    }

    /// `primary (model) → fallback (model)` for the title bar.
    pub fn provider_summary(&self) -> String {
        let primary = format!(
            "{} ({})",
            self.providers.primary.name(),
            self.providers.primary.model()
        );
        match &self.providers.fallback {
            Some(f) => format!("{} → {} ({})", primary, f.name(), f.model()),
            None => primary,
        }
    }
}
