//! # Messages
//!
//! A conversation is an ordered, append-only list of turns. Each turn is a
//! [`Message`] written by either the user or the assistant.
//!
//! ```text
//! MessageStore
//! ├── messages: Vec<Message>   // insertion order == display order
//! └── last_id: MessageId       // highest id handed out or appended
//! ```
//!
//! Ids are milliseconds since the epoch, bumped by one whenever two messages
//! would otherwise share a millisecond (a reply arriving in the same tick as
//! its question). They double as render keys for the reveal animation.

use chrono::{Local, Utc};
use log::warn;

/// Unique, increasing message identifier.
pub type MessageId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    User,
    Assistant,
}

/// One turn of the conversation. Content is final once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub author: Author,
    pub content: String,
    /// Display-formatted local time, fixed at creation.
    pub created_at: String,
}

impl Message {
    pub fn new(id: MessageId, author: Author, content: impl Into<String>) -> Self {
        Self {
            id,
            author,
            content: content.into(),
            created_at: Local::now().format("%H:%M:%S").to_string(),
        }
    }

    pub fn is_assistant(&self) -> bool {
        self.author == Author::Assistant
    }
}

/// Ordered conversation log. Append-only within a session; `reset` replaces
/// everything at once.
#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    messages: Vec<Message>,
    last_id: MessageId,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `seed` (e.g. the greeting).
    pub fn seeded(seed: Vec<Message>) -> Self {
        let mut store = Self::new();
        store.reset(seed);
        store
    }

    /// Returns a fresh id: the current time in ms, or `last + 1` if the clock
    /// hasn't moved past the last id yet.
    pub fn next_id(&mut self) -> MessageId {
        let now = Utc::now().timestamp_millis().max(0) as MessageId;
        let id = now.max(self.last_id + 1);
        self.last_id = id;
        id
    }

    /// Appends to the end. Existing entries are never touched.
    pub fn append(&mut self, message: Message) {
        if !self.messages.is_empty() && message.id <= self.last_id_appended() {
            warn!(
                "Appending message {} out of id order (last appended {})",
                message.id,
                self.last_id_appended()
            );
        }
        self.last_id = self.last_id.max(message.id);
        self.messages.push(message);
    }

    /// Replaces the whole conversation with `seed`.
    pub fn reset(&mut self, seed: Vec<Message>) {
        self.last_id = seed.iter().map(|m| m.id).max().unwrap_or(self.last_id);
        self.messages = seed;
    }

    /// Read-only snapshot in insertion order.
    pub fn all(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    fn last_id_appended(&self) -> MessageId {
        self.messages.last().map(|m| m.id).unwrap_or(0)
    }
}
