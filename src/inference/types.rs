use serde::{Deserialize, Serialize};

use crate::core::message::{Author, Message};

/// Chat role as understood by OpenAI-style APIs.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl From<Author> for Role {
    fn from(author: Author) -> Self {
        match author {
            Author::User => Role::User,
            Author::Assistant => Role::Assistant,
        }
    }
}

/// One `{role, content}` entry of a chat transcript on the wire.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

impl From<&Message> for ChatTurn {
    fn from(message: &Message) -> Self {
        ChatTurn::new(message.author.into(), message.content.clone())
    }
}

/// Sampling knobs shared by every provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 800;

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Prior turns followed by the new user text, without a system entry.
pub fn transcript(history: &[Message], text: &str) -> Vec<ChatTurn> {
    history
        .iter()
        .map(ChatTurn::from)
        .chain(std::iter::once(ChatTurn::new(Role::User, text)))
        .collect()
}

/// `transcript` with the system prompt prepended.
pub fn transcript_with_system(system_prompt: &str, history: &[Message], text: &str) -> Vec<ChatTurn> {
    let mut turns = Vec::with_capacity(history.len() + 2);
    turns.push(ChatTurn::new(Role::System, system_prompt));
    turns.extend(transcript(history, text));
    turns
}
