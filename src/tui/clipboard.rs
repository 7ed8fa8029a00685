//! System clipboard access for the copy shortcuts.

use std::fmt;

use arboard::Clipboard;
use log::error;

use crate::core::message::Message;
use crate::core::segments;

#[derive(Debug)]
pub enum ClipboardError {
    /// No clipboard available (headless session, missing display server).
    Unavailable(String),
    /// The clipboard rejected the text.
    Write(String),
    /// The message has no code block with that number.
    NoSuchBlock(usize),
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipboardError::Unavailable(msg) => write!(f, "clipboard unavailable: {msg}"),
            ClipboardError::Write(msg) => write!(f, "failed to set clipboard text: {msg}"),
            ClipboardError::NoSuchBlock(n) => write!(f, "message has no code block {n}"),
        }
    }
}

impl std::error::Error for ClipboardError {}

/// Copies `text` to the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<(), ClipboardError> {
    let mut clipboard = Clipboard::new().map_err(|e| {
        error!("Failed to initialize clipboard: {}", e);
        ClipboardError::Unavailable(e.to_string())
    })?;
    clipboard.set_text(text).map_err(|e| {
        error!("Failed to set clipboard text: {}", e);
        ClipboardError::Write(e.to_string())
    })
}

/// Body of the `n`th (1-based) fenced code block in `message`.
pub fn code_block_text(message: &Message, n: usize) -> Result<String, ClipboardError> {
    n.checked_sub(1)
        .and_then(|i| segments::code_blocks(&message.content).into_iter().nth(i))
        .map(|block| block.value)
        .ok_or(ClipboardError::NoSuchBlock(n))
}
