//! # Incremental Reveal
//!
//! Assistant replies are shown as if typed: a few words at a time on a fixed
//! cadence. User messages appear whole.
//!
//! [`Reveal`] is the per-message state machine (no clock). [`Revealer`] owns
//! one reveal per assistant message and decides when each is due to tick,
//! given the current `Instant` from the event loop.
//!
//! Tokens are the pieces of `content.split(' ')`. Because tokens are rejoined
//! with single spaces, the revealed text is always a byte prefix of the
//! content and ends up equal to it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::core::message::{Message, MessageId};

/// Words appended per tick.
pub const REVEAL_BATCH_WORDS: usize = 3;
/// Time between ticks.
pub const REVEAL_INTERVAL: Duration = Duration::from_millis(20);

/// Reveal progress for a single message.
#[derive(Debug, Clone, PartialEq)]
pub struct Reveal {
    content: String,
    /// Byte offset where each token ends.
    token_ends: Vec<usize>,
    /// Number of tokens revealed so far.
    shown: usize,
}

impl Reveal {
    /// Starts a reveal from empty. Non-assistant and empty content are complete
    /// immediately.
    pub fn start(content: &str, is_assistant: bool) -> Self {
        let mut token_ends = Vec::new();
        let mut offset = 0;
        for token in content.split(' ') {
            offset += token.len();
            token_ends.push(offset);
            offset += 1;
        }

        let shown = if !is_assistant || content.is_empty() {
            token_ends.len()
        } else {
            0
        };

        Self {
            content: content.to_string(),
            token_ends,
            shown,
        }
    }

    /// Reveals the next batch. Returns `true` if anything new became visible.
    pub fn tick(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }
        self.shown = (self.shown + REVEAL_BATCH_WORDS).min(self.token_ends.len());
        true
    }

    pub fn revealed(&self) -> &str {
        match self.shown {
            0 => "",
            n => &self.content[..self.token_ends[n - 1]],
        }
    }

    pub fn is_complete(&self) -> bool {
        self.shown == self.token_ends.len()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Number of ticks still needed to finish.
    pub fn remaining_ticks(&self) -> usize {
        (self.token_ends.len() - self.shown).div_ceil(REVEAL_BATCH_WORDS)
    }
}

struct Scheduled {
    reveal: Reveal,
    next_tick: Instant,
}

/// Drives one [`Reveal`] per assistant message on a shared cadence.
///
/// Each message keeps its own schedule; reveals don't interact. A reveal is
/// dropped as soon as its message leaves the conversation, so nothing ticks
/// for a message that is no longer displayed.
pub struct Revealer {
    interval: Duration,
    enabled: bool,
    reveals: HashMap<MessageId, Scheduled>,
}

impl Default for Revealer {
    fn default() -> Self {
        Self::new(REVEAL_INTERVAL, true)
    }
}

impl Revealer {
    pub fn new(interval: Duration, enabled: bool) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            enabled,
            reveals: HashMap::new(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Reconciles reveal state with the current conversation.
    ///
    /// New assistant messages start revealing from empty. A message whose
    /// content no longer matches its reveal restarts from empty. Reveals for
    /// messages that are gone are cancelled.
    pub fn sync(&mut self, messages: &[Message], now: Instant) {
        if !self.enabled {
            return;
        }

        self.reveals
            .retain(|id, _| messages.iter().any(|m| m.id == *id && m.is_assistant()));

        for message in messages.iter().filter(|m| m.is_assistant()) {
            let stale = self
                .reveals
                .get(&message.id)
                .is_none_or(|s| s.reveal.content() != message.content);
            if stale {
                self.reveals.insert(
                    message.id,
                    Scheduled {
                        reveal: Reveal::start(&message.content, true),
                        next_tick: now + self.interval,
                    },
                );
            }
        }
    }

    /// Applies every tick that is due at `now`. Returns the ids of messages
    /// whose revealed text grew, oldest first.
    pub fn advance(&mut self, now: Instant) -> Vec<MessageId> {
        let mut grown = Vec::new();
        for (id, scheduled) in self.reveals.iter_mut() {
            if scheduled.reveal.is_complete() || now < scheduled.next_tick {
                continue;
            }
            let overdue = now.duration_since(scheduled.next_tick);
            let ticks = 1 + (overdue.as_nanos() / self.interval.as_nanos()) as usize;
            let mut progressed = false;
            for _ in 0..ticks {
                progressed |= scheduled.reveal.tick();
            }
            scheduled.next_tick += self.interval * ticks as u32;
            if progressed {
                grown.push(*id);
            }
        }
        grown.sort_unstable();
        grown
    }

    /// Text to display for `message` right now.
    pub fn displayed<'a>(&'a self, message: &'a Message) -> &'a str {
        match self.reveals.get(&message.id) {
            Some(s) if s.reveal.content() == message.content => s.reveal.revealed(),
            _ => &message.content,
        }
    }

    /// True while `id` still has words left to show.
    pub fn is_revealing(&self, id: MessageId) -> bool {
        self.reveals
            .get(&id)
            .is_some_and(|s| !s.reveal.is_complete())
    }

    /// True while any reveal still has words to show.
    pub fn is_animating(&self) -> bool {
        self.reveals.values().any(|s| !s.reveal.is_complete())
    }

    /// Cancels every reveal (e.g. on "new chat").
    pub fn clear(&mut self) {
        self.reveals.clear();
    }

    /// Jumps every reveal to its end.
    pub fn finish_all(&mut self) {
        for scheduled in self.reveals.values_mut() {
            while scheduled.reveal.tick() {}
        }
    }
}
