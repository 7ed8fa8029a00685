//! # Core Application Logic
//!
//! This module contains Lucky's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Messages (the log)   │
//!                    │  • Reveal (typing)      │
//!                    │  • Segments (code)      │
//!                    │  • State + update()     │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                                ▼
//!                         ┌────────────┐
//!                         │    TUI     │
//!                         │  Adapter   │
//!                         │ (ratatui)  │
//!                         └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`message`]: `MessageStore`, the ordered conversation log
//! - [`reveal`]: word-batch typing animation for assistant replies
//! - [`segments`]: splits message text into plain text and code blocks
//! - [`state`]: The `App` struct, all conversation state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`config`]: config file, env and CLI resolution

pub mod action;
pub mod config;
pub mod message;
pub mod reveal;
pub mod segments;
pub mod state;
