//! # TUI Components
//!
//! All widgets of the chat screen.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Built fresh each frame from data the parent hands them:
//! - `TitleBar`: provider chain, status and the "↓ New" hint
//! - `Message`: one chat bubble (author, time, revealed text)
//! - `Toast`: transient notification in the corner
//!
//! ### Stateful Components (Event-Driven)
//!
//! Keep local state between frames and emit events:
//! - `InputBox`: composer with the attach/dictate path prompt
//! - `MessageList`: scrollable conversation with layout caching
//!
//! Components receive external data as props (struct fields) rather than
//! reaching into `App`, which keeps each one testable against a
//! `TestBackend` in isolation.
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (top status bar)
//! ├── message.rs       (single message renderer)
//! ├── message_list.rs  (scrollable message container)
//! ├── toast.rs         (notifications)
//! └── input_box/       (composer: editor, wrapping layout, prompts)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod input_box;
pub mod message;
pub use input_box::{InputBox, InputEvent};
pub mod message_list;
pub use message_list::{MessageList, MessageListState};
pub mod toast;
pub use toast::{TOAST_TTL, Toast};
