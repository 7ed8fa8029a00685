//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI, and
//! translates keyboard events into `core::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop only redraws when something changed:
//!
//! - **Revealing**: a reply is being typed out; wakes every reveal interval.
//! - **Pending**: waiting on a provider; wakes every ~80ms for the spinner.
//! - **Idle**: sleeps up to 500ms, redrawing on input or resize.
//!
//! ## Modes
//!
//! Input mode edits the composer. Esc switches to cursor mode, where Up/Down
//! walk the messages and `y` / `c` / `1`-`9` copy the selected message, its
//! first code block or its Nth code block. Typing drops back into input mode.

pub mod clipboard;
mod component;
mod components;
mod event;
pub mod rich_text;
mod ui;

use std::io::stdout;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use log::{debug, info, warn};

use crate::core::action::{Action, Effect, TurnRequest, update};
use crate::core::config::ResolvedConfig;
use crate::core::reveal::Revealer;
use crate::core::state::{App, Toast, ToastLevel};
use crate::inference::{ProviderChain, complete_turn};
use crate::relay::{Relay, dictate, upload_attachment};
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState, TOAST_TTL};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const PENDING_TICK: Duration = Duration::from_millis(80);
const IDLE_TICK: Duration = Duration::from_millis(500);

/// Modal input mode: determines how keyboard events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Navigate messages with arrow keys. Typing auto-switches to Input.
    Cursor,
    /// Text editing in the input box. Esc switches to Cursor.
    Input,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    pub input_mode: InputMode,
    pub revealer: Revealer,
    /// Sequence number of the toast on screen and when it first appeared
    shown_toast: Option<(u64, Instant)>,
}

impl TuiState {
    pub fn new(revealer: Revealer) -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            input_mode: InputMode::Input, // User expects to type immediately
            revealer,
            shown_toast: None,
        }
    }

    /// Copies the props the input box needs from `App`.
    pub fn sync_props(&mut self, app: &App) {
        self.input_box.pending = app.pending();
        self.input_box.dimmed = self.input_mode == InputMode::Cursor;
        self.input_box.staged_attachment =
            app.staged_attachment.as_ref().map(|a| a.name.clone());
    }

    /// Advances reveal animations and scrolls the newest growing message into
    /// view. Returns true if anything grew.
    fn tick_reveal(&mut self, app: &App, now: Instant) -> bool {
        self.revealer.sync(app.store.all(), now);
        // Ids increase with insertion, so the largest is the newest
        match self.revealer.advance(now).into_iter().max() {
            Some(newest) => {
                self.message_list.follow_message(newest);
                true
            }
            None => false,
        }
    }

    /// Clears per-conversation presentation state after "new chat".
    fn reset_conversation(&mut self) {
        self.revealer.clear();
        self.message_list.reset();
        self.input_mode = InputMode::Input;
    }

    /// True once the toast in `app` has been visible for [`TOAST_TTL`].
    fn toast_expired(&mut self, app: &App, now: Instant) -> bool {
        if app.toast.is_none() {
            self.shown_toast = None;
            return false;
        }
        match self.shown_toast {
            Some((seq, since)) if seq == app.toast_seq => now.duration_since(since) >= TOAST_TTL,
            _ => {
                self.shown_toast = Some((app.toast_seq, now));
                false
            }
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets us tell Shift+Enter from Enter; terminals
        // that don't support it ignore the request.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock, // blink timer resets on every draw
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Background work the event loop can start.
struct Spawner {
    tx: mpsc::Sender<Action>,
    relay: Option<Relay>,
}

impl Spawner {
    fn request(&self, app: &App, request: TurnRequest) {
        let chain = app.providers.clone();
        let settings = app.settings.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let action = complete_turn(&chain, &settings, request).await;
            if tx.send(action).is_err() {
                warn!("Failed to deliver completion result: receiver dropped");
            }
        });
    }

    fn upload(&self, path: PathBuf) -> Result<(), &'static str> {
        let relay = self.relay.as_ref().ok_or("Attachments are not configured")?;
        let store = relay.store.clone();
        let tx = self.tx.clone();
        info!("Spawning upload of {}", path.display());
        tokio::spawn(async move {
            let action = match upload_attachment(store.as_ref(), &path).await {
                Ok(attachment) => Action::AttachmentReady(attachment),
                Err(e) => {
                    warn!("Upload of {} failed: {}", path.display(), e);
                    Action::AttachmentFailed(e.to_string())
                }
            };
            if tx.send(action).is_err() {
                warn!("Failed to deliver upload result: receiver dropped");
            }
        });
        Ok(())
    }

    fn dictation(&self, path: PathBuf) -> Result<(), &'static str> {
        let relay = self.relay.clone().ok_or("Voice input is not configured")?;
        let tx = self.tx.clone();
        info!("Spawning dictation of {}", path.display());
        tokio::spawn(async move {
            let action = match dictate(&relay, &path).await {
                Ok(text) => Action::TranscriptReady(text),
                Err(e) => {
                    warn!("Dictation of {} failed: {}", path.display(), e);
                    Action::TranscriptFailed(e.to_string())
                }
            };
            if tx.send(action).is_err() {
                warn!("Failed to deliver transcript: receiver dropped");
            }
        });
        Ok(())
    }
}

/// Runs `action` through the reducer and carries out its effect.
/// Returns true when the app should quit.
fn dispatch(app: &mut App, action: Action, spawner: &Spawner) -> bool {
    match update(app, action) {
        Effect::None => false,
        Effect::Quit => true,
        Effect::SpawnRequest(request) => {
            spawner.request(app, request);
            false
        }
    }
}

pub fn run(config: ResolvedConfig, providers: ProviderChain) -> std::io::Result<()> {
    let mut app = App::from_config(providers, &config);
    let mut tui = TuiState::new(Revealer::new(config.reveal_interval, config.reveal));
    ui::apply_capabilities(&mut tui, &config);

    let relay = match Relay::from_config(&config) {
        Ok(relay) => Some(relay),
        Err(e) => {
            info!("Relay disabled: {}", e);
            None
        }
    };

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let spawner = Spawner { tx, relay };

    let start_time = Instant::now();
    let mut needs_redraw = true;

    loop {
        let now = Instant::now();

        if tui.tick_reveal(&app, now) {
            needs_redraw = true;
        }

        if let Some(text) = app.pending_transcript.take() {
            tui.input_box.insert_transcript(&text);
            needs_redraw = true;
        }

        if tui.toast_expired(&app, now) {
            dispatch(&mut app, Action::DismissToast, &spawner);
            needs_redraw = true;
        }

        let revealing = tui.revealer.is_animating();
        if revealing || app.pending() {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_millis() / 80) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if revealing {
            tui.revealer.interval()
        } else if app.pending() {
            PENDING_TICK
        } else {
            IDLE_TICK
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            tui.sync_props(&app);
            let frame_area = terminal.get_frame().area();
            should_quit |= handle_event(&mut app, &mut tui, &spawner, event, frame_area);
        }

        if should_quit {
            break;
        }

        // Handle background task results
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if dispatch(&mut app, action, &spawner) {
                should_quit = true;
            }
        }

        if should_quit {
            break;
        }
    }

    ratatui::restore();
    Ok(())
}

/// Routes one terminal event. Returns true when the app should quit.
fn handle_event(
    app: &mut App,
    tui: &mut TuiState,
    spawner: &Spawner,
    event: TuiEvent,
    frame_area: ratatui::layout::Rect,
) -> bool {
    match event {
        // Resize just needs a redraw (already flagged)
        TuiEvent::Resize => false,
        TuiEvent::ForceQuit => dispatch(app, Action::Quit, spawner),
        TuiEvent::MouseMove(_col, row) => {
            tui.message_list.hovered_index = ui::hit_test_message(row, frame_area, tui);
            false
        }
        TuiEvent::MouseClick(_col, row) => {
            if let Some(idx) = ui::hit_test_message(row, frame_area, tui) {
                tui.message_list.selected_index = Some(idx);
                tui.input_mode = InputMode::Cursor;
            }
            false
        }
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
        | TuiEvent::ScrollToBottom => {
            tui.message_list.handle_event(&event);
            false
        }
        TuiEvent::NewChat => {
            info!("Starting a new chat");
            tui.reset_conversation();
            dispatch(app, Action::NewChat, spawner)
        }
        _ => match tui.input_mode {
            InputMode::Input => handle_input_mode(app, tui, spawner, event),
            InputMode::Cursor => handle_cursor_mode(app, tui, spawner, event),
        },
    }
}

fn handle_input_mode(app: &mut App, tui: &mut TuiState, spawner: &Spawner, event: TuiEvent) -> bool {
    // Esc leaves the composer unless it's closing a path prompt
    if event == TuiEvent::Escape && !tui.input_box.is_prompting() {
        tui.input_mode = InputMode::Cursor;
        tui.message_list.selected_index = app.store.len().checked_sub(1);
        tui.message_list.scroll_to_selected();
        return false;
    }

    let Some(input_event) = tui.input_box.handle_event(&event) else {
        return false;
    };
    match input_event {
        InputEvent::Submit(text) => {
            // Skip the rest of the reveal so the new turn lands under a finished reply
            tui.revealer.finish_all();
            tui.message_list.stick_to_bottom = true;
            dispatch(app, Action::Submit(text), spawner)
        }
        InputEvent::Attach(path) => {
            match spawner.upload(path) {
                Ok(()) => app.status_message = String::from("Uploading attachment..."),
                Err(msg) => app.show_toast(Toast::new(ToastLevel::Error, "Upload failed", msg)),
            }
            false
        }
        InputEvent::Dictate(path) => {
            match spawner.dictation(path) {
                Ok(()) => app.status_message = String::from("Transcribing..."),
                Err(msg) => {
                    app.show_toast(Toast::new(ToastLevel::Error, "Transcription failed", msg))
                }
            }
            false
        }
        InputEvent::ContentChanged => false,
    }
}

fn handle_cursor_mode(app: &mut App, tui: &mut TuiState, spawner: &Spawner, event: TuiEvent) -> bool {
    let len = app.store.len();
    match event {
        TuiEvent::Escape | TuiEvent::Submit => {
            tui.input_mode = InputMode::Input;
            tui.message_list.selected_index = None;
        }
        TuiEvent::CursorUp => tui.message_list.select_previous(len),
        TuiEvent::CursorDown => tui.message_list.select_next(len),
        TuiEvent::InputChar(c @ ('y' | 'c' | '1'..='9')) => {
            if let Some(message) = tui
                .message_list
                .selected_index
                .and_then(|i| app.store.all().get(i))
            {
                app.show_toast(copy_from_message(message, c));
            }
        }
        // Typing auto-switches to Input mode and forwards the event
        TuiEvent::InputChar(_) | TuiEvent::Paste(_) | TuiEvent::Attach | TuiEvent::Dictate => {
            tui.input_mode = InputMode::Input;
            tui.message_list.selected_index = None;
            return handle_input_mode(app, tui, spawner, event);
        }
        _ => {}
    }
    false
}

/// Copies part of `message` per the cursor-mode key and reports the outcome.
fn copy_from_message(message: &crate::core::message::Message, key: char) -> Toast {
    let (text, what) = match key {
        'y' => (Ok(message.content.clone()), String::from("Message")),
        'c' => (clipboard::code_block_text(message, 1), String::from("Code block")),
        n => {
            let n = n.to_digit(10).unwrap_or(1) as usize;
            (clipboard::code_block_text(message, n), format!("Code block {n}"))
        }
    };
    match text.and_then(|t| clipboard::copy_to_clipboard(&t)) {
        Ok(()) => Toast::new(ToastLevel::Success, "Copied", format!("{what} copied to clipboard")),
        Err(e) => Toast::new(ToastLevel::Error, "Copy failed", e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reveal::REVEAL_INTERVAL;
    use crate::test_support::test_app;

    fn spawner() -> (Spawner, mpsc::Receiver<Action>) {
        let (tx, rx) = mpsc::channel();
        (Spawner { tx, relay: None }, rx)
    }

    fn tui() -> TuiState {
        TuiState::new(Revealer::new(REVEAL_INTERVAL, true))
    }

    fn area() -> ratatui::layout::Rect {
        ratatui::layout::Rect::new(0, 0, 80, 24)
    }

    #[test]
    fn test_escape_enters_cursor_mode_on_last_message() {
        let mut app = test_app();
        let mut tui = tui();
        let (spawner, _rx) = spawner();

        handle_event(&mut app, &mut tui, &spawner, TuiEvent::Escape, area());
        assert_eq!(tui.input_mode, InputMode::Cursor);
        assert_eq!(tui.message_list.selected_index, Some(0));

        // Typing goes back to the composer and is not lost
        handle_event(&mut app, &mut tui, &spawner, TuiEvent::InputChar('h'), area());
        assert_eq!(tui.input_mode, InputMode::Input);
        assert_eq!(tui.input_box.buffer(), "h");
    }

    #[test]
    fn test_new_chat_resets_presentation_state() {
        let mut app = test_app();
        let mut tui = tui();
        let (spawner, _rx) = spawner();
        tui.input_mode = InputMode::Cursor;
        tui.message_list.selected_index = Some(0);
        let session = app.session;

        handle_event(&mut app, &mut tui, &spawner, TuiEvent::NewChat, area());
        assert_eq!(app.session, session + 1);
        assert_eq!(tui.input_mode, InputMode::Input);
        assert_eq!(tui.message_list.selected_index, None);
        assert!(!tui.revealer.is_animating());
    }

    #[test]
    fn test_attach_without_relay_shows_error() {
        let mut app = test_app();
        let mut tui = tui();
        let (spawner, _rx) = spawner();

        // Drive the prompt directly; the capability is normally off without a relay
        tui.input_box.attach_enabled = true;
        handle_event(&mut app, &mut tui, &spawner, TuiEvent::Attach, area());
        handle_event(&mut app, &mut tui, &spawner, TuiEvent::Paste("/tmp/x.png".into()), area());
        handle_event(&mut app, &mut tui, &spawner, TuiEvent::Submit, area());

        let toast = app.toast.clone().unwrap();
        assert_eq!(toast.level, ToastLevel::Error);
        assert_eq!(toast.body, "Attachments are not configured");
    }

    #[test]
    fn test_reveal_tick_follows_newest_reply() {
        let mut app = test_app();
        let mut tui = tui();
        let start = Instant::now();
        tui.tick_reveal(&app, start);

        update(&mut app, Action::Submit("hi".into()));
        let session = app.session;
        update(&mut app, Action::ResponseReceived { session, text: "one two three four".into() });
        tui.message_list.handle_event(&TuiEvent::ScrollUp);
        assert!(!tui.message_list.stick_to_bottom);

        assert!(!tui.tick_reveal(&app, start));
        assert!(tui.tick_reveal(&app, start + REVEAL_INTERVAL));

        let backend = ratatui::backend::TestBackend::new(80, 24);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, 0)).unwrap();
        assert!(tui.message_list.stick_to_bottom);
    }

    #[test]
    fn test_force_quit() {
        let mut app = test_app();
        let mut tui = tui();
        let (spawner, _rx) = spawner();
        assert!(handle_event(&mut app, &mut tui, &spawner, TuiEvent::ForceQuit, area()));
    }

    #[test]
    fn test_copy_missing_code_block_reports_error() {
        let message = crate::core::message::Message::new(1, crate::core::message::Author::User, "plain");
        let toast = copy_from_message(&message, '2');
        assert_eq!(toast.level, ToastLevel::Error);
        assert!(toast.body.contains("code block 2"));
    }

    #[test]
    fn test_toast_expires_after_ttl() {
        let mut app = test_app();
        let mut tui = tui();
        let start = Instant::now();
        app.show_toast(Toast::new(ToastLevel::Info, "t", "b"));

        assert!(!tui.toast_expired(&app, start));
        assert!(!tui.toast_expired(&app, start + TOAST_TTL / 2));
        assert!(tui.toast_expired(&app, start + TOAST_TTL));

        // A different toast restarts the clock
        app.show_toast(Toast::new(ToastLevel::Info, "t2", "b"));
        assert!(!tui.toast_expired(&app, start + TOAST_TTL));

        // So does raising the same toast again
        let later = start + TOAST_TTL * 2;
        app.show_toast(Toast::new(ToastLevel::Info, "t2", "b"));
        assert!(!tui.toast_expired(&app, later));
        assert!(!tui.toast_expired(&app, later + TOAST_TTL / 2));
        assert!(tui.toast_expired(&app, later + TOAST_TTL));
    }

    #[test]
    fn test_transcript_lands_in_input_box() {
        let mut app = test_app();
        let mut tui = tui();
        let (spawner, _rx) = spawner();
        dispatch(&mut app, Action::TranscriptReady("hello there".into()), &spawner);
        if let Some(text) = app.pending_transcript.take() {
            tui.input_box.insert_transcript(&text);
        }
        assert_eq!(tui.input_box.buffer(), "hello there");
    }
}
