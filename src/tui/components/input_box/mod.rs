//! # InputBox Component
//!
//! Message composer at the bottom of the screen.
//!
//! ## Responsibilities
//!
//! - Capture and edit text (cursor movement, word jumps, paste)
//! - Submit on Enter, unless a reply is still pending
//! - Ask for a file path when attaching a file or dictating audio
//! - Show what is staged to go out with the next message
//!
//! ## State Management
//!
//! The compose buffer and the path prompt are internal state. `pending`,
//! the enabled capabilities and the staged attachment are props copied from
//! `App` before every draw.

mod editor;
mod layout;

use std::path::PathBuf;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use editor::Editor;
use layout::{CONTENT_OFFSET, MAX_VISIBLE_LINES, VERTICAL_OVERHEAD, inner_width};

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the text (Enter pressed)
    Submit(String),
    /// User picked a file to attach
    Attach(PathBuf),
    /// User picked an audio file to transcribe
    Dictate(PathBuf),
    /// Text or cursor changed
    ContentChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Attach,
    Dictate,
}

impl PromptKind {
    fn title(self) -> &'static str {
        match self {
            PromptKind::Attach => "Attach file (path, Enter to upload, Esc to cancel)",
            PromptKind::Dictate => "Dictate (audio file path, Enter to transcribe, Esc to cancel)",
        }
    }
}

pub struct InputBox {
    /// The message being composed
    compose: Editor,
    /// Path being typed for an attach/dictate prompt
    prompt: Option<(PromptKind, Editor)>,
    /// First visible row when the content is taller than the box
    scroll_offset: u16,
    /// Area width from the last render (used for vertical cursor movement)
    last_width: u16,

    /// A reply is pending; submission is blocked (Prop)
    pub pending: bool,
    /// Input is visually de-emphasised while cursor mode has focus (Prop)
    pub dimmed: bool,
    pub attach_enabled: bool,
    pub voice_enabled: bool,
    /// Name of the uploaded file that rides along with the next message (Prop)
    pub staged_attachment: Option<String>,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    const DEFAULT_WIDTH: u16 = 80;

    pub fn new() -> Self {
        Self {
            compose: Editor::default(),
            prompt: None,
            scroll_offset: 0,
            last_width: Self::DEFAULT_WIDTH,
            pending: false,
            dimmed: false,
            attach_enabled: false,
            voice_enabled: false,
            staged_attachment: None,
        }
    }

    pub fn buffer(&self) -> &str {
        &self.compose.buffer
    }

    pub fn is_prompting(&self) -> bool {
        self.prompt.is_some()
    }

    /// Inserts dictated text at the cursor of the compose buffer.
    pub fn insert_transcript(&mut self, text: &str) {
        self.compose.insert_text(text);
    }

    fn active(&self) -> &Editor {
        match &self.prompt {
            Some((_, editor)) => editor,
            None => &self.compose,
        }
    }

    fn active_mut(&mut self) -> &mut Editor {
        match &mut self.prompt {
            Some((_, editor)) => editor,
            None => &mut self.compose,
        }
    }

    /// Height for the current content, clamped to
    /// `[1 + VERTICAL_OVERHEAD, MAX_VISIBLE_LINES + VERTICAL_OVERHEAD]`.
    pub fn calculate_height(&self, area_width: u16) -> u16 {
        let editor = self.active();
        let rows = layout::rows(&editor.buffer, inner_width(area_width)).len() as u16;
        rows.clamp(1, MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    fn title(&self) -> Line<'static> {
        if let Some((kind, _)) = &self.prompt {
            return Line::from(Span::styled(
                format!(" {} ", kind.title()),
                Style::default().fg(Color::Yellow),
            ));
        }

        let mut spans = vec![Span::raw(" Message ")];
        if let Some(name) = &self.staged_attachment {
            spans.push(Span::styled(
                format!("📎 {name} "),
                Style::default().fg(Color::Cyan),
            ));
        }
        if self.pending {
            spans.push(Span::styled(
                "(waiting for reply) ",
                Style::default().fg(Color::DarkGray),
            ));
        }
        Line::from(spans)
    }

    fn hints(&self) -> Line<'static> {
        let mut hints = vec!["Enter send", "Shift+Enter newline"];
        if self.attach_enabled {
            hints.push("Ctrl+A attach");
        }
        if self.voice_enabled {
            hints.push("Ctrl+T dictate");
        }
        hints.push("Ctrl+N new chat");
        Line::from(Span::styled(
            format!(" {} ", hints.join(" · ")),
            Style::default().fg(Color::DarkGray),
        ))
        .right_aligned()
    }

    fn render_scrollbar(&self, frame: &mut Frame, area: Rect, total_rows: usize) {
        if total_rows <= MAX_VISIBLE_LINES as usize {
            return;
        }
        // content_length is the max scroll position, not the row count
        let max_scroll = total_rows - MAX_VISIBLE_LINES as usize;
        let mut state = ScrollbarState::default()
            .content_length(max_scroll)
            .position(self.scroll_offset as usize);
        let scrollbar_area = Rect {
            x: area.x + area.width.saturating_sub(1),
            y: area.y + 1,
            width: 1,
            height: area.height.saturating_sub(2),
        };
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            scrollbar_area,
            &mut state,
        );
    }

    fn submit(&mut self) -> Option<InputEvent> {
        if let Some((kind, mut editor)) = self.prompt.take() {
            let path = editor.take();
            let path = path.trim();
            if path.is_empty() {
                return Some(InputEvent::ContentChanged);
            }
            let path = PathBuf::from(path);
            return Some(match kind {
                PromptKind::Attach => InputEvent::Attach(path),
                PromptKind::Dictate => InputEvent::Dictate(path),
            });
        }

        if self.pending {
            return None;
        }
        if self.compose.buffer.trim().is_empty() && self.staged_attachment.is_none() {
            return None;
        }
        self.scroll_offset = 0;
        Some(InputEvent::Submit(self.compose.take()))
    }

    fn open_prompt(&mut self, kind: PromptKind, enabled: bool) -> Option<InputEvent> {
        if !enabled || self.prompt.is_some() {
            return None;
        }
        self.prompt = Some((kind, Editor::default()));
        Some(InputEvent::ContentChanged)
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.last_width = area.width;
        let width = inner_width(area.width);
        let editor = self.active();
        let rows = layout::rows(&editor.buffer, width);
        let (cursor_row, cursor_col) = layout::cursor_position(&editor.buffer, &rows, editor.pos);

        self.scroll_offset =
            layout::follow_cursor(self.scroll_offset, cursor_row, rows.len(), MAX_VISIBLE_LINES);

        let editor = self.active();
        let lines: Vec<Line> = rows
            .iter()
            .skip(self.scroll_offset as usize)
            .take(MAX_VISIBLE_LINES as usize)
            .map(|r| Line::raw(editor.buffer[r.start..r.end].to_string()))
            .collect();

        let mut text_style = Style::default().fg(Color::Green);
        let mut border_style = Style::default();
        if self.pending || self.dimmed {
            text_style = text_style.add_modifier(Modifier::DIM);
            border_style = border_style.add_modifier(Modifier::DIM);
        }
        if self.prompt.is_some() {
            text_style = Style::default().fg(Color::Yellow);
        }

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(self.title())
            .title_bottom(self.hints())
            .padding(ratatui::widgets::Padding::horizontal(1));

        frame.render_widget(Paragraph::new(lines).style(text_style).block(block), area);
        self.render_scrollbar(frame, area, rows.len());

        if !self.dimmed {
            let visible_row = (cursor_row as u16).saturating_sub(self.scroll_offset);
            frame.set_cursor_position((
                area.x + CONTENT_OFFSET + cursor_col as u16,
                area.y + 1 + visible_row,
            ));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let changed = |moved: bool| moved.then_some(InputEvent::ContentChanged);
        match event {
            TuiEvent::Submit => self.submit(),
            TuiEvent::Escape if self.prompt.is_some() => {
                self.prompt = None;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Attach => self.open_prompt(PromptKind::Attach, self.attach_enabled),
            TuiEvent::Dictate => self.open_prompt(PromptKind::Dictate, self.voice_enabled),
            TuiEvent::Newline => {
                // Paths are single-line
                if self.prompt.is_some() {
                    return None;
                }
                self.compose.insert_char('\n');
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::InputChar(c) => {
                self.active_mut().insert_char(*c);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                let text = if self.prompt.is_some() {
                    text.replace(['\r', '\n'], "")
                } else {
                    text.replace("\r\n", "\n")
                };
                self.active_mut().insert_str(&text);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => changed(self.active_mut().backspace()),
            TuiEvent::Delete => changed(self.active_mut().delete()),
            TuiEvent::CursorLeft => changed(self.active_mut().left()),
            TuiEvent::CursorRight => changed(self.active_mut().right()),
            TuiEvent::WordLeft => changed(self.active_mut().word_left()),
            TuiEvent::WordRight => changed(self.active_mut().word_right()),
            TuiEvent::CursorHome => changed(self.active_mut().home()),
            TuiEvent::CursorEnd => changed(self.active_mut().end()),
            TuiEvent::CursorUp | TuiEvent::CursorDown => {
                let delta = if *event == TuiEvent::CursorUp { -1 } else { 1 };
                let width = inner_width(self.last_width);
                let editor = self.active_mut();
                let rows = layout::rows(&editor.buffer, width);
                let target = layout::vertical_target(&editor.buffer, &rows, editor.pos, delta)?;
                changed(editor.move_to(target))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn type_text(input: &mut InputBox, text: &str) {
        for c in text.chars() {
            input.handle_event(&TuiEvent::InputChar(c));
        }
    }

    fn draw(input: &mut InputBox, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| input.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut input = InputBox::new();

        let res = input.handle_event(&TuiEvent::InputChar('a'));
        assert_eq!(res, Some(InputEvent::ContentChanged));
        type_text(&mut input, "b");
        assert_eq!(input.buffer(), "ab");

        let res = input.handle_event(&TuiEvent::Backspace);
        assert_eq!(res, Some(InputEvent::ContentChanged));
        assert_eq!(input.buffer(), "a");
    }

    #[test]
    fn test_submit_clears_buffer() {
        let mut input = InputBox::new();
        type_text(&mut input, "hello");

        let res = input.handle_event(&TuiEvent::Submit);
        assert_eq!(res, Some(InputEvent::Submit("hello".into())));
        assert!(input.buffer().is_empty());
    }

    #[test]
    fn test_blank_submit_is_ignored() {
        let mut input = InputBox::new();
        type_text(&mut input, "   ");
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.buffer(), "   ");
    }

    #[test]
    fn test_blank_submit_allowed_with_staged_attachment() {
        let mut input = InputBox::new();
        input.staged_attachment = Some("notes.pdf".into());
        assert_eq!(
            input.handle_event(&TuiEvent::Submit),
            Some(InputEvent::Submit(String::new()))
        );
    }

    #[test]
    fn test_submit_blocked_while_pending() {
        let mut input = InputBox::new();
        input.pending = true;
        type_text(&mut input, "second question");

        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.buffer(), "second question");

        input.pending = false;
        assert_eq!(
            input.handle_event(&TuiEvent::Submit),
            Some(InputEvent::Submit("second question".into()))
        );
    }

    #[test]
    fn test_newline_is_kept() {
        let mut input = InputBox::new();
        type_text(&mut input, "a");
        input.handle_event(&TuiEvent::Newline);
        type_text(&mut input, "b");
        assert_eq!(input.buffer(), "a\nb");
    }

    #[test]
    fn test_attach_prompt_emits_path() {
        let mut input = InputBox::new();
        input.attach_enabled = true;
        type_text(&mut input, "draft");

        assert_eq!(input.handle_event(&TuiEvent::Attach), Some(InputEvent::ContentChanged));
        assert!(input.is_prompting());
        type_text(&mut input, "/tmp/a.png");

        assert_eq!(
            input.handle_event(&TuiEvent::Submit),
            Some(InputEvent::Attach(PathBuf::from("/tmp/a.png")))
        );
        assert!(!input.is_prompting());
        // The draft is untouched by the prompt
        assert_eq!(input.buffer(), "draft");
    }

    #[test]
    fn test_dictate_prompt_emits_path() {
        let mut input = InputBox::new();
        input.voice_enabled = true;
        input.handle_event(&TuiEvent::Dictate);
        input.handle_event(&TuiEvent::Paste("/tmp/voice.webm\n".into()));
        assert_eq!(
            input.handle_event(&TuiEvent::Submit),
            Some(InputEvent::Dictate(PathBuf::from("/tmp/voice.webm")))
        );
    }

    #[test]
    fn test_disabled_capabilities_do_not_prompt() {
        let mut input = InputBox::new();
        assert_eq!(input.handle_event(&TuiEvent::Attach), None);
        assert_eq!(input.handle_event(&TuiEvent::Dictate), None);
        assert!(!input.is_prompting());
    }

    #[test]
    fn test_escape_cancels_prompt() {
        let mut input = InputBox::new();
        input.attach_enabled = true;
        input.handle_event(&TuiEvent::Attach);
        type_text(&mut input, "/tmp/x");
        assert_eq!(input.handle_event(&TuiEvent::Escape), Some(InputEvent::ContentChanged));
        assert!(!input.is_prompting());
        assert!(input.buffer().is_empty());
        // Esc without a prompt is left to the event loop
        assert_eq!(input.handle_event(&TuiEvent::Escape), None);
    }

    #[test]
    fn test_empty_prompt_submit_just_closes() {
        let mut input = InputBox::new();
        input.voice_enabled = true;
        input.handle_event(&TuiEvent::Dictate);
        assert_eq!(input.handle_event(&TuiEvent::Submit), Some(InputEvent::ContentChanged));
        assert!(!input.is_prompting());
    }

    #[test]
    fn test_insert_transcript() {
        let mut input = InputBox::new();
        type_text(&mut input, "note:");
        input.insert_transcript("buy milk");
        assert_eq!(input.buffer(), "note: buy milk");
    }

    #[test]
    fn test_cursor_up_down_across_lines() {
        let mut input = InputBox::new();
        type_text(&mut input, "abc");
        input.handle_event(&TuiEvent::Newline);
        type_text(&mut input, "de");

        assert_eq!(input.handle_event(&TuiEvent::CursorUp), Some(InputEvent::ContentChanged));
        type_text(&mut input, "X");
        assert_eq!(input.buffer(), "abXc\nde");
        assert_eq!(input.handle_event(&TuiEvent::CursorUp), None);
    }

    #[test]
    fn test_height_grows_then_caps() {
        let mut input = InputBox::new();
        assert_eq!(input.calculate_height(40), 1 + VERTICAL_OVERHEAD);
        for _ in 0..10 {
            input.handle_event(&TuiEvent::Newline);
        }
        assert_eq!(input.calculate_height(40), MAX_VISIBLE_LINES + VERTICAL_OVERHEAD);
    }

    #[test]
    fn test_render_shows_staged_attachment_and_hints() {
        let mut input = InputBox::new();
        input.attach_enabled = true;
        input.staged_attachment = Some("report.pdf".into());
        let text = draw(&mut input, 80, 3);
        assert!(text.contains("report.pdf"));
        assert!(text.contains("Ctrl+A attach"));
        assert!(!text.contains("Ctrl+T dictate"));
    }

    #[test]
    fn test_render_prompt_title() {
        let mut input = InputBox::new();
        input.voice_enabled = true;
        input.handle_event(&TuiEvent::Dictate);
        let text = draw(&mut input, 100, 3);
        assert!(text.contains("Dictate"));
    }
}
