use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Span, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::action::ERROR_REPLY;
use crate::core::message::{Author, Message as ChatMessage};
use crate::tui::component::Component;
use crate::tui::rich_text;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Shown at the end of a reply that is still being revealed.
const REVEAL_CURSOR: &str = "▍";

/// A single chat bubble.
///
/// Transient: built each frame by `MessageList` for the visible messages.
/// `displayed` is what the reveal animation currently shows, which for
/// anything but an animating reply is the full content.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub message: &'a ChatMessage,
    pub displayed: &'a str,
    /// Whether this message is under the mouse
    pub is_hovered: bool,
    /// Whether this message is selected in cursor mode
    pub is_selected: bool,
    /// Whether the reveal animation is still running for this message
    pub is_revealing: bool,
}

impl<'a> Message<'a> {
    pub fn new(message: &'a ChatMessage, displayed: &'a str) -> Self {
        Self {
            message,
            displayed,
            is_hovered: false,
            is_selected: false,
            is_revealing: false,
        }
    }

    pub fn hovered(mut self, is_hovered: bool) -> Self {
        self.is_hovered = is_hovered;
        self
    }

    pub fn selected(mut self, is_selected: bool) -> Self {
        self.is_selected = is_selected;
        self
    }

    pub fn revealing(mut self, is_revealing: bool) -> Self {
        self.is_revealing = is_revealing;
        self
    }

    /// Height this message needs at `width`, borders included.
    ///
    /// Measured with the same `Paragraph` that `render` draws, so the scroll
    /// layout and the drawn output can't disagree.
    pub fn calculate_height(
        message: &ChatMessage,
        displayed: &str,
        is_revealing: bool,
        width: u16,
    ) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Too narrow for borders + padding; still occupy a row.
            return 1;
        }
        let lines = body(message, displayed, is_revealing).line_count(content_width);
        u16::try_from(lines)
            .unwrap_or(u16::MAX)
            .max(1)
            .saturating_add(VERTICAL_OVERHEAD)
    }
}

fn author_style(message: &ChatMessage) -> Style {
    match message.author {
        Author::User => Style::default().fg(Color::Green),
        Author::Assistant if message.content == ERROR_REPLY => Style::default().fg(Color::Red),
        Author::Assistant => Style::default().fg(Color::Blue),
    }
}

fn author_label(author: Author) -> &'static str {
    match author {
        Author::User => "You",
        Author::Assistant => "Lucky",
    }
}

fn body(message: &ChatMessage, displayed: &str, is_revealing: bool) -> Paragraph<'static> {
    let style = author_style(message);
    let mut text: Text<'static> =
        rich_text::render(displayed.trim(), style.fg.unwrap_or(Color::Reset));
    if is_revealing {
        let cursor = Span::styled(REVEAL_CURSOR, style.add_modifier(Modifier::SLOW_BLINK));
        match text.lines.last_mut() {
            Some(line) => line.spans.push(cursor),
            None => text.lines.push(cursor.into()),
        }
    }
    Paragraph::new(text).wrap(Wrap { trim: true })
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = author_style(self.message);

        // Selection overrides hover: cyan border for selected, bright for hover, dim otherwise
        let border_style = if self.is_selected {
            Style::default().fg(Color::Cyan)
        } else if self.is_hovered {
            style
        } else {
            style.add_modifier(Modifier::DIM)
        };

        let block = Block::bordered()
            .title(format!(
                " {} · {} ",
                author_label(self.message.author),
                self.message.created_at
            ))
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);
        body(self.message, self.displayed, self.is_revealing).render(inner_area, buf);
    }
}

impl<'a> Component for Message<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
