//! # TitleBar Component
//!
//! Single-line bar at the top of the screen.
//!
//! ```text
//! Lucky | together (llama) → gemini (gemini-pro) | Ready | ↓ New
//! ```
//!
//! Purely presentational: every field is a prop copied from `App` or
//! `TuiState` right before drawing. Segments are dropped from the right when
//! they're empty, so the provider line is always the first thing visible.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

pub struct TitleBar {
    /// `primary (model) → fallback (model)`
    pub providers: String,
    pub status_message: String,
    /// Whether there's content below the current scroll position
    pub has_unseen_content: bool,
    /// Whether a request is in flight
    pub pending: bool,
}

impl TitleBar {
    pub fn new(
        providers: String,
        status_message: String,
        has_unseen_content: bool,
        pending: bool,
    ) -> Self {
        Self {
            providers,
            status_message,
            has_unseen_content,
            pending,
        }
    }

    fn line(&self) -> Line<'static> {
        let sep = Span::styled(" | ", Style::default().fg(Color::DarkGray));
        let mut spans = vec![
            Span::styled("Lucky", Style::default().add_modifier(Modifier::BOLD)),
            sep.clone(),
            Span::raw(self.providers.clone()),
        ];

        if !self.status_message.is_empty() {
            spans.push(sep.clone());
            let style = if self.pending {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            spans.push(Span::styled(self.status_message.clone(), style));
        }

        if self.has_unseen_content {
            spans.push(sep);
            spans.push(Span::styled("↓ New", Style::default().fg(Color::Cyan)));
        }

        Line::from(spans)
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(self.line(), area);
    }
}
