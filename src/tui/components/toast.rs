//! # Toast Component
//!
//! Small notification box drawn over the top-right corner of the
//! conversation. The event loop dismisses it after [`TOAST_TTL`].

use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Clear, Paragraph};

use crate::core::state::{Toast as ToastData, ToastLevel};
use crate::tui::component::Component;

pub const TOAST_TTL: Duration = Duration::from_secs(4);

const MAX_WIDTH: u16 = 48;
const MIN_WIDTH: u16 = 16;

pub struct Toast<'a> {
    pub toast: &'a ToastData,
}

impl<'a> Toast<'a> {
    pub fn new(toast: &'a ToastData) -> Self {
        Self { toast }
    }

    fn color(&self) -> Color {
        match self.toast.level {
            ToastLevel::Info => Color::Yellow,
            ToastLevel::Success => Color::Green,
            ToastLevel::Error => Color::Red,
        }
    }

    /// Body lines wrapped to fit `inner_width`.
    fn body_lines(&self, inner_width: u16) -> Vec<String> {
        if self.toast.body.is_empty() || inner_width == 0 {
            return Vec::new();
        }
        textwrap::wrap(&self.toast.body, inner_width as usize)
            .into_iter()
            .map(|l| l.into_owned())
            .collect()
    }

    /// Where the toast goes inside `area`: top-right corner, sized to its
    /// content.
    pub fn placement(&self, area: Rect) -> Rect {
        let width = MAX_WIDTH.min(area.width).max(MIN_WIDTH.min(area.width));
        let inner = width.saturating_sub(2);
        let height = (self.body_lines(inner).len() as u16 + 2).min(area.height);
        Rect {
            x: area.x + area.width.saturating_sub(width),
            y: area.y,
            width,
            height,
        }
    }
}

impl<'a> Component for Toast<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let rect = self.placement(area);
        let color = self.color();
        let lines: Vec<Line> = self
            .body_lines(rect.width.saturating_sub(2))
            .into_iter()
            .map(Line::raw)
            .collect();

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color))
            .title(format!(" {} ", self.toast.title))
            .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD));

        frame.render_widget(Clear, rect);
        frame.render_widget(Paragraph::new(lines).block(block), rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn data(level: ToastLevel, body: &str) -> ToastData {
        ToastData::new(level, "Title", body)
    }

    #[test]
    fn test_colors_follow_level() {
        assert_eq!(Toast::new(&data(ToastLevel::Info, "")).color(), Color::Yellow);
        assert_eq!(Toast::new(&data(ToastLevel::Success, "")).color(), Color::Green);
        assert_eq!(Toast::new(&data(ToastLevel::Error, "")).color(), Color::Red);
    }

    #[test]
    fn test_placement_is_top_right() {
        let toast = data(ToastLevel::Info, "short");
        let rect = Toast::new(&toast).placement(Rect::new(0, 1, 100, 30));
        assert_eq!(rect, Rect::new(52, 1, 48, 3));
    }

    #[test]
    fn test_long_body_wraps() {
        let body = "word ".repeat(30);
        let toast = data(ToastLevel::Error, body.trim());
        let rect = Toast::new(&toast).placement(Rect::new(0, 0, 100, 30));
        assert!(rect.height > 3);
    }

    #[test]
    fn test_narrow_area_clamps() {
        let toast = data(ToastLevel::Info, "body");
        let rect = Toast::new(&toast).placement(Rect::new(0, 0, 10, 2));
        assert_eq!(rect.width, 10);
        assert_eq!(rect.height, 2);
    }

    #[test]
    fn test_render_shows_title_and_body() {
        let backend = TestBackend::new(60, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        let toast = ToastData::new(ToastLevel::Success, "File attached", "notes.pdf");
        terminal
            .draw(|f| Toast::new(&toast).render(f, f.area()))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("File attached"));
        assert!(text.contains("notes.pdf"));
    }
}
