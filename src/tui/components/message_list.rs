//! # MessageList Component
//!
//! Scrollable view of the conversation.
//!
//! ## Responsibilities
//!
//! - Display messages as their reveal animation currently shows them
//! - Keep the newest message in view while the user hasn't scrolled away
//! - Bring a message that is being revealed into view, bottom edge first
//! - Show a typing indicator while a reply is pending
//! - Hit testing for mouse hover and clicks
//! - Cache message heights between frames
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) plus the messages and the
//! revealer as props. `Component::render` takes `&mut self`, so the layout
//! cache and scroll state are refreshed during the render pass, the same way
//! Ratatui's `StatefulWidget` works.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::message::{Message as ChatMessage, MessageId};
use crate::core::reveal::Revealer;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::Message;
use crate::tui::event::TuiEvent;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
/// Rows reserved under the last message for the typing indicator.
const TYPING_ROWS: u16 = 1;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    /// Scroll offset and view state
    pub scroll_state: ScrollViewState,
    /// Cached layout measurements
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Message selected in cursor mode or by click
    pub selected_index: Option<usize>,
    /// Message under the mouse pointer
    pub hovered_index: Option<usize>,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Whether there's content below the current scroll position
    pub has_unseen_content: bool,
    /// Message to bring into view on the next render
    follow: Option<MessageId>,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            selected_index: None,
            hovered_index: None,
            viewport_height: 0,
            has_unseen_content: false,
            follow: None,
        }
    }

    /// Requests that the next render scroll message `id` into view with its
    /// bottom edge on the bottom of the viewport.
    pub fn follow_message(&mut self, id: MessageId) {
        self.follow = Some(id);
    }

    /// Anchors message `index` to the bottom of the viewport. The last
    /// message re-engages auto-scroll so the typing indicator stays visible.
    fn anchor_bottom(&mut self, index: usize) {
        if index + 1 == self.layout.heights.len() {
            self.stick_to_bottom = true;
            return;
        }
        if let Some((_, bottom)) = self.layout.span(index) {
            let y = bottom.saturating_sub(self.viewport_height);
            self.scroll_state.set_offset(Position { x: 0, y });
            self.stick_to_bottom = false;
        }
    }

    fn max_scroll(&self) -> u16 {
        self.layout.total_height().saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_scroll();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll once the user has scrolled back to the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_scroll();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Scroll the viewport so the selected message is fully visible.
    /// If the message is taller than the viewport, align its top edge.
    pub fn scroll_to_selected(&mut self) {
        let Some((item_top, item_bottom)) = self.selected_index.and_then(|i| self.layout.span(i))
        else {
            return;
        };
        let offset_y = self.scroll_state.offset().y;

        if item_top < offset_y {
            self.scroll_state.set_offset(Position { x: 0, y: item_top });
            self.stick_to_bottom = false;
        } else if item_bottom > offset_y + self.viewport_height {
            let new_y = item_bottom
                .saturating_sub(self.viewport_height)
                .min(item_top);
            self.scroll_state.set_offset(Position { x: 0, y: new_y });
            self.stick_to_bottom = new_y >= self.max_scroll();
        }
    }

    /// Move the selection one message up, starting from the newest.
    pub fn select_previous(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.selected_index = Some(match self.selected_index {
            Some(i) => i.saturating_sub(1),
            None => len - 1,
        });
        self.scroll_to_selected();
    }

    pub fn select_next(&mut self, len: usize) {
        if let Some(i) = self.selected_index
            && i + 1 < len
        {
            self.selected_index = Some(i + 1);
            self.scroll_to_selected();
        }
    }

    /// Message at `row` rows below the top of the list's viewport.
    pub fn index_at(&self, row: u16) -> Option<usize> {
        let content_y = row.checked_add(self.scroll_state.offset().y)?;
        self.layout.index_at(content_y)
    }

    /// Forget everything tied to the previous conversation.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub messages: &'a [ChatMessage],
    pub revealer: &'a Revealer,
    /// A reply is pending: show the typing indicator
    pub pending: bool,
    pub spinner_frame: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        messages: &'a [ChatMessage],
        revealer: &'a Revealer,
        pending: bool,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            messages,
            revealer,
            pending,
            spinner_frame,
        }
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar
        let revealer = self.revealer;
        let messages = self.messages;

        // 1. Refresh the layout cache
        let keys: Vec<LayoutKey> = messages
            .iter()
            .map(|m| LayoutKey {
                id: m.id,
                displayed_len: revealer.displayed(m).len(),
                revealing: revealer.is_revealing(m.id),
            })
            .collect();
        self.state.layout.refresh(&keys, content_width, |i| {
            let m = &messages[i];
            Message::calculate_height(m, revealer.displayed(m), keys[i].revealing, content_width)
        });

        let total_height = self.state.layout.total_height();
        let typing_rows = if self.pending { TYPING_ROWS } else { 0 };
        let canvas_height = total_height.saturating_add(typing_rows);

        // 2. Pin to the bottom of the canvas (typing indicator included), or
        // clamp a manual scroll position to the content.
        self.state.viewport_height = area.height;
        if let Some(id) = self.state.follow.take()
            && let Some(index) = keys.iter().position(|k| k.id == id)
        {
            self.state.anchor_bottom(index);
        }
        if self.state.stick_to_bottom {
            self.state.scroll_state.set_offset(Position {
                x: 0,
                y: canvas_height.saturating_sub(area.height),
            });
        } else {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible messages into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        for i in visible_range {
            let Some((top, bottom)) = self.state.layout.span(i) else {
                continue;
            };
            let message = &messages[i];
            let widget = Message::new(message, revealer.displayed(message))
                .hovered(self.state.hovered_index == Some(i))
                .selected(self.state.selected_index == Some(i))
                .revealing(keys[i].revealing);
            scroll_view.render_widget(widget, Rect::new(0, top, content_width, bottom - top));
        }

        // A saturated canvas has no row left for the indicator
        if self.pending && total_height < canvas_height {
            let spinner = SPINNER[self.spinner_frame % SPINNER.len()];
            let indicator = Line::from(vec![
                Span::styled(format!(" {spinner} "), Style::default().fg(Color::Blue)),
                Span::styled(
                    "Lucky is typing...",
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                ),
            ]);
            scroll_view.render_widget(
                indicator,
                Rect::new(0, total_height, content_width, TYPING_ROWS),
            );
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);

        // 4. Unseen content indicator
        let max_scroll = canvas_height.saturating_sub(area.height);
        self.state.has_unseen_content =
            !self.state.stick_to_bottom && self.state.scroll_state.offset().y < max_scroll;
    }
}

/// EventHandler lives on `MessageListState` because `MessageList` is
/// rebuilt every frame and can't hold scroll position.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => {
                self.stick_to_bottom = true;
            }
            _ => {}
        }
        None
    }
}

/// What a cached height was measured for. A message is re-measured when
/// any of these change, which covers reveal growth and content replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutKey {
    pub id: MessageId,
    pub displayed_len: usize,
    pub revealing: bool,
}

/// Cached layout measurements
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    keys: Vec<LayoutKey>,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            keys: Vec::new(),
            content_width: 0,
        }
    }

    /// Number of leading cached heights still valid for `keys` at `content_width`.
    pub fn reusable_count(&self, keys: &[LayoutKey], content_width: u16) -> usize {
        if self.content_width != content_width {
            return 0;
        }
        self.keys
            .iter()
            .zip(keys)
            .take_while(|(cached, current)| cached == current)
            .count()
            .min(self.heights.len())
    }

    /// Brings the cache in line with `keys`, measuring only what changed.
    pub fn refresh(
        &mut self,
        keys: &[LayoutKey],
        content_width: u16,
        mut measure: impl FnMut(usize) -> u16,
    ) {
        let reusable = self.reusable_count(keys, content_width);
        self.heights.truncate(reusable);
        for i in reusable..keys.len() {
            self.heights.push(measure(i));
        }
        self.keys = keys.to_vec();
        self.content_width = content_width;
        self.rebuild_prefix_heights();
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// `(top, bottom)` content rows of message `index`.
    pub fn span(&self, index: usize) -> Option<(u16, u16)> {
        let bottom = *self.prefix_heights.get(index)?;
        let top = if index == 0 {
            0
        } else {
            self.prefix_heights[index - 1]
        };
        Some((top, bottom))
    }

    /// Message covering content row `y`.
    pub fn index_at(&self, y: u16) -> Option<usize> {
        let index = self.prefix_heights.partition_point(|&end| end <= y);
        (index < self.prefix_heights.len()).then_some(index)
    }

    /// Messages intersecting the viewport, padded by half a screen either way.
    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end.max(start)
    }
}
