use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::Capability;
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{MessageList, TitleBar, Toast};
use crate::tui::TuiState;

/// `[title, messages, input]` areas for a frame of `frame_area`.
pub fn layout_areas(frame_area: Rect, input_height: u16) -> [Rect; 3] {
    use Constraint::{Length, Min};
    Layout::vertical([Length(1), Min(0), Length(input_height)]).areas(frame_area)
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    tui.sync_props(app);
    let input_height = tui.input_box.calculate_height(frame.area().width);
    let [title_area, main_area, input_area] = layout_areas(frame.area(), input_height);

    let mut message_list = MessageList::new(
        &mut tui.message_list,
        app.store.all(),
        &tui.revealer,
        app.pending(),
        spinner_frame,
    );
    message_list.render(frame, main_area);

    let mut title_bar = TitleBar::new(
        app.provider_summary(),
        app.status_message.clone(),
        tui.message_list.has_unseen_content,
        app.pending(),
    );
    title_bar.render(frame, title_area);

    if let Some(toast) = &app.toast {
        Toast::new(toast).render(frame, main_area);
    }

    tui.input_box.render(frame, input_area);
}

/// Index of the message at screen row `screen_y`, if the row falls inside
/// the conversation area.
pub fn hit_test_message(screen_y: u16, frame_area: Rect, tui: &TuiState) -> Option<usize> {
    let input_height = tui.input_box.calculate_height(frame_area.width);
    let [_, main_area, _] = layout_areas(frame_area, input_height);
    if screen_y < main_area.y || screen_y >= main_area.y + main_area.height {
        return None;
    }
    tui.message_list.index_at(screen_y - main_area.y)
}

/// Copies capability switches from config onto the input box.
pub fn apply_capabilities(tui: &mut TuiState, config: &ResolvedConfig) {
    tui.input_box.attach_enabled = config.has_capability(Capability::Attachment);
    tui.input_box.voice_enabled = config.has_capability(Capability::Voice);
}
