use ratatui::Frame;
use ratatui::layout::Rect;

use super::event::TuiEvent;

/// Something that draws itself into a region of the frame.
///
/// Data comes in as props (plain struct fields set by the parent before each
/// draw). `render` takes `&mut self` so a component can refresh caches such
/// as wrapped layouts or scroll offsets while drawing.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that reacts to terminal input.
pub trait EventHandler {
    /// What the component reports back to the event loop.
    type Event;

    /// Consume a low-level event, optionally emitting a higher-level one.
    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
