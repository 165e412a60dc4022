use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::ui::UiFrame;

pub mod debug_log;

pub use debug_log::{DebugLogHandle, DebugLogWriter, global_debug_log, set_global_debug_log};

pub use crate::component_context::ComponentContext;

/// A piece of UI that draws into a rectangle and may consume input.
pub trait Component {
    fn resize(&mut self, _area: Rect, _ctx: &ComponentContext) {}

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext);

    fn handle_event(&mut self, _event: &Event, _ctx: &ComponentContext) -> bool {
        false
    }
}
