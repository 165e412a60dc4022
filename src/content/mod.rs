//! Window bodies.
//!
//! The window manager only stores a [`ContentKind`] per window. A
//! [`ContentProvider`] turns that tag into something drawable; it reads
//! window state and never changes it.

pub mod chart;
pub mod log_viewer;
pub mod market;
pub mod security;

use std::collections::HashMap;

use crossterm::event::Event;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;

use crate::components::{Component, ComponentContext, DebugLogHandle};
use crate::ui::UiFrame;
use crate::window::{ContentKind, Window, WindowId};

pub use chart::ChartView;
pub use log_viewer::{LevelFilter, LogViewerView};
pub use market::MarketDataView;
pub use security::SecurityView;

pub trait ContentProvider {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, window: &Window, ctx: &ComponentContext);

    /// Input for the focused window's body. Returns true when consumed.
    fn handle_event(&mut self, _window: &Window, _event: &Event) -> bool {
        false
    }

    /// Drop per-window state for windows that no longer exist.
    fn retain(&mut self, _alive: &dyn Fn(WindowId) -> bool) {}
}

/// Fallback body for kinds this build cannot render.
#[derive(Debug)]
pub struct UnknownModuleView {
    kind: String,
}

impl UnknownModuleView {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }

    pub fn message(&self) -> String {
        format!("Unknown module: {}", self.kind)
    }
}

impl Component for UnknownModuleView {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        if area.height == 0 {
            return;
        }
        let centered = Rect::new(area.x, area.y + area.height / 2, area.width, 1);
        frame.render_widget(
            Paragraph::new(self.message())
                .alignment(Alignment::Center)
                .style(Style::default().add_modifier(Modifier::ITALIC)),
            centered,
        );
    }
}

fn build_view(kind: &ContentKind, log: &DebugLogHandle) -> Box<dyn Component> {
    match kind {
        ContentKind::MarketData => Box::new(MarketDataView::new()),
        ContentKind::Chart => Box::new(ChartView::usdjpy()),
        ContentKind::Log => Box::new(LogViewerView::new(log.clone())),
        ContentKind::Security => Box::new(SecurityView::usdjpy()),
        ContentKind::Unknown(other) => Box::new(UnknownModuleView::new(other.as_str())),
    }
}

/// The built-in modules, one view instance per window so scroll and filter
/// state follow the window.
#[derive(Default)]
pub struct ModuleContent {
    log: DebugLogHandle,
    views: HashMap<WindowId, Box<dyn Component>>,
}

impl std::fmt::Debug for ModuleContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleContent")
            .field("views", &self.views.len())
            .finish()
    }
}

impl ModuleContent {
    /// `log` feeds every Log Viewer window.
    pub fn new(log: DebugLogHandle) -> Self {
        Self {
            log,
            views: HashMap::new(),
        }
    }

    pub fn build(&self, kind: &ContentKind) -> Box<dyn Component> {
        build_view(kind, &self.log)
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    fn view_for(&mut self, window: &Window) -> &mut Box<dyn Component> {
        let log = &self.log;
        self.views
            .entry(window.id())
            .or_insert_with(|| build_view(window.content(), log))
    }
}

impl ContentProvider for ModuleContent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, window: &Window, ctx: &ComponentContext) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        self.view_for(window).render(frame, area, ctx);
    }

    fn handle_event(&mut self, window: &Window, event: &Event) -> bool {
        let ctx = ComponentContext::new(true).with_maximized(window.is_maximized());
        self.view_for(window).handle_event(event, &ctx)
    }

    fn retain(&mut self, alive: &dyn Fn(WindowId) -> bool) {
        self.views.retain(|id, _| alive(*id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Bounds;
    use ratatui::buffer::Buffer;

    fn window(kind: ContentKind) -> Window {
        Window::new(WindowId::new(), "t".into(), kind, Bounds::new(0, 0, 400, 300), 1)
    }

    fn rendered(provider: &mut ModuleContent, window: &Window) -> String {
        let area = Rect::new(0, 0, 40, 5);
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        provider.render(&mut frame, area, window, &ComponentContext::default());
        (0..area.height)
            .map(|y| (0..area.width).map(|x| buffer[(x, y)].symbol().to_string()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn unknown_kinds_render_the_fallback() {
        let mut provider = ModuleContent::default();
        let text = rendered(&mut provider, &window(ContentKind::Unknown("heatmap".into())));
        assert!(text.contains("Unknown module: heatmap"));
    }

    #[test]
    fn views_are_per_window_and_pruned() {
        let mut provider = ModuleContent::default();
        let a = window(ContentKind::Chart);
        let b = window(ContentKind::Security);
        rendered(&mut provider, &a);
        rendered(&mut provider, &b);
        rendered(&mut provider, &a);
        assert_eq!(provider.view_count(), 2);
        let keep = a.id();
        provider.retain(&|id| id == keep);
        assert_eq!(provider.view_count(), 1);
    }

    #[test]
    fn log_windows_read_the_shared_buffer() {
        let log = DebugLogHandle::new(10);
        log.push("2026-01-01T00:00:00Z  INFO hello from the workspace");
        let mut provider = ModuleContent::new(log);
        let text = rendered(&mut provider, &window(ContentKind::Log));
        assert!(text.contains("hello from"));
    }
}
