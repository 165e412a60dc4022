//! The terminal workspace: menu bar, managed windows, minimized dock.
//!
//! [`Workspace`] owns everything one session needs and turns terminal events
//! into window-manager operations. [`run`] pumps a driver pair until Quit.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::actions::Action;
use crate::components::ComponentContext;
use crate::content::ContentProvider;
use crate::drivers::{InputDriver, OutputDriver, PointerTranslator};
use crate::event_loop::{ControlFlow, EventLoop};
use crate::keybindings::KeyBindings;
use crate::panel::{Notice, Panel, PanelAction, Severity};
use crate::persistence::{LayoutStore, LayoutSummary, PersistenceError, SaveLayout};
use crate::theme;
use crate::ui::{CellGrid, FloatRect, UiFrame};
use crate::window::{ContentKind, SurfaceDraw, SurfaceId, SurfaceKind, WindowId, WindowManager};

#[derive(Debug, Clone, PartialEq, Eq)]
struct LoadMenu {
    items: Vec<LayoutSummary>,
    selected: usize,
}

pub struct Workspace {
    wm: WindowManager,
    panel: Panel,
    keys: KeyBindings,
    layouts: Box<dyn LayoutStore>,
    content: Box<dyn ContentProvider>,
    pointer: PointerTranslator,
    grid: CellGrid,
    area: Rect,
    load_menu: Option<LoadMenu>,
    layout_name: String,
}

impl Workspace {
    pub fn new(
        wm: WindowManager,
        layouts: Box<dyn LayoutStore>,
        content: Box<dyn ContentProvider>,
        grid: CellGrid,
    ) -> Self {
        Self {
            wm,
            panel: Panel::new(),
            keys: KeyBindings::workspace_defaults(),
            layouts,
            content,
            pointer: PointerTranslator::new(grid),
            grid,
            area: Rect::default(),
            load_menu: None,
            layout_name: "Default".to_string(),
        }
    }

    /// Name the Save button writes to. Saving again updates that record.
    pub fn with_layout_name(mut self, name: impl Into<String>) -> Self {
        self.layout_name = name.into();
        self
    }

    pub fn with_keybindings(mut self, keys: KeyBindings) -> Self {
        self.keys = keys;
        self
    }

    pub fn windows(&self) -> &WindowManager {
        &self.wm
    }

    pub fn windows_mut(&mut self) -> &mut WindowManager {
        &mut self.wm
    }

    pub fn layouts(&self) -> &dyn LayoutStore {
        self.layouts.as_ref()
    }

    pub fn load_menu_open(&self) -> bool {
        self.load_menu.is_some()
    }

    pub fn notice(&mut self, now: Instant) -> Option<&Notice> {
        self.panel.notice(now)
    }

    /// Track a new terminal size. The bottom row is the dock, so the window
    /// manager's viewport stops above it.
    pub fn resize(&mut self, area: Rect) {
        self.area = area;
        let managed = Rect {
            height: area.height.saturating_sub(1),
            ..area
        };
        self.wm.set_viewport(self.grid.viewport_for(managed, 1));
    }

    pub fn handle_event(&mut self, event: &Event, now: Instant) -> ControlFlow {
        match event {
            Event::Key(key) => self.handle_key(event, key, now),
            Event::Mouse(mouse) => self.handle_mouse(event, mouse, now),
            Event::Resize(width, height) => {
                self.resize(Rect::new(0, 0, *width, *height));
                ControlFlow::Continue
            }
            Event::FocusLost => {
                if let Some(pointer) = self.pointer.translate(event, now) {
                    self.wm.handle_pointer(pointer);
                }
                ControlFlow::Continue
            }
            _ => ControlFlow::Continue,
        }
    }

    fn handle_key(&mut self, event: &Event, key: &KeyEvent, now: Instant) -> ControlFlow {
        if key.kind != KeyEventKind::Press {
            return ControlFlow::Continue;
        }
        if let Some(action) = self.keys.action_for_key(key, self.load_menu.is_some()) {
            return self.apply_action(action, now);
        }
        if self.load_menu.is_some() {
            return ControlFlow::Continue;
        }
        let surfaces = self.wm.surfaces();
        if let Some(window) = surfaces.last().and_then(SurfaceDraw::body) {
            self.content.handle_event(window, event);
        }
        ControlFlow::Continue
    }

    fn handle_mouse(&mut self, event: &Event, mouse: &MouseEvent, now: Instant) -> ControlFlow {
        if mouse.kind == MouseEventKind::Down(MouseButton::Left) {
            let (column, row) = (mouse.column, mouse.row);
            if self.load_menu.is_some() {
                if let Some(index) = self.panel.hit_test_menu_item(column, row) {
                    if let Some(menu) = self.load_menu.as_mut() {
                        menu.selected = index;
                    }
                    self.load_selected(now);
                    return ControlFlow::Continue;
                }
                if self.panel.menu_contains_point(column, row) {
                    return ControlFlow::Continue;
                }
                let on_anchor = self.panel.hit_test(column, row) == Some(PanelAction::Load);
                self.load_menu = None;
                if on_anchor {
                    return ControlFlow::Continue;
                }
            }
            if let Some(action) = self.panel.hit_test(column, row) {
                return self.apply_panel_action(action, now);
            }
            if self.panel.contains_point(column, row) {
                return ControlFlow::Continue;
            }
        }
        if let Some(pointer) = self.pointer.translate(event, now) {
            self.wm.handle_pointer(pointer);
        }
        ControlFlow::Continue
    }

    fn apply_panel_action(&mut self, action: PanelAction, now: Instant) -> ControlFlow {
        match action {
            PanelAction::Launch(kind) => self.launch(kind),
            PanelAction::Save => self.save_layout(now),
            PanelAction::Load => self.toggle_load_menu(now),
            PanelAction::Quit => return ControlFlow::Quit,
            PanelAction::Restore(id) => {
                self.wm.restore_window(id);
            }
        }
        ControlFlow::Continue
    }

    pub fn apply_action(&mut self, action: Action, now: Instant) -> ControlFlow {
        if let Some(kind) = action.launches() {
            self.launch(kind);
            return ControlFlow::Continue;
        }
        let focused = self.wm.focused();
        match action {
            Action::Quit => return ControlFlow::Quit,
            Action::SaveLayout => self.save_layout(now),
            Action::ToggleLoadMenu => self.toggle_load_menu(now),
            Action::CloseFocused => match focused {
                Some(SurfaceId::Window(id)) => {
                    self.wm.close_window(id);
                }
                Some(SurfaceId::Group(id)) => {
                    self.wm.close_group(id);
                }
                None => {}
            },
            Action::MinimizeFocused => {
                if let Some(id) = focused.and_then(SurfaceId::as_window) {
                    self.wm.minimize_window(id);
                }
            }
            Action::ToggleMaximizeFocused => {
                if let Some(id) = focused.and_then(SurfaceId::as_window) {
                    self.wm.toggle_maximize(id);
                }
            }
            Action::RestoreLastMinimized => {
                if let Some(entry) = self.wm.store().minimized().last() {
                    let id = entry.window_id;
                    self.wm.restore_window(id);
                }
            }
            Action::CycleWindows => {
                let surfaces = self.wm.surfaces();
                let back = (surfaces.len() > 1).then(|| surfaces[0].id);
                if let Some(id) = back {
                    self.wm.bring_to_front(id);
                }
            }
            Action::GroupWithNext => self.group_with_next(focused),
            Action::Ungroup => {
                if let Some(id) = focused.and_then(SurfaceId::as_group) {
                    self.wm.ungroup(id);
                }
            }
            Action::NextTab | Action::PrevTab => {
                if let Some(id) = focused.and_then(SurfaceId::as_group) {
                    self.wm.cycle_tab(id, action == Action::NextTab);
                }
            }
            Action::MenuUp | Action::MenuDown => {
                if let Some(menu) = self.load_menu.as_mut()
                    && !menu.items.is_empty()
                {
                    let last = menu.items.len() - 1;
                    menu.selected = if action == Action::MenuUp {
                        menu.selected.saturating_sub(1)
                    } else {
                        (menu.selected + 1).min(last)
                    };
                }
            }
            Action::MenuSelect => self.load_selected(now),
            Action::MenuDelete => self.delete_selected(now),
            Action::Cancel => {
                if self.load_menu.take().is_none()
                    && let Some(pointer) = self.pointer.cancel(now)
                {
                    self.wm.handle_pointer(pointer);
                }
            }
            Action::OpenMarketData | Action::OpenChart | Action::OpenLog | Action::OpenSecurity => {}
        }
        ControlFlow::Continue
    }

    fn launch(&mut self, kind: ContentKind) {
        let id = self.wm.open_module(kind.clone());
        tracing::info!(window_id = %id, content = %kind, "opened module");
    }

    /// Tab the focused window together with the nearest free window behind it.
    fn group_with_next(&mut self, focused: Option<SurfaceId>) {
        let Some(front) = focused.and_then(SurfaceId::as_window) else {
            return;
        };
        let surfaces = self.wm.surfaces();
        let behind = surfaces.iter().rev().skip(1).find_map(|draw| match draw.kind {
            SurfaceKind::Window(window) => Some(window.id()),
            SurfaceKind::Group(_) => None,
        });
        match behind {
            Some(other) => {
                self.wm.group_windows(&[front, other]);
            }
            None => tracing::debug!(window_id = %front, "no free window to group with"),
        }
    }

    fn report(&mut self, context: &str, err: &PersistenceError, now: Instant) {
        tracing::warn!(error = %err, "{context}");
        self.panel.notify(format!("{context}: {err}"), Severity::Error, now);
    }

    /// Write the current arrangement under the workspace's layout name,
    /// updating the newest record of that name if there is one.
    pub fn save_layout(&mut self, now: Instant) {
        let mut request = SaveLayout::new(self.layout_name.clone(), self.wm.snapshot());
        match self.layouts.find_by_name(&self.layout_name) {
            Ok(Some(existing)) => request = request.with_id(existing.id),
            Ok(None) => {}
            Err(err) => return self.report("Save failed", &err, now),
        }
        match self.layouts.save_layout(request) {
            Ok(id) => {
                tracing::info!(layout_id = %id, name = %self.layout_name, "saved layout");
                self.panel
                    .notify(format!("Saved \"{}\"", self.layout_name), Severity::Info, now);
            }
            Err(err) => self.report("Save failed", &err, now),
        }
    }

    pub fn toggle_load_menu(&mut self, now: Instant) {
        if self.load_menu.take().is_some() {
            return;
        }
        match self.layouts.list_layouts() {
            Ok(items) => self.load_menu = Some(LoadMenu { items, selected: 0 }),
            Err(err) => self.report("Could not list layouts", &err, now),
        }
    }

    fn load_selected(&mut self, now: Instant) {
        let Some(menu) = self.load_menu.take() else {
            return;
        };
        let Some(summary) = menu.items.get(menu.selected) else {
            return;
        };
        match self.layouts.fetch_layout(&summary.id) {
            Ok(record) => {
                self.wm.apply_snapshot(&record.layout);
                self.panel
                    .notify(format!("Loaded \"{}\"", record.name), Severity::Info, now);
            }
            Err(err) => self.report("Load failed", &err, now),
        }
    }

    fn delete_selected(&mut self, now: Instant) {
        let Some(summary) = self
            .load_menu
            .as_ref()
            .and_then(|menu| menu.items.get(menu.selected).cloned())
        else {
            return;
        };
        if let Err(err) = self.layouts.delete_layout(&summary.id) {
            return self.report("Delete failed", &err, now);
        }
        tracing::info!(layout_id = %summary.id, "deleted layout");
        self.panel
            .notify(format!("Deleted \"{}\"", summary.name), Severity::Info, now);
        match self.layouts.list_layouts() {
            Ok(items) => {
                let selected = self
                    .load_menu
                    .as_ref()
                    .map_or(0, |menu| menu.selected)
                    .min(items.len().saturating_sub(1));
                self.load_menu = Some(LoadMenu { items, selected });
            }
            Err(err) => {
                self.load_menu = None;
                self.report("Could not list layouts", &err, now);
            }
        }
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>, now: Instant) {
        let area = frame.area();
        if area != self.area {
            self.resize(area);
        }
        self.panel.begin_frame();
        let (_, _, managed) = self.panel.split_area(area);

        let decorator = self.wm.decorator();
        let surfaces = self.wm.surfaces();
        for draw in &surfaces {
            let cells = self.grid.to_cells(draw.bounds);
            if cells.width == 0 || cells.height == 0 {
                continue;
            }
            let local = Rect::new(0, 0, cells.width, cells.height);
            let mut buffer = Buffer::empty(local);
            {
                let mut surface = UiFrame::from_parts(local, &mut buffer);
                let body_area = decorator.render_surface(&mut surface, draw);
                if let Some(window) = draw.body() {
                    let ctx = ComponentContext::new(draw.focused).with_maximized(window.is_maximized());
                    self.content.render(&mut surface, body_area, window, &ctx);
                }
            }
            frame.blit_from_signed(&buffer, cells);
        }

        if let Some((_, bounds)) = self.wm.snap_preview() {
            paint_outline(
                frame,
                self.grid.to_cells(bounds),
                managed,
                Style::default().fg(theme::snap_preview()),
            );
        }

        let active: Option<ContentKind> = surfaces.last().and_then(SurfaceDraw::content).cloned();
        self.panel
            .render(frame, active.as_ref(), self.load_menu.is_some(), now);
        self.panel.render_dock(frame, self.wm.store().minimized());
        if let Some(menu) = &self.load_menu {
            let labels: Vec<&str> = menu.items.iter().map(|item| item.name.as_str()).collect();
            self.panel.render_menu(frame, area, &labels, menu.selected);
        }

        let store = self.wm.store();
        let groups = self.wm.groups();
        self.content
            .retain(&|id: WindowId| store.contains(id) || groups.group_of(id).is_some());
    }
}

/// Border-only rectangle clipped to `clip`.
fn paint_outline(frame: &mut UiFrame<'_>, rect: FloatRect, clip: Rect, style: Style) {
    if rect.width < 2 || rect.height < 2 {
        return;
    }
    let left = rect.x;
    let top = rect.y;
    let right = rect.x + rect.width as i32 - 1;
    let bottom = rect.y + rect.height as i32 - 1;
    let clip = clip.intersection(frame.area());
    let buffer = frame.buffer_mut();
    let mut put = |x: i32, y: i32, symbol: &str| {
        let (Ok(cx), Ok(cy)) = (u16::try_from(x), u16::try_from(y)) else {
            return;
        };
        if !clip.contains((cx, cy).into()) {
            return;
        }
        if let Some(cell) = buffer.cell_mut((cx, cy)) {
            cell.set_symbol(symbol);
            cell.set_style(style);
        }
    };
    for x in left + 1..right {
        put(x, top, "╌");
        put(x, bottom, "╌");
    }
    for y in top + 1..bottom {
        put(left, y, "╎");
        put(right, y, "╎");
    }
    put(left, top, "┌");
    put(right, top, "┐");
    put(left, bottom, "└");
    put(right, bottom, "┘");
}

/// Drive `workspace` with events from `driver` and frames to `output` until
/// a Quit action.
pub fn run<D, O>(
    driver: D,
    output: &mut O,
    workspace: &mut Workspace,
    poll_interval: Duration,
) -> io::Result<()>
where
    D: InputDriver,
    O: OutputDriver,
{
    output.enter()?;
    workspace.resize(output.size()?);
    let mut event_loop = EventLoop::new(driver, poll_interval);
    let result = event_loop.run(|_, event| match event {
        Some(event) => Ok(workspace.handle_event(&event, Instant::now())),
        None => {
            output.draw(|frame| workspace.render(frame, Instant::now()))?;
            Ok(ControlFlow::Continue)
        }
    });
    let exited = output.exit();
    result.and(exited)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use crossterm::event::{KeyCode, KeyModifiers};
    use pretty_assertions::assert_eq;

    use crate::components::DebugLogHandle;
    use crate::content::ModuleContent;
    use crate::drivers::BufferOutputDriver;
    use crate::persistence::{LayoutRecord, MemoryLayoutStore};
    use crate::window::{Chrome, WindowStore};

    const COLS: u16 = 160;
    const ROWS: u16 = 50;

    fn workspace_with(layouts: Box<dyn LayoutStore>) -> Workspace {
        let grid = CellGrid::default();
        let wm = WindowManager::with_store(WindowStore::with_seed(3), Default::default(), Chrome::for_cells(grid));
        let content = Box::new(ModuleContent::new(DebugLogHandle::default()));
        Workspace::new(wm, layouts, content, grid)
    }

    fn workspace() -> Workspace {
        workspace_with(Box::new(MemoryLayoutStore::new()))
    }

    fn draw(ws: &mut Workspace, out: &mut BufferOutputDriver, now: Instant) {
        out.draw(|frame| ws.render(frame, now)).unwrap();
    }

    fn row_text(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width).map(|x| buffer[(x, y)].symbol().to_string()).collect()
    }

    fn click(ws: &mut Workspace, column: u16, row: u16, now: Instant) {
        for kind in [
            MouseEventKind::Down(MouseButton::Left),
            MouseEventKind::Up(MouseButton::Left),
        ] {
            ws.handle_event(
                &Event::Mouse(MouseEvent {
                    kind,
                    column,
                    row,
                    modifiers: KeyModifiers::NONE,
                }),
                now,
            );
        }
    }

    fn key(ws: &mut Workspace, code: KeyCode, mods: KeyModifiers, now: Instant) -> ControlFlow {
        ws.handle_event(&Event::Key(KeyEvent::new(code, mods)), now)
    }

    struct BrokenStore;

    impl LayoutStore for BrokenStore {
        fn list_layouts(&self) -> Result<Vec<LayoutSummary>, PersistenceError> {
            Err(io::Error::other("disk gone").into())
        }

        fn fetch_layout(&self, id: &str) -> Result<LayoutRecord, PersistenceError> {
            Err(PersistenceError::NotFound(id.to_string()))
        }

        fn save_layout(&mut self, _request: SaveLayout) -> Result<String, PersistenceError> {
            Err(io::Error::other("disk gone").into())
        }

        fn delete_layout(&mut self, id: &str) -> Result<(), PersistenceError> {
            Err(PersistenceError::NotFound(id.to_string()))
        }
    }

    #[test]
    fn launcher_click_opens_a_window() {
        let mut ws = workspace();
        let mut out = BufferOutputDriver::new(COLS, ROWS);
        let now = Instant::now();
        draw(&mut ws, &mut out, now);
        assert!(row_text(out.buffer(), 0).contains("Market Data"));

        // brand "≡ deskwm " takes the first nine cells
        click(&mut ws, 10, 0, now);
        assert_eq!(ws.windows().store().len(), 1);

        draw(&mut ws, &mut out, now);
        // window at (50, 50) px sits at cell (6, 3); its header is one row down
        assert!(row_text(out.buffer(), 4).contains("Market Data"));
    }

    #[test]
    fn resize_tracks_the_dock_row() {
        let mut ws = workspace();
        ws.handle_event(&Event::Resize(100, 30), Instant::now());
        let vp = ws.windows().viewport();
        assert_eq!(vp.size.width, 800);
        assert_eq!(vp.size.height, 29 * 16);
        assert_eq!(vp.menu_bar_height, 16);
    }

    #[test]
    fn save_then_load_restores_windows() {
        let mut ws = workspace();
        let now = Instant::now();
        ws.resize(Rect::new(0, 0, COLS, ROWS));
        ws.apply_action(Action::OpenChart, now);
        ws.apply_action(Action::OpenLog, now);
        assert_eq!(key(&mut ws, KeyCode::Char('s'), KeyModifiers::CONTROL, now), ControlFlow::Continue);
        assert_eq!(ws.notice(now).map(|n| n.severity), Some(Severity::Info));

        // saving again updates the same record
        ws.save_layout(now);
        assert_eq!(ws.layouts().list_layouts().unwrap().len(), 1);

        ws.apply_action(Action::CloseFocused, now);
        ws.apply_action(Action::CloseFocused, now);
        assert!(ws.windows().store().is_empty());

        key(&mut ws, KeyCode::Char('o'), KeyModifiers::CONTROL, now);
        assert!(ws.load_menu_open());
        key(&mut ws, KeyCode::Enter, KeyModifiers::NONE, now);
        assert!(!ws.load_menu_open());
        assert_eq!(ws.windows().store().len(), 2);
    }

    #[test]
    fn persistence_failure_leaves_windows_alone() {
        let mut ws = workspace_with(Box::new(BrokenStore));
        let now = Instant::now();
        ws.apply_action(Action::OpenSecurity, now);
        ws.save_layout(now);
        let notice = ws.notice(now).cloned().unwrap();
        assert_eq!(notice.severity, Severity::Error);
        assert!(notice.text.contains("disk gone"));

        ws.toggle_load_menu(now);
        assert!(!ws.load_menu_open());
        assert_eq!(ws.windows().store().len(), 1);
    }

    #[test]
    fn dock_click_restores_minimized_window() {
        let mut ws = workspace();
        let mut out = BufferOutputDriver::new(COLS, ROWS);
        let now = Instant::now();
        ws.apply_action(Action::OpenMarketData, now);
        key(&mut ws, KeyCode::Char('m'), KeyModifiers::ALT, now);
        assert_eq!(ws.windows().store().minimized().len(), 1);

        draw(&mut ws, &mut out, now);
        assert!(row_text(out.buffer(), ROWS - 1).contains("Market Data"));
        click(&mut ws, 1, ROWS - 1, now);
        assert!(ws.windows().store().minimized().is_empty());
    }

    #[test]
    fn group_with_next_tabs_the_two_front_windows() {
        let mut ws = workspace();
        let now = Instant::now();
        ws.apply_action(Action::OpenChart, now);
        ws.apply_action(Action::OpenLog, now);
        ws.apply_action(Action::GroupWithNext, now);
        assert_eq!(ws.windows().groups().len(), 1);
        assert!(matches!(ws.windows().focused(), Some(SurfaceId::Group(_))));

        ws.apply_action(Action::Ungroup, now);
        assert_eq!(ws.windows().groups().len(), 0);
        assert_eq!(ws.windows().store().len(), 2);
    }

    #[test]
    fn escape_abandons_a_drag() {
        let mut ws = workspace();
        let now = Instant::now();
        ws.resize(Rect::new(0, 0, COLS, ROWS));
        ws.apply_action(Action::OpenChart, now);
        // Chart opens at (100, 100) px; its header spans y 116..132, cell row 8
        ws.handle_event(
            &Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: 20,
                row: 8,
                modifiers: KeyModifiers::NONE,
            }),
            now,
        );
        assert_ne!(ws.windows().interaction_state(), crate::window::InteractionState::Idle);
        key(&mut ws, KeyCode::Esc, KeyModifiers::NONE, now);
        assert_eq!(ws.windows().interaction_state(), crate::window::InteractionState::Idle);
    }

    #[test]
    fn quit_key_stops_run() {
        struct Scripted(VecDeque<Event>);
        impl InputDriver for Scripted {
            fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
                Ok(!self.0.is_empty())
            }
            fn read(&mut self) -> io::Result<Event> {
                self.0.pop_front().ok_or_else(|| io::Error::other("done"))
            }
        }

        let mut ws = workspace();
        let mut out = BufferOutputDriver::new(COLS, ROWS);
        let driver = Scripted(VecDeque::from(vec![Event::Key(KeyEvent::new(
            KeyCode::Char('q'),
            KeyModifiers::CONTROL,
        ))]));
        run(driver, &mut out, &mut ws, Duration::from_millis(0)).unwrap();
        assert!(row_text(out.buffer(), 0).contains("deskwm"));
    }
}
