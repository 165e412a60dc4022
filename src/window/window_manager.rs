use std::sync::Arc;
use std::time::Instant;

use super::decorator::{Chrome, DefaultDecorator, GROUP_CONTROLS, HeaderAction, WINDOW_CONTROLS, WindowDecorator};
use super::interaction::{InteractionController, InteractionState, PointerEvent, PointerKind, SessionRelease, SessionStep};
use super::store::{WindowRequest, WindowStore};
use super::tab_group::{TabGroup, TabGroups};
use super::{ContentKind, SurfaceId, TabGroupId, Window, WindowId};
use crate::constants::{DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH};
use crate::layout::floating::{hit_resize_handle, resize_handles_for_bounds};
use crate::layout::snap::{maximized_geometry, resolve_snap_geometry};
use crate::layout::{Bounds, Point, Size, Viewport, rect_contains};
use crate::snapshot::{self, LayoutSnapshot};

/// What a surface is, for drawing.
#[derive(Debug, Clone, Copy)]
pub enum SurfaceKind<'a> {
    Window(&'a Window),
    Group(&'a TabGroup),
}

/// One entry of the back-to-front draw plan.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceDraw<'a> {
    pub id: SurfaceId,
    /// Effective rectangle: the workspace for a maximized window.
    pub bounds: Bounds,
    pub kind: SurfaceKind<'a>,
    pub focused: bool,
}

impl<'a> SurfaceDraw<'a> {
    /// The window whose body is shown: the window itself or the active tab.
    pub fn body(&self) -> Option<&'a Window> {
        match self.kind {
            SurfaceKind::Window(window) => Some(window),
            SurfaceKind::Group(group) => group.active_window(),
        }
    }

    pub fn content(&self) -> Option<&'a ContentKind> {
        self.body().map(Window::content)
    }
}

/// Default request for a module launched from the menu.
pub fn launcher_request(kind: ContentKind) -> WindowRequest {
    match kind {
        ContentKind::MarketData => WindowRequest::new(kind, "Market Data")
            .at(Point::new(50, 50))
            .sized(Size::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT)),
        ContentKind::Chart => WindowRequest::new(kind, "Chart - USDJPY")
            .at(Point::new(100, 100))
            .sized(Size::new(600, 400)),
        ContentKind::Log => WindowRequest::new(kind, "Log Viewer")
            .at(Point::new(150, 150))
            .sized(Size::new(900, 600)),
        ContentKind::Security => WindowRequest::new(kind, "Security"),
        other @ ContentKind::Unknown(_) => {
            let title = other.to_string();
            WindowRequest::new(other, title)
        }
    }
}

/// Owns every surface on the workspace and routes pointer input to them.
///
/// All geometry is in workspace pixels. Operations on ids that no longer
/// exist are no-ops, so a close that lands mid-drag simply ends the drag.
#[derive(Debug)]
pub struct WindowManager {
    store: WindowStore,
    groups: TabGroups,
    controller: InteractionController,
    viewport: Viewport,
    chrome: Chrome,
    decorator: Arc<dyn WindowDecorator>,
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new(Viewport::default(), Chrome::default())
    }
}

impl WindowManager {
    pub fn new(viewport: Viewport, chrome: Chrome) -> Self {
        Self::with_store(WindowStore::new(), viewport, chrome)
    }

    pub fn with_store(store: WindowStore, viewport: Viewport, chrome: Chrome) -> Self {
        Self {
            store,
            groups: TabGroups::new(),
            controller: InteractionController::new(),
            viewport,
            chrome,
            decorator: Arc::new(DefaultDecorator),
        }
    }

    pub fn store(&self) -> &WindowStore {
        &self.store
    }

    pub fn groups(&self) -> &TabGroups {
        &self.groups
    }

    pub fn interaction_state(&self) -> InteractionState {
        self.controller.state()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Maximized windows follow the new viewport on the next draw.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn decorator(&self) -> Arc<dyn WindowDecorator> {
        self.decorator.clone()
    }

    pub fn create_window(
        &mut self,
        content: ContentKind,
        title: impl Into<String>,
        position: Option<Point>,
        size: Option<Size>,
    ) -> WindowId {
        self.store.create(content, title, position, size)
    }

    pub fn open_module(&mut self, kind: ContentKind) -> WindowId {
        self.store.open(launcher_request(kind))
    }

    /// Close a free window or a tab. Returns `false` for unknown ids.
    pub fn close_window(&mut self, id: WindowId) -> bool {
        self.controller.forget(SurfaceId::Window(id));
        if self.store.close(id).is_some() {
            return true;
        }
        self.groups.close_tab(&mut self.store, id)
    }

    pub fn minimize_window(&mut self, id: WindowId) -> bool {
        let done = self.store.minimize(id);
        if done {
            self.controller.forget(SurfaceId::Window(id));
        }
        done
    }

    pub fn restore_window(&mut self, id: WindowId) -> bool {
        self.store.restore(id)
    }

    pub fn toggle_maximize(&mut self, id: WindowId) -> bool {
        let done = self.store.toggle_maximize(id);
        if done && self.controller.session().is_some_and(|s| s.target() == SurfaceId::Window(id)) {
            self.controller.cancel();
        }
        done
    }

    pub fn bring_to_front(&mut self, id: SurfaceId) -> bool {
        match id {
            SurfaceId::Window(id) => self.store.bring_to_front(id),
            SurfaceId::Group(id) => self.groups.bring_to_front(&mut self.store, id),
        }
    }

    pub fn group_windows(&mut self, window_ids: &[WindowId]) -> Option<TabGroupId> {
        let id = self.groups.group(&mut self.store, window_ids)?;
        for window_id in window_ids {
            self.controller.forget(SurfaceId::Window(*window_id));
        }
        Some(id)
    }

    pub fn set_active_tab(&mut self, group_id: TabGroupId, window_id: WindowId) -> bool {
        self.groups.set_active_tab(group_id, window_id)
    }

    pub fn cycle_tab(&mut self, group_id: TabGroupId, forward: bool) -> bool {
        self.groups.cycle_tab(group_id, forward)
    }

    /// Remove a group and discard its tabs.
    pub fn close_group(&mut self, group_id: TabGroupId) -> bool {
        self.controller.forget(SurfaceId::Group(group_id));
        self.groups.close(group_id).is_some()
    }

    /// Remove a group and float its tabs again.
    pub fn ungroup(&mut self, group_id: TabGroupId) -> Vec<WindowId> {
        self.controller.forget(SurfaceId::Group(group_id));
        self.groups.ungroup(&mut self.store, group_id)
    }

    /// The surface currently in front, which keyboard actions target.
    pub fn focused(&self) -> Option<SurfaceId> {
        let window = self
            .store
            .frontmost()
            .and_then(|id| self.store.get(id))
            .map(|w| (w.z_order(), SurfaceId::Window(w.id())));
        let group = self
            .groups
            .iter()
            .max_by_key(|g| g.z_order())
            .map(|g| (g.z_order(), SurfaceId::Group(g.id())));
        window.into_iter().chain(group).max_by_key(|(z, _)| *z).map(|(_, id)| id)
    }

    /// Where a surface is drawn right now.
    pub fn effective_bounds(&self, id: SurfaceId) -> Option<Bounds> {
        match id {
            SurfaceId::Window(id) => {
                let window = self.store.get(id)?;
                if window.is_minimized() {
                    None
                } else if window.is_maximized() {
                    Some(maximized_geometry(self.viewport.size, self.viewport.menu_bar_height))
                } else {
                    Some(window.geometry())
                }
            }
            SurfaceId::Group(id) => self.groups.get(id).map(TabGroup::geometry),
        }
    }

    /// Visible surfaces, back to front.
    pub fn surfaces(&self) -> Vec<SurfaceDraw<'_>> {
        let mut plan: Vec<(u64, SurfaceDraw<'_>)> = Vec::new();
        for window in self.store.visible() {
            let id = SurfaceId::Window(window.id());
            if let Some(bounds) = self.effective_bounds(id) {
                plan.push((
                    window.z_order(),
                    SurfaceDraw {
                        id,
                        bounds,
                        kind: SurfaceKind::Window(window),
                        focused: false,
                    },
                ));
            }
        }
        for group in self.groups.iter() {
            plan.push((
                group.z_order(),
                SurfaceDraw {
                    id: SurfaceId::Group(group.id()),
                    bounds: group.geometry(),
                    kind: SurfaceKind::Group(group),
                    focused: false,
                },
            ));
        }
        plan.sort_by_key(|(z, _)| *z);
        let mut plan: Vec<SurfaceDraw<'_>> = plan.into_iter().map(|(_, draw)| draw).collect();
        if let Some(front) = plan.last_mut() {
            front.focused = true;
        }
        plan
    }

    /// Topmost surface under `point`.
    pub fn surface_at(&self, point: Point) -> Option<SurfaceId> {
        self.surfaces()
            .iter()
            .rev()
            .find(|draw| rect_contains(draw.bounds, point))
            .map(|draw| draw.id)
    }

    /// The rectangle a release would snap the dragged surface into.
    pub fn snap_preview(&self) -> Option<(SurfaceId, Bounds)> {
        let (id, zone) = self.controller.snap_preview()?;
        let bounds = resolve_snap_geometry(zone, self.viewport.size, self.viewport.menu_bar_height)?;
        Some((id, bounds))
    }

    /// Feed one pointer sample. Returns `true` when a surface consumed it.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        match event.kind {
            PointerKind::Down => self.pointer_down(event.position, event.at),
            PointerKind::Move => self.pointer_moved(event.position),
            PointerKind::Up => self.pointer_up(),
            PointerKind::Cancel => self.controller.cancel().is_some(),
        }
    }

    fn pointer_down(&mut self, point: Point, at: Instant) -> bool {
        // An up we never saw; drop the stale session where it is.
        self.controller.cancel();

        let Some(id) = self.surface_at(point) else {
            self.controller.clear_header_activation();
            return false;
        };
        let Some(bounds) = self.effective_bounds(id) else {
            return false;
        };
        let (maximized, tabs) = match id {
            SurfaceId::Window(wid) => (self.store.get(wid).is_some_and(Window::is_maximized), 0),
            SurfaceId::Group(gid) => (false, self.groups.get(gid).map_or(0, TabGroup::len)),
        };

        if !maximized {
            let handles = resize_handles_for_bounds(id, bounds, self.chrome.border);
            if let Some(handle) = hit_resize_handle(&handles, point) {
                self.bring_to_front(id);
                self.controller.clear_header_activation();
                self.controller.begin_resize(id, handle.edge, bounds, point);
                return true;
            }
        }

        let controls: &[HeaderAction] = match id {
            SurfaceId::Window(_) => &WINDOW_CONTROLS,
            SurfaceId::Group(_) => &GROUP_CONTROLS,
        };
        let action = self.chrome.hit_header(bounds, point, controls, tabs);
        if action != HeaderAction::Drag {
            self.controller.clear_header_activation();
        }
        match (action, id) {
            (HeaderAction::Minimize, SurfaceId::Window(wid)) => {
                self.minimize_window(wid);
            }
            (HeaderAction::Maximize, SurfaceId::Window(wid)) => {
                self.toggle_maximize(wid);
            }
            (HeaderAction::Close, SurfaceId::Window(wid)) => {
                self.close_window(wid);
            }
            (HeaderAction::Close, SurfaceId::Group(gid)) => {
                self.close_group(gid);
            }
            (HeaderAction::Tab(idx), SurfaceId::Group(gid)) => {
                self.groups.bring_to_front(&mut self.store, gid);
                let tab = self
                    .groups
                    .get(gid)
                    .and_then(|g| g.members().get(idx))
                    .map(Window::id);
                if let Some(tab) = tab {
                    self.groups.set_active_tab(gid, tab);
                }
            }
            (HeaderAction::Drag, _) => {
                self.bring_to_front(id);
                if self.controller.register_header_activation(id, at) {
                    if let SurfaceId::Window(wid) = id {
                        self.toggle_maximize(wid);
                    }
                } else if !maximized {
                    self.controller.begin_drag(id, bounds, point);
                }
            }
            _ => {
                self.bring_to_front(id);
            }
        }
        true
    }

    fn pointer_moved(&mut self, point: Point) -> bool {
        let Some(target) = self.controller.session().map(|s| s.target()) else {
            return false;
        };
        let can_maximize = matches!(target, SurfaceId::Window(_));
        let step = self.controller.pointer_moved(point, self.viewport.size, can_maximize);
        let committed = match step {
            SessionStep::Ignore => true,
            SessionStep::MoveTo { target, position } => self.move_surface(target, position),
            SessionStep::Resize { target, geometry } => self.resize_surface(target, geometry),
            SessionStep::Maximize {
                target,
                restore_position,
            } => {
                let moved = self.move_surface(target, restore_position);
                if let SurfaceId::Window(wid) = target
                    && self.store.get(wid).is_some_and(|w| !w.is_maximized())
                {
                    self.store.toggle_maximize(wid);
                }
                tracing::debug!(surface = %target, "drag reached the top edge, maximized");
                moved
            }
        };
        if !committed {
            self.controller.cancel();
        }
        true
    }

    fn pointer_up(&mut self) -> bool {
        let Some(release) = self.controller.pointer_released(self.viewport) else {
            return false;
        };
        if let SessionRelease::Snap {
            target,
            zone,
            geometry,
        } = release
        {
            self.resize_surface(target, geometry);
            tracing::debug!(surface = %target, ?zone, "snapped");
        }
        true
    }

    fn move_surface(&mut self, id: SurfaceId, position: Point) -> bool {
        match id {
            SurfaceId::Window(id) => self.store.move_to(id, position),
            SurfaceId::Group(id) => self.groups.move_to(id, position),
        }
    }

    fn resize_surface(&mut self, id: SurfaceId, geometry: Bounds) -> bool {
        match id {
            SurfaceId::Window(id) => self.store.set_geometry(id, geometry),
            SurfaceId::Group(id) => self.groups.set_geometry(id, geometry),
        }
    }

    pub fn snapshot(&self) -> LayoutSnapshot {
        snapshot::capture(&self.store, &self.groups)
    }

    /// Replace every window and tab group with the snapshot's contents in
    /// one step. Any drag or resize in flight is dropped.
    pub fn apply_snapshot(&mut self, layout: &LayoutSnapshot) {
        let (store, groups) = snapshot::rebuild(layout, self.store.empty_like());
        self.controller.cancel();
        self.controller.clear_header_activation();
        self.store = store;
        self.groups = groups;
        tracing::info!(
            windows = self.store.len(),
            groups = self.groups.len(),
            "applied layout snapshot"
        );
    }
}
