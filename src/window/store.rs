//! Authoritative collection of free-floating window records.
//!
//! Every operation is total: an unknown id, or a window in the wrong state
//! for the request, is a silent no-op reported through the return value.
//! Pointer races (a close landing mid-drag) must never take the session down.

use std::collections::BTreeMap;

use super::{ContentKind, MinimizedEntry, Window, WindowId};
use crate::constants::{
    DEFAULT_POSITION_JITTER, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_X,
    DEFAULT_WINDOW_Y,
};
use crate::layout::{Bounds, Point, Size};

/// Monotonic stacking counter.
///
/// Each bring-to-front takes the current value and advances it, so the most
/// recently touched surface always holds the highest value. Values are never
/// handed out twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZCounter {
    next: u64,
}

impl ZCounter {
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// The value the next bump will hand out.
    pub fn peek(&self) -> u64 {
        self.next
    }

    pub fn bump(&mut self) -> u64 {
        let z = self.next;
        self.next = self.next.saturating_add(1);
        z
    }
}

impl Default for ZCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Parameters for opening a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRequest {
    pub id: Option<WindowId>,
    pub content: ContentKind,
    pub title: String,
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub maximized: bool,
}

impl WindowRequest {
    pub fn new(content: ContentKind, title: impl Into<String>) -> Self {
        Self {
            id: None,
            content,
            title: title.into(),
            position: None,
            size: None,
            maximized: false,
        }
    }

    pub fn at(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    pub fn sized(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    /// Reuse an id, e.g. when restoring a layout. Ignored if already taken.
    pub fn with_id(mut self, id: WindowId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn maximized(mut self, maximized: bool) -> Self {
        self.maximized = maximized;
        self
    }
}

#[derive(Debug, Clone)]
pub struct WindowStore {
    windows: BTreeMap<WindowId, Window>,
    minimized: Vec<MinimizedEntry>,
    z: ZCounter,
    rng: fastrand::Rng,
}

impl Default for WindowStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowStore {
    pub fn new() -> Self {
        Self::with_rng(fastrand::Rng::new())
    }

    /// A store whose default-position jitter is reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(fastrand::Rng::with_seed(seed))
    }

    /// An empty store whose jitter and stacking counter continue from this
    /// one. The counter is session-scoped and never goes backwards.
    pub(crate) fn empty_like(&mut self) -> Self {
        let mut store = Self::with_rng(self.rng.fork());
        store.z = self.z;
        store
    }

    fn with_rng(rng: fastrand::Rng) -> Self {
        Self {
            windows: BTreeMap::new(),
            minimized: Vec::new(),
            z: ZCounter::new(),
            rng,
        }
    }

    /// Open a window with explicit or default geometry and put it in front.
    pub fn create(
        &mut self,
        content: ContentKind,
        title: impl Into<String>,
        position: Option<Point>,
        size: Option<Size>,
    ) -> WindowId {
        let mut request = WindowRequest::new(content, title);
        request.position = position;
        request.size = size;
        self.open(request)
    }

    pub fn open(&mut self, request: WindowRequest) -> WindowId {
        let id = match request.id {
            Some(id) if !self.windows.contains_key(&id) => id,
            _ => self.fresh_id(),
        };
        let position = request.position.unwrap_or_else(|| self.default_position());
        let size = request
            .size
            .unwrap_or(Size::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT));
        let z = self.z.bump();
        let mut window = Window::new(
            id,
            request.title,
            request.content,
            Bounds::from_parts(position, size),
            z,
        );
        window.set_maximized(request.maximized);
        tracing::debug!(window_id = %id, content = %window.content(), z, "opened window");
        self.windows.insert(id, window);
        id
    }

    fn fresh_id(&self) -> WindowId {
        loop {
            let id = WindowId::new();
            if !self.windows.contains_key(&id) {
                return id;
            }
        }
    }

    fn default_position(&mut self) -> Point {
        Point::new(
            DEFAULT_WINDOW_X + self.rng.i32(0..DEFAULT_POSITION_JITTER),
            DEFAULT_WINDOW_Y + self.rng.i32(0..DEFAULT_POSITION_JITTER),
        )
    }

    /// Remove a window and any dock entry pointing at it.
    pub fn close(&mut self, id: WindowId) -> Option<Window> {
        let removed = self.windows.remove(&id)?;
        self.minimized.retain(|entry| entry.window_id != id);
        tracing::debug!(window_id = %id, "closed window");
        Some(removed)
    }

    pub fn minimize(&mut self, id: WindowId) -> bool {
        let Some(window) = self.windows.get_mut(&id) else {
            return false;
        };
        if window.is_minimized() {
            return false;
        }
        // Minimized and maximized are exclusive; the floating geometry is
        // untouched so a later restore shows the pre-maximize rectangle.
        window.set_maximized(false);
        window.set_minimized(true);
        self.minimized.push(window.minimized_entry());
        tracing::trace!(window_id = %id, "minimized window");
        true
    }

    /// Un-minimize and bring to front.
    pub fn restore(&mut self, id: WindowId) -> bool {
        let Some(window) = self.windows.get_mut(&id) else {
            return false;
        };
        if !window.is_minimized() {
            return false;
        }
        window.set_minimized(false);
        window.set_z_order(self.z.bump());
        self.minimized.retain(|entry| entry.window_id != id);
        tracing::trace!(window_id = %id, "restored window");
        true
    }

    /// Flip maximized state; both directions bring the window to front.
    pub fn toggle_maximize(&mut self, id: WindowId) -> bool {
        let Some(window) = self.windows.get_mut(&id) else {
            return false;
        };
        if window.is_minimized() {
            return false;
        }
        let maximized = !window.is_maximized();
        window.set_maximized(maximized);
        window.set_z_order(self.z.bump());
        tracing::trace!(window_id = %id, maximized, "toggled maximize");
        true
    }

    pub fn bring_to_front(&mut self, id: WindowId) -> bool {
        let Some(window) = self.windows.get_mut(&id) else {
            return false;
        };
        if window.is_minimized() {
            return false;
        }
        window.set_z_order(self.z.bump());
        true
    }

    pub fn move_to(&mut self, id: WindowId, position: Point) -> bool {
        let Some(window) = self.windows.get_mut(&id) else {
            return false;
        };
        window.set_position(position);
        true
    }

    /// Replace the floating geometry. Size is floored at the minimums.
    pub fn set_geometry(&mut self, id: WindowId, geometry: Bounds) -> bool {
        let Some(window) = self.windows.get_mut(&id) else {
            return false;
        };
        window.set_geometry(geometry);
        true
    }

    pub fn get(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(&id)
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Window> {
        self.windows.values()
    }

    /// All windows, back to front.
    pub fn stacking_order(&self) -> Vec<&Window> {
        let mut all: Vec<&Window> = self.windows.values().collect();
        all.sort_by_key(|w| w.z_order());
        all
    }

    /// Non-minimized windows, back to front.
    pub fn visible(&self) -> Vec<&Window> {
        let mut visible: Vec<&Window> = self
            .windows
            .values()
            .filter(|w| !w.is_minimized())
            .collect();
        visible.sort_by_key(|w| w.z_order());
        visible
    }

    pub fn frontmost(&self) -> Option<WindowId> {
        self.windows
            .values()
            .filter(|w| !w.is_minimized())
            .max_by_key(|w| w.z_order())
            .map(Window::id)
    }

    /// Dock entries in the order windows were minimized.
    pub fn minimized(&self) -> &[MinimizedEntry] {
        &self.minimized
    }

    /// The stacking value the next bring-to-front will assign.
    pub fn next_z_index(&self) -> u64 {
        self.z.peek()
    }

    pub(crate) fn bump_z(&mut self) -> u64 {
        self.z.bump()
    }

    /// Detach a free (non-minimized) window, e.g. to become a tab.
    pub(crate) fn take(&mut self, id: WindowId) -> Option<Window> {
        if self.windows.get(&id).is_none_or(Window::is_minimized) {
            return None;
        }
        self.windows.remove(&id)
    }

    /// Re-home a detached window as a free window in front of everything.
    pub(crate) fn adopt(&mut self, mut window: Window) -> WindowId {
        if self.windows.contains_key(&window.id()) {
            window.id = self.fresh_id();
        }
        window.set_minimized(false);
        window.set_z_order(self.z.bump());
        let id = window.id();
        self.windows.insert(id, window);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MIN_HEIGHT, MIN_WIDTH};

    fn store_with(n: usize) -> (WindowStore, Vec<WindowId>) {
        let mut store = WindowStore::with_seed(7);
        let ids = (0..n)
            .map(|i| store.create(ContentKind::Chart, format!("w{i}"), None, None))
            .collect();
        (store, ids)
    }

    #[test]
    fn create_assigns_increasing_z_and_defaults() {
        let (store, ids) = store_with(3);
        let zs: Vec<u64> = ids.iter().map(|id| store.get(*id).unwrap().z_order()).collect();
        assert!(zs.windows(2).all(|pair| pair[0] < pair[1]));
        let w = store.get(ids[0]).unwrap();
        assert_eq!(w.size(), Size::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT));
        assert!(w.position().x >= DEFAULT_WINDOW_X);
        assert!(w.position().x < DEFAULT_WINDOW_X + DEFAULT_POSITION_JITTER);
        assert_eq!(store.frontmost(), Some(ids[2]));
    }

    #[test]
    fn explicit_geometry_is_kept_and_floored() {
        let mut store = WindowStore::with_seed(1);
        let id = store.create(
            ContentKind::Log,
            "log",
            Some(Point::new(150, 150)),
            Some(Size::new(50, 40)),
        );
        let w = store.get(id).unwrap();
        assert_eq!(w.position(), Point::new(150, 150));
        assert_eq!(w.size(), Size::new(MIN_WIDTH, MIN_HEIGHT));
    }

    #[test]
    fn requested_id_is_reused_only_when_free() {
        let mut store = WindowStore::with_seed(1);
        let wanted = WindowId::new();
        let a = store.open(WindowRequest::new(ContentKind::Chart, "a").with_id(wanted));
        let b = store.open(WindowRequest::new(ContentKind::Chart, "b").with_id(wanted));
        assert_eq!(a, wanted);
        assert_ne!(b, wanted);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn close_is_idempotent_and_drops_dock_entry() {
        let (mut store, ids) = store_with(2);
        assert!(store.minimize(ids[0]));
        assert_eq!(store.minimized().len(), 1);
        assert!(store.close(ids[0]).is_some());
        assert!(store.minimized().is_empty());
        assert!(store.close(ids[0]).is_none());
        assert!(store.close(WindowId::new()).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn minimize_then_restore_round_trip() {
        let (mut store, ids) = store_with(2);
        assert!(store.minimize(ids[1]));
        assert!(!store.minimize(ids[1]));
        assert_eq!(store.minimized().len(), 1);
        assert_eq!(store.visible().len(), 1);
        assert_eq!(store.frontmost(), Some(ids[0]));

        assert!(store.restore(ids[1]));
        assert!(!store.restore(ids[1]));
        assert!(store.minimized().is_empty());
        assert_eq!(store.frontmost(), Some(ids[1]));
    }

    #[test]
    fn minimizing_clears_maximize_but_keeps_geometry() {
        let (mut store, ids) = store_with(1);
        let before = store.get(ids[0]).unwrap().geometry();
        store.toggle_maximize(ids[0]);
        store.minimize(ids[0]);
        let w = store.get(ids[0]).unwrap();
        assert!(w.is_minimized());
        assert!(!w.is_maximized());
        assert!(!store.toggle_maximize(ids[0]));
        store.restore(ids[0]);
        assert_eq!(store.get(ids[0]).unwrap().geometry(), before);
    }

    #[test]
    fn maximize_round_trip_preserves_geometry_and_raises() {
        let (mut store, ids) = store_with(2);
        store.set_geometry(ids[0], Bounds::new(-33, 71, 612, 288));
        assert!(store.toggle_maximize(ids[0]));
        assert!(store.get(ids[0]).unwrap().is_maximized());
        assert_eq!(store.frontmost(), Some(ids[0]));
        store.bring_to_front(ids[1]);
        assert!(store.toggle_maximize(ids[0]));
        let w = store.get(ids[0]).unwrap();
        assert!(!w.is_maximized());
        assert_eq!(w.geometry(), Bounds::new(-33, 71, 612, 288));
        assert_eq!(store.frontmost(), Some(ids[0]));
    }

    #[test]
    fn counter_never_reuses_values() {
        let (mut store, ids) = store_with(2);
        let before = store.next_z_index();
        store.bring_to_front(ids[0]);
        store.bring_to_front(ids[0]);
        assert_eq!(store.next_z_index(), before + 2);
        assert_eq!(store.get(ids[0]).unwrap().z_order(), before + 1);
    }

    #[test]
    fn unknown_ids_are_no_ops() {
        let (mut store, _) = store_with(1);
        let ghost = WindowId::new();
        let z = store.next_z_index();
        assert!(!store.minimize(ghost));
        assert!(!store.restore(ghost));
        assert!(!store.toggle_maximize(ghost));
        assert!(!store.bring_to_front(ghost));
        assert!(!store.move_to(ghost, Point::new(1, 1)));
        assert_eq!(store.next_z_index(), z);
    }

    #[test]
    fn take_refuses_minimized_windows() {
        let (mut store, ids) = store_with(2);
        store.minimize(ids[0]);
        assert!(store.take(ids[0]).is_none());
        let taken = store.take(ids[1]).unwrap();
        assert!(!store.contains(ids[1]));
        let id = store.adopt(taken);
        assert_eq!(id, ids[1]);
        assert_eq!(store.frontmost(), Some(ids[1]));
    }
}
