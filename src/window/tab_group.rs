//! Tab groups: several windows multiplexed behind one tabbed surface.
//!
//! Grouping moves the member `Window` records out of the store and into the
//! group, so a window is always either free-floating or a tab, never both.

use super::store::WindowStore;
use super::{ContentKind, TabGroupId, Window, WindowId};
use crate::layout::{Bounds, Point, Size};

/// Read-only view of one tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabView<'a> {
    pub window_id: WindowId,
    pub title: &'a str,
    pub content: &'a ContentKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabGroup {
    id: TabGroupId,
    members: Vec<Window>,
    active: WindowId,
    geometry: Bounds,
    z_order: u64,
}

impl TabGroup {
    /// Build a group from detached members. `None` when fewer than two.
    pub(crate) fn from_members(
        id: TabGroupId,
        members: Vec<Window>,
        active: Option<WindowId>,
        geometry: Bounds,
        z_order: u64,
    ) -> Option<Self> {
        if members.len() < 2 {
            return None;
        }
        let first = members[0].id();
        let active = active
            .filter(|wanted| members.iter().any(|m| m.id() == *wanted))
            .unwrap_or(first);
        Some(Self {
            id,
            members,
            active,
            geometry: Bounds::from_parts(geometry.position, geometry.size.clamp_min()),
            z_order,
        })
    }

    pub fn id(&self) -> TabGroupId {
        self.id
    }

    pub fn tabs(&self) -> impl Iterator<Item = TabView<'_>> {
        self.members.iter().map(|w| TabView {
            window_id: w.id(),
            title: w.title(),
            content: w.content(),
        })
    }

    pub fn members(&self) -> &[Window] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, window_id: WindowId) -> bool {
        self.members.iter().any(|m| m.id() == window_id)
    }

    pub fn active_tab_id(&self) -> WindowId {
        self.active
    }

    pub fn active_window(&self) -> Option<&Window> {
        self.members.iter().find(|m| m.id() == self.active)
    }

    pub fn active_index(&self) -> usize {
        self.members
            .iter()
            .position(|m| m.id() == self.active)
            .unwrap_or(0)
    }

    pub fn geometry(&self) -> Bounds {
        self.geometry
    }

    pub fn position(&self) -> Point {
        self.geometry.position
    }

    pub fn size(&self) -> Size {
        self.geometry.size
    }

    pub fn z_order(&self) -> u64 {
        self.z_order
    }
}

#[derive(Debug, Clone, Default)]
pub struct TabGroups {
    groups: Vec<TabGroup>,
}

impl TabGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group free windows into one tabbed surface.
    ///
    /// Needs at least two distinct ids, all naming free (non-minimized)
    /// windows in `store`; otherwise nothing happens. The group takes the
    /// first window's geometry and shows its tab.
    pub fn group(&mut self, store: &mut WindowStore, window_ids: &[WindowId]) -> Option<TabGroupId> {
        if window_ids.len() < 2 {
            return None;
        }
        for (idx, id) in window_ids.iter().enumerate() {
            if window_ids[..idx].contains(id) {
                return None;
            }
            if store.get(*id).is_none_or(Window::is_minimized) {
                return None;
            }
        }
        let geometry = store.get(window_ids[0]).map(Window::geometry)?;
        let members: Vec<Window> = window_ids.iter().filter_map(|id| store.take(*id)).collect();
        let id = TabGroupId::new();
        let z = store.bump_z();
        let group = TabGroup::from_members(id, members, None, geometry, z)?;
        tracing::debug!(group_id = %id, tabs = group.len(), "grouped windows");
        self.groups.push(group);
        Some(id)
    }

    pub fn set_active_tab(&mut self, group_id: TabGroupId, window_id: WindowId) -> bool {
        let Some(group) = self.get_mut(group_id) else {
            return false;
        };
        if !group.contains(window_id) {
            return false;
        }
        group.active = window_id;
        true
    }

    /// Step the active tab forward or backward, wrapping around.
    pub fn cycle_tab(&mut self, group_id: TabGroupId, forward: bool) -> bool {
        let Some(group) = self.get_mut(group_id) else {
            return false;
        };
        let len = group.members.len();
        if len == 0 {
            return false;
        }
        let idx = group.active_index();
        let next = if forward {
            (idx + 1) % len
        } else {
            (idx + len - 1) % len
        };
        group.active = group.members[next].id();
        true
    }

    /// Remove the group and discard its member windows.
    pub fn close(&mut self, group_id: TabGroupId) -> Option<TabGroup> {
        let idx = self.groups.iter().position(|g| g.id == group_id)?;
        let group = self.groups.remove(idx);
        tracing::debug!(group_id = %group_id, discarded = group.len(), "closed tab group");
        Some(group)
    }

    /// Remove the group and hand its members back to `store` as free windows.
    ///
    /// Members come back in tab order, the last one frontmost.
    pub fn ungroup(&mut self, store: &mut WindowStore, group_id: TabGroupId) -> Vec<WindowId> {
        let Some(idx) = self.groups.iter().position(|g| g.id == group_id) else {
            return Vec::new();
        };
        let group = self.groups.remove(idx);
        tracing::debug!(group_id = %group_id, tabs = group.len(), "ungrouped windows");
        group
            .members
            .into_iter()
            .map(|window| store.adopt(window))
            .collect()
    }

    /// Close one tab. A group left with a single member dissolves and the
    /// survivor floats free at the group's geometry.
    pub fn close_tab(&mut self, store: &mut WindowStore, window_id: WindowId) -> bool {
        let Some(idx) = self.groups.iter().position(|g| g.contains(window_id)) else {
            return false;
        };
        let group = &mut self.groups[idx];
        let pos = group.active_index();
        group.members.retain(|m| m.id() != window_id);
        if group.active == window_id
            && let Some(next) = group.members.get(pos.min(group.members.len().saturating_sub(1)))
        {
            group.active = next.id();
        }
        tracing::debug!(group_id = %group.id, window_id = %window_id, "closed tab");
        if group.members.len() < 2 {
            let group = self.groups.remove(idx);
            for mut survivor in group.members {
                survivor.set_geometry(group.geometry);
                survivor.set_maximized(false);
                store.adopt(survivor);
            }
        }
        true
    }

    pub fn bring_to_front(&mut self, store: &mut WindowStore, group_id: TabGroupId) -> bool {
        let Some(group) = self.get_mut(group_id) else {
            return false;
        };
        group.z_order = store.bump_z();
        true
    }

    pub fn move_to(&mut self, group_id: TabGroupId, position: Point) -> bool {
        let Some(group) = self.get_mut(group_id) else {
            return false;
        };
        group.geometry.position = position;
        true
    }

    pub fn set_geometry(&mut self, group_id: TabGroupId, geometry: Bounds) -> bool {
        let Some(group) = self.get_mut(group_id) else {
            return false;
        };
        group.geometry = Bounds::from_parts(geometry.position, geometry.size.clamp_min());
        true
    }

    pub fn get(&self, group_id: TabGroupId) -> Option<&TabGroup> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    fn get_mut(&mut self, group_id: TabGroupId) -> Option<&mut TabGroup> {
        self.groups.iter_mut().find(|g| g.id == group_id)
    }

    /// The group currently holding `window_id` as a tab.
    pub fn group_of(&self, window_id: WindowId) -> Option<TabGroupId> {
        self.groups
            .iter()
            .find(|g| g.contains(window_id))
            .map(TabGroup::id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TabGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub(crate) fn insert(&mut self, group: TabGroup) {
        self.groups.push(group);
    }
}
