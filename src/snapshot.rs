//! Serializable layout snapshots.
//!
//! The JSON shape is camelCase and mirrors what the layouts service stores:
//!
//! ```json
//! {"windows": [{"id", "title", "contentKind", "position", "size",
//!               "isMaximized", "isMinimized"}],
//!  "tabGroups": [{"id", "tabs": [{"id", "title", "contentKind"}],
//!                 "activeTabId", "position", "size"}]}
//! ```
//!
//! Ids are kept as strings so layouts written by other clients still load;
//! anything that is not a free uuid is replaced on restore.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::layout::{Bounds, Point, Size};
use crate::window::store::{WindowRequest, WindowStore};
use crate::window::tab_group::{TabGroup, TabGroups};
use crate::window::{ContentKind, TabGroupId, Window, WindowId};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSnapshot {
    #[serde(default)]
    pub windows: Vec<WindowSnapshot>,
    #[serde(default)]
    pub tab_groups: Vec<TabGroupSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSnapshot {
    pub id: String,
    pub title: String,
    #[serde(alias = "module")]
    pub content_kind: ContentKind,
    pub position: Point,
    pub size: Size,
    #[serde(default)]
    pub is_maximized: bool,
    #[serde(default)]
    pub is_minimized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabSnapshot {
    pub id: String,
    pub title: String,
    #[serde(alias = "module")]
    pub content_kind: ContentKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabGroupSnapshot {
    pub id: String,
    pub tabs: Vec<TabSnapshot>,
    pub active_tab_id: String,
    pub position: Point,
    pub size: Size,
}

impl LayoutSnapshot {
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty() && self.tab_groups.is_empty()
    }
}

/// Capture every window and tab group, back to front.
///
/// Maximized windows record their floating geometry so a restore can
/// un-maximize them exactly.
pub(crate) fn capture(store: &WindowStore, groups: &TabGroups) -> LayoutSnapshot {
    let windows = store
        .stacking_order()
        .into_iter()
        .map(|w| WindowSnapshot {
            id: w.id().to_string(),
            title: w.title().to_string(),
            content_kind: w.content().clone(),
            position: w.position(),
            size: w.size(),
            is_maximized: w.is_maximized(),
            is_minimized: w.is_minimized(),
        })
        .collect();

    let mut ordered: Vec<&TabGroup> = groups.iter().collect();
    ordered.sort_by_key(|g| g.z_order());
    let tab_groups = ordered
        .into_iter()
        .map(|g| TabGroupSnapshot {
            id: g.id().to_string(),
            tabs: g
                .tabs()
                .map(|tab| TabSnapshot {
                    id: tab.window_id.to_string(),
                    title: tab.title.to_string(),
                    content_kind: tab.content.clone(),
                })
                .collect(),
            active_tab_id: g.active_tab_id().to_string(),
            position: g.position(),
            size: g.size(),
        })
        .collect();

    LayoutSnapshot {
        windows,
        tab_groups,
    }
}

/// Build fresh workspace state from a snapshot into the empty `store`.
///
/// Windows come back in listed order with fresh stacking values, tab groups
/// in front of them. Minimized state is not restored: every window starts
/// visible. A group listing a single tab comes back as a free window.
pub(crate) fn rebuild(snapshot: &LayoutSnapshot, mut store: WindowStore) -> (WindowStore, TabGroups) {
    let mut used: HashSet<WindowId> = HashSet::new();
    let mut claim = |raw: &str| -> WindowId {
        let id = match raw.parse::<WindowId>() {
            Ok(id) if !used.contains(&id) => id,
            _ => loop {
                let id = WindowId::new();
                if !used.contains(&id) {
                    break id;
                }
            },
        };
        used.insert(id);
        id
    };

    for entry in &snapshot.windows {
        let id = claim(&entry.id);
        store.open(
            WindowRequest::new(entry.content_kind.clone(), entry.title.clone())
                .with_id(id)
                .at(entry.position)
                .sized(entry.size)
                .maximized(entry.is_maximized),
        );
    }

    let mut groups = TabGroups::new();
    let mut group_ids: HashSet<TabGroupId> = HashSet::new();
    for entry in &snapshot.tab_groups {
        let geometry = Bounds::from_parts(entry.position, entry.size);
        let mut active = None;
        let members: Vec<Window> = entry
            .tabs
            .iter()
            .map(|tab| {
                let id = claim(&tab.id);
                if tab.id == entry.active_tab_id {
                    active = Some(id);
                }
                Window::new(id, tab.title.clone(), tab.content_kind.clone(), geometry, 0)
            })
            .collect();

        if members.len() < 2 {
            for member in members {
                store.open(
                    WindowRequest::new(member.content().clone(), member.title())
                        .with_id(member.id())
                        .at(geometry.position)
                        .sized(geometry.size),
                );
            }
            continue;
        }

        let group_id = match entry.id.parse::<TabGroupId>() {
            Ok(id) if !group_ids.contains(&id) => id,
            _ => TabGroupId::new(),
        };
        group_ids.insert(group_id);
        let z = store.bump_z();
        if let Some(group) = TabGroup::from_members(group_id, members, active, geometry, z) {
            groups.insert(group);
        }
    }

    (store, groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> (WindowStore, TabGroups, Vec<WindowId>) {
        let mut store = WindowStore::with_seed(5);
        let mut groups = TabGroups::new();
        let ids: Vec<WindowId> = ["marketData", "chart", "log", "security"]
            .iter()
            .enumerate()
            .map(|(i, kind)| {
                store.create(
                    ContentKind::from(*kind),
                    format!("w{i}"),
                    Some(Point::new(40 * i as i32, 60)),
                    Some(Size::new(500, 400)),
                )
            })
            .collect();
        groups.group(&mut store, &ids[2..]).unwrap();
        (store, groups, ids)
    }

    #[test]
    fn json_uses_camel_case_shape() {
        let (store, groups, _) = sample();
        let value = serde_json::to_value(capture(&store, &groups)).unwrap();
        let window = &value["windows"][0];
        for key in ["id", "title", "contentKind", "position", "size", "isMaximized", "isMinimized"] {
            assert!(window.get(key).is_some(), "missing {key}");
        }
        assert_eq!(window["contentKind"], "marketData");
        assert_eq!(window["size"]["width"], 500);
        let group = &value["tabGroups"][0];
        for key in ["id", "tabs", "activeTabId", "position", "size"] {
            assert!(group.get(key).is_some(), "missing {key}");
        }
        assert_eq!(group["tabs"][1]["contentKind"], "security");
    }

    #[test]
    fn rebuild_reproduces_structure_and_ids() {
        let (mut store, groups, ids) = sample();
        store.toggle_maximize(ids[1]);
        store.minimize(ids[0]);
        let snap = capture(&store, &groups);

        let (restored, restored_groups) = rebuild(&snap, WindowStore::with_seed(9));
        assert_eq!(restored.len(), 2);
        assert_eq!(restored_groups.len(), 1);
        assert!(restored.minimized().is_empty());
        assert!(restored.get(ids[1]).unwrap().is_maximized());
        assert!(!restored.get(ids[0]).unwrap().is_minimized());

        let group = restored_groups.iter().next().unwrap();
        assert_eq!(group.active_tab_id(), ids[2]);
        let kinds: Vec<&str> = group.tabs().map(|t| t.content.as_str()).collect();
        assert_eq!(kinds, vec!["log", "security"]);
        assert!(group.z_order() > restored.get(ids[1]).unwrap().z_order());
        assert_eq!(capture(&restored, &restored_groups).tab_groups, snap.tab_groups);
    }

    #[test]
    fn foreign_and_duplicate_ids_are_replaced() {
        let json = r#"{
            "windows": [
                {"id": "w-1", "title": "A", "module": "chart",
                 "position": {"x": 10, "y": 20}, "size": {"width": 50, "height": 50}},
                {"id": "w-1", "title": "B", "contentKind": "heatmap",
                 "position": {"x": 0, "y": 0}, "size": {"width": 300, "height": 300}}
            ]
        }"#;
        let snap: LayoutSnapshot = serde_json::from_str(json).unwrap();
        let (store, groups) = rebuild(&snap, WindowStore::with_seed(1));
        assert!(groups.is_empty());
        assert_eq!(store.len(), 2);
        let order = store.stacking_order();
        let titles: Vec<&str> = order.iter().map(|w| w.title()).collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert_eq!(order[0].size(), Size::new(200, 100));
        assert_eq!(order[0].content(), &ContentKind::Chart);
        assert_eq!(order[1].content(), &ContentKind::Unknown("heatmap".into()));
    }

    #[test]
    fn single_tab_group_comes_back_free() {
        let snap = LayoutSnapshot {
            windows: Vec::new(),
            tab_groups: vec![TabGroupSnapshot {
                id: "g".into(),
                tabs: vec![TabSnapshot {
                    id: "t".into(),
                    title: "Lonely".into(),
                    content_kind: ContentKind::Log,
                }],
                active_tab_id: "t".into(),
                position: Point::new(5, 6),
                size: Size::new(700, 500),
            }],
        };
        let (store, groups) = rebuild(&snap, WindowStore::with_seed(1));
        assert!(groups.is_empty());
        let w = store.iter().next().unwrap();
        assert_eq!(w.title(), "Lonely");
        assert_eq!(w.geometry(), Bounds::new(5, 6, 700, 500));
    }
}
