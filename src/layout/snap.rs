//! Edge snapping for dragged surfaces.
//!
//! Zones are only a preview while the pointer is held; the resolved
//! rectangle is committed on release.

use super::{Bounds, Point, Size};
use crate::constants::{MAXIMIZE_TOP_THRESHOLD, SNAP_EDGE_THRESHOLD, SNAP_SIDE_MAX_Y};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapZone {
    #[default]
    None,
    Left,
    Right,
    Top,
    Bottom,
}

impl SnapZone {
    pub fn is_active(self) -> bool {
        self != SnapZone::None
    }
}

/// What releasing a drag at a candidate position would do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragVerdict {
    /// The top edge reached the very top of the viewport.
    Maximize,
    Snap(SnapZone),
    Free,
}

/// Snap zone for a window of `window_size` placed at `candidate`.
///
/// Checks run left, right, top, bottom; the first match wins.
pub fn detect_snap_zone(candidate: Point, window_size: Size, viewport_size: Size) -> SnapZone {
    let right_edge = candidate.x.saturating_add(window_size.width);
    let bottom_edge = candidate.y.saturating_add(window_size.height);
    let near_top_band = candidate.y < SNAP_SIDE_MAX_Y;

    if candidate.x < SNAP_EDGE_THRESHOLD && near_top_band {
        SnapZone::Left
    } else if right_edge > viewport_size.width - SNAP_EDGE_THRESHOLD && near_top_band {
        SnapZone::Right
    } else if candidate.y < SNAP_EDGE_THRESHOLD {
        SnapZone::Top
    } else if bottom_edge > viewport_size.height - SNAP_EDGE_THRESHOLD {
        SnapZone::Bottom
    } else {
        SnapZone::None
    }
}

/// Like [`detect_snap_zone`], but a top edge above the maximize line
/// pre-empts every zone.
pub fn classify_drag(candidate: Point, window_size: Size, viewport_size: Size) -> DragVerdict {
    if candidate.y < MAXIMIZE_TOP_THRESHOLD {
        return DragVerdict::Maximize;
    }
    match detect_snap_zone(candidate, window_size, viewport_size) {
        SnapZone::None => DragVerdict::Free,
        zone => DragVerdict::Snap(zone),
    }
}

/// Rectangle a surface occupies after being released in `zone`.
///
/// Side zones give half-width, full-height panes below the menu bar; top and
/// bottom give full-width, half-height panes. Sizes never drop below the
/// window minimums.
pub fn resolve_snap_geometry(
    zone: SnapZone,
    viewport_size: Size,
    menu_bar_height: i32,
) -> Option<Bounds> {
    let width = viewport_size.width;
    let remaining = viewport_size.height.saturating_sub(menu_bar_height);
    let half_width = width / 2;
    let half_height = remaining / 2;
    let bounds = match zone {
        SnapZone::None => return None,
        SnapZone::Left => Bounds::new(0, menu_bar_height, half_width, remaining),
        SnapZone::Right => Bounds::new(width - half_width, menu_bar_height, half_width, remaining),
        SnapZone::Top => Bounds::new(0, menu_bar_height, width, half_height),
        SnapZone::Bottom => Bounds::new(0, menu_bar_height + half_height, width, half_height),
    };
    Some(Bounds::from_parts(bounds.position, bounds.size.clamp_min()))
}

/// Rectangle a maximized window fills: everything below the menu bar.
pub fn maximized_geometry(viewport_size: Size, menu_bar_height: i32) -> Bounds {
    let remaining = viewport_size.height.saturating_sub(menu_bar_height);
    Bounds::from_parts(
        Point::new(0, menu_bar_height),
        Size::new(viewport_size.width, remaining).clamp_min(),
    )
}
