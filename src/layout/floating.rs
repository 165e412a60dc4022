use std::fmt;
use std::str::FromStr;

use super::{Bounds, Point, Size, rect_contains};

/// One of the eight compass resize handles around a floating surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeEdge {
    pub const ALL: [ResizeEdge; 8] = [
        ResizeEdge::NorthWest,
        ResizeEdge::NorthEast,
        ResizeEdge::SouthWest,
        ResizeEdge::SouthEast,
        ResizeEdge::North,
        ResizeEdge::South,
        ResizeEdge::West,
        ResizeEdge::East,
    ];

    pub fn has_north(self) -> bool {
        matches!(
            self,
            ResizeEdge::North | ResizeEdge::NorthEast | ResizeEdge::NorthWest
        )
    }

    pub fn has_south(self) -> bool {
        matches!(
            self,
            ResizeEdge::South | ResizeEdge::SouthEast | ResizeEdge::SouthWest
        )
    }

    pub fn has_east(self) -> bool {
        matches!(
            self,
            ResizeEdge::East | ResizeEdge::NorthEast | ResizeEdge::SouthEast
        )
    }

    pub fn has_west(self) -> bool {
        matches!(
            self,
            ResizeEdge::West | ResizeEdge::NorthWest | ResizeEdge::SouthWest
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResizeEdge::North => "n",
            ResizeEdge::South => "s",
            ResizeEdge::East => "e",
            ResizeEdge::West => "w",
            ResizeEdge::NorthEast => "ne",
            ResizeEdge::NorthWest => "nw",
            ResizeEdge::SouthEast => "se",
            ResizeEdge::SouthWest => "sw",
        }
    }
}

impl fmt::Display for ResizeEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownResizeEdge(pub String);

impl fmt::Display for UnknownResizeEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown resize direction {:?}", self.0)
    }
}

impl std::error::Error for UnknownResizeEdge {}

impl FromStr for ResizeEdge {
    type Err = UnknownResizeEdge;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let edge = match s.to_ascii_lowercase().as_str() {
            "n" => ResizeEdge::North,
            "s" => ResizeEdge::South,
            "e" => ResizeEdge::East,
            "w" => ResizeEdge::West,
            "ne" | "en" => ResizeEdge::NorthEast,
            "nw" | "wn" => ResizeEdge::NorthWest,
            "se" | "es" => ResizeEdge::SouthEast,
            "sw" | "ws" => ResizeEdge::SouthWest,
            _ => return Err(UnknownResizeEdge(s.to_string())),
        };
        Ok(edge)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeHandle<R: Copy + Eq> {
    pub id: R,
    pub rect: Bounds,
    pub edge: ResizeEdge,
}

/// Translate `origin` by the pointer delta. No clamping: windows may be
/// dragged partially off-screen.
pub fn compute_drag_position(origin: Point, pointer_delta: Point) -> Point {
    origin.offset(pointer_delta)
}

/// Geometry of a surface while one of its handles is dragged.
///
/// Width responds to `e`/`w`, height to `n`/`s`. The `w` and `n` handles also
/// move the origin so the opposite edge stays put. Size is floored at the
/// minimums while the origin follows the raw delta; the two are clamped
/// independently.
pub fn compute_resize_geometry(
    edge: ResizeEdge,
    pointer_delta: Point,
    start_size: Size,
    start_position: Point,
) -> Bounds {
    let dx = pointer_delta.x;
    let dy = pointer_delta.y;
    let mut position = start_position;
    let mut size = start_size;

    if edge.has_east() {
        size.width = start_size.width.saturating_add(dx);
    } else if edge.has_west() {
        size.width = start_size.width.saturating_sub(dx);
        position.x = start_position.x.saturating_add(dx);
    }
    if edge.has_south() {
        size.height = start_size.height.saturating_add(dy);
    } else if edge.has_north() {
        size.height = start_size.height.saturating_sub(dy);
        position.y = start_position.y.saturating_add(dy);
    }

    Bounds::from_parts(position, size.clamp_min())
}

/// Hit regions for the eight handles on the border ring of `rect`.
///
/// `thickness` is the border width (horizontal) and height (vertical). The
/// corners come first so they win over the edges they overlap.
pub fn resize_handles_for_bounds<R: Copy + Eq>(
    id: R,
    rect: Bounds,
    thickness: Size,
) -> Vec<ResizeHandle<R>> {
    let mut handles = Vec::with_capacity(8);
    let tw = thickness.width.max(1);
    let th = thickness.height.max(1);
    if rect.size.width < tw * 2 || rect.size.height < th * 2 {
        return handles;
    }
    let left = rect.left();
    let top = rect.top();
    let right = rect.right() - tw;
    let bottom = rect.bottom() - th;
    let inner_w = rect.size.width - tw * 2;
    let inner_h = rect.size.height - th * 2;

    for edge in ResizeEdge::ALL {
        let region = match edge {
            ResizeEdge::NorthWest => Bounds::new(left, top, tw, th),
            ResizeEdge::NorthEast => Bounds::new(right, top, tw, th),
            ResizeEdge::SouthWest => Bounds::new(left, bottom, tw, th),
            ResizeEdge::SouthEast => Bounds::new(right, bottom, tw, th),
            ResizeEdge::North => Bounds::new(left + tw, top, inner_w, th),
            ResizeEdge::South => Bounds::new(left + tw, bottom, inner_w, th),
            ResizeEdge::West => Bounds::new(left, top + th, tw, inner_h),
            ResizeEdge::East => Bounds::new(right, top + th, tw, inner_h),
        };
        if region.size.width > 0 && region.size.height > 0 {
            handles.push(ResizeHandle {
                id,
                rect: region,
                edge,
            });
        }
    }
    handles
}

/// The handle under `point`, if any.
pub fn hit_resize_handle<R: Copy + Eq>(
    handles: &[ResizeHandle<R>],
    point: Point,
) -> Option<ResizeHandle<R>> {
    handles
        .iter()
        .find(|handle| rect_contains(handle.rect, point))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MIN_HEIGHT, MIN_WIDTH};

    #[test]
    fn drag_is_plain_translation() {
        let pos = compute_drag_position(Point::new(100, 100), Point::new(-250, 40));
        assert_eq!(pos, Point::new(-150, 140));
    }

    #[test]
    fn resize_north_drag_down_keeps_bottom_edge() {
        let res = compute_resize_geometry(
            ResizeEdge::North,
            Point::new(0, 5),
            Size::new(400, 300),
            Point::new(0, 50),
        );
        assert_eq!(res, Bounds::new(0, 55, 400, 295));
        assert_eq!(res.bottom(), 350);
    }

    #[test]
    fn resize_north_drag_up_grows() {
        let res = compute_resize_geometry(
            ResizeEdge::North,
            Point::new(0, -5),
            Size::new(400, 300),
            Point::new(0, 50),
        );
        assert_eq!(res, Bounds::new(0, 45, 400, 305));
    }

    #[test]
    fn resize_south_east_ignores_position() {
        let res = compute_resize_geometry(
            ResizeEdge::SouthEast,
            Point::new(30, -20),
            Size::new(400, 300),
            Point::new(10, 10),
        );
        assert_eq!(res, Bounds::new(10, 10, 430, 280));
    }

    #[test]
    fn resize_east_only_touches_width() {
        let res = compute_resize_geometry(
            ResizeEdge::East,
            Point::new(25, 999),
            Size::new(400, 300),
            Point::new(10, 10),
        );
        assert_eq!(res, Bounds::new(10, 10, 425, 300));
    }

    #[test]
    fn resize_west_clamps_size_but_follows_delta() {
        let res = compute_resize_geometry(
            ResizeEdge::West,
            Point::new(700, 0),
            Size::new(800, 600),
            Point::new(-8, 10),
        );
        assert_eq!(res.size.width, MIN_WIDTH);
        assert_eq!(res.position.x, 692);
        assert_eq!(res.position.y, 10);
        assert_eq!(res.size.height, 600);
    }

    #[test]
    fn resize_north_west_clamps_both_axes() {
        let res = compute_resize_geometry(
            ResizeEdge::NorthWest,
            Point::new(1000, 1000),
            Size::new(300, 300),
            Point::new(0, 0),
        );
        assert_eq!(res.size, Size::new(MIN_WIDTH, MIN_HEIGHT));
        assert_eq!(res.position, Point::new(1000, 1000));
    }

    #[test]
    fn edge_parses_compass_letters() {
        assert_eq!("se".parse::<ResizeEdge>(), Ok(ResizeEdge::SouthEast));
        assert_eq!("NW".parse::<ResizeEdge>(), Ok(ResizeEdge::NorthWest));
        assert_eq!("w".parse::<ResizeEdge>(), Ok(ResizeEdge::West));
        assert!("x".parse::<ResizeEdge>().is_err());
        for edge in ResizeEdge::ALL {
            assert_eq!(edge.as_str().parse::<ResizeEdge>(), Ok(edge));
        }
    }

    #[test]
    fn handles_cover_border_ring() {
        let rect = Bounds::new(100, 100, 400, 300);
        let handles = resize_handles_for_bounds(7u8, rect, Size::new(8, 16));
        assert_eq!(handles.len(), 8);
        let at = |x, y| hit_resize_handle(&handles, Point::new(x, y)).map(|h| h.edge);
        assert_eq!(at(100, 100), Some(ResizeEdge::NorthWest));
        assert_eq!(at(499, 100), Some(ResizeEdge::NorthEast));
        assert_eq!(at(100, 399), Some(ResizeEdge::SouthWest));
        assert_eq!(at(499, 399), Some(ResizeEdge::SouthEast));
        assert_eq!(at(300, 100), Some(ResizeEdge::North));
        assert_eq!(at(300, 390), Some(ResizeEdge::South));
        assert_eq!(at(103, 250), Some(ResizeEdge::West));
        assert_eq!(at(495, 250), Some(ResizeEdge::East));
        assert_eq!(at(300, 250), None);
    }
}
