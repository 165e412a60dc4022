//! Pixel-space geometry shared by the floating and snap engines.
//!
//! Positions are signed because windows may be dragged partially off-screen.
//! Sizes are signed too so intermediate resize math can go negative before it
//! is floored; every stored size is clamped through [`Size::clamp_min`].

pub mod floating;
pub mod snap;

use serde::{Deserialize, Serialize};

use crate::constants::{MIN_HEIGHT, MIN_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Vector from `origin` to `self`.
    pub fn delta_from(self, origin: Point) -> Point {
        Point {
            x: self.x.saturating_sub(origin.x),
            y: self.y.saturating_sub(origin.y),
        }
    }

    pub fn offset(self, delta: Point) -> Point {
        Point {
            x: self.x.saturating_add(delta.x),
            y: self.y.saturating_add(delta.y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Floor both dimensions at the window minimums.
    pub fn clamp_min(self) -> Size {
        Size {
            width: self.width.max(MIN_WIDTH),
            height: self.height.max(MIN_HEIGHT),
        }
    }
}

impl Default for Size {
    fn default() -> Self {
        Size::new(MIN_WIDTH, MIN_HEIGHT)
    }
}

/// A positioned rectangle: the floating geometry of a window or tab group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub position: Point,
    pub size: Size,
}

impl Bounds {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            position: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub const fn from_parts(position: Point, size: Size) -> Self {
        Self { position, size }
    }

    pub fn left(&self) -> i32 {
        self.position.x
    }

    pub fn top(&self) -> i32 {
        self.position.y
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.position.x.saturating_add(self.size.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.position.y.saturating_add(self.size.height)
    }

    pub fn contains(&self, point: Point) -> bool {
        rect_contains(*self, point)
    }
}

pub fn rect_contains(rect: Bounds, point: Point) -> bool {
    if rect.size.width <= 0 || rect.size.height <= 0 {
        return false;
    }
    point.x >= rect.left() && point.x < rect.right() && point.y >= rect.top() && point.y < rect.bottom()
}

/// The visible surface windows live on.
///
/// `size` is the full viewport; `menu_bar_height` is the strip at the top
/// reserved for the application menu. Snapped and maximized windows fill the
/// space below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub size: Size,
    pub menu_bar_height: i32,
}

impl Viewport {
    pub const fn new(width: i32, height: i32, menu_bar_height: i32) -> Self {
        Self {
            size: Size::new(width, height),
            menu_bar_height,
        }
    }

    /// The area below the menu bar.
    pub fn workspace(&self) -> Bounds {
        Bounds::new(
            0,
            self.menu_bar_height,
            self.size.width,
            self.size.height.saturating_sub(self.menu_bar_height).max(0),
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::new(1920, 1080, 40)
    }
}
