pub mod decorator;
pub mod interaction;
pub mod store;
pub mod tab_group;

mod window_manager;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::layout::{Bounds, Point, Size};

/// Opaque identifier of a managed window, stable for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(Uuid);

impl WindowId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WindowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for WindowId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabGroupId(Uuid);

impl TabGroupId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TabGroupId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TabGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TabGroupId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Names the content provider that renders a window body.
///
/// The window manager only stores and forwards this; rendering is the
/// content provider's business. Kinds this build does not know survive a
/// snapshot round trip as `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContentKind {
    MarketData,
    Chart,
    Log,
    Security,
    Unknown(String),
}

impl ContentKind {
    pub fn as_str(&self) -> &str {
        match self {
            ContentKind::MarketData => "marketData",
            ContentKind::Chart => "chart",
            ContentKind::Log => "log",
            ContentKind::Security => "security",
            ContentKind::Unknown(other) => other.as_str(),
        }
    }
}

impl From<&str> for ContentKind {
    fn from(value: &str) -> Self {
        match value {
            "marketData" => ContentKind::MarketData,
            "chart" => ContentKind::Chart,
            "log" => ContentKind::Log,
            "security" => ContentKind::Security,
            other => ContentKind::Unknown(other.to_string()),
        }
    }
}

impl From<String> for ContentKind {
    fn from(value: String) -> Self {
        ContentKind::from(value.as_str())
    }
}

impl From<ContentKind> for String {
    fn from(value: ContentKind) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One managed window.
///
/// `geometry` is the floating rectangle. Maximizing never overwrites it; the
/// maximized rectangle is derived from the viewport at render time, so
/// un-maximizing returns to exactly this geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    id: WindowId,
    title: String,
    content: ContentKind,
    geometry: Bounds,
    z_order: u64,
    minimized: bool,
    maximized: bool,
}

impl Window {
    pub(crate) fn new(
        id: WindowId,
        title: String,
        content: ContentKind,
        geometry: Bounds,
        z_order: u64,
    ) -> Self {
        Self {
            id,
            title,
            content,
            geometry: Bounds::from_parts(geometry.position, geometry.size.clamp_min()),
            z_order,
            minimized: false,
            maximized: false,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &ContentKind {
        &self.content
    }

    pub fn position(&self) -> Point {
        self.geometry.position
    }

    pub fn size(&self) -> Size {
        self.geometry.size
    }

    /// Floating geometry, retained while maximized.
    pub fn geometry(&self) -> Bounds {
        self.geometry
    }

    pub fn z_order(&self) -> u64 {
        self.z_order
    }

    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    pub fn is_maximized(&self) -> bool {
        self.maximized
    }

    pub(crate) fn set_geometry(&mut self, geometry: Bounds) {
        self.geometry = Bounds::from_parts(geometry.position, geometry.size.clamp_min());
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.geometry.position = position;
    }

    pub(crate) fn set_z_order(&mut self, z: u64) {
        self.z_order = z;
    }

    pub(crate) fn set_minimized(&mut self, minimized: bool) {
        self.minimized = minimized;
    }

    pub(crate) fn set_maximized(&mut self, maximized: bool) {
        self.maximized = maximized;
    }

    pub(crate) fn minimized_entry(&self) -> MinimizedEntry {
        MinimizedEntry {
            window_id: self.id,
            title: self.title.clone(),
            content: self.content.clone(),
        }
    }
}

/// Dock record for a minimized window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinimizedEntry {
    pub window_id: WindowId,
    pub title: String,
    pub content: ContentKind,
}

/// Anything that floats on the workspace and takes pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SurfaceId {
    Window(WindowId),
    Group(TabGroupId),
}

impl SurfaceId {
    pub fn as_window(self) -> Option<WindowId> {
        match self {
            SurfaceId::Window(id) => Some(id),
            SurfaceId::Group(_) => None,
        }
    }

    pub fn as_group(self) -> Option<TabGroupId> {
        match self {
            SurfaceId::Group(id) => Some(id),
            SurfaceId::Window(_) => None,
        }
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceId::Window(id) => write!(f, "window:{id}"),
            SurfaceId::Group(id) => write!(f, "group:{id}"),
        }
    }
}

pub use decorator::{Chrome, DefaultDecorator, WindowDecorator};
pub use interaction::{InputSession, InteractionController, InteractionState, PointerEvent, PointerKind};
pub use store::{WindowRequest, WindowStore, ZCounter};
pub use tab_group::{TabGroup, TabGroups, TabView};
pub use window_manager::{SurfaceDraw, SurfaceKind, WindowManager, launcher_request};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_kind_round_trips_known_and_unknown() {
        for raw in ["marketData", "chart", "log", "security", "heatmap"] {
            let kind = ContentKind::from(raw);
            assert_eq!(kind.as_str(), raw);
        }
        assert_eq!(ContentKind::from("heatmap"), ContentKind::Unknown("heatmap".into()));
    }

    #[test]
    fn content_kind_serializes_as_plain_string() {
        let json = serde_json::to_string(&ContentKind::MarketData).unwrap();
        assert_eq!(json, "\"marketData\"");
        let back: ContentKind = serde_json::from_str("\"news\"").unwrap();
        assert_eq!(back, ContentKind::Unknown("news".into()));
    }

    #[test]
    fn window_ids_parse_from_display() {
        let id = WindowId::new();
        assert_eq!(id.to_string().parse::<WindowId>().unwrap(), id);
        assert!("not-a-uuid".parse::<WindowId>().is_err());
    }

    #[test]
    fn new_window_floors_size() {
        let w = Window::new(
            WindowId::new(),
            "t".into(),
            ContentKind::Chart,
            Bounds::new(0, 0, 10, 10),
            1,
        );
        assert_eq!(w.size(), Size::new(200, 100));
    }
}
