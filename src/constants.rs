//! Shared crate-wide constants.
//!
//! All geometry values are in pixel-equivalent units. The terminal host maps
//! them onto cells through `config::WorkspaceConfig::cell_width` and
//! `cell_height`; the window-manager core never sees cells.

/// Smallest width any window or tab group may have.
pub const MIN_WIDTH: i32 = 200;

/// Smallest height any window or tab group may have.
pub const MIN_HEIGHT: i32 = 100;

/// Distance from a viewport edge inside which a dragged window arms a snap zone.
pub const SNAP_EDGE_THRESHOLD: i32 = 20;

/// The left/right snap zones only arm while the window top is above this line.
pub const SNAP_SIDE_MAX_Y: i32 = 100;

/// Dragging the window top above this line maximizes it instead of snapping.
pub const MAXIMIZE_TOP_THRESHOLD: i32 = 5;

/// Size given to windows opened without an explicit size.
pub const DEFAULT_WINDOW_WIDTH: i32 = 800;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 600;

/// Origin of windows opened without an explicit position, before jitter.
pub const DEFAULT_WINDOW_X: i32 = 50;
pub const DEFAULT_WINDOW_Y: i32 = 50;

/// Upper bound (exclusive) of the random offset added to each axis of a
/// default origin so sequential opens do not stack exactly.
pub const DEFAULT_POSITION_JITTER: i32 = 120;

/// Two header activations closer together than this toggle maximize.
pub const DOUBLE_ACTIVATION_MS: u64 = 500;
