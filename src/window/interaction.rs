//! Pointer interaction state machine.
//!
//! A drag or resize lives in an [`InputSession`] created on pointer-down and
//! dropped on pointer-up or pointer-cancel. Only one session exists at a
//! time, so a surface can never be dragged and resized at once. The
//! controller computes candidate geometry; committing it is the caller's job.

use std::time::{Duration, Instant};

use super::SurfaceId;
use crate::constants::DOUBLE_ACTIVATION_MS;
use crate::layout::floating::{ResizeEdge, compute_drag_position, compute_resize_geometry};
use crate::layout::snap::{DragVerdict, SnapZone, classify_drag, detect_snap_zone, resolve_snap_geometry};
use crate::layout::{Bounds, Point, Size, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Cancel,
}

/// A pointer sample in workspace pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Point,
    pub at: Instant,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, position: Point, at: Instant) -> Self {
        Self { kind, position, at }
    }

    pub fn down(position: Point, at: Instant) -> Self {
        Self::new(PointerKind::Down, position, at)
    }

    pub fn moved(position: Point, at: Instant) -> Self {
        Self::new(PointerKind::Move, position, at)
    }

    pub fn up(position: Point, at: Instant) -> Self {
        Self::new(PointerKind::Up, position, at)
    }

    pub fn cancel(position: Point, at: Instant) -> Self {
        Self::new(PointerKind::Cancel, position, at)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Dragging,
    Resizing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    pub target: SurfaceId,
    /// Surface position when the drag started.
    pub origin: Point,
    pub size: Size,
    pub pointer_start: Point,
    /// Zone armed by the latest move; committed on release.
    pub zone: SnapZone,
    /// Set once the drag crossed the maximize line; later moves are ignored.
    pub maximized: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeSession {
    pub target: SurfaceId,
    pub edge: ResizeEdge,
    pub start: Bounds,
    pub pointer_start: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSession {
    Drag(DragSession),
    Resize(ResizeSession),
}

impl InputSession {
    pub fn target(&self) -> SurfaceId {
        match self {
            InputSession::Drag(drag) => drag.target,
            InputSession::Resize(resize) => resize.target,
        }
    }
}

/// Geometry a pointer move asks the caller to commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStep {
    Ignore,
    MoveTo {
        target: SurfaceId,
        position: Point,
    },
    Resize {
        target: SurfaceId,
        geometry: Bounds,
    },
    /// Put the surface back at `restore_position`, then maximize it.
    Maximize {
        target: SurfaceId,
        restore_position: Point,
    },
}

/// What the caller commits when a session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRelease {
    /// Geometry already committed by the moves stays as is.
    Keep { target: SurfaceId },
    Snap {
        target: SurfaceId,
        zone: SnapZone,
        geometry: Bounds,
    },
    /// The drag already maximized the surface.
    Maximized { target: SurfaceId },
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    session: Option<InputSession>,
    last_header_activation: Option<(SurfaceId, Instant)>,
    double_activation: Duration,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self::with_double_activation(Duration::from_millis(DOUBLE_ACTIVATION_MS))
    }

    pub fn with_double_activation(window: Duration) -> Self {
        Self {
            session: None,
            last_header_activation: None,
            double_activation: window,
        }
    }

    pub fn state(&self) -> InteractionState {
        match self.session {
            None => InteractionState::Idle,
            Some(InputSession::Drag(_)) => InteractionState::Dragging,
            Some(InputSession::Resize(_)) => InteractionState::Resizing,
        }
    }

    pub fn session(&self) -> Option<&InputSession> {
        self.session.as_ref()
    }

    /// The zone a release would snap into right now.
    pub fn snap_preview(&self) -> Option<(SurfaceId, SnapZone)> {
        match self.session {
            Some(InputSession::Drag(drag)) if drag.zone.is_active() => Some((drag.target, drag.zone)),
            _ => None,
        }
    }

    /// Record a header activation. Returns `true` when it completes a double
    /// activation on the same surface; the tracker is then reset so a third
    /// activation starts over.
    pub fn register_header_activation(&mut self, target: SurfaceId, at: Instant) -> bool {
        if let Some((prev_target, prev_at)) = self.last_header_activation
            && prev_target == target
            && at.saturating_duration_since(prev_at) <= self.double_activation
        {
            self.last_header_activation = None;
            return true;
        }
        self.last_header_activation = Some((target, at));
        false
    }

    pub fn clear_header_activation(&mut self) {
        self.last_header_activation = None;
    }

    pub fn begin_drag(&mut self, target: SurfaceId, geometry: Bounds, pointer: Point) {
        self.session = Some(InputSession::Drag(DragSession {
            target,
            origin: geometry.position,
            size: geometry.size,
            pointer_start: pointer,
            zone: SnapZone::None,
            maximized: false,
        }));
        tracing::trace!(surface = %target, "drag started");
    }

    pub fn begin_resize(&mut self, target: SurfaceId, edge: ResizeEdge, start: Bounds, pointer: Point) {
        self.session = Some(InputSession::Resize(ResizeSession {
            target,
            edge,
            start,
            pointer_start: pointer,
        }));
        tracing::trace!(surface = %target, %edge, "resize started");
    }

    /// Advance the active session. `can_maximize` is false for surfaces
    /// without a maximized state; for those the maximize line falls through
    /// to ordinary snapping.
    pub fn pointer_moved(&mut self, pointer: Point, viewport: Size, can_maximize: bool) -> SessionStep {
        match self.session.as_mut() {
            None => SessionStep::Ignore,
            Some(InputSession::Drag(drag)) => {
                if drag.maximized {
                    return SessionStep::Ignore;
                }
                let candidate = compute_drag_position(drag.origin, pointer.delta_from(drag.pointer_start));
                match classify_drag(candidate, drag.size, viewport) {
                    DragVerdict::Maximize if can_maximize => {
                        drag.maximized = true;
                        drag.zone = SnapZone::None;
                        return SessionStep::Maximize {
                            target: drag.target,
                            restore_position: drag.origin,
                        };
                    }
                    DragVerdict::Maximize => {
                        drag.zone = detect_snap_zone(candidate, drag.size, viewport);
                    }
                    DragVerdict::Snap(zone) => drag.zone = zone,
                    DragVerdict::Free => drag.zone = SnapZone::None,
                }
                SessionStep::MoveTo {
                    target: drag.target,
                    position: candidate,
                }
            }
            Some(InputSession::Resize(resize)) => {
                let delta = pointer.delta_from(resize.pointer_start);
                SessionStep::Resize {
                    target: resize.target,
                    geometry: compute_resize_geometry(
                        resize.edge,
                        delta,
                        resize.start.size,
                        resize.start.position,
                    ),
                }
            }
        }
    }

    /// End the active session on pointer-up.
    pub fn pointer_released(&mut self, viewport: Viewport) -> Option<SessionRelease> {
        let session = self.session.take()?;
        let release = match session {
            InputSession::Drag(drag) if drag.maximized => SessionRelease::Maximized { target: drag.target },
            InputSession::Drag(drag) => {
                match resolve_snap_geometry(drag.zone, viewport.size, viewport.menu_bar_height) {
                    Some(geometry) => SessionRelease::Snap {
                        target: drag.target,
                        zone: drag.zone,
                        geometry,
                    },
                    None => SessionRelease::Keep { target: drag.target },
                }
            }
            InputSession::Resize(resize) => SessionRelease::Keep { target: resize.target },
        };
        tracing::trace!(?release, "session released");
        Some(release)
    }

    /// End the active session without snapping, e.g. on pointer-cancel or
    /// when the surface disappeared mid-drag.
    pub fn cancel(&mut self) -> Option<InputSession> {
        self.session.take()
    }

    /// Drop any state that refers to `target`.
    pub fn forget(&mut self, target: SurfaceId) {
        if self.session.is_some_and(|s| s.target() == target) {
            self.session = None;
        }
        if self.last_header_activation.is_some_and(|(id, _)| id == target) {
            self.last_header_activation = None;
        }
    }
}
