use std::time::Instant;

use crossterm::event::{Event, MouseButton, MouseEventKind};

use crate::layout::Point;
use crate::ui::CellGrid;
use crate::window::PointerEvent;

/// Turns terminal mouse reports into workspace pointer samples.
///
/// Only the left button drives windows. A button-less move is dropped, and
/// losing terminal focus mid-gesture becomes a cancel at the last position.
#[derive(Debug, Clone, Copy)]
pub struct PointerTranslator {
    grid: CellGrid,
    pressed: bool,
    last: Point,
}

impl PointerTranslator {
    pub fn new(grid: CellGrid) -> Self {
        Self {
            grid,
            pressed: false,
            last: Point::new(0, 0),
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Abandon a held gesture, e.g. on Esc.
    pub fn cancel(&mut self, at: Instant) -> Option<PointerEvent> {
        if !self.pressed {
            return None;
        }
        self.pressed = false;
        Some(PointerEvent::cancel(self.last, at))
    }

    pub fn translate(&mut self, event: &Event, at: Instant) -> Option<PointerEvent> {
        match event {
            Event::Mouse(mouse) => {
                let position = self.grid.to_pixels(mouse.column, mouse.row);
                match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        self.pressed = true;
                        self.last = position;
                        Some(PointerEvent::down(position, at))
                    }
                    MouseEventKind::Drag(MouseButton::Left) if self.pressed => {
                        self.last = position;
                        Some(PointerEvent::moved(position, at))
                    }
                    MouseEventKind::Up(MouseButton::Left) if self.pressed => {
                        self.pressed = false;
                        self.last = position;
                        Some(PointerEvent::up(position, at))
                    }
                    _ => None,
                }
            }
            Event::FocusLost => self.cancel(at),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::PointerKind;
    use crossterm::event::{KeyModifiers, MouseEvent};

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn left_gesture_maps_to_pixels() {
        let mut tr = PointerTranslator::new(CellGrid::new(8, 16));
        let now = Instant::now();
        let down = tr
            .translate(&mouse(MouseEventKind::Down(MouseButton::Left), 3, 2), now)
            .unwrap();
        assert_eq!(down.kind, PointerKind::Down);
        assert_eq!(down.position, Point::new(24, 32));

        let drag = tr
            .translate(&mouse(MouseEventKind::Drag(MouseButton::Left), 5, 2), now)
            .unwrap();
        assert_eq!(drag.kind, PointerKind::Move);
        assert_eq!(drag.position, Point::new(40, 32));

        let up = tr
            .translate(&mouse(MouseEventKind::Up(MouseButton::Left), 5, 3), now)
            .unwrap();
        assert_eq!(up.kind, PointerKind::Up);
        assert!(!tr.is_pressed());
    }

    #[test]
    fn hover_and_other_buttons_are_ignored() {
        let mut tr = PointerTranslator::new(CellGrid::default());
        let now = Instant::now();
        assert!(tr.translate(&mouse(MouseEventKind::Moved, 1, 1), now).is_none());
        assert!(
            tr.translate(&mouse(MouseEventKind::Down(MouseButton::Right), 1, 1), now)
                .is_none()
        );
        assert!(
            tr.translate(&mouse(MouseEventKind::Up(MouseButton::Left), 1, 1), now)
                .is_none()
        );
    }

    #[test]
    fn focus_loss_cancels_only_while_pressed() {
        let mut tr = PointerTranslator::new(CellGrid::default());
        let now = Instant::now();
        assert!(tr.translate(&Event::FocusLost, now).is_none());
        tr.translate(&mouse(MouseEventKind::Down(MouseButton::Left), 2, 2), now);
        let cancel = tr.translate(&Event::FocusLost, now).unwrap();
        assert_eq!(cancel.kind, PointerKind::Cancel);
        assert_eq!(cancel.position, Point::new(16, 32));
        assert!(!tr.is_pressed());
    }
}
