//! UiFrame: a thin wrapper around `ratatui::Frame` that clamps drawing to the
//! visible area, plus the grid that maps workspace pixels onto cells.
//!
//! Surfaces are painted into an offscreen buffer of their own size and then
//! composited with [`UiFrame::blit_from_signed`], which clips surfaces that
//! hang off the left or top of the terminal.
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

use crate::layout::{Bounds, Point, Viewport};

/// Signed cell rectangle: origin may sit left of or above the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatRect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

/// Pixels per terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellGrid {
    pub cell_width: i32,
    pub cell_height: i32,
}

impl CellGrid {
    pub fn new(cell_width: i32, cell_height: i32) -> Self {
        Self {
            cell_width: cell_width.max(1),
            cell_height: cell_height.max(1),
        }
    }

    /// Pixel position of the top-left corner of a cell.
    pub fn to_pixels(&self, column: u16, row: u16) -> Point {
        Point::new(
            column as i32 * self.cell_width,
            row as i32 * self.cell_height,
        )
    }

    pub fn to_cells(&self, bounds: Bounds) -> FloatRect {
        let x = bounds.left().div_euclid(self.cell_width);
        let y = bounds.top().div_euclid(self.cell_height);
        let right = bounds.right().div_euclid(self.cell_width);
        let bottom = bounds.bottom().div_euclid(self.cell_height);
        FloatRect {
            x,
            y,
            width: (right - x).clamp(0, u16::MAX as i32) as u16,
            height: (bottom - y).clamp(0, u16::MAX as i32) as u16,
        }
    }

    /// Pixel viewport for a terminal area whose top `menu_rows` rows hold
    /// the menu bar.
    pub fn viewport_for(&self, area: Rect, menu_rows: u16) -> Viewport {
        Viewport::new(
            area.width as i32 * self.cell_width,
            area.height as i32 * self.cell_height,
            menu_rows as i32 * self.cell_height,
        )
    }
}

impl Default for CellGrid {
    fn default() -> Self {
        Self::new(8, 16)
    }
}

/// Wrapper around `ratatui::Frame` that clamps drawing to the visible area.
pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    /// Construct a `UiFrame` directly from an area and buffer, e.g. an
    /// offscreen surface buffer.
    pub fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    fn clip_rect(&self, rect: Rect) -> Option<Rect> {
        let clipped = rect.intersection(self.area);
        if clipped.width == 0 || clipped.height == 0 {
            None
        } else {
            Some(clipped)
        }
    }

    pub fn render_widget<W>(&mut self, widget: W, area: Rect)
    where
        W: Widget,
    {
        if let Some(clipped) = self.clip_rect(area) {
            widget.render(clipped, self.buffer);
        }
    }

    pub fn set_string(&mut self, x: u16, y: u16, text: &str, style: Style) {
        let bounds = self.area;
        safe_set_string(self.buffer, bounds, x, y, text, style);
    }

    pub fn blit_from_signed(&mut self, src: &Buffer, dest: FloatRect) {
        let frame_x0 = self.area.x as i32;
        let frame_y0 = self.area.y as i32;
        let frame_x1 = frame_x0 + self.area.width as i32;
        let frame_y1 = frame_y0 + self.area.height as i32;
        for sy in 0..dest.height as i32 {
            let dy = dest.y + sy;
            if dy < frame_y0 || dy >= frame_y1 {
                continue;
            }
            for sx in 0..dest.width as i32 {
                let dx = dest.x + sx;
                if dx < frame_x0 || dx >= frame_x1 {
                    continue;
                }
                if let (Some(src_cell), Some(dst_cell)) = (
                    src.cell((sx as u16, sy as u16)),
                    self.buffer.cell_mut((dx as u16, dy as u16)),
                ) {
                    *dst_cell = src_cell.clone();
                }
            }
        }
    }
}

pub(crate) fn safe_set_string(
    buffer: &mut Buffer,
    bounds: Rect,
    x: u16,
    y: u16,
    text: &str,
    style: Style,
) {
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }
    let max_x = bounds.x.saturating_add(bounds.width);
    let max_y = bounds.y.saturating_add(bounds.height);
    if x < bounds.x || x >= max_x || y < bounds.y || y >= max_y {
        return;
    }
    let available = max_x.saturating_sub(x);
    if available == 0 {
        return;
    }
    let text = truncate_to_width(text, available as usize);
    buffer.set_string(x, y, text, style);
}

pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    value.chars().take(width).collect()
}
