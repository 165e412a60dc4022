//! Surface chrome: where the header, controls and tabs sit, and how the
//! frame is painted in the terminal.
//!
//! [`Chrome`] is unit-agnostic. The window manager hit-tests with a
//! pixel-scaled copy while the decorator paints with [`Chrome::cells`], so
//! both agree on the layout by construction.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use super::window_manager::{SurfaceDraw, SurfaceKind};
use crate::layout::{Bounds, Point, Size, rect_contains};
use crate::theme;
use crate::ui::{CellGrid, UiFrame};

/// What a pointer-down on a surface header asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    Minimize,
    Maximize,
    Close,
    Tab(usize),
    Drag,
    None,
}

/// Header buttons of a free window, left to right.
pub const WINDOW_CONTROLS: [HeaderAction; 3] =
    [HeaderAction::Minimize, HeaderAction::Maximize, HeaderAction::Close];

/// Tab groups cannot minimize or maximize.
pub const GROUP_CONTROLS: [HeaderAction; 1] = [HeaderAction::Close];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chrome {
    /// Border thickness: width on the sides, height top and bottom.
    pub border: Size,
    pub header_height: i32,
    pub control_width: i32,
    pub tab_width: i32,
}

impl Chrome {
    /// Layout in terminal cells.
    pub const fn cells() -> Self {
        Self {
            border: Size::new(1, 1),
            header_height: 1,
            control_width: 3,
            tab_width: 16,
        }
    }

    /// The cell layout scaled to pixels.
    pub fn for_cells(grid: CellGrid) -> Self {
        let cells = Self::cells();
        Self {
            border: Size::new(
                cells.border.width * grid.cell_width,
                cells.border.height * grid.cell_height,
            ),
            header_height: cells.header_height * grid.cell_height,
            control_width: cells.control_width * grid.cell_width,
            tab_width: cells.tab_width * grid.cell_width,
        }
    }

    pub fn header_rect(&self, outer: Bounds) -> Bounds {
        Bounds::new(
            outer.left() + self.border.width,
            outer.top() + self.border.height,
            (outer.size.width - self.border.width * 2).max(0),
            self.header_height,
        )
    }

    pub fn content_rect(&self, outer: Bounds) -> Bounds {
        let top = outer.top() + self.border.height + self.header_height;
        Bounds::new(
            outer.left() + self.border.width,
            top,
            (outer.size.width - self.border.width * 2).max(0),
            (outer.bottom() - self.border.height - top).max(0),
        )
    }

    /// Button rectangles, right-aligned in the header.
    pub fn control_rects(&self, outer: Bounds, controls: &[HeaderAction]) -> Vec<(HeaderAction, Bounds)> {
        let header = self.header_rect(outer);
        let count = controls.len() as i32;
        let start = header.right() - self.control_width * count;
        controls
            .iter()
            .enumerate()
            .map(|(idx, action)| {
                let x = start + self.control_width * idx as i32;
                (*action, Bounds::new(x, header.top(), self.control_width, header.size.height))
            })
            .filter(|(_, rect)| rect.left() >= header.left())
            .collect()
    }

    /// Tab rectangles from the left of the header, shrunk to fit before the
    /// controls.
    pub fn tab_rects(&self, outer: Bounds, tabs: usize, controls: usize) -> Vec<Bounds> {
        if tabs == 0 {
            return Vec::new();
        }
        let header = self.header_rect(outer);
        let available = header.size.width - self.control_width * controls as i32;
        let width = (available / tabs as i32).min(self.tab_width);
        if width <= 0 {
            return Vec::new();
        }
        (0..tabs)
            .map(|idx| Bounds::new(header.left() + width * idx as i32, header.top(), width, header.size.height))
            .collect()
    }

    pub fn hit_header(&self, outer: Bounds, point: Point, controls: &[HeaderAction], tabs: usize) -> HeaderAction {
        if !rect_contains(self.header_rect(outer), point) {
            return HeaderAction::None;
        }
        if let Some((action, _)) = self
            .control_rects(outer, controls)
            .into_iter()
            .find(|(_, rect)| rect_contains(*rect, point))
        {
            return action;
        }
        if let Some(idx) = self
            .tab_rects(outer, tabs, controls.len())
            .iter()
            .position(|rect| rect_contains(*rect, point))
        {
            return HeaderAction::Tab(idx);
        }
        HeaderAction::Drag
    }
}

impl Default for Chrome {
    fn default() -> Self {
        Self::for_cells(CellGrid::default())
    }
}

fn to_rect(bounds: Bounds) -> Rect {
    Rect::new(
        bounds.left().max(0) as u16,
        bounds.top().max(0) as u16,
        bounds.size.width.max(0) as u16,
        bounds.size.height.max(0) as u16,
    )
}

/// Paints the frame of one surface into its own offscreen buffer.
pub trait WindowDecorator: std::fmt::Debug {
    /// `frame` covers exactly the surface, origin at (0, 0). Returns the
    /// content area left for the body.
    fn render_surface(&self, frame: &mut UiFrame<'_>, draw: &SurfaceDraw<'_>) -> Rect;
}

#[derive(Debug, Default)]
pub struct DefaultDecorator;

impl WindowDecorator for DefaultDecorator {
    fn render_surface(&self, frame: &mut UiFrame<'_>, draw: &SurfaceDraw<'_>) -> Rect {
        let area = frame.area();
        let chrome = Chrome::cells();
        let outer = Bounds::new(0, 0, area.width as i32, area.height as i32);

        let header_style = if draw.focused {
            Style::default()
                .bg(theme::decorator_header_bg())
                .fg(theme::decorator_header_fg())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .bg(theme::decorator_border())
                .fg(theme::decorator_header_fg())
        };
        let border_style = Style::default().fg(theme::decorator_border());

        let right = area.width.saturating_sub(1);
        let bottom = area.height.saturating_sub(1);
        let buffer = frame.buffer_mut();
        for y in 0..area.height {
            for x in 0..area.width {
                let symbol = match (x, y) {
                    (0, 0) => "┌",
                    (x, 0) if x == right => "┐",
                    (0, y) if y == bottom => "└",
                    (x, y) if x == right && y == bottom => "┘",
                    (_, 0) => "─",
                    (_, y) if y == bottom => "─",
                    (0, _) => "│",
                    (x, _) if x == right => "│",
                    _ => continue,
                };
                if let Some(cell) = buffer.cell_mut((x, y)) {
                    cell.set_symbol(symbol);
                    cell.set_style(border_style);
                }
            }
        }

        let header = to_rect(chrome.header_rect(outer));
        for x in header.x..header.x.saturating_add(header.width) {
            if let Some(cell) = buffer.cell_mut((x, header.y)) {
                cell.set_symbol(" ");
                cell.set_style(header_style);
            }
        }

        let controls: &[HeaderAction] = match draw.kind {
            SurfaceKind::Window(_) => &WINDOW_CONTROLS,
            SurfaceKind::Group(_) => &GROUP_CONTROLS,
        };
        match draw.kind {
            SurfaceKind::Window(window) => {
                frame.set_string(header.x.saturating_add(1), header.y, window.title(), header_style);
            }
            SurfaceKind::Group(group) => {
                let active = group.active_index();
                let rects = chrome.tab_rects(outer, group.len(), controls.len());
                for (idx, (tab, rect)) in group.tabs().zip(rects).enumerate() {
                    let rect = to_rect(rect);
                    let style = if idx == active {
                        header_style.add_modifier(Modifier::REVERSED)
                    } else {
                        header_style
                    };
                    let label = crate::ui::truncate_to_width(
                        &format!(" {} ", tab.title),
                        rect.width as usize,
                    );
                    frame.set_string(rect.x, rect.y, &label, style);
                }
            }
        }

        let maximized = matches!(draw.kind, SurfaceKind::Window(w) if w.is_maximized());
        for (action, rect) in chrome.control_rects(outer, controls) {
            let rect = to_rect(rect);
            let glyph = match action {
                HeaderAction::Minimize => "[_]",
                HeaderAction::Maximize if maximized => "[=]",
                HeaderAction::Maximize => "[^]",
                HeaderAction::Close => "[x]",
                _ => continue,
            };
            frame.set_string(rect.x, rect.y, glyph, header_style);
        }

        to_rect(chrome.content_rect(outer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px() -> Chrome {
        Chrome::for_cells(CellGrid::new(8, 16))
    }

    #[test]
    fn header_sits_below_top_border() {
        let chrome = px();
        let outer = Bounds::new(100, 100, 400, 300);
        assert_eq!(chrome.header_rect(outer), Bounds::new(108, 116, 384, 16));
        assert_eq!(chrome.content_rect(outer), Bounds::new(108, 132, 384, 252));
    }

    #[test]
    fn controls_are_right_aligned() {
        let chrome = px();
        let outer = Bounds::new(0, 0, 400, 300);
        let rects = chrome.control_rects(outer, &WINDOW_CONTROLS);
        assert_eq!(rects.len(), 3);
        assert_eq!(rects[2], (HeaderAction::Close, Bounds::new(368, 16, 24, 16)));
        assert_eq!(rects[0].0, HeaderAction::Minimize);
    }

    #[test]
    fn hit_header_distinguishes_controls_tabs_and_drag() {
        let chrome = px();
        let outer = Bounds::new(0, 0, 400, 300);
        assert_eq!(chrome.hit_header(outer, Point::new(380, 20), &WINDOW_CONTROLS, 0), HeaderAction::Close);
        assert_eq!(chrome.hit_header(outer, Point::new(330, 20), &WINDOW_CONTROLS, 0), HeaderAction::Minimize);
        assert_eq!(chrome.hit_header(outer, Point::new(50, 20), &WINDOW_CONTROLS, 0), HeaderAction::Drag);
        assert_eq!(chrome.hit_header(outer, Point::new(50, 4), &WINDOW_CONTROLS, 0), HeaderAction::None);
        assert_eq!(chrome.hit_header(outer, Point::new(50, 40), &WINDOW_CONTROLS, 0), HeaderAction::None);

        assert_eq!(chrome.hit_header(outer, Point::new(20, 20), &GROUP_CONTROLS, 2), HeaderAction::Tab(0));
        assert_eq!(chrome.hit_header(outer, Point::new(140, 20), &GROUP_CONTROLS, 2), HeaderAction::Tab(1));
        assert_eq!(chrome.hit_header(outer, Point::new(300, 20), &GROUP_CONTROLS, 2), HeaderAction::Drag);
    }

    #[test]
    fn tabs_shrink_to_fit() {
        let chrome = Chrome::cells();
        let outer = Bounds::new(0, 0, 30, 10);
        let tabs = chrome.tab_rects(outer, 4, 1);
        // 28 header cells, 3 for the close button
        assert!(tabs.iter().all(|t| t.size.width == 6));
        assert!(chrome.tab_rects(outer, 0, 1).is_empty());
    }
}
