//! Menu bar along the top row and minimized-window dock along the bottom.
//!
//! Rendering records the cell rectangle of every clickable chunk; hit tests
//! answer against the rectangles of the last frame, in cell coordinates.

use std::time::{Duration, Instant};

use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};

use crate::theme;
use crate::ui::{UiFrame, safe_set_string, truncate_to_width};
use crate::window::{ContentKind, MinimizedEntry, WindowId};

/// How long a notification stays in the menu bar.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Module launchers shown in the menu bar, in order.
pub const LAUNCHERS: [(ContentKind, &str); 4] = [
    (ContentKind::MarketData, "Market Data"),
    (ContentKind::Chart, "Charts"),
    (ContentKind::Log, "Logs"),
    (ContentKind::Security, "Security"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    Launch(ContentKind),
    Save,
    Load,
    Quit,
    Restore(WindowId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub severity: Severity,
    expires_at: Instant,
}

#[derive(Debug, Clone)]
struct PanelHit {
    action: PanelAction,
    rect: Rect,
}

#[derive(Debug, Clone, Copy)]
struct PanelMenuHit {
    index: usize,
    rect: Rect,
}

#[derive(Debug, Default)]
struct Dropdown {
    anchor: Option<Rect>,
    bounds: Option<Rect>,
    item_hits: Vec<PanelMenuHit>,
}

#[derive(Debug, Default)]
pub struct Panel {
    area: Rect,
    bottom_area: Rect,
    hits: Vec<PanelHit>,
    dropdown: Dropdown,
    notice: Option<Notice>,
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    rect.contains(Position::new(column, row))
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_frame(&mut self) {
        self.hits.clear();
        self.dropdown.bounds = None;
        self.dropdown.item_hits.clear();
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn bottom_area(&self) -> Rect {
        self.bottom_area
    }

    /// Split `area` into the menu bar row, the dock row and the workspace
    /// between them.
    pub fn split_area(&mut self, area: Rect) -> (Rect, Rect, Rect) {
        let top_h = 1u16.min(area.height);
        let bottom_h = 1u16.min(area.height.saturating_sub(top_h));
        let panel = Rect { height: top_h, ..area };
        let bottom = Rect {
            y: area.y.saturating_add(area.height).saturating_sub(bottom_h),
            height: bottom_h,
            ..area
        };
        let managed = Rect {
            y: area.y.saturating_add(top_h),
            height: area.height.saturating_sub(top_h).saturating_sub(bottom_h),
            ..area
        };
        self.area = panel;
        self.bottom_area = bottom;
        (panel, bottom, managed)
    }

    pub fn notify(&mut self, text: impl Into<String>, severity: Severity, now: Instant) {
        self.notice = Some(Notice {
            text: text.into(),
            severity,
            expires_at: now + NOTICE_TTL,
        });
    }

    /// The notification still showing at `now`, clearing an expired one.
    pub fn notice(&mut self, now: Instant) -> Option<&Notice> {
        if self.notice.as_ref().is_some_and(|n| now >= n.expires_at) {
            self.notice = None;
        }
        self.notice.as_ref()
    }

    /// Paint the menu bar. `active` highlights the launcher of the focused
    /// window's module.
    pub fn render(&mut self, frame: &mut UiFrame<'_>, active: Option<&ContentKind>, load_open: bool, now: Instant) {
        let area = self.area;
        if area.width == 0 || area.height == 0 {
            return;
        }
        let bar_style = Style::default().bg(theme::panel_bg()).fg(theme::panel_fg());
        fill(frame, area, bar_style);

        let mut x = area.x;
        let y = area.y;
        let max_x = area.x.saturating_add(area.width);
        let brand = format!("≡ {} ", env!("CARGO_PKG_NAME"));
        let brand_style = bar_style.fg(theme::accent()).add_modifier(Modifier::BOLD);
        frame.set_string(x, y, &brand, brand_style);
        x = x.saturating_add(brand.chars().count() as u16);

        let mut chunks: Vec<(String, PanelAction, bool)> = LAUNCHERS
            .iter()
            .map(|(kind, label)| {
                (
                    format!(" {label} "),
                    PanelAction::Launch(kind.clone()),
                    active == Some(kind),
                )
            })
            .collect();
        chunks.push((" Save ".to_string(), PanelAction::Save, false));
        chunks.push((" Load ▾ ".to_string(), PanelAction::Load, load_open));
        chunks.push((" Quit ".to_string(), PanelAction::Quit, false));

        let active_style = Style::default()
            .bg(theme::panel_active_bg())
            .fg(theme::panel_active_fg())
            .add_modifier(Modifier::BOLD);
        for (label, action, highlighted) in chunks {
            let width = label.chars().count() as u16;
            if x.saturating_add(width) > max_x {
                break;
            }
            let style = if highlighted { active_style } else { bar_style };
            frame.set_string(x, y, &label, style);
            let rect = Rect::new(x, y, width, 1);
            if action == PanelAction::Load {
                self.dropdown.anchor = Some(rect);
            }
            self.hits.push(PanelHit { action, rect });
            x = x.saturating_add(width);
        }

        let Some(notice) = self.notice(now).cloned() else {
            return;
        };
        let available = max_x.saturating_sub(x).saturating_sub(1) as usize;
        if available == 0 {
            return;
        }
        let text = truncate_to_width(&notice.text, available);
        let start = max_x.saturating_sub(text.chars().count() as u16);
        let fg = match notice.severity {
            Severity::Info => theme::notice_info_fg(),
            Severity::Error => theme::notice_error_fg(),
        };
        frame.set_string(start, y, &text, bar_style.fg(fg).add_modifier(Modifier::BOLD));
    }

    /// Paint the dock: one chunk per minimized window, in minimize order.
    pub fn render_dock(&mut self, frame: &mut UiFrame<'_>, entries: &[MinimizedEntry]) {
        let area = self.bottom_area;
        if area.width == 0 || area.height == 0 {
            return;
        }
        let dock_style = Style::default().bg(theme::dock_bg()).fg(theme::dock_fg());
        fill(frame, area, dock_style);
        let item_style = Style::default().bg(theme::dock_item_bg()).fg(theme::menu_fg());
        let max_x = area.x.saturating_add(area.width);
        let mut x = area.x;
        for entry in entries {
            let room = max_x.saturating_sub(x).saturating_sub(3) as usize;
            if room == 0 {
                break;
            }
            let label = format!(" {} ", truncate_to_width(&entry.title, room.min(24)));
            let width = label.chars().count() as u16;
            frame.set_string(x, area.y, &label, item_style);
            self.hits.push(PanelHit {
                action: PanelAction::Restore(entry.window_id),
                rect: Rect::new(x, area.y, width, 1),
            });
            x = x.saturating_add(width).saturating_add(1);
        }
    }

    /// Dropdown under the Load button listing `items`, `selected` marked.
    pub fn render_menu(&mut self, frame: &mut UiFrame<'_>, bounds: Rect, items: &[&str], selected: usize) {
        let Some(anchor) = self.dropdown.anchor else {
            return;
        };
        let placeholder = ["(no saved layouts)"];
        let empty = items.is_empty();
        let items: &[&str] = if empty { &placeholder } else { items };

        let start_x = anchor.x;
        let start_y = anchor.y.saturating_add(1);
        let right = bounds.x.saturating_add(bounds.width);
        let bottom = bounds.y.saturating_add(bounds.height);
        if start_x >= right || start_y >= bottom {
            return;
        }
        let label_width = items.iter().map(|l| l.chars().count() as u16).max().unwrap_or(1);
        let width = (label_width + 4).min(right - start_x);
        let height = (items.len() as u16 + 2).min(bottom - start_y);
        let menu_style = Style::default().bg(theme::menu_bg()).fg(theme::menu_fg());
        let selected_style = Style::default()
            .bg(theme::menu_selected_bg())
            .fg(theme::menu_selected_fg())
            .add_modifier(Modifier::BOLD);
        let rect = Rect::new(start_x, start_y, width, height);
        self.dropdown.bounds = Some(rect);

        let buffer = frame.buffer_mut();
        let clip = bounds.intersection(buffer.area);
        for y in rect.y..rect.y + rect.height {
            for x in rect.x..rect.x + rect.width {
                if let Some(cell) = buffer.cell_mut((x, y)) {
                    cell.reset();
                    cell.set_symbol(" ");
                    cell.set_style(menu_style);
                }
            }
        }
        for (idx, label) in items.iter().enumerate() {
            let y = start_y.saturating_add(idx as u16 + 1);
            if y >= rect.y + rect.height.saturating_sub(1) {
                break;
            }
            let is_selected = !empty && idx == selected;
            let marker = if is_selected { ">" } else { " " };
            let text = truncate_to_width(&format!("{marker} {label}"), width.saturating_sub(2) as usize);
            let style = if is_selected { selected_style } else { menu_style };
            safe_set_string(buffer, clip, start_x + 1, y, &text, style);
            if !empty {
                self.dropdown.item_hits.push(PanelMenuHit {
                    index: idx,
                    rect: Rect::new(start_x, y, width, 1),
                });
            }
        }
    }

    pub fn hit_test(&self, column: u16, row: u16) -> Option<PanelAction> {
        self.hits
            .iter()
            .find(|hit| contains(hit.rect, column, row))
            .map(|hit| hit.action.clone())
    }

    pub fn hit_test_menu_item(&self, column: u16, row: u16) -> Option<usize> {
        self.dropdown
            .item_hits
            .iter()
            .find(|hit| contains(hit.rect, column, row))
            .map(|hit| hit.index)
    }

    pub fn menu_contains_point(&self, column: u16, row: u16) -> bool {
        self.dropdown.bounds.is_some_and(|b| contains(b, column, row))
    }

    /// Whether a cell belongs to either bar.
    pub fn contains_point(&self, column: u16, row: u16) -> bool {
        contains(self.area, column, row) || contains(self.bottom_area, column, row)
    }
}

fn fill(frame: &mut UiFrame<'_>, area: Rect, style: Style) {
    let buffer = frame.buffer_mut();
    let area = area.intersection(buffer.area);
    for y in area.y..area.y.saturating_add(area.height) {
        for x in area.x..area.x.saturating_add(area.width) {
            if let Some(cell) = buffer.cell_mut((x, y)) {
                cell.reset();
                cell.set_symbol(" ");
                cell.set_style(style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;

    fn row_text(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol().to_string())
            .collect()
    }

    fn setup(width: u16, height: u16) -> (Panel, Buffer) {
        let area = Rect::new(0, 0, width, height);
        let mut panel = Panel::new();
        panel.split_area(area);
        (panel, Buffer::empty(area))
    }

    #[test]
    fn split_reserves_top_and_bottom_rows() {
        let mut panel = Panel::new();
        let (top, bottom, managed) = panel.split_area(Rect::new(0, 0, 80, 24));
        assert_eq!(top, Rect::new(0, 0, 80, 1));
        assert_eq!(bottom, Rect::new(0, 23, 80, 1));
        assert_eq!(managed, Rect::new(0, 1, 80, 22));
        let (_, bottom, managed) = panel.split_area(Rect::new(0, 0, 80, 1));
        assert_eq!(bottom.height, 0);
        assert_eq!(managed.height, 0);
    }

    #[test]
    fn launchers_are_clickable() {
        let (mut panel, mut buffer) = setup(120, 10);
        let area = buffer.area;
        let now = Instant::now();
        panel.begin_frame();
        panel.render(&mut UiFrame::from_parts(area, &mut buffer), Some(&ContentKind::Chart), false, now);
        let text = row_text(&buffer, 0);
        assert!(text.starts_with("≡ deskwm"));
        let charts = text.find("Charts").map(|b| text[..b].chars().count() as u16).unwrap();
        assert_eq!(
            panel.hit_test(charts, 0),
            Some(PanelAction::Launch(ContentKind::Chart))
        );
        let save = text.find("Save").map(|b| text[..b].chars().count() as u16).unwrap();
        assert_eq!(panel.hit_test(save, 0), Some(PanelAction::Save));
        assert_eq!(panel.hit_test(0, 5), None);
    }

    #[test]
    fn dock_lists_minimized_windows() {
        let (mut panel, mut buffer) = setup(60, 10);
        let area = buffer.area;
        let id = WindowId::new();
        let entries = vec![MinimizedEntry {
            window_id: id,
            title: "Log Viewer".into(),
            content: ContentKind::Log,
        }];
        panel.begin_frame();
        panel.render_dock(&mut UiFrame::from_parts(area, &mut buffer), &entries);
        assert!(row_text(&buffer, 9).starts_with(" Log Viewer "));
        assert_eq!(panel.hit_test(3, 9), Some(PanelAction::Restore(id)));
    }

    #[test]
    fn notices_expire() {
        let mut panel = Panel::new();
        let now = Instant::now();
        panel.notify("Layout saved", Severity::Info, now);
        assert_eq!(panel.notice(now).map(|n| n.text.as_str()), Some("Layout saved"));
        assert!(panel.notice(now + NOTICE_TTL).is_none());
    }

    #[test]
    fn notice_is_right_aligned() {
        let (mut panel, mut buffer) = setup(140, 4);
        let area = buffer.area;
        let now = Instant::now();
        panel.notify("Failed to load layout", Severity::Error, now);
        panel.render(&mut UiFrame::from_parts(area, &mut buffer), None, false, now);
        assert!(row_text(&buffer, 0).ends_with("Failed to load layout"));
    }

    #[test]
    fn load_menu_hits_items() {
        let (mut panel, mut buffer) = setup(120, 10);
        let area = buffer.area;
        let now = Instant::now();
        panel.begin_frame();
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        panel.render(&mut frame, None, true, now);
        panel.render_menu(&mut frame, area, &["Morning", "Evening"], 1);
        let anchor = panel.dropdown.anchor.unwrap();
        assert_eq!(panel.hit_test_menu_item(anchor.x + 1, 2), Some(0));
        assert_eq!(panel.hit_test_menu_item(anchor.x + 1, 3), Some(1));
        assert!(panel.menu_contains_point(anchor.x, 1));
        assert!(!panel.menu_contains_point(0, 8));
    }

    #[test]
    fn empty_load_menu_has_no_items() {
        let (mut panel, mut buffer) = setup(120, 10);
        let area = buffer.area;
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        panel.render(&mut frame, None, true, Instant::now());
        panel.render_menu(&mut frame, area, &[], 0);
        let anchor = panel.dropdown.anchor.unwrap();
        assert_eq!(panel.hit_test_menu_item(anchor.x + 1, 2), None);
        assert!(row_text(&buffer, 2).contains("(no saved layouts)"));
    }
}
