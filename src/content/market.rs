use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Cell, Row, Table};

use crate::components::{Component, ComponentContext};
use crate::theme;
use crate::ui::UiFrame;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub ticker: &'static str,
    pub price: f64,
    pub change: f64,
    pub change_pct: f64,
    pub day: f64,
    pub week: f64,
    pub month: f64,
    pub ytd: f64,
}

const fn quote(
    ticker: &'static str,
    price: f64,
    change: f64,
    change_pct: f64,
    [day, week, month, ytd]: [f64; 4],
) -> Quote {
    Quote {
        ticker,
        price,
        change,
        change_pct,
        day,
        week,
        month,
        ytd,
    }
}

pub const MACRO: [Quote; 9] = [
    quote("USDJPY", 145.70, 0.03, 0.02, [7.9, 17.4, 15.9, 13.1]),
    quote("EURUSD", 1.11, -0.01, -0.21, [-0.3, 11.2, 12.4, 11.3]),
    quote("USGG10YR", 4.11, 0.03, 0.77, [-0.6, 21.0, 19.1, 16.4]),
    quote("USGG2YR", 3.99, 0.04, 0.98, [-5.7, 30.8, 28.0, 24.5]),
    quote("USGG5YR", 4.09, 0.04, 0.96, [-5.6, 25.6, 23.9, 20.8]),
    quote("USGG10YR", 4.47, 0.05, 1.03, [-2.0, 24.1, 24.4, 22.6]),
    quote("DXY", 101.09, 0.21, 0.21, [-6.8, 11.7, 11.2, 10.1]),
    quote("CL1", 86.07, 0.10, 0.12, [-3.6, 22.8, 24.1, 23.0]),
    quote("GOLDS", 3203.65, -36.4, -1.13, [22.5, 32.1, 31.4, 24.3]),
];

pub const US: [Quote; 5] = [
    quote("SPX", 5958.3, 41.4, 0.70, [1.3, 20.2, 33.2, 28.0]),
    quote("ES1", 5975.50, 42.2, 0.71, [-0.3, 17.9, 34.9, 27.8]),
    quote("NDX", 21506.00, 105.0, 0.49, [0.2, 22.1, 42.8, 34.2]),
    quote("RTY", 2113.25, 18.5, 0.89, [-5.2, 24.2, 36.7, 29.9]),
    quote("INDU", 42654.74, 331.0, 0.78, [0.3, 18.9, 30.9, 24.2]),
];

pub const ASIA: [Quote; 4] = [
    quote("AS51", 8343.68, 46.2, 0.56, [2.3, 5.5, 24.3, 19.2]),
    quote("XPMS", 8360.0, -7.00, -0.08, [1.7, 2.6, 25.4, 20.3]),
    quote("NKY", 37753.72, -179.0, -0.47, [-5.4, 14.8, 47.3, 35.9]),
    quote("TPX", 2740.45, 1.49, 0.05, [-1.6, 11.4, 45.5, 34.2]),
];

/// Which columns a section shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Columns {
    /// Ticker, price, change, change %, then day/week/month/ytd.
    Full,
    /// Ticker, price, change, change %.
    Short,
}

struct Section {
    title: &'static str,
    quotes: &'static [Quote],
    columns: Columns,
}

const SECTIONS: [Section; 3] = [
    Section {
        title: "Macro",
        quotes: &MACRO,
        columns: Columns::Full,
    },
    Section {
        title: "US",
        quotes: &US,
        columns: Columns::Short,
    },
    Section {
        title: "Asia",
        quotes: &ASIA,
        columns: Columns::Short,
    },
];

/// Signed with two decimals, like `+0.03` or `-1.13%`.
pub fn format_signed(value: f64, pct: bool) -> String {
    let sign = if value >= 0.0 { "+" } else { "" };
    if pct {
        format!("{sign}{value:.2}%")
    } else {
        format!("{sign}{value:.2}")
    }
}

fn signed_cell(value: f64, pct: bool) -> Cell<'static> {
    let style = if value > 0.0 {
        Style::default().fg(theme::gain())
    } else if value < 0.0 {
        Style::default().fg(theme::loss())
    } else {
        Style::default()
    };
    Cell::from(Span::styled(format_signed(value, pct), style))
}

fn quote_row(q: &Quote, columns: Columns) -> Row<'static> {
    let mut cells = vec![
        Cell::from(q.ticker),
        Cell::from(format!("{:.2}", q.price)),
        signed_cell(q.change, false),
        signed_cell(q.change_pct, true),
    ];
    if columns == Columns::Full {
        cells.extend([q.day, q.week, q.month, q.ytd].into_iter().map(|v| signed_cell(v, false)));
    }
    Row::new(cells)
}

fn header_row(columns: Columns) -> Row<'static> {
    let mut labels = vec!["Ticker", "Price", "Change", "Change %"];
    if columns == Columns::Full {
        labels.extend(["Day", "Week", "Month", "YTD"]);
    }
    Row::new(labels).style(Style::default().add_modifier(Modifier::BOLD))
}

fn widths(columns: Columns) -> Vec<Constraint> {
    let mut widths = vec![
        Constraint::Length(9),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(9),
    ];
    if columns == Columns::Full {
        widths.extend([Constraint::Length(7); 4]);
    }
    widths
}

/// Static quote board with macro, US and Asia sections.
#[derive(Debug, Default)]
pub struct MarketDataView {
    scroll: u16,
}

impl MarketDataView {
    pub fn new() -> Self {
        Self::default()
    }

    fn content_height() -> u16 {
        SECTIONS
            .iter()
            .map(|s| s.quotes.len() as u16 + 3)
            .sum()
    }
}

impl Component for MarketDataView {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        self.scroll = self
            .scroll
            .min(Self::content_height().saturating_sub(area.height));
        let mut y = area.y as i32 - self.scroll as i32;
        let bottom = area.y as i32 + area.height as i32;
        for section in &SECTIONS {
            let rows = section.quotes.len() as i32 + 1;
            if y >= area.y as i32 && y < bottom {
                frame.set_string(
                    area.x,
                    y as u16,
                    section.title,
                    Style::default().fg(theme::accent()).add_modifier(Modifier::BOLD),
                );
            }
            let table_top = y + 1;
            let visible_top = table_top.max(area.y as i32);
            let visible_bottom = (table_top + rows).min(bottom);
            if visible_bottom > visible_top {
                let skip = (visible_top - table_top) as usize;
                let body = section
                    .quotes
                    .iter()
                    .skip(skip.saturating_sub(1))
                    .map(|q| quote_row(q, section.columns));
                let table = if skip == 0 {
                    Table::new(body, widths(section.columns)).header(header_row(section.columns))
                } else {
                    Table::new(body, widths(section.columns))
                };
                let rect = Rect::new(
                    area.x,
                    visible_top as u16,
                    area.width,
                    (visible_bottom - visible_top) as u16,
                );
                frame.render_widget(table, rect);
            }
            y = table_top + rows + 1;
        }
    }

    fn handle_event(&mut self, event: &crossterm::event::Event, _ctx: &ComponentContext) -> bool {
        use crossterm::event::{Event, KeyCode};
        let Event::Key(key) = event else {
            return false;
        };
        match key.code {
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Home => self.scroll = 0,
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;

    fn render_to_string(view: &mut MarketDataView, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        view.render(&mut frame, area, &ComponentContext::default());
        (0..height)
            .map(|y| (0..width).map(|x| buffer[(x, y)].symbol().to_string()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn signed_formatting() {
        assert_eq!(format_signed(0.03, false), "+0.03");
        assert_eq!(format_signed(-1.13, true), "-1.13%");
        assert_eq!(format_signed(0.0, true), "+0.00%");
    }

    #[test]
    fn board_lists_sections_in_order() {
        let mut view = MarketDataView::new();
        let text = render_to_string(&mut view, 80, 40);
        let macro_at = text.find("Macro").unwrap();
        let us_at = text.find("\nUS ").unwrap();
        let asia_at = text.find("Asia").unwrap();
        assert!(macro_at < us_at && us_at < asia_at);
        assert!(text.contains("USDJPY"));
        assert!(text.contains("145.70"));
        assert!(text.contains("AS51"));
    }

    #[test]
    fn scrolling_hides_the_first_section_title() {
        let mut view = MarketDataView::new();
        let down = crossterm::event::Event::Key(crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Down,
            crossterm::event::KeyModifiers::NONE,
        ));
        assert!(view.handle_event(&down, &ComponentContext::default()));
        let text = render_to_string(&mut view, 80, 10);
        assert!(!text.contains("Macro"));
        assert!(text.contains("Ticker"));
    }
}
