use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::chart::Candle;
use super::market::{MACRO, Quote, format_signed};
use crate::components::{Component, ComponentContext};
use crate::theme;
use crate::ui::UiFrame;

/// Detail pane for a single instrument: last quote, session range and
/// performance buckets.
#[derive(Debug)]
pub struct SecurityView {
    quote: Quote,
    session: Option<Candle>,
}

impl SecurityView {
    pub fn new(quote: Quote, session: Option<Candle>) -> Self {
        Self { quote, session }
    }

    pub fn usdjpy() -> Self {
        Self::new(MACRO[0], super::chart::USDJPY_DAILY.last().copied())
    }

    fn signed_span(value: f64, pct: bool) -> Span<'static> {
        let color = if value >= 0.0 { theme::gain() } else { theme::loss() };
        Span::styled(format_signed(value, pct), Style::default().fg(color))
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        let q = &self.quote;
        let mut lines = vec![
            Line::from(Span::styled(
                q.ticker,
                Style::default().fg(theme::accent()).add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::raw(format!("Last   {:.2}  ", q.price)),
                Self::signed_span(q.change, false),
                Span::raw(" "),
                Self::signed_span(q.change_pct, true),
            ]),
        ];
        if let Some(c) = &self.session {
            lines.push(Line::raw(format!(
                "Open   {:.2}  High {:.2}  Low {:.2}  ({})",
                c.open, c.high, c.low, c.date
            )));
            lines.push(Line::raw(format!("Volume {}", c.volume)));
        }
        lines.push(Line::raw(""));
        for (label, value) in [("Day", q.day), ("Week", q.week), ("Month", q.month), ("YTD", q.ytd)] {
            lines.push(Line::from(vec![
                Span::raw(format!("{label:<7}")),
                Self::signed_span(value, false),
            ]));
        }
        lines
    }
}

impl Component for SecurityView {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        frame.render_widget(Paragraph::new(self.lines()), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_lines_include_session_range() {
        let text: Vec<String> = SecurityView::usdjpy()
            .lines()
            .iter()
            .map(|l| l.to_string())
            .collect();
        assert_eq!(text[0], "USDJPY");
        assert!(text[1].contains("145.70"));
        assert!(text[2].contains("High 145.80"));
        assert!(text.iter().any(|l| l.starts_with("YTD") && l.contains("+13.10")));
    }
}
