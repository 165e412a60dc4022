use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Chart, Dataset, GraphType};

use crate::components::{Component, ComponentContext};
use crate::theme;
use crate::ui::UiFrame;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub date: &'static str,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

const fn candle(date: &'static str, [open, high, low, close]: [f64; 4], volume: u64) -> Candle {
    Candle {
        date,
        open,
        high,
        low,
        close,
        volume,
    }
}

pub const USDJPY_DAILY: [Candle; 7] = [
    candle("2025-03-01", [144.0, 145.0, 143.5, 144.5], 1_000_000),
    candle("2025-03-02", [144.5, 146.0, 144.0, 145.2], 1_200_000),
    candle("2025-03-03", [145.2, 146.2, 144.9, 145.0], 900_000),
    candle("2025-03-04", [145.0, 145.6, 144.9, 145.3], 800_000),
    candle("2025-03-05", [145.3, 146.0, 145.0, 145.5], 1_100_000),
    candle("2025-03-06", [145.5, 145.7, 144.8, 145.1], 950_000),
    candle("2025-03-07", [145.1, 145.8, 144.9, 145.7], 1_050_000),
];

/// Closing-price line chart of one ticker.
#[derive(Debug)]
pub struct ChartView {
    ticker: String,
    candles: &'static [Candle],
    points: Vec<(f64, f64)>,
}

impl ChartView {
    pub fn new(ticker: impl Into<String>, candles: &'static [Candle]) -> Self {
        let points = candles
            .iter()
            .enumerate()
            .map(|(i, c)| (i as f64, c.close))
            .collect();
        Self {
            ticker: ticker.into(),
            candles,
            points,
        }
    }

    pub fn usdjpy() -> Self {
        Self::new("USDJPY", &USDJPY_DAILY)
    }

    /// Min and max close, widened so a flat series still has height.
    pub fn price_bounds(&self) -> [f64; 2] {
        let (min, max) = self
            .candles
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
                (lo.min(c.close), hi.max(c.close))
            });
        if !min.is_finite() {
            return [0.0, 1.0];
        }
        if (max - min).abs() < f64::EPSILON {
            [min - 0.5, max + 0.5]
        } else {
            [min, max]
        }
    }

    pub fn last_close(&self) -> Option<f64> {
        self.candles.last().map(|c| c.close)
    }
}

impl Component for ChartView {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        if area.width < 4 || area.height < 3 {
            return;
        }
        let title = match self.last_close() {
            Some(close) => format!("{} {close:.2}", self.ticker),
            None => self.ticker.clone(),
        };
        frame.set_string(
            area.x,
            area.y,
            &title,
            Style::default().fg(theme::accent()).add_modifier(Modifier::BOLD),
        );

        let [lo, hi] = self.price_bounds();
        let x_max = self.points.len().saturating_sub(1).max(1) as f64;
        let first = self.candles.first().map(|c| c.date).unwrap_or("");
        let last = self.candles.last().map(|c| c.date).unwrap_or("");
        let dataset = Dataset::default()
            .name(self.ticker.as_str())
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme::accent()))
            .data(&self.points);
        let chart = Chart::new(vec![dataset])
            .x_axis(
                Axis::default()
                    .bounds([0.0, x_max])
                    .labels([Span::raw(first), Span::raw(last)]),
            )
            .y_axis(
                Axis::default()
                    .bounds([lo, hi])
                    .labels([Span::raw(format!("{lo:.2}")), Span::raw(format!("{hi:.2}"))]),
            );
        let plot = Rect::new(area.x, area.y + 1, area.width, area.height - 1);
        frame.render_widget(chart, plot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;

    #[test]
    fn bounds_follow_closes() {
        let chart = ChartView::usdjpy();
        assert_eq!(chart.price_bounds(), [144.5, 145.7]);
        assert_eq!(chart.last_close(), Some(145.7));
    }

    #[test]
    fn flat_series_gets_height() {
        static FLAT: [Candle; 2] = [
            candle("a", [1.0, 1.0, 1.0, 1.0], 0),
            candle("b", [1.0, 1.0, 1.0, 1.0], 0),
        ];
        let chart = ChartView::new("X", &FLAT);
        assert_eq!(chart.price_bounds(), [0.5, 1.5]);
    }

    #[test]
    fn renders_title_with_last_close() {
        let area = Rect::new(0, 0, 40, 12);
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        ChartView::usdjpy().render(&mut frame, area, &ComponentContext::default());
        let top: String = (0..area.width).map(|x| buffer[(x, 0)].symbol().to_string()).collect();
        assert!(top.starts_with("USDJPY 145.70"));
    }
}
