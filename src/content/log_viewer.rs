use crossterm::event::{Event, KeyCode};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::components::{Component, ComponentContext, DebugLogHandle};
use crate::theme;
use crate::ui::UiFrame;

/// Level filter, cycled with `l`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelFilter {
    #[default]
    All,
    Error,
    Warn,
    Info,
    Debug,
}

impl LevelFilter {
    pub fn next(self) -> Self {
        match self {
            LevelFilter::All => LevelFilter::Error,
            LevelFilter::Error => LevelFilter::Warn,
            LevelFilter::Warn => LevelFilter::Info,
            LevelFilter::Info => LevelFilter::Debug,
            LevelFilter::Debug => LevelFilter::All,
        }
    }

    fn label(self) -> &'static str {
        match self {
            LevelFilter::All => "all",
            LevelFilter::Error => "ERROR",
            LevelFilter::Warn => "WARN",
            LevelFilter::Info => "INFO",
            LevelFilter::Debug => "DEBUG",
        }
    }

    pub fn accepts(self, line: &str) -> bool {
        self == LevelFilter::All || line_level(line) == Some(self.label())
    }
}

const LEVELS: [&str; 5] = ["ERROR", "WARN", "INFO", "DEBUG", "TRACE"];

/// The level token of a fmt-formatted line, if any.
fn line_level(line: &str) -> Option<&'static str> {
    line.split_whitespace()
        .take(3)
        .find_map(|token| LEVELS.iter().copied().find(|level| *level == token))
}

fn level_color(level: &str) -> Color {
    match level {
        "ERROR" => Color::Red,
        "WARN" => Color::Yellow,
        "INFO" => Color::Blue,
        _ => Color::Gray,
    }
}

/// Tails the in-process log buffer.
///
/// Live mode re-reads the buffer every frame and sticks to the newest line;
/// paused mode keeps showing the frame it was paused on.
#[derive(Debug)]
pub struct LogViewerView {
    source: DebugLogHandle,
    filter: LevelFilter,
    live: bool,
    /// Lines scrolled back from the newest.
    scroll_back: usize,
    frozen: Option<Vec<String>>,
}

impl LogViewerView {
    pub fn new(source: DebugLogHandle) -> Self {
        Self {
            source,
            filter: LevelFilter::default(),
            live: true,
            scroll_back: 0,
            frozen: None,
        }
    }

    pub fn filter(&self) -> LevelFilter {
        self.filter
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn set_live(&mut self, live: bool) {
        self.live = live;
        self.frozen = if live {
            None
        } else {
            Some(self.source.tail(self.source.len(), 0))
        };
    }

    /// Filtered lines, newest last.
    pub fn visible_lines(&self, rows: usize) -> Vec<String> {
        let all = match &self.frozen {
            Some(lines) => lines.clone(),
            None => self.source.tail(self.source.len(), 0),
        };
        let filtered: Vec<String> = all.into_iter().filter(|l| self.filter.accepts(l)).collect();
        let end = filtered.len().saturating_sub(self.scroll_back);
        let start = end.saturating_sub(rows);
        filtered[start..end].to_vec()
    }

    fn status_line(&self) -> Line<'static> {
        let mode = if self.live { "live" } else { "paused" };
        Line::from(vec![
            Span::styled(
                format!(" level: {} ", self.filter.label()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("[{mode}] ")),
            Span::styled("l:level p:pause", Style::default().fg(theme::accent())),
        ])
    }
}

impl Component for LogViewerView {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        if area.height == 0 {
            return;
        }
        frame.render_widget(Paragraph::new(self.status_line()), Rect { height: 1, ..area });
        let rows = area.height.saturating_sub(1) as usize;
        let lines: Vec<Line> = self
            .visible_lines(rows)
            .into_iter()
            .map(|line| match line_level(&line) {
                Some(level) => Line::styled(line, Style::default().fg(level_color(level))),
                None => Line::raw(line),
            })
            .collect();
        let body = Rect::new(area.x, area.y + 1, area.width, rows as u16);
        frame.render_widget(Paragraph::new(lines), body);
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        let Event::Key(key) = event else {
            return false;
        };
        match key.code {
            KeyCode::Char('l') => {
                self.filter = self.filter.next();
                self.scroll_back = 0;
            }
            KeyCode::Char('p') => self.set_live(!self.live),
            KeyCode::Up => self.scroll_back = self.scroll_back.saturating_add(1),
            KeyCode::Down => self.scroll_back = self.scroll_back.saturating_sub(1),
            KeyCode::PageUp => self.scroll_back = self.scroll_back.saturating_add(10),
            KeyCode::PageDown => self.scroll_back = self.scroll_back.saturating_sub(10),
            KeyCode::End => self.scroll_back = 0,
            _ => return false,
        }
        true
    }
}
