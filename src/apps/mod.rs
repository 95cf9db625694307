//! Window content for every registered application.

pub mod about;
pub mod chat;
pub mod projects;
pub mod skills;
pub mod snake;
pub mod terminal;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Paragraph, Wrap},
    Frame,
};

pub use chat::ChatApp;
pub use snake::SnakeApp;
pub use terminal::TerminalApp;

pub enum AppContent {
    About(Scroll),
    Projects(Scroll),
    Skills(Scroll),
    Terminal(TerminalApp),
    Chat(ChatApp),
    Snake(SnakeApp),
}

impl std::fmt::Debug for AppContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AppContent::About(_) => "About",
            AppContent::Projects(_) => "Projects",
            AppContent::Skills(_) => "Skills",
            AppContent::Terminal(_) => "Terminal",
            AppContent::Chat(_) => "Chat",
            AppContent::Snake(_) => "Snake",
        };
        f.write_str(name)
    }
}

impl AppContent {
    pub fn draw(&self, f: &mut Frame, area: Rect, focused: bool) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        match self {
            AppContent::About(s) => s.render(f, area, about::lines()),
            AppContent::Projects(s) => s.render(f, area, projects::lines()),
            AppContent::Skills(s) => s.render(f, area, skills::lines(area.width)),
            AppContent::Terminal(t) => t.draw(f, area, focused),
            AppContent::Chat(c) => c.draw(f, area, focused),
            AppContent::Snake(s) => s.draw(f, area),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self {
            AppContent::About(s) => s.handle_key(key, about::lines().len()),
            AppContent::Projects(s) => s.handle_key(key, projects::lines().len()),
            AppContent::Skills(s) => s.handle_key(key, skills::lines(80).len()),
            AppContent::Terminal(t) => t.handle_key(key),
            AppContent::Chat(c) => c.handle_key(key),
            AppContent::Snake(s) => s.handle_key(key),
        }
    }

    /// Advance timers and drain background results. Called once per frame.
    pub fn tick(&mut self) {
        match self {
            AppContent::Chat(c) => c.poll(),
            AppContent::Snake(s) => s.tick(),
            _ => {}
        }
    }
}

// ── Scrolling panels ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scroll {
    offset: u16,
}

const PAGE: u16 = 10;

impl Scroll {
    pub fn offset(&self) -> u16 {
        self.offset
    }

    pub fn handle_key(&mut self, key: KeyEvent, line_count: usize) {
        let max = u16::try_from(line_count.saturating_sub(1)).unwrap_or(u16::MAX);
        self.offset = match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.offset.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.offset.saturating_add(1),
            KeyCode::PageUp => self.offset.saturating_sub(PAGE),
            KeyCode::PageDown => self.offset.saturating_add(PAGE),
            KeyCode::Home => 0,
            KeyCode::End => max,
            _ => self.offset,
        }
        .min(max);
    }

    fn render(&self, f: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
        f.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .scroll((self.offset, 0)),
            area,
        );
    }
}

/// Keep the last `height` lines of `lines`.
pub(crate) fn tail<T>(lines: &[T], height: u16) -> &[T] {
    let start = lines.len().saturating_sub(height as usize);
    &lines[start..]
}
