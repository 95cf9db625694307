//! Compact shell for narrow terminals: one full-screen app at a time on top
//! of a home screen with a clock, an app grid and a dock.

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};

use crate::apps::AppContent;
use crate::registry::{self, AppDescriptor, APPS, DEFAULT_APP};
use crate::status::render_status_bar;
use crate::ui::{dim_style, normal_style, point_in_rect, sel_style, title_style};

const WELCOME_DELAY: Duration = Duration::from_millis(1300);
const DOCK_APPS: usize = 4;
const TILE_W: u16 = 14;
const TILE_H: u16 = 3;
const NAV_ITEMS: [(&str, NavButton); 4] = [
    ("[<]", NavButton::Back),
    ("[O]", NavButton::Home),
    ("[□]", NavButton::Recents),
    ("[Logout]", NavButton::Logout),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MobileAction {
    Logout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavButton {
    Back,
    Home,
    Recents,
    Logout,
}

struct Foreground {
    app: &'static AppDescriptor,
    content: AppContent,
}

pub struct MobileShell {
    foreground: Option<Foreground>,
    selected: usize,
    welcome_at: Option<Instant>,
}

impl MobileShell {
    /// `greet` schedules the welcome app; the caller makes sure that happens
    /// once per process.
    pub fn new(greet: bool) -> Self {
        Self {
            foreground: None,
            selected: 0,
            welcome_at: greet.then(|| Instant::now() + WELCOME_DELAY),
        }
    }

    pub fn foreground_id(&self) -> Option<&'static str> {
        self.foreground.as_ref().map(|fg| fg.app.id)
    }

    pub fn open(&mut self, id: &str) {
        let (Some(app), Some(content)) = (registry::find(id), registry::build_content(id)) else {
            log::debug!("compact open ignored for unknown app {id}");
            return;
        };
        self.foreground = Some(Foreground { app, content });
    }

    /// Back and home both return to the home screen and drop the app.
    pub fn home(&mut self) {
        self.foreground = None;
    }

    pub fn tick(&mut self) {
        if let Some(at) = self.welcome_at {
            if Instant::now() >= at {
                self.welcome_at = None;
                if self.foreground.is_none() {
                    self.open(DEFAULT_APP);
                }
            }
        }
        if let Some(fg) = self.foreground.as_mut() {
            fg.content.tick();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<MobileAction> {
        if let Some(fg) = self.foreground.as_mut() {
            if key.code == KeyCode::Esc {
                self.home();
            } else {
                fg.content.handle_key(key);
            }
            return None;
        }
        let last = APPS.len().saturating_sub(1);
        match key.code {
            KeyCode::Left | KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Right | KeyCode::Down | KeyCode::Tab => {
                self.selected = (self.selected + 1).min(last)
            }
            KeyCode::Enter => {
                if let Some(app) = APPS.get(self.selected) {
                    self.open(app.id);
                }
            }
            _ => {}
        }
        None
    }

    pub fn handle_mouse(&mut self, size: Rect, mouse: MouseEvent) -> Option<MobileAction> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return None;
        }
        let (x, y) = (mouse.column, mouse.row);
        let layout = MobileLayout::of(size);

        if let Some((_, btn)) = nav_rects(layout.nav).into_iter().find(|(r, _)| point_in_rect(x, y, *r)) {
            return match btn {
                NavButton::Back | NavButton::Home => {
                    self.home();
                    None
                }
                NavButton::Recents => None,
                NavButton::Logout => Some(MobileAction::Logout),
            };
        }
        if self.foreground.is_some() {
            return None;
        }
        let hit = grid_rects(layout.grid)
            .into_iter()
            .chain(dock_rects(layout.dock))
            .find(|(_, r)| point_in_rect(x, y, *r));
        if let Some((app, _)) = hit {
            self.open(app.id);
        }
        None
    }

    pub fn draw(&self, f: &mut Frame, size: Rect) {
        let layout = MobileLayout::of(size);
        f.render_widget(Clear, size);
        render_status_bar(f, layout.status, "YuzuOS");

        match self.foreground.as_ref() {
            Some(fg) => {
                let block = Block::default()
                    .borders(Borders::TOP)
                    .title(format!(" {} {} ", fg.app.icon, fg.app.title))
                    .border_style(title_style());
                let inner = block.inner(layout.body);
                f.render_widget(block, layout.body);
                fg.content.draw(f, inner, true);
            }
            None => {
                draw_clock(f, layout.clock);
                for (i, (app, r)) in grid_rects(layout.grid).into_iter().enumerate() {
                    draw_tile(f, app, r, i == self.selected);
                }
                for (app, r) in dock_rects(layout.dock) {
                    let icon = Span::styled(app.icon, title_style().fg(app.color));
                    f.render_widget(Paragraph::new(Line::from(icon)), r);
                }
            }
        }
        draw_nav(f, layout.nav);
    }
}

// ── Layout ────────────────────────────────────────────────────────────────────

struct MobileLayout {
    status: Rect,
    body: Rect,
    clock: Rect,
    grid: Rect,
    dock: Rect,
    nav: Rect,
}

impl MobileLayout {
    fn of(size: Rect) -> Self {
        let row = |y: u16| Rect { x: size.x, y, width: size.width, height: size.height.min(1) };
        let status = row(size.y);
        let nav = row(size.y + size.height.saturating_sub(1));
        let dock = row(size.y + size.height.saturating_sub(2));
        let body = Rect {
            x: size.x,
            y: size.y + 1,
            width: size.width,
            height: size.height.saturating_sub(2),
        };
        let clock = Rect { height: body.height.min(3), ..body };
        let grid = Rect {
            y: body.y + clock.height + 1,
            height: body.height.saturating_sub(clock.height + 2),
            ..body
        };
        Self { status, body, clock, grid, dock, nav }
    }
}

fn grid_rects(grid: Rect) -> Vec<(&'static AppDescriptor, Rect)> {
    let cols = (grid.width / (TILE_W + 1)).clamp(1, 3);
    let used = cols * (TILE_W + 1);
    let x0 = grid.x + grid.width.saturating_sub(used) / 2;
    APPS.iter()
        .enumerate()
        .map(|(i, app)| {
            let (col, row) = (i as u16 % cols, i as u16 / cols);
            let r = Rect {
                x: x0 + col * (TILE_W + 1),
                y: grid.y + row * (TILE_H + 1),
                width: TILE_W.min(grid.width),
                height: TILE_H,
            };
            (app, r)
        })
        .filter(|(_, r)| r.y + r.height <= grid.y + grid.height)
        .collect()
}

/// Each dock slot is a 4-cell icon with a one-cell gap, centred.
fn dock_rects(dock: Rect) -> Vec<(&'static AppDescriptor, Rect)> {
    let apps = &APPS[..DOCK_APPS.min(APPS.len())];
    let total = apps.len() as u16 * 4;
    let x0 = dock.x + dock.width.saturating_sub(total) / 2;
    apps.iter()
        .enumerate()
        .map(|(i, app)| (app, Rect { x: x0 + i as u16 * 4, y: dock.y, width: 3, height: 1 }))
        .collect()
}

fn nav_rects(nav: Rect) -> Vec<(Rect, NavButton)> {
    let labels: u16 = NAV_ITEMS.iter().map(|(l, _)| l.chars().count() as u16).sum();
    let total = labels + 2 * (NAV_ITEMS.len() as u16 - 1);
    let mut x = nav.x + nav.width.saturating_sub(total) / 2;
    NAV_ITEMS
        .iter()
        .map(|(label, btn)| {
            let w = label.chars().count() as u16;
            let r = Rect { x, y: nav.y, width: w, height: 1 };
            x += w + 2;
            (r, *btn)
        })
        .collect()
}

// ── Drawing ───────────────────────────────────────────────────────────────────

fn draw_clock(f: &mut Frame, area: Rect) {
    let now = Local::now();
    let lines = vec![
        Line::from(Span::styled(
            now.format("%H:%M").to_string(),
            title_style().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(now.format("%A, %B %d").to_string(), dim_style())),
    ];
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn draw_tile(f: &mut Frame, app: &AppDescriptor, r: Rect, selected: bool) {
    let label = if selected { sel_style() } else { normal_style() };
    let lines = vec![
        Line::from(Span::styled(app.icon, title_style().fg(app.color))),
        Line::from(Span::styled(app.title, label)),
    ];
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), r);
}

fn draw_nav(f: &mut Frame, nav: Rect) {
    let mut spans = Vec::new();
    for ((_, btn), (label, _)) in nav_rects(nav).into_iter().zip(NAV_ITEMS) {
        let style = if btn == NavButton::Recents { dim_style() } else { sel_style() };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw("  "));
    }
    spans.pop();
    f.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), nav);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    const PHONE: Rect = Rect { x: 0, y: 0, width: 60, height: 30 };

    fn click(x: u16, y: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: x,
            row: y,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn nav(btn: NavButton) -> (u16, u16) {
        let layout = MobileLayout::of(PHONE);
        let (r, _) = nav_rects(layout.nav).into_iter().find(|(_, b)| *b == btn).unwrap();
        (r.x + 1, r.y)
    }

    #[test]
    fn grid_tile_opens_full_screen_app() {
        let mut shell = MobileShell::new(false);
        let layout = MobileLayout::of(PHONE);
        let (app, r) = grid_rects(layout.grid)[1];
        shell.handle_mouse(PHONE, click(r.x + 2, r.y + 1));
        assert_eq!(shell.foreground_id(), Some(app.id));

        // Grid is hidden while an app is in front.
        let (other, r) = grid_rects(layout.grid)[0];
        shell.handle_mouse(PHONE, click(r.x + 2, r.y + 1));
        assert_ne!(shell.foreground_id(), Some(other.id));
    }

    #[test]
    fn back_and_home_drop_foreground() {
        let mut shell = MobileShell::new(false);
        for btn in [NavButton::Back, NavButton::Home] {
            shell.open("terminal");
            let (x, y) = nav(btn);
            assert_eq!(shell.handle_mouse(PHONE, click(x, y)), None);
            assert_eq!(shell.foreground_id(), None);
        }
    }

    #[test]
    fn recents_is_inert_and_logout_exits() {
        let mut shell = MobileShell::new(false);
        shell.open("skills");
        let (x, y) = nav(NavButton::Recents);
        assert_eq!(shell.handle_mouse(PHONE, click(x, y)), None);
        assert_eq!(shell.foreground_id(), Some("skills"));
        let (x, y) = nav(NavButton::Logout);
        assert_eq!(shell.handle_mouse(PHONE, click(x, y)), Some(MobileAction::Logout));
    }

    #[test]
    fn dock_holds_first_four_apps() {
        let layout = MobileLayout::of(PHONE);
        let ids: Vec<_> = dock_rects(layout.dock).iter().map(|(a, _)| a.id).collect();
        assert_eq!(ids, ["about", "projects", "skills", "terminal"]);

        let mut shell = MobileShell::new(false);
        let (_, r) = dock_rects(layout.dock)[3];
        shell.handle_mouse(PHONE, click(r.x, r.y));
        assert_eq!(shell.foreground_id(), Some("terminal"));
    }

    #[test]
    fn keyboard_selection_and_escape() {
        let mut shell = MobileShell::new(false);
        let k = |code| KeyEvent::new(code, KeyModifiers::NONE);
        shell.handle_key(k(KeyCode::Right));
        shell.handle_key(k(KeyCode::Right));
        shell.handle_key(k(KeyCode::Enter));
        assert_eq!(shell.foreground_id(), Some(APPS[2].id));
        shell.handle_key(k(KeyCode::Esc));
        assert_eq!(shell.foreground_id(), None);
    }

    #[test]
    fn welcome_waits_for_delay() {
        let mut shell = MobileShell::new(true);
        shell.tick();
        assert_eq!(shell.foreground_id(), None);
        shell.welcome_at = Some(Instant::now());
        shell.tick();
        assert_eq!(shell.foreground_id(), Some(DEFAULT_APP));

        let mut quiet = MobileShell::new(false);
        assert!(quiet.welcome_at.is_none());
        quiet.tick();
        assert_eq!(quiet.foreground_id(), None);
    }
}
