use anyhow::Result;
use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};

use crate::ui::{centered_rect, dim_style, normal_style, title_style, Term};

pub const USER_NAME: &str = "増尾 柚希";
pub const SUBMIT_DELAY: Duration = Duration::from_millis(800);
const FIELD_W: u16 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    LoggedIn,
    Shutdown,
}

// ── Form state ────────────────────────────────────────────────────────────────

/// Any credential is accepted; the form only exists for the ceremony.
#[derive(Debug, Default)]
pub struct LoginForm {
    password: String,
    submitted_at: Option<Instant>,
}

impl LoginForm {
    pub fn masked(&self) -> String {
        "•".repeat(self.password.chars().count())
    }

    pub fn is_submitting(&self) -> bool {
        self.submitted_at.is_some()
    }

    pub fn placeholder(compact: bool) -> &'static str {
        if compact {
            "Enter Passcode"
        } else {
            "Password"
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Option<LoginOutcome> {
        if self.is_submitting() {
            return None;
        }
        match key.code {
            KeyCode::Esc => return Some(LoginOutcome::Shutdown),
            KeyCode::Enter => self.submitted_at = Some(now),
            KeyCode::Backspace => {
                self.password.pop();
            }
            KeyCode::Char(c) => self.password.push(c),
            _ => {}
        }
        None
    }

    /// Logged in once the welcome delay after submission has passed.
    pub fn poll(&self, now: Instant) -> Option<LoginOutcome> {
        let at = self.submitted_at?;
        (now.duration_since(at) >= SUBMIT_DELAY).then_some(LoginOutcome::LoggedIn)
    }
}

// ── Login screen ──────────────────────────────────────────────────────────────

pub fn login_screen(terminal: &mut Term, compact: bool) -> Result<LoginOutcome> {
    let mut form = LoginForm::default();
    loop {
        if let Some(outcome) = form.poll(Instant::now()) {
            return Ok(outcome);
        }
        terminal.draw(|f| draw_login(f, &form, compact))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press && key.kind != KeyEventKind::Repeat {
                    continue;
                }
                if let Some(outcome) = form.handle_key(key, Instant::now()) {
                    return Ok(outcome);
                }
            }
        }
    }
}

fn draw_login(f: &mut Frame, form: &LoginForm, compact: bool) {
    let size = f.area();
    f.render_widget(Clear, size);
    let now = Local::now();

    if compact {
        let clock = vec![
            Line::from(Span::styled(
                now.format("%H:%M").to_string(),
                title_style().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(now.format("%A, %B %d").to_string(), normal_style())),
        ];
        let area = Rect { y: size.y + size.height / 6, height: size.height.min(2), ..size };
        f.render_widget(Paragraph::new(clock).alignment(Alignment::Center), area);
    }

    let card = centered_rect(FIELD_W + 4, 7, size);
    let name = Line::from(Span::styled(USER_NAME, title_style()));
    f.render_widget(
        Paragraph::new(vec![Line::from("( ◕‿◕ )"), Line::from(""), name]).alignment(Alignment::Center),
        Rect { height: card.height.min(3), ..card },
    );

    let field = Rect {
        x: card.x + 2,
        y: card.y + 3,
        width: FIELD_W.min(card.width),
        height: card.height.saturating_sub(3).min(3),
    };
    if form.is_submitting() {
        f.render_widget(
            Paragraph::new(Span::styled("Welcome", normal_style())).alignment(Alignment::Center),
            Rect { y: field.y + 1, height: field.height.min(1), ..field },
        );
    } else {
        let text = if form.masked().is_empty() {
            Span::styled(LoginForm::placeholder(compact), dim_style())
        } else {
            Span::styled(form.masked(), normal_style())
        };
        f.render_widget(
            Paragraph::new(Line::from(text))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).border_style(normal_style())),
            field,
        );
    }

    if size.height > 1 {
        let hint = if compact { "Enter to unlock" } else { "Enter to log in · Esc to shut down" };
        let row = Rect { x: size.x + 1, y: size.y + size.height - 1, width: size.width.saturating_sub(2), height: 1 };
        f.render_widget(Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray))), row);
        if !compact {
            let clock = now.format("%H:%M").to_string();
            f.render_widget(
                Paragraph::new(Span::styled(clock, dim_style())).alignment(Alignment::Right),
                row,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_is_masked() {
        let mut form = LoginForm::default();
        let now = Instant::now();
        for c in "yuzu".chars() {
            form.handle_key(key(KeyCode::Char(c)), now);
        }
        form.handle_key(key(KeyCode::Backspace), now);
        assert_eq!(form.masked(), "•••");
    }

    #[test]
    fn empty_submit_logs_in_after_delay() {
        let mut form = LoginForm::default();
        let t0 = Instant::now();
        assert_eq!(form.handle_key(key(KeyCode::Enter), t0), None);
        assert!(form.is_submitting());
        assert_eq!(form.poll(t0 + Duration::from_millis(799)), None);
        assert_eq!(form.poll(t0 + SUBMIT_DELAY), Some(LoginOutcome::LoggedIn));
    }

    #[test]
    fn escape_shuts_down_unless_submitting() {
        let mut form = LoginForm::default();
        let now = Instant::now();
        assert_eq!(form.handle_key(key(KeyCode::Esc), now), Some(LoginOutcome::Shutdown));

        form.handle_key(key(KeyCode::Enter), now);
        assert_eq!(form.handle_key(key(KeyCode::Esc), now), None);
    }

    #[test]
    fn placeholder_depends_on_layout() {
        assert_eq!(LoginForm::placeholder(false), "Password");
        assert_eq!(LoginForm::placeholder(true), "Enter Passcode");
    }
}
