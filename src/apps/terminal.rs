use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{tail, AppContent};
use crate::core::fs::TerminalSession;

const PROMPT_COLOR: Color = Color::LightBlue;
const TEXT_COLOR: Color = Color::LightGreen;

pub fn new_content() -> AppContent {
    AppContent::Terminal(TerminalApp::default())
}

#[derive(Debug, Clone, Default)]
pub struct TerminalApp {
    session: TerminalSession,
    input: String,
}

impl TerminalApp {
    pub fn session(&self) -> &TerminalSession {
        &self.session
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.session.interrupt();
                self.input.clear();
            }
            KeyCode::Enter => {
                let line = std::mem::take(&mut self.input);
                self.session.execute(&line);
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.push(c);
            }
            _ => {}
        }
    }

    pub fn draw(&self, f: &mut Frame, area: Rect, focused: bool) {
        let text = Style::default().fg(TEXT_COLOR);
        let prompt = Style::default().fg(PROMPT_COLOR);

        let mut lines: Vec<Line> = Vec::new();
        for entry in self.session.history() {
            let is_echo = entry.starts_with(&format!("{}@", crate::core::fs::USER));
            for part in entry.split('\n') {
                let style = if is_echo { prompt } else { text };
                lines.push(Line::from(Span::styled(part.to_string(), style)));
            }
        }
        let cursor = if focused { "█" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", self.session.prompt()), prompt),
            Span::styled(format!("{}{cursor}", self.input), text),
        ]));

        let visible = tail(&lines, area.height).to_vec();
        f.render_widget(Paragraph::new(visible), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(app: &mut TerminalApp, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_line(app: &mut TerminalApp, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
        press(app, KeyCode::Enter);
    }

    #[test]
    fn typed_command_runs_on_enter() {
        let mut app = TerminalApp::default();
        type_line(&mut app, "pwd");
        assert_eq!(app.input(), "");
        assert_eq!(app.session().history().last().unwrap(), "/home/guest");
    }

    #[test]
    fn backspace_edits_input() {
        let mut app = TerminalApp::default();
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.input(), "ls");
    }

    #[test]
    fn ctrl_c_clears_input() {
        let mut app = TerminalApp::default();
        press(&mut app, KeyCode::Char('l'));
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(app.input(), "");
        assert_eq!(app.session().history().last().unwrap(), "guest@yuzu-os:~$ ^C");
    }
}
