use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;

use super::AppContent;
use crate::config::{api_key, get_settings};
use crate::core::chat::{send_prompt, ChatBackend, ChatError, HttpChatClient, GREETING};
use crate::ui::dim_style;

const BOT_COLOR: Color = Color::Indexed(61);

pub fn new_content() -> AppContent {
    let options = get_settings().chat.options();
    let backend = HttpChatClient::new(api_key(), options);
    AppContent::Chat(ChatApp::new(Arc::new(backend)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

pub struct ChatApp {
    messages: Vec<Message>,
    input: String,
    backend: Arc<dyn ChatBackend>,
    pending: Option<Receiver<String>>,
}

impl ChatApp {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            messages: vec![Message { sender: Sender::Bot, text: GREETING.to_string() }],
            input: String::new(),
            backend,
            pending: None,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Transcript as sent to the model: `User: ...` / `Model: ...`.
    fn history(&self) -> Vec<String> {
        self.messages
            .iter()
            .map(|m| match m.sender {
                Sender::User => format!("User: {}", m.text),
                Sender::Bot => format!("Model: {}", m.text),
            })
            .collect()
    }

    pub fn send(&mut self) {
        if self.input.trim().is_empty() || self.is_loading() {
            return;
        }
        let prompt = std::mem::take(&mut self.input).trim().to_string();
        let history = self.history();
        self.messages.push(Message { sender: Sender::User, text: prompt.clone() });

        let (tx, rx) = mpsc::channel();
        let backend = Arc::clone(&self.backend);
        std::thread::spawn(move || {
            let reply = send_prompt(backend.as_ref(), &prompt, &history);
            let _ = tx.send(reply);
        });
        self.pending = Some(rx);
    }

    /// Pick up a finished reply, if any.
    pub fn poll(&mut self) {
        let Some(rx) = &self.pending else { return };
        let reply = match rx.try_recv() {
            Ok(reply) => reply,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                ChatError::Connection("request worker stopped".into()).to_string()
            }
        };
        self.pending = None;
        self.messages.push(Message { sender: Sender::Bot, text: reply });
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.send(),
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
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1), Constraint::Length(3)])
            .split(area);

        let bot = Style::default().fg(Color::White).bg(BOT_COLOR);
        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" [?] YuzuBot AI ", bot.add_modifier(Modifier::BOLD)),
                Span::styled("  ● Online", Style::default().fg(Color::LightGreen)),
            ])),
            chunks[0],
        );

        let mut lines: Vec<Line> = Vec::new();
        for m in &self.messages {
            let label = match m.sender {
                Sender::Bot => Span::styled(
                    "YuzuBot ",
                    Style::default().fg(BOT_COLOR).add_modifier(Modifier::BOLD),
                ),
                Sender::User => Span::styled("You ", Style::default().add_modifier(Modifier::BOLD)),
            };
            let mut parts = m.text.split('\n');
            let first = parts.next().unwrap_or_default().to_string();
            lines.push(Line::from(vec![label, Span::raw(first)]));
            lines.extend(parts.map(|p| Line::from(p.to_string())));
            lines.push(Line::from(""));
        }
        if self.is_loading() {
            lines.push(Line::from(Span::styled("YuzuBot ...", dim_style())));
        }

        let offset = wrapped_height(&lines, chunks[1].width).saturating_sub(chunks[1].height);
        f.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .scroll((offset, 0)),
            chunks[1],
        );

        let cursor = if focused { "█" } else { "" };
        let input_text = if self.input.is_empty() && !focused {
            Span::styled("Type a message...", dim_style())
        } else {
            Span::raw(format!("{}{cursor}", self.input))
        };
        f.render_widget(
            Paragraph::new(Line::from(input_text)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Enter to send ")
                    .border_style(dim_style()),
            ),
            chunks[2],
        );
    }
}

/// Rows `lines` occupy when wrapped at `width` columns.
fn wrapped_height(lines: &[Line], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = lines.iter().map(|l| l.width().div_ceil(width).max(1)).sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    struct Echo {
        histories: Mutex<Vec<Vec<String>>>,
    }

    impl ChatBackend for Echo {
        fn complete(&self, prompt: &str, history: &[String]) -> Result<String, ChatError> {
            if let Ok(mut h) = self.histories.lock() {
                h.push(history.to_vec());
            }
            Ok(format!("echo: {prompt}"))
        }
    }

    struct Broken;

    impl ChatBackend for Broken {
        fn complete(&self, _: &str, _: &[String]) -> Result<String, ChatError> {
            Err(ChatError::InvalidKey)
        }
    }

    fn type_text(app: &mut ChatApp, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    fn wait_reply(app: &mut ChatApp) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.is_loading() && Instant::now() < deadline {
            app.poll();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn wrapped_height_counts_rows() {
        let lines = vec![Line::from("abcdefghij"), Line::from("")];
        assert_eq!(wrapped_height(&lines, 4), 4);
    }

    #[test]
    fn starts_with_greeting() {
        let app = ChatApp::new(Arc::new(Broken));
        assert_eq!(app.messages().len(), 1);
        assert_eq!(app.messages()[0].sender, Sender::Bot);
    }

    #[test]
    fn blank_input_is_not_sent() {
        let mut app = ChatApp::new(Arc::new(Broken));
        type_text(&mut app, "   ");
        app.send();
        assert!(!app.is_loading());
        assert_eq!(app.messages().len(), 1);
    }

    #[test]
    fn reply_arrives_with_prior_transcript() {
        let backend = Arc::new(Echo { histories: Mutex::new(Vec::new()) });
        let mut app = ChatApp::new(backend.clone());
        type_text(&mut app, "  hello  ");
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert!(app.is_loading());

        wait_reply(&mut app);
        let texts: Vec<&str> = app.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, [GREETING, "hello", "echo: hello"]);

        let seen = backend.histories.lock().unwrap();
        assert_eq!(seen[0], vec![format!("Model: {GREETING}")]);
    }

    #[test]
    fn second_send_waits_for_pending_reply() {
        let backend = Arc::new(Echo { histories: Mutex::new(Vec::new()) });
        let mut app = ChatApp::new(backend);
        type_text(&mut app, "one");
        app.send();
        type_text(&mut app, "two");
        app.send();
        assert_eq!(app.messages().len(), 2);
        wait_reply(&mut app);
        assert_eq!(app.messages().len(), 3);
    }

    #[test]
    fn failures_render_inline() {
        let mut app = ChatApp::new(Arc::new(Broken));
        type_text(&mut app, "hi");
        app.send();
        wait_reply(&mut app);
        assert_eq!(
            app.messages().last().unwrap().text,
            ChatError::InvalidKey.to_string()
        );
    }
}
