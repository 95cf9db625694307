//! YuzuBot chat backend: an OpenAI-compatible chat-completions client.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const GREETING: &str =
    "Hi! I'm YuzuBot. Ask me anything about Masuo Yuzuki's portfolio, skills, or projects!";
pub const EMPTY_REPLY: &str = "I couldn't process that request.";

const SYSTEM_PROMPT: &str = "You are \"YuzuBot\", a helpful AI assistant living inside the portfolio operating system of Masuo Yuzuki (増尾 柚希).

About Yuzuki:
- 4th Year Student at Ritsumeikan University, Faculty of Information Science and Engineering (立命館大学 情報理工学部 4年生)
- Research: Multi-Agent Dialogue Protocol using Large Language Models at Social Intelligence Lab (SI Lab)
- Research Focus: Cross-cultural collaboration and solving social issues using LLM multi-agents
- Tech Stack: React, Next.js, TypeScript, Python, Node.js, NestJS, MySQL, Prisma, Docker, GitHub, FastAPI
- Skills: Full-stack development with REST API and gRPC
- Certifications: Fundamental Information Technology Engineer (基本情報技術者), TOEIC IP: 895
- Email: is0690ke@ed.ritsumei.ac.jp
- GitHub: https://github.com/Yuuzuukii

Featured Projects:
1. ShigaChat - Multi-language Q&A service for foreigners in Shiga using ChatGPT and RAG (React, Python, FastAPI, MySQL)
2. YuzukiOS Portfolio - This OS-style portfolio (React, TypeScript, Tailwind, Vite)
3. Multi-Agent Dialogue Protocol Research - Academic research on LLM agents

Your Goal:
- Answer questions about Yuzuki's skills, education, research, and projects accurately
- Maintain a friendly, professional, and slightly tech-savvy persona
- Keep responses concise (under 100 words) as you are in a chat window
- If asked to open apps, guide them to click the desktop icons or taskbar
- Provide information in Japanese or English based on the user's language";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("System Error: API Key missing. Please configure the environment.")]
    MissingKey,

    #[error("API Key is invalid. Please check your Groq API key.")]
    InvalidKey,

    #[error("Rate limit exceeded. Please try again in a moment.")]
    RateLimited,

    #[error("Connection error: {0}")]
    Connection(String),
}

/// Anything that can turn a prompt plus prior turns into a reply.
pub trait ChatBackend: Send + Sync {
    fn complete(&self, prompt: &str, history: &[String]) -> Result<String, ChatError>;
}

/// Run a request and collapse failures into their display strings.
pub fn send_prompt(backend: &dyn ChatBackend, prompt: &str, history: &[String]) -> String {
    match backend.complete(prompt, history) {
        Ok(reply) => reply,
        Err(e) => {
            log::warn!("chat request failed: {e}");
            e.to_string()
        }
    }
}

// ── Wire format ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: &str) -> Self {
        Self { role: role.to_string(), content: content.to_string() }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChatMessageBody>,
}

#[derive(Debug, Deserialize)]
struct ChatMessageBody {
    content: Option<String>,
}

/// System prompt, then history entries as alternating user/assistant turns
/// by position, then the new prompt.
pub fn build_messages(prompt: &str, history: &[String]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::new("system", SYSTEM_PROMPT));
    for (i, turn) in history.iter().enumerate() {
        let role = if i % 2 == 0 { "user" } else { "assistant" };
        messages.push(ChatMessage::new(role, turn));
    }
    messages.push(ChatMessage::new("user", prompt));
    messages
}

fn first_completion(body: CompletionResponse) -> String {
    body.choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| EMPTY_REPLY.to_string())
}

// ── HTTP client ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ChatOptions {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

pub struct HttpChatClient {
    api_key: Option<String>,
    options: ChatOptions,
}

impl HttpChatClient {
    pub fn new(api_key: Option<String>, options: ChatOptions) -> Self {
        let api_key = api_key.filter(|k| !k.trim().is_empty());
        Self { api_key, options }
    }
}

impl ChatBackend for HttpChatClient {
    fn complete(&self, prompt: &str, history: &[String]) -> Result<String, ChatError> {
        let key = self.api_key.as_deref().ok_or(ChatError::MissingKey)?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(self.options.timeout_secs))
            .build()
            .map_err(|e| ChatError::Connection(e.to_string()))?;

        let request = CompletionRequest {
            model: &self.options.model,
            messages: build_messages(prompt, history),
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
        };

        log::debug!(
            "chat: POST {} ({} messages)",
            self.options.endpoint,
            request.messages.len()
        );
        let response = client
            .post(&self.options.endpoint)
            .bearer_auth(key)
            .json(&request)
            .send()
            .map_err(|e| ChatError::Connection(e.to_string()))?;

        match response.status().as_u16() {
            401 => return Err(ChatError::InvalidKey),
            429 => return Err(ChatError::RateLimited),
            _ => {}
        }
        if !response.status().is_success() {
            return Err(ChatError::Connection(format!("HTTP {}", response.status())));
        }

        let body: CompletionResponse = response
            .json()
            .map_err(|e| ChatError::Connection(e.to_string()))?;
        Ok(first_completion(body))
    }
}
