use anyhow::{Context, Result};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{OnceLock, RwLock};

use crate::core::chat::ChatOptions;

pub const APP_NAME: &str = "yuzuos";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const API_KEY_VARS: &[&str] = &["YUZUOS_API_KEY", "GROQ_API_KEY"];

// ── Paths ─────────────────────────────────────────────────────────────────────

fn ensure_dir(d: PathBuf) -> PathBuf {
    let _ = std::fs::create_dir_all(&d);
    d
}

pub fn config_dir() -> PathBuf {
    ensure_dir(
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_NAME),
    )
}

pub fn data_dir() -> PathBuf {
    ensure_dir(
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_NAME),
    )
}

pub fn settings_file() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn state_file() -> PathBuf {
    data_dir().join("state.json")
}

pub fn log_file() -> PathBuf {
    data_dir().join("yuzuos.log")
}

// ── JSON helpers ──────────────────────────────────────────────────────────────

pub fn load_json<T: for<'de> Deserialize<'de> + Default>(path: &Path) -> T {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

pub fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

// ── Persisted state ───────────────────────────────────────────────────────────

/// The only value that outlives the process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(rename = "yuzuos_snake_highscore", default)]
    pub snake_high_score: u32,
}

pub fn load_high_score() -> u32 {
    load_json::<PersistedState>(&state_file()).snake_high_score
}

pub fn save_high_score(score: u32) {
    let state = PersistedState { snake_high_score: score };
    if let Err(e) = save_json(&state_file(), &state) {
        log::warn!("could not persist high score: {e:#}");
    }
}

// ── Settings ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatSettings {
    #[serde(default = "default_chat_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_chat_model")]
    pub model: String,
    #[serde(default = "default_chat_temperature")]
    pub temperature: f32,
    #[serde(default = "default_chat_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_chat_timeout")]
    pub timeout_secs: u64,
}

fn default_chat_endpoint() -> String {
    "https://api.groq.com/openai/v1/chat/completions".to_string()
}

fn default_chat_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

const fn default_chat_temperature() -> f32 {
    0.7
}

const fn default_chat_max_tokens() -> u32 {
    500
}

const fn default_chat_timeout() -> u64 {
    30
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            endpoint: default_chat_endpoint(),
            model: default_chat_model(),
            temperature: default_chat_temperature(),
            max_tokens: default_chat_max_tokens(),
            timeout_secs: default_chat_timeout(),
        }
    }
}

impl ChatSettings {
    pub fn options(&self) -> ChatOptions {
        ChatOptions {
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout_secs: self.timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default = "default_true")]
    pub bootup: bool,
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Terminals narrower than this many columns get the compact shell.
    #[serde(default = "default_compact_width")]
    pub compact_width: u16,
    #[serde(default = "default_true")]
    pub auto_open_welcome: bool,
    #[serde(default)]
    pub chat: ChatSettings,
}

const fn default_true() -> bool {
    true
}

fn default_theme() -> String {
    THEMES[0].0.to_string()
}

const fn default_compact_width() -> u16 {
    100
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bootup: true,
            theme: default_theme(),
            compact_width: default_compact_width(),
            auto_open_welcome: true,
            chat: ChatSettings::default(),
        }
    }
}

pub fn load_settings() -> Settings {
    load_json(&settings_file())
}

pub fn save_settings(d: &Settings) {
    if let Err(e) = save_json(&settings_file(), d) {
        log::warn!("could not save settings: {e:#}");
    }
}

// ── Global mutable state ──────────────────────────────────────────────────────

static APP_SETTINGS: OnceLock<RwLock<Settings>> = OnceLock::new();

fn settings_lock() -> &'static RwLock<Settings> {
    APP_SETTINGS.get_or_init(|| RwLock::new(Settings::default()))
}

pub fn get_settings() -> Settings {
    settings_lock()
        .read()
        .map(|g| g.clone())
        .unwrap_or_default()
}

pub fn reload_settings() {
    let s = load_settings();
    if let Ok(mut guard) = settings_lock().write() {
        *guard = s;
    }
}

pub fn update_settings<F: FnOnce(&mut Settings)>(f: F) {
    if let Ok(mut guard) = settings_lock().write() {
        f(&mut guard);
    }
}

pub fn persist_settings() {
    let s = get_settings();
    save_settings(&s);
}

/// First non-empty key from the environment.
pub fn api_key() -> Option<String> {
    API_KEY_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

// ── Themes ────────────────────────────────────────────────────────────────────

pub const THEMES: &[(&str, Color)] = &[
    ("Yuzu (Default)", Color::LightYellow),
    ("Matcha", Color::LightGreen),
    ("Sakura", Color::LightMagenta),
    ("Ocean", Color::LightCyan),
    ("Paper", Color::White),
];

pub fn theme_color(name: &str) -> Color {
    THEMES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, c)| *c)
        .unwrap_or(THEMES[0].1)
}

pub fn current_theme_color() -> Color {
    theme_color(&get_settings().theme)
}

pub fn cycle_theme() {
    let current = get_settings().theme;
    let idx = THEMES
        .iter()
        .position(|(name, _)| *name == current)
        .unwrap_or(0);
    let next = THEMES[(idx + 1) % THEMES.len()].0.to_string();
    log::info!("theme -> {next}");
    update_settings(|s| s.theme = next);
    persist_settings();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_fill_defaults() {
        let s: Settings = serde_json::from_str(r#"{"bootup": false}"#).unwrap();
        assert!(!s.bootup);
        assert_eq!(s.compact_width, 100);
        assert_eq!(s.chat.model, "llama-3.3-70b-versatile");
        assert_eq!(s.chat.max_tokens, 500);
        assert!(s.auto_open_welcome);
    }

    #[test]
    fn high_score_uses_storage_key() {
        let json = serde_json::to_string(&PersistedState { snake_high_score: 70 }).unwrap();
        assert_eq!(json, r#"{"yuzuos_snake_highscore":70}"#);
        let back: PersistedState = serde_json::from_str("{}").unwrap();
        assert_eq!(back.snake_high_score, 0);
    }

    #[test]
    fn unknown_theme_falls_back() {
        assert_eq!(theme_color("Neon"), THEMES[0].1);
        assert_eq!(theme_color("Ocean"), Color::LightCyan);
    }

    #[test]
    fn load_json_defaults_on_missing_file() {
        let s: Settings = load_json(Path::new("/definitely/not/here.json"));
        assert_eq!(s, Settings::default());
    }
}
