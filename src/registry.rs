use ratatui::style::Color;

use crate::apps::{self, AppContent};

/// One installable application.
#[derive(Clone, Copy)]
pub struct AppDescriptor {
    pub id: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    pub color: Color,
    pub content: fn() -> AppContent,
}

impl std::fmt::Debug for AppDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppDescriptor")
            .field("id", &self.id)
            .field("title", &self.title)
            .finish()
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

pub const DEFAULT_APP: &str = "about";

pub const APPS: &[AppDescriptor] = &[
    AppDescriptor {
        id: "about",
        title: "About Me",
        icon: "[@]",
        color: Color::LightMagenta,
        content: apps::about::new_content,
    },
    AppDescriptor {
        id: "projects",
        title: "Projects",
        icon: "[#]",
        color: Color::Yellow,
        content: apps::projects::new_content,
    },
    AppDescriptor {
        id: "skills",
        title: "Skills",
        icon: "[%]",
        color: Color::LightBlue,
        content: apps::skills::new_content,
    },
    AppDescriptor {
        id: "terminal",
        title: "Terminal",
        icon: "[>]",
        color: Color::Gray,
        content: apps::terminal::new_content,
    },
    AppDescriptor {
        id: "ai_chat",
        title: "YuzuBot AI",
        icon: "[?]",
        color: Color::Indexed(61),
        content: apps::chat::new_content,
    },
    AppDescriptor {
        id: "snake",
        title: "Snake OS",
        icon: "[~]",
        color: Color::Green,
        content: apps::snake::new_content,
    },
];

pub fn find(id: &str) -> Option<&'static AppDescriptor> {
    APPS.iter().find(|app| app.id == id)
}

/// Build fresh content for `id`. Every call yields a new instance.
pub fn build_content(id: &str) -> Option<AppContent> {
    find(id).map(|app| (app.content)())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn app_ids_are_unique() {
        let ids: HashSet<&str> = APPS.iter().map(|a| a.id).collect();
        assert_eq!(ids.len(), APPS.len());
    }

    #[test]
    fn unknown_ids_resolve_to_nothing() {
        assert!(find("contact").is_none());
        assert!(build_content("").is_none());
    }

    #[test]
    fn default_app_is_registered() {
        assert!(find(DEFAULT_APP).is_some());
    }
}
