use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use super::{AppContent, Scroll};
use crate::ui::{dim_style, title_style};

pub const COMPETENCIES: &[(&str, u8)] = &[
    ("Frontend", 95),
    ("Backend", 70),
    ("UI/UX", 85),
    ("DevOps", 60),
    ("Communication", 90),
    ("English", 75),
];

pub const LANGUAGES: &[(&str, u8)] = &[
    ("TypeScript", 90),
    ("Python", 80),
    ("Rust", 40),
    ("Go", 65),
    ("SQL", 70),
];

pub const TOOLS: &[&str] = &[
    "React", "Next.js", "TailwindCSS", "Node.js", "Docker", "AWS", "Figma", "Git",
];

const LABEL_W: usize = 14;

pub fn new_content() -> AppContent {
    AppContent::Skills(Scroll::default())
}

/// `[█████░░░░░]` style bar, `width` cells between the brackets.
pub fn bar(level: u8, width: usize) -> String {
    let filled = (usize::from(level.min(100)) * width + 50) / 100;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}

fn bar_line(name: &'static str, level: u8, width: usize, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{name:<LABEL_W$}")),
        Span::styled(bar(level, width), Style::default().fg(color)),
        Span::styled(format!(" {level:>3}"), dim_style()),
    ])
}

pub fn lines(area_width: u16) -> Vec<Line<'static>> {
    let bar_w = usize::from(area_width)
        .saturating_sub(LABEL_W + 6)
        .clamp(10, 40);

    let mut out = vec![
        Line::from(Span::styled("Technical Proficiency", title_style())),
        Line::from(Span::styled(
            "Visualizing my skill distribution across various domains.",
            dim_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[*] Core Competencies",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    out.extend(
        COMPETENCIES
            .iter()
            .map(|(name, lvl)| bar_line(name, *lvl, bar_w, Color::LightCyan)),
    );

    out.push(Line::from(""));
    out.push(Line::from(Span::styled(
        "[=] Languages & Tools",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    out.extend(
        LANGUAGES
            .iter()
            .map(|(name, lvl)| bar_line(name, *lvl, bar_w, Color::LightMagenta)),
    );

    out.push(Line::from(""));
    let tiles: Vec<Span<'static>> = TOOLS
        .iter()
        .flat_map(|t| {
            [
                Span::styled(format!("[ {t} ]"), Style::default().fg(Color::LightCyan)),
                Span::raw(" "),
            ]
        })
        .collect();
    out.push(Line::from(tiles));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_fill_matches_level() {
        assert_eq!(bar(0, 10), "[░░░░░░░░░░]");
        assert_eq!(bar(100, 10), "[██████████]");
        assert_eq!(bar(95, 10), "[██████████]");
        assert_eq!(bar(40, 10), "[████░░░░░░]");
    }

    #[test]
    fn bar_width_is_clamped() {
        let narrow = lines(10);
        let wide = lines(300);
        assert_eq!(narrow.len(), wide.len());
        let competency = wide[4].spans[1].content.chars().count();
        assert_eq!(competency, 42);
    }
}
