use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use super::{AppContent, Scroll};
use crate::ui::{dim_style, title_style};

pub fn new_content() -> AppContent {
    AppContent::About(Scroll::default())
}

fn heading(icon: &'static str, text: &'static str, color: Color) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(icon, Style::default().fg(color)),
            Span::raw(" "),
            Span::styled(text, Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(Span::styled("─".repeat(40), dim_style())),
    ]
}

pub fn lines() -> Vec<Line<'static>> {
    let mut out = vec![
        Line::from(Span::styled("  Masuo Yuzuki", title_style())),
        Line::from(Span::styled("  Information Systems Student", dim_style())),
        Line::from(Span::styled(
            "  [GitHub] github.com/yuzuki   [LinkedIn] linkedin.com/in/yuzuki   [Mail] yuzuki.dev@example.com",
            dim_style(),
        )),
    ];

    out.extend(heading("[^]", "Education", Color::LightMagenta));
    out.push(Line::from(vec![
        Span::styled("University of Information Science", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled("   2021 - Present", dim_style()),
    ]));
    out.push(Line::from("Bachelor of Information Systems"));
    out.push(Line::from(Span::styled(
        "Focusing on Human-Computer Interaction, Web Technologies, and Artificial Intelligence. \
         Currently conducting research on \"User Perception in Web-based Operating Systems.\"",
        dim_style(),
    )));

    out.extend(heading("</>", "Bio", Color::LightRed));
    out.push(Line::from(
        "Hello! I'm a 4th-year student passionate about bridging the gap between complex backend \
         logic and beautiful frontend experiences. I believe software should not only be functional \
         but also delightful to use. This \"OS Portfolio\" is an experiment in pushing the boundaries \
         of what a standard portfolio can be.",
    ));

    out.extend(heading("(o)", "Location", Color::LightBlue));
    out.push(Line::from(
        "Based in Tokyo, Japan. Available for remote work and internships.",
    ));
    out
}
