use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use super::{AppContent, Scroll};
use crate::ui::{dim_style, title_style};

pub fn new_content() -> AppContent {
    AppContent::Projects(Scroll::default())
}

pub struct Project {
    pub title: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub tags: &'static [&'static str],
    pub source: Option<&'static str>,
}

pub const PROJECTS: &[Project] = &[
    Project {
        title: "ShigaChat",
        category: "Web Application / AI",
        description: "滋賀県在住の外国人向け多言語対応Q&Aサービス。ChatGPTとRAG（検索拡張生成）を組み合わせることで、地域特化の情報を迅速かつ正確に提供します。日本語、英語、ベトナム語、中国語、韓国語に対応。",
        tags: &["React", "Python", "FastAPI", "ChatGPT", "RAG", "MySQL"],
        source: Some("https://github.com/Yuuzuukii/ShigaChat"),
    },
    Project {
        title: "YuzukiOS Portfolio",
        category: "Frontend / React",
        description: "Windows風のオペレーティングシステムを模したポートフォリオ。カスタムウィンドウマネージャー、タスクバー、各種アプリケーションを実装。このポートフォリオそのものです！",
        tags: &["React", "TypeScript", "Tailwind", "Vite"],
        source: Some("https://github.com/Yuuzuukii/portfolio"),
    },
    Project {
        title: "Multi-Agent Dialogue Protocol",
        category: "Research / AI",
        description: "大規模言語モデルを用いたマルチエージェント対話プロトコルの研究。異文化コラボレーションを軸に、LLMマルチエージェントを用いて社会的課題を解決する実験的プロジェクト。",
        tags: &["Python", "LLM", "AI Research", "NLP"],
        source: None,
    },
];

pub fn lines() -> Vec<Line<'static>> {
    let mut out = vec![
        Line::from(vec![
            Span::styled("[#] My Projects", title_style()),
            Span::styled(format!("   {} items", PROJECTS.len()), dim_style()),
        ]),
        Line::from(""),
    ];

    for p in PROJECTS {
        out.push(Line::from(Span::styled(
            p.category.to_uppercase(),
            Style::default().fg(Color::LightBlue).add_modifier(Modifier::BOLD),
        )));
        out.push(Line::from(Span::styled(
            p.title,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        out.push(Line::from(p.description));

        let mut tags: Vec<Span<'static>> = Vec::new();
        for tag in p.tags {
            tags.push(Span::styled(format!("[{tag}]"), dim_style()));
            tags.push(Span::raw(" "));
        }
        out.push(Line::from(tags));

        out.push(match p.source {
            Some(url) => Line::from(vec![
                Span::styled("Source: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(url),
            ]),
            None => Line::from(Span::styled("Source: Private", dim_style())),
        });
        out.push(Line::from(""));
    }
    out
}
