use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use rand::Rng;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};
use sysinfo::System;

use crate::config::VERSION;
use crate::ui::{dim_style, title_style, Term};

pub const STEP: Duration = Duration::from_millis(200);
pub const FORCE_FULL_AT: Duration = Duration::from_millis(2500);
pub const COMPLETE_AT: Duration = Duration::from_millis(3000);
const MAX_STEP_GAIN: u32 = 15;
const BAR_W: usize = 32;

const STATUS_TEXT: [&str; 5] = [
    "Initializing BIOS...",
    "Loading Kernel...",
    "Mounting File System...",
    "Starting YuzuOS...",
    "Ready.",
];

// ── Progress model ────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BootProgress {
    progress: u32,
    steps: u32,
}

impl BootProgress {
    pub fn progress(&self) -> u32 {
        self.progress
    }

    pub fn status(&self) -> &'static str {
        STATUS_TEXT[(self.progress / 20).min(STATUS_TEXT.len() as u32 - 1) as usize]
    }

    /// Catch up to `elapsed` since boot start. Returns true once the boot
    /// screen is done.
    pub fn update<R: Rng>(&mut self, elapsed: Duration, rng: &mut R) -> bool {
        let due = (elapsed.as_millis() / STEP.as_millis()) as u32;
        while self.steps < due {
            self.steps += 1;
            self.progress = (self.progress + rng.gen_range(0..MAX_STEP_GAIN)).min(100);
        }
        if elapsed >= FORCE_FULL_AT {
            self.progress = 100;
        }
        elapsed >= COMPLETE_AT
    }
}

pub fn memory_label(total_bytes: u64) -> String {
    if total_bytes == 0 {
        return "Memory: OK".to_string();
    }
    let gib = (total_bytes as f64 / (1024.0 * 1024.0 * 1024.0)).round().max(1.0);
    format!("Memory: {gib:.0}GB OK")
}

fn host_memory() -> u64 {
    let mut sys = System::new();
    sys.refresh_memory();
    sys.total_memory()
}

// ── Boot screen ───────────────────────────────────────────────────────────────

pub fn bootup(terminal: &mut Term) -> Result<()> {
    let footer = format!("Version {VERSION}-release | {}", memory_label(host_memory()));
    let mut boot = BootProgress::default();
    let mut rng = rand::thread_rng();
    let started = Instant::now();

    loop {
        let done = boot.update(started.elapsed(), &mut rng);
        terminal.draw(|f| draw_boot(f, &boot, &footer))?;
        if done {
            break;
        }
        if check_skip()? {
            log::info!("boot skipped at {}%", boot.progress());
            break;
        }
    }
    Ok(())
}

fn progress_bar(progress: u32) -> String {
    let filled = (progress as usize * BAR_W) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_W - filled))
}

fn draw_boot(f: &mut Frame, boot: &BootProgress, footer: &str) {
    let size = f.area();
    f.render_widget(Clear, size);

    let accent = Style::default().fg(Color::LightBlue).add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(Span::styled("[ CPU ]", accent)),
        Line::from(""),
        Line::from(vec![
            Span::styled("YUZU", title_style()),
            Span::styled("OS", accent),
        ]),
        Line::from(""),
        Line::from(Span::styled(progress_bar(boot.progress()), Style::default().fg(Color::LightBlue))),
        Line::from(""),
        Line::from(Span::styled(boot.status(), dim_style())),
    ];
    let top = size.height.saturating_sub(lines.len() as u16) / 2;
    let area = Rect {
        x: size.x,
        y: size.y + top,
        width: size.width,
        height: size.height.saturating_sub(top),
    };
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);

    if size.height > 2 {
        let footer_area = Rect { x: size.x + 1, y: size.y + size.height - 1, width: size.width.saturating_sub(1), height: 1 };
        f.render_widget(Paragraph::new(Span::styled(footer, dim_style())), footer_area);
        let hint = Paragraph::new(Span::styled("SPACE to skip", Style::default().fg(Color::DarkGray)))
            .alignment(Alignment::Right);
        let hint_area = Rect { x: size.x, y: size.y + size.height - 1, width: size.width.saturating_sub(1), height: 1 };
        f.render_widget(hint, hint_area);
    }
}

/// Waits one frame for input; true if the user asked to skip.
fn check_skip() -> Result<bool> {
    if event::poll(Duration::from_millis(16))? {
        if let Event::Key(k) = event::read()? {
            if k.kind == KeyEventKind::Press
                && matches!(k.code, KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Esc)
            {
                return Ok(true);
            }
        }
    }
    Ok(false)
}
