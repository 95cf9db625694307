use chrono::Local;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::ui::{sel_style, write_text};

// ── Power indicator ───────────────────────────────────────────────────────────

const POWER_SUPPLY_DIR: &str = "/sys/class/power_supply";
const POWER_REFRESH: Duration = Duration::from_secs(30);

/// What the status bar shows for power: a charge level, or mains.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Power {
    Battery(u8),
    Mains,
}

impl Power {
    pub fn label(self) -> String {
        match self {
            Power::Battery(pct) => format!("[{pct}%]"),
            Power::Mains => "[AC]".to_string(),
        }
    }
}

/// First `Battery` supply under `dir`; anything unreadable counts as mains.
fn probe_power(dir: &Path) -> Power {
    let Ok(entries) = std::fs::read_dir(dir) else { return Power::Mains };
    entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| read_trimmed(&p.join("type")).as_deref() == Some("Battery"))
        .find_map(|p| read_trimmed(&p.join("capacity"))?.parse::<u8>().ok())
        .map_or(Power::Mains, |pct| Power::Battery(pct.min(100)))
}

fn read_trimmed(path: &Path) -> Option<String> {
    std::fs::read_to_string(path).ok().map(|s| s.trim().to_string())
}

static POWER: Mutex<Option<(Power, Instant)>> = Mutex::new(None);

/// Sysfs is re-read at most every `POWER_REFRESH`; the bar redraws every frame.
fn current_power() -> Power {
    let Ok(mut cached) = POWER.lock() else { return Power::Mains };
    match *cached {
        Some((power, at)) if at.elapsed() < POWER_REFRESH => power,
        _ => {
            let power = probe_power(Path::new(POWER_SUPPLY_DIR));
            *cached = Some((power, Instant::now()));
            power
        }
    }
}

pub fn clock_hm() -> String {
    Local::now().format("%H:%M").to_string()
}

/// Right-hand indicators: network, power, `HH:MM`.
pub fn indicators() -> String {
    format!("((•)) {} {}", current_power().label(), clock_hm())
}

/// One-row bar: `label` on the left, indicators on the right.
pub fn status_line(width: usize, label: &str) -> String {
    let mut row = vec![' '; width];
    write_text(&mut row, 0, &format!(" {label}"));
    let right = format!("{} ", indicators());
    let len = right.chars().count();
    if width > len + label.chars().count() + 1 {
        write_text(&mut row, width - len, &right);
    }
    row.into_iter().collect()
}

// ── Status bar ────────────────────────────────────────────────────────────────

pub fn render_status_bar(f: &mut Frame, area: Rect, label: &str) {
    if area.height == 0 { return; }
    let line = status_line(area.width as usize, label);
    f.render_widget(Paragraph::new(Line::from(Span::styled(line, sel_style()))), area);
}
