use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    Terminal,
};

use crate::config::current_theme_color;

pub type Term = Terminal<ratatui::backend::CrosstermBackend<std::io::Stdout>>;

// ── Layout helpers ────────────────────────────────────────────────────────────

/// A `w`x`h` rect centred in `area`, shrunk to fit.
pub fn centered_rect(w: u16, h: u16, area: Rect) -> Rect {
    let w = w.min(area.width);
    let h = h.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

// ── Color helpers ─────────────────────────────────────────────────────────────

pub fn normal_style()   -> Style { Style::default().fg(current_theme_color()) }
pub fn sel_style()      -> Style { Style::default().fg(Color::Black).bg(current_theme_color()).add_modifier(Modifier::BOLD) }
pub fn title_style()    -> Style { Style::default().fg(current_theme_color()).add_modifier(Modifier::BOLD) }
pub fn dim_style()      -> Style { Style::default().fg(Color::Gray).add_modifier(Modifier::DIM) }

// ── Cell text helpers ─────────────────────────────────────────────────────────

pub fn point_in_rect(x: u16, y: u16, r: Rect) -> bool {
    x >= r.x && x < r.x.saturating_add(r.width) && y >= r.y && y < r.y.saturating_add(r.height)
}

pub fn write_text(buf: &mut [char], start: usize, text: &str) {
    for (i, ch) in text.chars().enumerate() {
        let idx = start + i;
        if idx >= buf.len() {
            break;
        }
        buf[idx] = ch;
    }
}

pub fn write_text_in_area(buf: &mut [char], area: Rect, x: u16, text: &str) {
    if x < area.x {
        return;
    }
    let start = (x - area.x) as usize;
    write_text(buf, start, text);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_fits_inside() {
        let area = Rect::new(10, 5, 40, 20);
        assert_eq!(centered_rect(20, 10, area), Rect::new(20, 10, 20, 10));
        assert_eq!(centered_rect(99, 99, area), area);
    }

    #[test]
    fn write_text_clips_at_end() {
        let mut row = vec![' '; 5];
        write_text(&mut row, 3, "abc");
        assert_eq!(row.iter().collect::<String>(), "   ab");
    }

    #[test]
    fn point_in_rect_excludes_far_edge() {
        let r = Rect::new(2, 2, 3, 1);
        assert!(point_in_rect(4, 2, r));
        assert!(!point_in_rect(5, 2, r));
        assert!(!point_in_rect(2, 3, r));
    }
}
