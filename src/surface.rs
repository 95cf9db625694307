//! Window surface: chrome geometry, hit testing, the drag contract and
//! painting of a single window.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::apps::AppContent;
use crate::core::wm::{Point, WindowManager, WindowRecord};
use crate::ui::{dim_style, sel_style, title_style, write_text};

pub const TITLE_MIN_BUTTON: &str = "[-]";
pub const TITLE_MAX_BUTTON: &str = "[□]";
pub const TITLE_CLOSE_BUTTON: &str = "[X]";
const BUTTON_W: i32 = 3;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Unclipped frame in screen cells; may hang off any edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinRect {
    pub x: i32,
    pub y: i32,
    pub w: u16,
    pub h: u16,
}

impl WinRect {
    pub fn of(win: &WindowRecord, desk: Rect) -> Self {
        if win.is_maximized {
            return Self {
                x: i32::from(desk.x),
                y: i32::from(desk.y),
                w: desk.width,
                h: desk.height,
            };
        }
        Self {
            x: i32::from(desk.x) + win.position.x,
            y: i32::from(desk.y) + win.position.y,
            w: win.size.width,
            h: win.size.height,
        }
    }

    fn right(self) -> i32 {
        self.x + i32::from(self.w)
    }

    fn bottom(self) -> i32 {
        self.y + i32::from(self.h)
    }

    /// The part of the frame inside `bounds`.
    pub fn clip(self, bounds: Rect) -> Option<Rect> {
        let x0 = self.x.max(i32::from(bounds.x));
        let y0 = self.y.max(i32::from(bounds.y));
        let x1 = self.right().min(i32::from(bounds.x) + i32::from(bounds.width));
        let y1 = self.bottom().min(i32::from(bounds.y) + i32::from(bounds.height));
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect {
            x: x0 as u16,
            y: y0 as u16,
            width: (x1 - x0) as u16,
            height: (y1 - y0) as u16,
        })
    }

    /// Narrow frames carry no title buttons.
    fn has_buttons(self) -> bool {
        i32::from(self.w) - 2 > BUTTON_W * 3
    }

    /// Left column of each title button, right-aligned inside the border.
    fn button_x(self, from_right: i32) -> i32 {
        self.right() - 1 - BUTTON_W * from_right
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowHit {
    Title,
    Minimize,
    Maximize,
    Close,
    Content,
}

/// Topmost visible window under `(x, y)` and the part that was hit.
pub fn hit_test(wm: &WindowManager, desk: Rect, x: u16, y: u16) -> Option<(String, WindowHit)> {
    for win in wm.stacking_order().into_iter().rev() {
        let frame = WinRect::of(win, desk);
        let Some(visible) = frame.clip(desk) else { continue };
        if !crate::ui::point_in_rect(x, y, visible) {
            continue;
        }
        let (px, py) = (i32::from(x), i32::from(y));
        let hit = if py == frame.y && frame.has_buttons() {
            let on = |n: i32| px >= frame.button_x(n) && px < frame.button_x(n) + BUTTON_W;
            if on(1) {
                WindowHit::Close
            } else if on(2) {
                WindowHit::Maximize
            } else if on(3) {
                WindowHit::Minimize
            } else {
                WindowHit::Title
            }
        } else if py == frame.y {
            WindowHit::Title
        } else {
            WindowHit::Content
        };
        return Some((win.id.clone(), hit));
    }
    None
}

// ── Drag contract ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragState {
    pub window_id: String,
    pub offset: Point,
}

/// Screen cell to desktop-relative point.
pub fn desk_point(desk: Rect, x: u16, y: u16) -> Point {
    Point::new(i32::from(x) - i32::from(desk.x), i32::from(y) - i32::from(desk.y))
}

/// Title-row press: focus, then remember where inside the frame the pointer
/// grabbed it. Maximized windows only take focus.
pub fn begin_drag(wm: &mut WindowManager, id: &str, pointer: Point) -> Option<DragState> {
    let win = wm.get(id)?;
    let maximized = win.is_maximized;
    let position = win.position;
    wm.focus_window(id);
    if maximized {
        return None;
    }
    Some(DragState {
        window_id: id.to_string(),
        offset: Point::new(pointer.x - position.x, pointer.y - position.y),
    })
}

pub fn drag_to(wm: &mut WindowManager, drag: &DragState, pointer: Point) {
    let to = Point::new(pointer.x - drag.offset.x, pointer.y - drag.offset.y);
    wm.update_window_position(&drag.window_id, to);
}

/// Route a left press inside the desktop to the window surfaces.
/// Returns `None` when no window was hit.
pub fn press(wm: &mut WindowManager, desk: Rect, x: u16, y: u16) -> Option<Option<DragState>> {
    let (id, hit) = hit_test(wm, desk, x, y)?;
    let drag = match hit {
        WindowHit::Close => {
            wm.close_window(&id);
            None
        }
        WindowHit::Minimize => {
            wm.minimize_window(&id);
            None
        }
        WindowHit::Title => begin_drag(wm, &id, desk_point(desk, x, y)),
        WindowHit::Maximize | WindowHit::Content => {
            wm.focus_window(&id);
            None
        }
    };
    Some(drag)
}

// ── Painting ──────────────────────────────────────────────────────────────────

pub fn draw_window(
    f: &mut Frame,
    win: &WindowRecord,
    content: Option<&AppContent>,
    desk: Rect,
    active: bool,
) {
    if win.is_minimized {
        return;
    }
    let frame = WinRect::of(win, desk);
    let Some(area) = frame.clip(desk) else { return };

    f.render_widget(Clear, area);
    let border_style = if active { title_style() } else { dim_style() };
    f.render_widget(
        Block::default().borders(Borders::ALL).border_style(border_style),
        area,
    );

    if frame.y == i32::from(area.y) && area.width > 2 {
        draw_title_row(f, win, frame, area, active);
    }

    if area.width < 4 || area.height < 3 {
        return;
    }
    let inner = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width - 2,
        height: area.height - 2,
    };
    if let Some(content) = content {
        content.draw(f, inner, active);
    }
}

fn draw_title_row(f: &mut Frame, win: &WindowRecord, frame: WinRect, area: Rect, active: bool) {
    let full_w = usize::from(frame.w.saturating_sub(2));
    let mut chars = vec![' '; full_w];
    write_text(&mut chars, 0, &format!(" {} {} ", win.icon, win.title));

    // Buttons sit at fixed offsets from the frame's right border.
    let title_x0 = frame.x + 1;
    let place = |n: i32| (frame.button_x(n) - title_x0).max(0) as usize;
    let has_buttons = frame.has_buttons();
    if has_buttons {
        write_text(&mut chars, place(3), TITLE_MIN_BUTTON);
        write_text(&mut chars, place(2), TITLE_MAX_BUTTON);
        write_text(&mut chars, place(1), TITLE_CLOSE_BUTTON);
    }

    let start = (i32::from(area.x) + 1 - title_x0).max(0) as usize;
    let visible_w = usize::from(area.width - 2);
    let max_btn = place(2);
    let text_style = if active { sel_style() } else { dim_style() };

    // The maximize button is inert and always dim.
    let mut spans: Vec<Span> = Vec::new();
    let mut run = String::new();
    let mut run_dim = false;
    for (i, ch) in chars.iter().enumerate().skip(start).take(visible_w) {
        let inert = has_buttons && i >= max_btn && i < max_btn + BUTTON_W as usize;
        if inert != run_dim && !run.is_empty() {
            let style = if run_dim { dim_style() } else { text_style };
            spans.push(Span::styled(std::mem::take(&mut run), style));
        }
        run_dim = inert;
        run.push(*ch);
    }
    if !run.is_empty() {
        let style = if run_dim { dim_style() } else { text_style };
        spans.push(Span::styled(run, style));
    }

    f.render_widget(
        Paragraph::new(Line::from(spans)),
        Rect {
            x: area.x + 1,
            y: area.y,
            width: area.width - 2,
            height: 1,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::wm::Size;

    const DESK: Rect = Rect { x: 0, y: 1, width: 160, height: 46 };

    fn wm_with(ids: &[&str]) -> WindowManager {
        let mut wm = WindowManager::new(Size::new(DESK.width, DESK.height));
        for id in ids {
            wm.open_app(id);
        }
        wm
    }

    fn title_cell(wm: &WindowManager, id: &str) -> (u16, u16) {
        let frame = WinRect::of(wm.get(id).unwrap(), DESK);
        ((frame.x + 5) as u16, frame.y as u16)
    }

    #[test]
    fn drag_keeps_pointer_offset() {
        let mut wm = wm_with(&["about"]);
        let start = wm.get("about").unwrap().position;
        let (x, y) = title_cell(&wm, "about");

        let drag = press(&mut wm, DESK, x, y).flatten().expect("title press starts a drag");
        assert_eq!(drag.offset, Point::new(5, 0));

        for (dx, dy) in [(3, 1), (-20, 4), (200, -9)] {
            let pointer = Point::new(i32::from(x) + dx, i32::from(y) - 1 + dy);
            drag_to(&mut wm, &drag, pointer);
            let pos = wm.get("about").unwrap().position;
            assert_eq!(pos, Point::new(start.x + dx, start.y + dy));
        }
    }

    #[test]
    fn maximized_window_refuses_drag() {
        let mut wm = wm_with(&["about", "skills"]);
        wm.get_mut("about").unwrap().is_maximized = true;
        wm.focus_window("skills");
        let before = wm.get("about").unwrap().position;

        let drag = begin_drag(&mut wm, "about", Point::new(3, 0));
        assert!(drag.is_none());
        assert_eq!(wm.active_id(), Some("about"));
        assert_eq!(wm.get("about").unwrap().position, before);
        assert_eq!(WinRect::of(wm.get("about").unwrap(), DESK).h, DESK.height);
    }

    #[test]
    fn minimized_window_is_never_hit() {
        let mut wm = wm_with(&["about"]);
        let (x, y) = title_cell(&wm, "about");
        wm.minimize_window("about");
        assert_eq!(hit_test(&wm, DESK, x, y + 2), None);
        assert_eq!(press(&mut wm, DESK, x, y), None);
    }

    #[test]
    fn topmost_window_wins() {
        let mut wm = wm_with(&["about", "projects"]);
        // projects cascades 4 right / 2 down, overlapping about.
        let p = WinRect::of(wm.get("projects").unwrap(), DESK);
        let (x, y) = ((p.x + 2) as u16, (p.y + 3) as u16);
        assert_eq!(hit_test(&wm, DESK, x, y).map(|h| h.0), Some("projects".into()));

        wm.focus_window("about");
        assert_eq!(hit_test(&wm, DESK, x, y).map(|h| h.0), Some("about".into()));
    }

    #[test]
    fn title_buttons() {
        let mut wm = wm_with(&["about", "skills"]);
        let frame = WinRect::of(wm.get("about").unwrap(), DESK);
        let y = frame.y as u16;
        let at = |n: i32| (frame.button_x(n) + 1) as u16;

        wm.focus_window("about");
        assert_eq!(hit_test(&wm, DESK, at(1), y).unwrap().1, WindowHit::Close);
        assert_eq!(hit_test(&wm, DESK, at(2), y).unwrap().1, WindowHit::Maximize);
        assert_eq!(hit_test(&wm, DESK, at(3), y).unwrap().1, WindowHit::Minimize);
        assert_eq!(hit_test(&wm, DESK, at(3), y + 1).unwrap().1, WindowHit::Content);
    }

    #[test]
    fn narrow_frame_has_no_button_zones() {
        let mut wm = wm_with(&["about"]);
        wm.get_mut("about").unwrap().size = Size::new(11, 5);
        let frame = WinRect::of(wm.get("about").unwrap(), DESK);
        let y = frame.y as u16;
        for n in 1..=3 {
            let x = (frame.button_x(n) + 1) as u16;
            assert_eq!(hit_test(&wm, DESK, x, y).unwrap().1, WindowHit::Title);
        }
        assert!(press(&mut wm, DESK, (frame.button_x(1) + 1) as u16, y).flatten().is_some());
        assert!(wm.get("about").is_some());

        wm.get_mut("about").unwrap().size = Size::new(12, 5);
        let frame = WinRect::of(wm.get("about").unwrap(), DESK);
        let x = (frame.button_x(1) + 1) as u16;
        assert_eq!(hit_test(&wm, DESK, x, frame.y as u16).unwrap().1, WindowHit::Close);
    }

    #[test]
    fn minimize_and_close_do_not_refocus() {
        let mut wm = wm_with(&["about", "skills"]);
        wm.focus_window("about");
        let skills_z = wm.get("skills").unwrap().z_index;

        // about is on top now; move skills clear of it so its buttons are exposed.
        wm.update_window_position("skills", Point::new(60, 20));
        let frame = WinRect::of(wm.get("skills").unwrap(), DESK);
        let minimize = ((frame.button_x(3) + 1) as u16, frame.y as u16);

        assert_eq!(press(&mut wm, DESK, minimize.0, minimize.1), Some(None));
        let skills = wm.get("skills").unwrap();
        assert!(skills.is_minimized);
        assert_eq!(skills.z_index, skills_z);
        assert_eq!(wm.active_id(), Some("about"));

        let frame = WinRect::of(wm.get("about").unwrap(), DESK);
        let close = ((frame.button_x(1) + 1) as u16, frame.y as u16);
        press(&mut wm, DESK, close.0, close.1);
        assert!(wm.get("about").is_none());
        assert_eq!(wm.active_id(), None);
    }

    #[test]
    fn maximize_button_only_focuses() {
        let mut wm = wm_with(&["about", "skills"]);
        wm.update_window_position("about", Point::new(0, 30));
        let frame = WinRect::of(wm.get("about").unwrap(), DESK);
        let (x, y) = ((frame.button_x(2) + 1) as u16, frame.y as u16);
        assert_eq!(press(&mut wm, DESK, x, y), Some(None));
        let about = wm.get("about").unwrap();
        assert!(!about.is_maximized);
        assert_eq!(wm.active_id(), Some("about"));
    }

    #[test]
    fn clip_drops_offscreen_frames() {
        let r = WinRect { x: -50, y: 5, w: 20, h: 5 };
        assert_eq!(r.clip(DESK), None);
        let r = WinRect { x: -5, y: 0, w: 20, h: 5 };
        assert_eq!(r.clip(DESK), Some(Rect::new(0, 1, 15, 4)));
    }
}
