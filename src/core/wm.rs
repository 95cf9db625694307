//! Window manager: the single owner of open windows, their stacking order
//! and the active-window reference.
//!
//! Every operation is total. Unknown ids are absorbed as no-ops so that stale
//! references from the taskbar or a surface can never put the shell in an
//! undefined state.

use serde::{Deserialize, Serialize};

use crate::registry;

/// First z value handed out; the counter only ever grows from here.
pub const Z_BASE: u64 = 100;
pub const DEFAULT_SIZE: Size = Size { width: 76, height: 24 };
/// Cells kept free around a freshly opened window.
pub const VIEWPORT_MARGIN: Size = Size { width: 4, height: 2 };
pub const CASCADE_ORIGIN: Point = Point { x: 16, y: 1 };
pub const CASCADE_STEP: Point = Point { x: 4, y: 2 };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: String,
    pub title: String,
    pub icon: String,
    /// Content instance number. The shell resolves the app's content factory
    /// once per instance; a reopened app always gets a new number.
    pub instance: u64,
    pub is_open: bool,
    pub is_minimized: bool,
    /// Reserved. Nothing in the shell sets it yet.
    pub is_maximized: bool,
    pub z_index: u64,
    pub position: Point,
    pub size: Size,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WmIntent {
    Open(String),
    Close(String),
    Minimize(String),
    Focus(String),
    Move { id: String, to: Point },
    SetViewport(Size),
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowManager {
    windows: Vec<WindowRecord>,
    active: Option<String>,
    z_counter: u64,
    next_instance: u64,
    viewport: Size,
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new(Size::new(120, 40))
    }
}

/// Pure reducer form of [`WindowManager::apply`].
pub fn reduce(mut state: WindowManager, intent: WmIntent) -> WindowManager {
    state.apply(intent);
    state
}

impl WindowManager {
    pub fn new(viewport: Size) -> Self {
        Self {
            windows: Vec::new(),
            active: None,
            z_counter: Z_BASE,
            next_instance: 1,
            viewport,
        }
    }

    pub fn apply(&mut self, intent: WmIntent) {
        match intent {
            WmIntent::Open(id) => self.open_app(&id),
            WmIntent::Close(id) => self.close_window(&id),
            WmIntent::Minimize(id) => self.minimize_window(&id),
            WmIntent::Focus(id) => self.focus_window(&id),
            WmIntent::Move { id, to } => self.update_window_position(&id, to),
            WmIntent::SetViewport(size) => self.set_viewport(size),
            WmIntent::Reset => self.reset(),
        }
    }

    // ── Read side ─────────────────────────────────────────────────────────────

    pub fn windows(&self) -> &[WindowRecord] {
        &self.windows
    }

    pub fn get(&self, id: &str) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == id)
    }

    #[cfg(test)]
    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut WindowRecord> {
        self.windows.iter_mut().find(|w| w.id == id)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.as_deref() == Some(id)
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Visible windows, bottom to top.
    pub fn stacking_order(&self) -> Vec<&WindowRecord> {
        let mut visible: Vec<&WindowRecord> =
            self.windows.iter().filter(|w| !w.is_minimized).collect();
        visible.sort_by_key(|w| w.z_index);
        visible
    }

    pub fn topmost_visible(&self) -> Option<&WindowRecord> {
        self.windows
            .iter()
            .filter(|w| !w.is_minimized)
            .max_by_key(|w| w.z_index)
    }

    // ── Operations ────────────────────────────────────────────────────────────

    pub fn open_app(&mut self, app_id: &str) {
        if let Some(win) = self.windows.iter_mut().find(|w| w.id == app_id) {
            win.is_minimized = false;
            self.focus_window(app_id);
            return;
        }

        let Some(app) = registry::find(app_id) else {
            log::debug!("open ignored for unknown app '{app_id}'");
            return;
        };

        let size = self.initial_size();
        let position = self.cascade_position(self.windows.len(), size);
        let z_index = self.next_z();
        let instance = self.next_instance;
        self.next_instance += 1;

        self.windows.push(WindowRecord {
            id: app.id.to_string(),
            title: app.title.to_string(),
            icon: app.icon.to_string(),
            instance,
            is_open: true,
            is_minimized: false,
            is_maximized: false,
            z_index,
            position,
            size,
        });
        self.active = Some(app.id.to_string());
        log::info!("opened '{}' (z={z_index}, instance={instance})", app.id);
    }

    pub fn close_window(&mut self, id: &str) {
        let before = self.windows.len();
        self.windows.retain(|w| w.id != id);
        if self.windows.len() == before {
            return;
        }
        if self.is_active(id) {
            self.active = None;
        }
        log::info!("closed '{id}'");
    }

    pub fn minimize_window(&mut self, id: &str) {
        let Some(win) = self.windows.iter_mut().find(|w| w.id == id) else {
            return;
        };
        if win.is_minimized {
            return;
        }
        win.is_minimized = true;
        if self.is_active(id) {
            self.active = None;
        }
    }

    /// Re-stack `id` on top and make it active. A minimized window is only
    /// re-stacked: it cannot hold focus until something unminimizes it.
    pub fn focus_window(&mut self, id: &str) {
        let Some(idx) = self.windows.iter().position(|w| w.id == id) else {
            return;
        };
        let z = self.next_z();
        let win = &mut self.windows[idx];
        win.z_index = z;
        if !win.is_minimized {
            self.active = Some(win.id.clone());
        }
    }

    pub fn update_window_position(&mut self, id: &str, to: Point) {
        if let Some(win) = self.windows.iter_mut().find(|w| w.id == id) {
            win.position = to;
        }
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Drop every window and the active reference. The z and instance
    /// counters keep running so values are never reissued.
    pub fn reset(&mut self) {
        self.windows.clear();
        self.active = None;
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn next_z(&mut self) -> u64 {
        self.z_counter += 1;
        self.z_counter
    }

    fn initial_size(&self) -> Size {
        let max_w = self.viewport.width.saturating_sub(VIEWPORT_MARGIN.width).max(1);
        let max_h = self.viewport.height.saturating_sub(VIEWPORT_MARGIN.height).max(1);
        Size {
            width: DEFAULT_SIZE.width.min(max_w),
            height: DEFAULT_SIZE.height.min(max_h),
        }
    }

    fn cascade_position(&self, open_count: usize, size: Size) -> Point {
        let n = open_count as i32;
        let x = CASCADE_ORIGIN.x + n * CASCADE_STEP.x;
        let y = CASCADE_ORIGIN.y + n * CASCADE_STEP.y;
        let max_x = i32::from(self.viewport.width) - i32::from(size.width);
        let max_y = i32::from(self.viewport.height) - i32::from(size.height);
        Point {
            x: x.min(max_x).max(0),
            y: y.min(max_y).max(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wm() -> WindowManager {
        WindowManager::new(Size::new(160, 48))
    }

    fn z(wm: &WindowManager, id: &str) -> u64 {
        wm.get(id).map(|w| w.z_index).unwrap_or_default()
    }

    fn assert_invariants(wm: &WindowManager) {
        let mut ids: Vec<&str> = wm.windows().iter().map(|w| w.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), wm.windows().len(), "duplicate window ids");

        let mut zs: Vec<u64> = wm.windows().iter().map(|w| w.z_index).collect();
        zs.sort_unstable();
        zs.dedup();
        assert_eq!(zs.len(), wm.windows().len(), "shared z values");

        assert!(wm.windows().iter().all(|w| w.is_open));
        if let Some(active) = wm.active_id() {
            let win = wm.get(active).expect("active window must exist");
            assert!(!win.is_minimized, "minimized window is active");
        }
    }

    #[test]
    fn repeated_open_never_duplicates() {
        let mut wm = wm();
        for id in ["about", "about", "terminal", "about", "terminal", "snake", "about"] {
            wm.open_app(id);
            assert_invariants(&wm);
        }
        assert_eq!(wm.windows().iter().filter(|w| w.id == "about").count(), 1);
        assert_eq!(wm.windows().len(), 3);
    }

    #[test]
    fn unknown_app_is_ignored() {
        let mut wm = wm();
        wm.open_app("contact");
        assert!(wm.windows().is_empty());
        assert_eq!(wm.active_id(), None);
    }

    #[test]
    fn missing_ids_are_noops() {
        let mut wm = wm();
        wm.open_app("about");
        let before = wm.clone();
        wm.close_window("ghost");
        wm.minimize_window("ghost");
        wm.focus_window("ghost");
        wm.update_window_position("ghost", Point::new(3, 3));
        assert_eq!(wm, before);
    }

    #[test]
    fn z_values_increase_in_call_order() {
        let mut wm = wm();
        let mut last = 0;
        let ops: [(&str, bool); 6] = [
            ("about", true),
            ("projects", true),
            ("about", false),
            ("skills", true),
            ("projects", false),
            ("about", false),
        ];
        for (id, open) in ops {
            if open {
                wm.open_app(id);
            } else {
                wm.focus_window(id);
            }
            let now = z(&wm, id);
            assert!(now > last, "{id}: {now} <= {last}");
            last = now;
        }
        assert_invariants(&wm);
    }

    #[test]
    fn reopen_after_close_builds_fresh_instance_on_top() {
        let mut wm = wm();
        wm.open_app("terminal");
        wm.open_app("about");
        let first = wm.get("terminal").cloned().unwrap();
        let highest = wm.windows().iter().map(|w| w.z_index).max().unwrap();

        wm.close_window("terminal");
        assert!(wm.get("terminal").is_none());
        wm.open_app("terminal");

        let reopened = wm.get("terminal").unwrap();
        assert_ne!(reopened.instance, first.instance);
        assert!(reopened.z_index > highest);
        assert_eq!(wm.active_id(), Some("terminal"));
    }

    #[test]
    fn minimizing_active_window_clears_focus() {
        let mut wm = wm();
        wm.open_app("about");
        wm.minimize_window("about");
        assert_eq!(wm.active_id(), None);
        assert!(wm.get("about").unwrap().is_minimized);
        assert_invariants(&wm);
    }

    #[test]
    fn minimizing_inactive_window_keeps_focus() {
        let mut wm = wm();
        wm.open_app("about");
        wm.open_app("skills");
        wm.minimize_window("about");
        assert_eq!(wm.active_id(), Some("skills"));
    }

    #[test]
    fn minimize_is_idempotent() {
        let mut wm = wm();
        wm.open_app("about");
        wm.minimize_window("about");
        let once = wm.clone();
        wm.minimize_window("about");
        assert_eq!(wm, once);
    }

    #[test]
    fn focus_does_not_unminimize() {
        let mut wm = wm();
        wm.open_app("about");
        wm.open_app("skills");
        wm.minimize_window("about");
        let before = z(&wm, "about");

        wm.focus_window("about");
        let about = wm.get("about").unwrap();
        assert!(about.is_minimized);
        assert!(about.z_index > before);
        assert_eq!(wm.active_id(), Some("skills"));
        assert_invariants(&wm);
    }

    #[test]
    fn focus_makes_visible_window_active() {
        let mut wm = wm();
        wm.open_app("about");
        wm.open_app("skills");
        wm.focus_window("about");
        assert_eq!(wm.active_id(), Some("about"));
        assert_eq!(wm.topmost_visible().map(|w| w.id.as_str()), Some("about"));
    }

    #[test]
    fn position_updates_are_unclamped() {
        let mut wm = wm();
        wm.open_app("about");
        wm.update_window_position("about", Point::new(-40, 500));
        assert_eq!(wm.get("about").unwrap().position, Point::new(-40, 500));
    }

    #[test]
    fn new_windows_cascade_and_stay_inside_viewport() {
        let mut wm = wm();
        wm.open_app("about");
        wm.open_app("projects");
        let a = wm.get("about").unwrap();
        let b = wm.get("projects").unwrap();
        assert_eq!(a.position, CASCADE_ORIGIN);
        assert_eq!(b.position.x - a.position.x, CASCADE_STEP.x);
        assert_eq!(b.position.y - a.position.y, CASCADE_STEP.y);

        for id in ["skills", "terminal", "ai_chat", "snake"] {
            wm.open_app(id);
        }
        let vp = wm.viewport();
        for w in wm.windows() {
            assert!(w.position.x >= 0 && w.position.y >= 0);
            assert!(w.position.x + i32::from(w.size.width) <= i32::from(vp.width));
            assert!(w.position.y + i32::from(w.size.height) <= i32::from(vp.height));
        }
    }

    #[test]
    fn size_is_clamped_to_small_viewports() {
        let mut wm = WindowManager::new(Size::new(50, 20));
        wm.open_app("about");
        let w = wm.get("about").unwrap();
        assert_eq!(w.size, Size::new(46, 18));
        assert_eq!(w.position, Point::new(4, 1));
    }

    #[test]
    fn walkthrough_scenario() {
        let mut wm = wm();
        wm.open_app("about");
        assert_eq!(wm.windows().len(), 1);
        assert!(!wm.get("about").unwrap().is_minimized);
        assert_eq!(wm.active_id(), Some("about"));

        wm.open_app("projects");
        assert_eq!(wm.windows().len(), 2);
        assert_eq!(wm.active_id(), Some("projects"));
        assert!(z(&wm, "projects") > z(&wm, "about"));

        wm.minimize_window("projects");
        assert_eq!(wm.active_id(), None);
        assert!(wm.get("projects").unwrap().is_minimized);

        let before = z(&wm, "projects");
        wm.open_app("projects");
        assert!(!wm.get("projects").unwrap().is_minimized);
        assert_eq!(wm.active_id(), Some("projects"));
        assert!(z(&wm, "projects") > before);
        assert!(wm.windows().iter().all(|w| w.z_index <= z(&wm, "projects")));

        wm.close_window("about");
        assert_eq!(wm.windows().len(), 1);
        assert_eq!(wm.windows()[0].id, "projects");
        assert_eq!(wm.active_id(), Some("projects"));
        assert_invariants(&wm);
    }

    #[test]
    fn reducer_matches_method_calls() {
        let intents = vec![
            WmIntent::Open("about".into()),
            WmIntent::Open("skills".into()),
            WmIntent::Move { id: "about".into(), to: Point::new(7, 9) },
            WmIntent::Minimize("skills".into()),
            WmIntent::Focus("about".into()),
        ];
        let reduced = intents.into_iter().fold(wm(), reduce);

        let mut direct = wm();
        direct.open_app("about");
        direct.open_app("skills");
        direct.update_window_position("about", Point::new(7, 9));
        direct.minimize_window("skills");
        direct.focus_window("about");
        assert_eq!(reduced, direct);
    }

    #[test]
    fn reset_keeps_counters_running() {
        let mut wm = wm();
        wm.open_app("about");
        wm.open_app("snake");
        let high = z(&wm, "snake");
        let instance = wm.get("snake").unwrap().instance;

        wm.apply(WmIntent::Reset);
        assert!(wm.windows().is_empty());
        assert_eq!(wm.active_id(), None);

        wm.open_app("snake");
        assert!(z(&wm, "snake") > high);
        assert!(wm.get("snake").unwrap().instance > instance);
    }

    #[test]
    fn records_serialize() {
        let mut wm = wm();
        wm.open_app("about");
        let json = serde_json::to_string(wm.get("about").unwrap()).unwrap();
        let back: WindowRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, wm.get("about").unwrap());
    }
}
