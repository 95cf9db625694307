//! Shell chrome rules that do not depend on rendering.

use super::wm::{WindowManager, WmIntent};

/// What a taskbar (or start menu) click on `app_id` should do.
///
/// Hides the window when it is the visible, focused one; otherwise opens,
/// restores or refocuses it through `open_app`.
pub fn taskbar_intent(wm: &WindowManager, app_id: &str) -> WmIntent {
    match wm.get(app_id) {
        Some(win) if !win.is_minimized && wm.is_active(app_id) => {
            WmIntent::Minimize(app_id.to_string())
        }
        _ => WmIntent::Open(app_id.to_string()),
    }
}

pub fn is_compact(width: u16, threshold: u16) -> bool {
    width < threshold
}

/// Window that Tab should bring forward: the bottom-most visible one, so
/// repeated presses rotate through every visible window.
pub fn next_window(wm: &WindowManager) -> Option<String> {
    wm.stacking_order().first().map(|w| w.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::wm::{Size, WindowManager};

    #[test]
    fn taskbar_toggle_sequence() {
        let mut wm = WindowManager::new(Size::new(160, 48));
        let mut seen = Vec::new();

        wm.open_app("about");
        let mut step = |wm: &mut WindowManager| {
            let intent = taskbar_intent(wm, "about");
            seen.push(intent.clone());
            wm.apply(intent);
        };

        step(&mut wm);
        assert!(wm.get("about").unwrap().is_minimized);
        assert_eq!(wm.active_id(), None);

        step(&mut wm);
        assert!(!wm.get("about").unwrap().is_minimized);
        assert!(wm.is_active("about"));

        step(&mut wm);
        assert!(wm.get("about").unwrap().is_minimized);
        assert_eq!(wm.active_id(), None);

        assert_eq!(
            seen,
            vec![
                WmIntent::Minimize("about".into()),
                WmIntent::Open("about".into()),
                WmIntent::Minimize("about".into()),
            ]
        );
    }

    #[test]
    fn taskbar_opens_unopened_app() {
        let wm = WindowManager::new(Size::new(160, 48));
        assert_eq!(taskbar_intent(&wm, "snake"), WmIntent::Open("snake".into()));
    }

    #[test]
    fn taskbar_refocuses_inactive_window() {
        let mut wm = WindowManager::new(Size::new(160, 48));
        wm.open_app("about");
        wm.open_app("skills");
        assert_eq!(taskbar_intent(&wm, "about"), WmIntent::Open("about".into()));
        wm.apply(taskbar_intent(&wm, "about"));
        assert_eq!(wm.active_id(), Some("about"));
    }

    #[test]
    fn compact_threshold() {
        assert!(is_compact(99, 100));
        assert!(!is_compact(100, 100));
    }

    #[test]
    fn tab_cycles_through_visible_windows() {
        let mut wm = WindowManager::new(Size::new(160, 48));
        assert_eq!(next_window(&wm), None);
        wm.open_app("about");
        wm.open_app("skills");
        wm.open_app("snake");

        let mut visited = Vec::new();
        for _ in 0..3 {
            let id = next_window(&wm).unwrap();
            wm.focus_window(&id);
            visited.push(id);
        }
        assert_eq!(visited, ["about", "skills", "snake"]);
    }
}
