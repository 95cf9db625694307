//! Top-level screen state: boot, login and the desktop, plus the window
//! manager the desktop drives.
//!
//! Transitions:
//!   Boot    --BootComplete-->   Login
//!   Login   --LoginSubmitted--> Desktop
//!   Desktop --Logout-->         Login   (all windows torn down)
//!
//! Every other event is ignored in the current screen.

use crate::core::wm::{Size, WindowManager, WmIntent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Boot,
    Login,
    Desktop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    BootComplete,
    LoginSubmitted,
    Logout,
    Window(WmIntent),
}

#[derive(Debug, Clone)]
pub struct Session {
    screen: Screen,
    pub wm: WindowManager,
    /// The compact shell greets with `about` once per process.
    pub compact_welcome_shown: bool,
}

impl Session {
    pub fn new(viewport: Size) -> Self {
        Self {
            screen: Screen::Boot,
            wm: WindowManager::new(viewport),
            compact_welcome_shown: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Apply `event`; returns whether the screen changed.
    pub fn apply(&mut self, event: SessionEvent) -> bool {
        let next = match (self.screen, event) {
            (Screen::Boot, SessionEvent::BootComplete) => Screen::Login,
            (Screen::Login, SessionEvent::LoginSubmitted) => Screen::Desktop,
            (Screen::Desktop, SessionEvent::Logout) => {
                self.wm.reset();
                Screen::Login
            }
            (Screen::Desktop, SessionEvent::Window(intent)) => {
                self.wm.apply(intent);
                return false;
            }
            (screen, event) => {
                log::debug!("ignored {event:?} on {screen:?}");
                return false;
            }
        };
        log::info!("screen {:?} -> {next:?}", self.screen);
        self.screen = next;
        true
    }
}
