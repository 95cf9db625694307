use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use env_logger::{Env, Target};
use ratatui::backend::CrosstermBackend;
use std::fs::OpenOptions;
use std::io::stdout;

mod apps;
mod auth;
mod boot;
mod config;
mod core;
mod desktop;
mod mobile;
mod registry;
mod session;
mod status;
mod surface;
mod ui;

use auth::{login_screen, LoginOutcome};
use config::get_settings;
use crate::core::shell::is_compact;
use crate::core::wm::Size;
use desktop::{desktop_mode, DesktopExit};
use session::{Screen, Session, SessionEvent};
use ui::Term;

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
struct Options {
    skip_boot: bool,
    force_compact: bool,
    skip_login: bool,
}

impl Options {
    fn from_args(args: &[String]) -> Self {
        Self {
            skip_boot: args.contains(&"--no-boot".to_string()),
            force_compact: args.contains(&"--compact".to_string()),
            skip_login: args.contains(&"--desktop".to_string()),
        }
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// The TUI owns the screen, so log lines go to a file.
fn init_logging() {
    let path = config::log_file();
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init();
    log::info!("{} {} starting", config::APP_NAME, config::VERSION);
}

// ── Terminal setup / teardown ─────────────────────────────────────────────────

fn init_terminal() -> Result<Term> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(ratatui::Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

// ── Session loop ──────────────────────────────────────────────────────────────

fn compact_now(terminal: &Term, opts: Options) -> Result<bool> {
    let width = terminal.size()?.width;
    Ok(opts.force_compact || is_compact(width, get_settings().compact_width))
}

fn run(terminal: &mut Term, opts: Options) -> Result<()> {
    config::reload_settings();
    let ts = terminal.size()?;
    let mut session = Session::new(Size::new(ts.width, ts.height.saturating_sub(2)));

    if get_settings().bootup && !opts.skip_boot {
        boot::bootup(terminal)?;
    }
    session.apply(SessionEvent::BootComplete);
    if opts.skip_login {
        session.apply(SessionEvent::LoginSubmitted);
    }

    loop {
        match session.screen() {
            Screen::Boot => {
                session.apply(SessionEvent::BootComplete);
            }
            Screen::Login => {
                let compact = compact_now(terminal, opts)?;
                match login_screen(terminal, compact)? {
                    LoginOutcome::LoggedIn => {
                        session.apply(SessionEvent::LoginSubmitted);
                    }
                    LoginOutcome::Shutdown => break,
                }
            }
            Screen::Desktop => match desktop_mode(terminal, &mut session, opts.force_compact)? {
                DesktopExit::Logout => {
                    session.apply(SessionEvent::Logout);
                }
                DesktopExit::Shutdown => break,
            },
        }
    }
    log::info!("shutdown");
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let opts = Options::from_args(&args);
    init_logging();

    let mut terminal = init_terminal()?;

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| run(&mut terminal, opts)));

    // Always restore terminal
    restore_terminal(&mut terminal).ok();
    print!("{}", crossterm::terminal::Clear(crossterm::terminal::ClearType::All));

    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            log::error!("fatal: {e:#}");
            Err(e)
        }
        Err(_) => {
            log::error!("panic in session loop");
            eprintln!("YuzuOS crashed. Check {}", config::log_file().display());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("yuzuos").chain(list.iter().copied()).map(String::from).collect()
    }

    #[test]
    fn flags_parse_independently() {
        let o = Options::from_args(&args(&[]));
        assert!(!o.skip_boot && !o.force_compact && !o.skip_login);
        let o = Options::from_args(&args(&["--compact", "--no-boot"]));
        assert!(o.skip_boot && o.force_compact && !o.skip_login);
        let o = Options::from_args(&args(&["--desktop"]));
        assert!(o.skip_login);
    }
}
