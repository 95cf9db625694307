use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::apps::AppContent;
use crate::config::{cycle_theme, get_settings};
use crate::core::shell::{is_compact, next_window, taskbar_intent};
use crate::core::wm::{Size, WindowManager, WmIntent};
use crate::mobile::{MobileAction, MobileShell};
use crate::registry::{self, AppDescriptor, APPS, DEFAULT_APP};
use crate::session::{Session, SessionEvent};
use crate::status::{clock_hm, render_status_bar};
use crate::surface::{self, desk_point, drag_to, DragState};
use crate::ui::{
    dim_style, normal_style, point_in_rect, sel_style, title_style, write_text,
    write_text_in_area, Term,
};

const WELCOME_DELAY: Duration = Duration::from_millis(500);
const TASK_START_BUTTON: &str = "[Start]";
const TASK_START_SEPARATOR: &str = " | ";
const ICON_W: u16 = 12;
const ICON_PITCH: u16 = 3;
const START_MENU_W: u16 = 34;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesktopExit {
    Logout,
    Shutdown,
}

// ── Start menu ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StartItem {
    App(&'static str),
    Logout,
    Shutdown,
}

/// Visual rows of the start menu; `None` is a separator.
fn start_rows() -> Vec<Option<StartItem>> {
    let mut rows: Vec<Option<StartItem>> =
        APPS.iter().map(|a| Some(StartItem::App(a.id))).collect();
    rows.push(None);
    rows.push(Some(StartItem::Logout));
    rows.push(Some(StartItem::Shutdown));
    rows
}

fn start_items() -> Vec<StartItem> {
    start_rows().into_iter().flatten().collect()
}

fn start_item_label(item: StartItem) -> String {
    match item {
        StartItem::App(id) => match registry::find(id) {
            Some(app) => format!("{} {}", app.icon, app.title),
            None => id.to_string(),
        },
        StartItem::Logout => "Logout".to_string(),
        StartItem::Shutdown => "Shutdown".to_string(),
    }
}

#[derive(Debug, Default)]
struct StartMenu {
    open: bool,
    selected: usize,
}

impl StartMenu {
    fn toggle(&mut self) {
        self.open = !self.open;
        self.selected = 0;
    }

    fn close(&mut self) {
        self.open = false;
    }
}

// ── Desktop state ─────────────────────────────────────────────────────────────

struct DesktopState {
    /// Live app content keyed by window instance.
    contents: HashMap<u64, AppContent>,
    dragging: Option<DragState>,
    start: StartMenu,
    welcome_at: Option<Instant>,
    mobile: Option<MobileShell>,
    force_compact: bool,
}

impl DesktopState {
    fn new(force_compact: bool) -> Self {
        Self {
            contents: HashMap::new(),
            dragging: None,
            start: StartMenu::default(),
            welcome_at: None,
            mobile: None,
            force_compact,
        }
    }

    fn compact(&self, width: u16) -> bool {
        self.force_compact || is_compact(width, get_settings().compact_width)
    }
}

/// Build content for new windows and drop content whose window is gone.
fn sync_contents(contents: &mut HashMap<u64, AppContent>, wm: &WindowManager) {
    contents.retain(|instance, _| wm.windows().iter().any(|w| w.instance == *instance));
    for win in wm.windows() {
        if contents.contains_key(&win.instance) {
            continue;
        }
        if let Some(content) = registry::build_content(&win.id) {
            contents.insert(win.instance, content);
        }
    }
}

fn active_content<'a>(
    contents: &'a mut HashMap<u64, AppContent>,
    wm: &WindowManager,
) -> Option<&'a mut AppContent> {
    let active = wm.active_id()?;
    let instance = wm.get(active)?.instance;
    contents.get_mut(&instance)
}

// ── Entry point ───────────────────────────────────────────────────────────────

pub fn desktop_mode(terminal: &mut Term, session: &mut Session, force_compact: bool) -> Result<DesktopExit> {
    let _ = terminal.hide_cursor();
    execute!(terminal.backend_mut(), EnableMouseCapture)?;
    let result = run_desktop_loop(terminal, session, force_compact);
    let _ = execute!(terminal.backend_mut(), DisableMouseCapture);
    let _ = terminal.show_cursor();
    result
}

fn run_desktop_loop(terminal: &mut Term, session: &mut Session, force_compact: bool) -> Result<DesktopExit> {
    let mut state = DesktopState::new(force_compact);
    let ts = terminal.size()?;
    let size = full_rect(ts.width, ts.height);
    set_viewport(session, size);
    if !state.compact(size.width) && get_settings().auto_open_welcome {
        state.welcome_at = Some(Instant::now() + WELCOME_DELAY);
    }

    loop {
        let ts = terminal.size()?;
        let compact = state.compact(ts.width);
        if compact && state.mobile.is_none() {
            let greet = !session.compact_welcome_shown;
            session.compact_welcome_shown = true;
            state.mobile = Some(MobileShell::new(greet));
        }

        if let Some(at) = state.welcome_at {
            if Instant::now() >= at {
                state.welcome_at = None;
                session.apply(SessionEvent::Window(WmIntent::Open(DEFAULT_APP.to_string())));
            }
        }
        sync_contents(&mut state.contents, &session.wm);
        for content in state.contents.values_mut() {
            content.tick();
        }
        if let Some(mobile) = state.mobile.as_mut() {
            mobile.tick();
        }

        terminal.draw(|f| {
            if compact {
                if let Some(mobile) = state.mobile.as_ref() {
                    let area = f.area();
                    mobile.draw(f, area);
                }
            } else {
                draw_desktop(f, session, &state);
            }
        })?;

        if !event::poll(Duration::from_millis(16))? {
            continue;
        }
        let exit = match event::read()? {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press && key.kind != KeyEventKind::Repeat {
                    continue;
                }
                if compact {
                    mobile_exit(state.mobile.as_mut().and_then(|m| m.handle_key(key)))
                } else {
                    handle_key(session, &mut state, key)
                }
            }
            Event::Mouse(mouse) => {
                let size = full_rect(ts.width, ts.height);
                if compact {
                    mobile_exit(state.mobile.as_mut().and_then(|m| m.handle_mouse(size, mouse)))
                } else {
                    handle_mouse(session, &mut state, size, mouse)
                }
            }
            Event::Resize(w, h) => {
                set_viewport(session, full_rect(w, h));
                None
            }
            _ => None,
        };
        if let Some(exit) = exit {
            log::info!("desktop exit: {exit:?}");
            return Ok(exit);
        }
    }
}

fn mobile_exit(action: Option<MobileAction>) -> Option<DesktopExit> {
    match action {
        Some(MobileAction::Logout) => Some(DesktopExit::Logout),
        None => None,
    }
}

fn set_viewport(session: &mut Session, size: Rect) {
    let desk = desktop_area(size);
    session.apply(SessionEvent::Window(WmIntent::SetViewport(Size::new(desk.width, desk.height))));
}

// ── Input ─────────────────────────────────────────────────────────────────────

fn handle_key(session: &mut Session, state: &mut DesktopState, key: KeyEvent) -> Option<DesktopExit> {
    if state.start.open {
        let items = start_items();
        match key.code {
            KeyCode::Esc | KeyCode::F(10) => state.start.close(),
            KeyCode::Up => state.start.selected = state.start.selected.saturating_sub(1),
            KeyCode::Down => {
                state.start.selected = (state.start.selected + 1).min(items.len().saturating_sub(1))
            }
            KeyCode::Enter => {
                let item = items.get(state.start.selected).copied();
                state.start.close();
                return item.and_then(|item| run_start_item(session, item));
            }
            _ => {}
        }
        return None;
    }

    let wm = &session.wm;
    let intent = match key.code {
        KeyCode::F(10) => {
            state.start.toggle();
            None
        }
        KeyCode::F(9) => {
            cycle_theme();
            None
        }
        KeyCode::F(2) => wm.active_id().map(|id| WmIntent::Minimize(id.to_string())),
        KeyCode::F(4) => wm.active_id().map(|id| WmIntent::Close(id.to_string())),
        KeyCode::Tab => next_window(wm).map(WmIntent::Focus),
        _ => {
            if let Some(content) = active_content(&mut state.contents, &session.wm) {
                content.handle_key(key);
            }
            None
        }
    };
    if let Some(intent) = intent {
        session.apply(SessionEvent::Window(intent));
    }
    None
}

fn run_start_item(session: &mut Session, item: StartItem) -> Option<DesktopExit> {
    match item {
        StartItem::App(id) => {
            let intent = taskbar_intent(&session.wm, id);
            session.apply(SessionEvent::Window(intent));
            None
        }
        StartItem::Logout => Some(DesktopExit::Logout),
        StartItem::Shutdown => Some(DesktopExit::Shutdown),
    }
}

fn handle_mouse(
    session: &mut Session,
    state: &mut DesktopState,
    size: Rect,
    mouse: MouseEvent,
) -> Option<DesktopExit> {
    let desk = desktop_area(size);
    let task = taskbar_area(size);
    let (x, y) = (mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Drag(MouseButton::Left) => {
            if let Some(drag) = state.dragging.as_ref() {
                drag_to(&mut session.wm, drag, desk_point(desk, x, y));
            }
            return None;
        }
        MouseEventKind::Up(MouseButton::Left) => {
            state.dragging = None;
            return None;
        }
        // A drag never outlives its press, even if the release was lost.
        MouseEventKind::Down(MouseButton::Left) => state.dragging = None,
        _ => return None,
    }

    if state.start.open {
        let menu = start_menu_rect(task);
        if point_in_rect(x, y, menu) {
            if let Some(item) = start_menu_item_at(menu, x, y) {
                state.start.close();
                return run_start_item(session, item);
            }
            return None;
        }
        if !point_in_rect(x, y, start_button_rect(task)) {
            state.start.close();
        }
    }

    if point_in_rect(x, y, task) {
        if point_in_rect(x, y, start_button_rect(task)) {
            state.start.toggle();
            return None;
        }
        if let Some(btn) = taskbar_layout(task).into_iter().find(|b| point_in_rect(x, y, b.rect)) {
            let intent = taskbar_intent(&session.wm, btn.app_id);
            session.apply(SessionEvent::Window(intent));
        }
        return None;
    }

    if !point_in_rect(x, y, desk) {
        return None;
    }
    if let Some(drag) = surface::press(&mut session.wm, desk, x, y) {
        state.dragging = drag;
        return None;
    }
    if let Some((app, _)) = icon_rects(desk).into_iter().find(|(_, r)| point_in_rect(x, y, *r)) {
        session.apply(SessionEvent::Window(WmIntent::Open(app.id.to_string())));
    }
    None
}

// ── Layout ────────────────────────────────────────────────────────────────────

fn full_rect(width: u16, height: u16) -> Rect {
    Rect { x: 0, y: 0, width, height }
}

fn top_status_area(size: Rect) -> Rect {
    Rect {
        x: size.x,
        y: size.y,
        width: size.width,
        height: if size.height > 0 { 1 } else { 0 },
    }
}

fn taskbar_area(size: Rect) -> Rect {
    Rect {
        x: size.x,
        y: size.y + size.height.saturating_sub(1),
        width: size.width,
        height: if size.height > 1 { 1 } else { 0 },
    }
}

/// Everything between the status row and the taskbar.
fn desktop_area(size: Rect) -> Rect {
    let top = if size.height > 0 { 1 } else { 0 };
    let bottom = if size.height > 1 { 1 } else { 0 };
    Rect {
        x: size.x,
        y: size.y + top,
        width: size.width,
        height: size.height.saturating_sub(top + bottom),
    }
}

fn start_button_rect(task: Rect) -> Rect {
    Rect {
        x: task.x,
        y: task.y,
        width: (TASK_START_BUTTON.len() as u16).min(task.width),
        height: task.height,
    }
}

/// Menu item under a point; the border rows and columns hold none.
fn start_menu_item_at(menu: Rect, x: u16, y: u16) -> Option<StartItem> {
    let inner_right = menu.x + menu.width.saturating_sub(1);
    if y <= menu.y || x <= menu.x || x >= inner_right {
        return None;
    }
    start_rows().get(usize::from(y - menu.y - 1)).copied().flatten()
}

fn start_menu_rect(task: Rect) -> Rect {
    let h = start_rows().len() as u16 + 2;
    Rect {
        x: task.x,
        y: task.y.saturating_sub(h),
        width: START_MENU_W.min(task.width.max(12)),
        height: h.min(task.y),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TaskButton {
    app_id: &'static str,
    rect: Rect,
}

fn task_button_text(app: &AppDescriptor, wm: &WindowManager) -> String {
    let mark = match wm.get(app.id) {
        Some(_) if wm.is_active(app.id) => '*',
        Some(_) => '·',
        None => ' ',
    };
    format!(" {} {}{mark}", app.icon, app.title)
}

/// One button per registry app after `[Start] | `, dropping those that do
/// not fit before the clock.
fn taskbar_layout(task: Rect) -> Vec<TaskButton> {
    let clock_w = clock_hm().chars().count() as u16 + 2;
    let limit = task.x + task.width.saturating_sub(clock_w);
    let mut x = task.x + (TASK_START_BUTTON.len() + TASK_START_SEPARATOR.len()) as u16;
    let mut out = Vec::new();
    for app in APPS {
        let w = (app.icon.chars().count() + app.title.chars().count() + 3) as u16;
        if x + w > limit {
            break;
        }
        out.push(TaskButton {
            app_id: app.id,
            rect: Rect { x, y: task.y, width: w, height: 1 },
        });
        x += w + 1;
    }
    out
}

/// Desktop icons run down the left column, one per registry app.
fn icon_rects(desk: Rect) -> Vec<(&'static AppDescriptor, Rect)> {
    if desk.width < ICON_W + 2 {
        return Vec::new();
    }
    APPS.iter()
        .enumerate()
        .map(|(i, app)| {
            let r = Rect {
                x: desk.x + 2,
                y: desk.y + 1 + i as u16 * ICON_PITCH,
                width: ICON_W,
                height: 2,
            };
            (app, r)
        })
        .filter(|(_, r)| r.y + r.height <= desk.y + desk.height)
        .collect()
}

// ── Drawing ───────────────────────────────────────────────────────────────────

fn draw_desktop(f: &mut Frame, session: &Session, state: &DesktopState) {
    let size = f.area();
    let desk = desktop_area(size);
    let task = taskbar_area(size);

    f.render_widget(Clear, size);
    render_status_bar(f, top_status_area(size), "YuzuOS");
    draw_icons(f, desk);

    let wm = &session.wm;
    for win in wm.stacking_order() {
        let content = state.contents.get(&win.instance);
        surface::draw_window(f, win, content, desk, wm.is_active(&win.id));
    }

    draw_taskbar(f, wm, task);
    if state.start.open {
        draw_start_menu(f, task, state.start.selected);
    }
}

fn draw_icons(f: &mut Frame, desk: Rect) {
    for (app, r) in icon_rects(desk) {
        let lines = vec![
            Line::from(Span::styled(format!(" {} ", app.icon), title_style().fg(app.color))),
            Line::from(Span::styled(app.title, normal_style())),
        ];
        f.render_widget(Paragraph::new(lines), r);
    }
}

fn draw_taskbar(f: &mut Frame, wm: &WindowManager, task: Rect) {
    if task.height == 0 || task.width == 0 {
        return;
    }
    let width = task.width as usize;
    let mut row = vec![' '; width];
    write_text_in_area(&mut row, task, task.x, TASK_START_BUTTON);
    write_text_in_area(
        &mut row,
        task,
        task.x.saturating_add(start_button_rect(task).width),
        TASK_START_SEPARATOR,
    );
    for btn in taskbar_layout(task) {
        if let Some(app) = registry::find(btn.app_id) {
            write_text_in_area(&mut row, task, btn.rect.x, &task_button_text(app, wm));
        }
    }
    let clock = format!("{} ", clock_hm());
    let clock_len = clock.chars().count();
    if width > clock_len {
        write_text(&mut row, width - clock_len, &clock);
    }

    let line: String = row.into_iter().collect();
    f.render_widget(Paragraph::new(Line::from(Span::styled(line, sel_style()))), task);
}

fn format_menu_row(width: usize, label: &str) -> String {
    let mut chars = vec![' '; width];
    write_text(&mut chars, 0, &format!(" {label}"));
    chars.into_iter().collect()
}

fn draw_start_menu(f: &mut Frame, task: Rect, selected: usize) {
    let menu = start_menu_rect(task);
    if menu.height < 3 {
        return;
    }
    f.render_widget(Clear, menu);
    f.render_widget(Block::default().borders(Borders::ALL).style(title_style()), menu);

    let inner_w = menu.width.saturating_sub(2) as usize;
    let mut idx = 0;
    let mut lines = Vec::new();
    for row in start_rows() {
        match row {
            Some(item) => {
                let style = if idx == selected { sel_style() } else { normal_style() };
                lines.push(Line::from(Span::styled(
                    format_menu_row(inner_w, &start_item_label(item)),
                    style,
                )));
                idx += 1;
            }
            None => lines.push(Line::from(Span::styled("-".repeat(inner_w), dim_style()))),
        }
    }
    f.render_widget(
        Paragraph::new(lines),
        Rect {
            x: menu.x + 1,
            y: menu.y + 1,
            width: menu.width.saturating_sub(2),
            height: menu.height.saturating_sub(2),
        },
    );
}
