use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};

use super::AppContent;
use crate::config::{load_high_score, save_high_score};
use crate::core::snake::{Cell, Direction, Phase, SnakeGame, StepOutcome, GRID_SIZE, TICK_MS};
use crate::ui::{centered_rect, dim_style};

const CELL_W: u16 = 2;

pub fn new_content() -> AppContent {
    AppContent::Snake(SnakeApp::new(load_high_score()))
}

#[derive(Debug, Clone)]
pub struct SnakeApp {
    game: SnakeGame,
    last_step: Instant,
}

impl SnakeApp {
    pub fn new(high_score: u32) -> Self {
        Self {
            game: SnakeGame::new(high_score),
            last_step: Instant::now(),
        }
    }

    pub fn game(&self) -> &SnakeGame {
        &self.game
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let turn = match key.code {
            KeyCode::Up | KeyCode::Char('w') => Some(Direction::Up),
            KeyCode::Down | KeyCode::Char('s') => Some(Direction::Down),
            KeyCode::Left | KeyCode::Char('a') => Some(Direction::Left),
            KeyCode::Right | KeyCode::Char('d') => Some(Direction::Right),
            _ => None,
        };
        if let Some(dir) = turn {
            self.game.turn(dir);
            return;
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') if self.game.phase != Phase::Playing => {
                self.restart()
            }
            KeyCode::Char('r') => self.restart(),
            _ => {}
        }
    }

    fn restart(&mut self) {
        self.game.start(&mut rand::thread_rng());
        self.last_step = Instant::now();
    }

    pub fn tick(&mut self) {
        if self.last_step.elapsed() < Duration::from_millis(TICK_MS) {
            return;
        }
        self.last_step = Instant::now();
        if let StepOutcome::Crashed { new_high_score: true } = self.game.step(&mut rand::thread_rng()) {
            save_high_score(self.game.high_score);
        }
    }

    pub fn draw(&self, f: &mut Frame, area: Rect) {
        let g = &self.game;
        let header = Line::from(vec![
            Span::styled(" SCORE ", Style::default().fg(Color::LightGreen).add_modifier(Modifier::BOLD)),
            Span::styled(format!("{:03}", g.score), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!("   BEST {}", g.high_score), Style::default().fg(Color::Yellow)),
            Span::styled("   SNAKE.EXE  arrows/WASD  r=reset", dim_style()),
        ]);
        f.render_widget(Paragraph::new(header), Rect { height: area.height.min(1), ..area });

        let board_w = GRID_SIZE as u16 * CELL_W + 2;
        let board_h = GRID_SIZE as u16 + 2;
        let below = Rect {
            y: area.y.saturating_add(1),
            height: area.height.saturating_sub(1),
            ..area
        };
        let board = centered_rect(board_w, board_h, below);
        f.render_widget(
            Block::default().borders(Borders::ALL).border_style(dim_style()),
            board,
        );

        let faded = g.phase == Phase::GameOver;
        let inner_w = board.width.saturating_sub(2);
        let inner_h = board.height.saturating_sub(2);
        let mut rows: Vec<Line> = Vec::new();
        for y in 0..GRID_SIZE.min(i32::from(inner_h)) {
            let mut spans = Vec::new();
            for x in 0..GRID_SIZE.min(i32::from(inner_w / CELL_W)) {
                spans.push(cell_span(g, Cell { x, y }, faded));
            }
            rows.push(Line::from(spans));
        }
        f.render_widget(
            Paragraph::new(rows),
            Rect {
                x: board.x + 1,
                y: board.y + 1,
                width: inner_w,
                height: inner_h,
            },
        );

        let overlay = match g.phase {
            Phase::Playing => None,
            Phase::Ready => Some(vec![
                Line::from(Span::styled("SNAKE", Style::default().fg(Color::LightGreen).add_modifier(Modifier::BOLD))),
                Line::from(Span::styled("SYSTEM READY", dim_style())),
                Line::from(""),
                Line::from("[Enter] START GAME"),
            ]),
            Phase::GameOver => Some(vec![
                Line::from(Span::styled("GAME OVER", Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD))),
                Line::from(format!("SCORE: {}", g.score)),
                Line::from(""),
                Line::from("[Enter] TRY AGAIN"),
            ]),
        };
        if let Some(lines) = overlay {
            let pop = centered_rect(24, 6, board);
            f.render_widget(Clear, pop);
            f.render_widget(
                Paragraph::new(lines)
                    .alignment(ratatui::layout::Alignment::Center)
                    .block(Block::default().borders(Borders::ALL)),
                pop,
            );
        }
    }
}

fn cell_span(g: &SnakeGame, cell: Cell, faded: bool) -> Span<'static> {
    let dim = if faded { Modifier::DIM } else { Modifier::empty() };
    if g.head() == cell {
        Span::styled("██", Style::default().fg(Color::LightGreen).add_modifier(dim))
    } else if g.snake.contains(&cell) {
        Span::styled("▓▓", Style::default().fg(Color::Green).add_modifier(dim))
    } else if g.food == cell {
        Span::styled("()", Style::default().fg(Color::LightRed))
    } else {
        Span::styled(" ·", Style::default().fg(Color::DarkGray))
    }
}
