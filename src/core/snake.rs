use rand::Rng;
use std::collections::VecDeque;

pub const GRID_SIZE: i32 = 20;
pub const TICK_MS: u64 = 150;
pub const FOOD_SCORE: u32 = 10;
pub const START: Cell = Cell { x: 10, y: 10 };
pub const FIRST_FOOD: Cell = Cell { x: 15, y: 10 };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Ready,
    Playing,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Idle,
    Moved,
    Ate,
    Crashed { new_high_score: bool },
}

#[derive(Debug, Clone)]
pub struct SnakeGame {
    /// Head first.
    pub snake: VecDeque<Cell>,
    pub food: Cell,
    pub direction: Direction,
    pub phase: Phase,
    pub score: u32,
    pub high_score: u32,
}

impl SnakeGame {
    pub fn new(high_score: u32) -> Self {
        Self {
            snake: VecDeque::from([START]),
            food: FIRST_FOOD,
            direction: Direction::Right,
            phase: Phase::Ready,
            score: 0,
            high_score,
        }
    }

    pub fn head(&self) -> Cell {
        self.snake.front().copied().unwrap_or(START)
    }

    /// (Re)start a round. The high score carries over.
    pub fn start(&mut self, rng: &mut impl Rng) {
        self.snake = VecDeque::from([START]);
        self.food = spawn_food(&self.snake, rng);
        self.direction = Direction::Right;
        self.score = 0;
        self.phase = Phase::Playing;
    }

    /// Turn requests only count while playing; reversing is ignored.
    pub fn turn(&mut self, dir: Direction) {
        if self.phase != Phase::Playing || dir == self.direction.opposite() {
            return;
        }
        self.direction = dir;
    }

    pub fn step(&mut self, rng: &mut impl Rng) -> StepOutcome {
        if self.phase != Phase::Playing {
            return StepOutcome::Idle;
        }
        let head = self.head();
        let (dx, dy) = self.direction.delta();
        let next = Cell { x: head.x + dx, y: head.y + dy };

        let off_grid = next.x < 0 || next.x >= GRID_SIZE || next.y < 0 || next.y >= GRID_SIZE;
        if off_grid || self.snake.contains(&next) {
            return self.crash();
        }

        self.snake.push_front(next);
        if next == self.food {
            self.score += FOOD_SCORE;
            self.food = spawn_food(&self.snake, rng);
            StepOutcome::Ate
        } else {
            self.snake.pop_back();
            StepOutcome::Moved
        }
    }

    fn crash(&mut self) -> StepOutcome {
        self.phase = Phase::GameOver;
        let new_high_score = self.score > self.high_score;
        if new_high_score {
            self.high_score = self.score;
        }
        log::info!("snake: game over at {} (best {})", self.score, self.high_score);
        StepOutcome::Crashed { new_high_score }
    }
}

/// Random free cell. A full board leaves the food where the head is.
fn spawn_food(snake: &VecDeque<Cell>, rng: &mut impl Rng) -> Cell {
    let free = (GRID_SIZE * GRID_SIZE) as usize - snake.len();
    if free == 0 {
        return snake.front().copied().unwrap_or(START);
    }
    loop {
        let cell = Cell {
            x: rng.gen_range(0..GRID_SIZE),
            y: rng.gen_range(0..GRID_SIZE),
        };
        if !snake.contains(&cell) {
            return cell;
        }
    }
}
