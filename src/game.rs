use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::config::GridSize;
use crate::food;
use crate::input::Direction;
use crate::snake::{Position, Snake};

/// Lifecycle phase of one game.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GamePhase {
    Running,
    Over,
}

/// Why a game reached [`GamePhase::Over`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
    /// The snake covers every cell, so no food can be placed.
    BoardFull,
}

/// Outcome of one [`GameState::tick`] call.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickEvent {
    /// The game is over; nothing moved.
    Idle,
    Moved,
    Grew { score: u32 },
    /// Emitted exactly once, on the tick that ends the game.
    Terminal { score: u32, reason: DeathReason },
}

/// Read-only copy of everything a renderer needs for one frame.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snapshot {
    pub grid: GridSize,
    /// Head first.
    pub snake: Vec<Position>,
    pub food: Option<Position>,
    pub direction: Direction,
    pub score: u32,
    pub phase: GamePhase,
    pub death_reason: Option<DeathReason>,
}

/// Complete mutable game state for one session.
///
/// `food` is only `None` after a [`DeathReason::BoardFull`] ending.
#[derive(Debug, Clone)]
pub struct GameState {
    pub snake: Snake,
    pub food: Option<Position>,
    pub score: u32,
    pub tick_count: u64,
    pub phase: GamePhase,
    pub death_reason: Option<DeathReason>,
    grid: GridSize,
    rng: StdRng,
}

impl GameState {
    /// Creates a fresh game seeded from OS entropy.
    #[must_use]
    pub fn new(grid: GridSize) -> Self {
        Self::with_rng(grid, StdRng::from_entropy())
    }

    /// Creates a deterministic state for tests and reproducible simulations.
    #[must_use]
    pub fn new_with_seed(grid: GridSize, seed: u64) -> Self {
        Self::with_rng(grid, StdRng::seed_from_u64(seed))
    }

    fn with_rng(grid: GridSize, rng: StdRng) -> Self {
        let mut state = Self {
            snake: initial_snake(grid),
            food: None,
            score: 0,
            tick_count: 0,
            phase: GamePhase::Running,
            death_reason: None,
            grid,
            rng,
        };
        state.restart();
        state
    }

    /// Returns the grid this game is played on.
    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.grid
    }

    /// Queues a turn for the next tick; reversals of the heading are ignored.
    pub fn set_pending_direction(&mut self, requested: Direction) -> bool {
        self.snake.set_pending_direction(requested)
    }

    /// Advances simulation by one gameplay tick.
    pub fn tick(&mut self) -> TickEvent {
        if self.phase != GamePhase::Running {
            return TickEvent::Idle;
        }

        self.tick_count += 1;
        let next = self.snake.turn_and_peek();

        if !next.is_within_bounds(self.grid) {
            return self.finish(DeathReason::WallCollision);
        }

        let growing = self.food == Some(next);
        if self.snake.would_collide(next, growing) {
            return self.finish(DeathReason::SelfCollision);
        }

        self.snake.advance(next, growing);
        if !growing {
            return TickEvent::Moved;
        }

        self.score += 1;
        self.food = food::spawn_position(&mut self.rng, self.grid, &self.snake);
        if self.food.is_none() {
            return self.finish(DeathReason::BoardFull);
        }

        debug!(score = self.score, length = self.snake.len(), "snake grew");
        TickEvent::Grew { score: self.score }
    }

    /// Starts a new game on the current grid.
    pub fn restart(&mut self) {
        self.restart_with_grid(self.grid);
    }

    /// Starts a new game, adopting `grid` (e.g. after a terminal resize).
    ///
    /// Every [`GridSize`] has at least four cells, so the fresh one-cell snake
    /// always leaves room for food.
    pub fn restart_with_grid(&mut self, grid: GridSize) {
        self.grid = grid;
        self.snake = initial_snake(grid);
        self.food = Some(
            food::spawn_position(&mut self.rng, grid, &self.snake)
                .expect("a one-cell snake leaves a free cell on any grid of at least 2x2"),
        );
        self.score = 0;
        self.tick_count = 0;
        self.phase = GamePhase::Running;
        self.death_reason = None;
    }

    /// Captures the state a render sink draws from.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid,
            snake: self.snake.segments().copied().collect(),
            food: self.food,
            direction: self.snake.direction(),
            score: self.score,
            phase: self.phase,
            death_reason: self.death_reason,
        }
    }

    fn finish(&mut self, reason: DeathReason) -> TickEvent {
        self.phase = GamePhase::Over;
        self.death_reason = Some(reason);
        debug!(score = self.score, ?reason, ticks = self.tick_count, "game over");

        TickEvent::Terminal {
            score: self.score,
            reason,
        }
    }
}

fn initial_snake(grid: GridSize) -> Snake {
    let start = Position {
        x: i32::from(grid.width() / 2),
        y: i32::from(grid.height() / 2),
    };
    Snake::new(start, Direction::Right)
}
