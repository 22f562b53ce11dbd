//! Snake rule engine
//!
//! The snake moves one cell per tick on a wrap-around grid. Eating food grows
//! it by one segment; running into its own body ends the game.

use std::collections::VecDeque;

use glam::IVec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::consts::SNAKE_START;
use crate::settings::SnakeConfig;
use crate::sim::{
    ClockPolicy, Direction, Grid, InputResult, Intent, Rules, ScoreState, TickResult, seeded_rng,
};

/// Board values in the snapshot
pub const CELL_BODY: u8 = 1;
pub const CELL_HEAD: u8 = 2;
pub const CELL_FOOD: u8 = 3;

/// Why a snake game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SnakeOutcome {
    /// Head ran into the body
    Crashed,
    /// Body covers the whole grid; nowhere left for food
    BoardFull,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnakeSnapshot {
    /// Head first
    pub body: Vec<IVec2>,
    pub food: Option<IVec2>,
    pub heading: Direction,
    pub score: ScoreState,
    pub interval_ms: f64,
    pub board: Vec<Vec<u8>>,
    pub outcome: Option<SnakeOutcome>,
}

#[derive(Debug, Clone)]
pub struct SnakeGame {
    config: SnakeConfig,
    rng: Pcg32,
    grid: Grid,
    /// Head first
    body: VecDeque<IVec2>,
    heading: Direction,
    /// Buffered turn applied on the next tick
    pending: Direction,
    food: Option<IVec2>,
    score: ScoreState,
    interval_ms: f64,
    outcome: Option<SnakeOutcome>,
}

impl SnakeGame {
    pub fn body(&self) -> &VecDeque<IVec2> {
        &self.body
    }

    pub fn head(&self) -> IVec2 {
        self.body.front().copied().unwrap_or_default()
    }

    pub fn food(&self) -> Option<IVec2> {
        self.food
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn outcome(&self) -> Option<SnakeOutcome> {
        self.outcome
    }

    /// Resample random cells until one is off the snake. `None` when the
    /// body covers the grid.
    fn place_food(&mut self) -> Option<IVec2> {
        let capacity = (self.grid.width() * self.grid.height()) as usize;
        if self.body.len() >= capacity {
            return None;
        }
        loop {
            let cell = IVec2::new(
                self.rng.random_range(0..self.grid.width()),
                self.rng.random_range(0..self.grid.height()),
            );
            if !self.body.contains(&cell) {
                return Some(cell);
            }
        }
    }

    fn eat(&mut self) {
        self.score.score += self.config.food_score;
        let every = self.config.speedup_every.max(1);
        if self.score.score % every == 0 {
            self.score.level += 1;
            self.interval_ms =
                (self.interval_ms - self.config.speedup_step_ms).max(self.config.min_interval_ms);
            log::debug!(
                "snake: speed level {} ({}ms)",
                self.score.level,
                self.interval_ms
            );
        }

        self.food = self.place_food();
        if self.food.is_none() {
            self.outcome = Some(SnakeOutcome::BoardFull);
        }
    }
}

impl Rules for SnakeGame {
    type Config = SnakeConfig;
    type Input = Intent;
    type Snapshot = SnakeSnapshot;

    const NAME: &'static str = "snake";

    fn new(config: &SnakeConfig, seed: u64) -> Self {
        let grid = Grid::new(config.grid_size, config.grid_size);
        let start = grid.clamp(IVec2::new(SNAKE_START.0, SNAKE_START.1));
        let mut game = Self {
            config: config.clone(),
            rng: seeded_rng(seed),
            grid,
            body: VecDeque::from([start]),
            heading: Direction::Right,
            pending: Direction::Right,
            food: None,
            score: ScoreState::new(1),
            interval_ms: config.difficulty.interval_ms(),
            outcome: None,
        };
        game.food = game.place_food();
        if game.food.is_none() {
            game.outcome = Some(SnakeOutcome::BoardFull);
        }
        game
    }

    fn clock_policy(&self) -> ClockPolicy {
        ClockPolicy::Accumulator
    }

    fn tick_interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Only turns onto the other axis are buffered; reversing into the body
    /// and repeating the heading are ignored.
    fn apply_input(&mut self, intent: Intent) -> InputResult {
        if self.outcome.is_none()
            && let Some(dir) = intent.direction()
            && dir.is_perpendicular(self.heading)
        {
            self.pending = dir;
        }
        InputResult::Applied
    }

    fn tick(&mut self) -> TickResult {
        if self.outcome.is_some() {
            return TickResult::Ended;
        }

        // Move
        self.heading = self.pending;
        let head = self.grid.wrap(self.head() + self.heading.delta());
        self.body.push_front(head);
        let ate = self.food == Some(head);
        if !ate {
            self.body.pop_back();
        }

        // Collide: head against every segment behind it
        let crashed = self.body.iter().skip(1).any(|&seg| seg == head);

        // Commit
        if ate {
            log::debug!("snake: ate food at {:?}, length {}", head, self.body.len());
            self.eat();
        }
        if crashed {
            log::debug!("snake: crashed into itself at {:?}", head);
            self.outcome = Some(SnakeOutcome::Crashed);
        }

        if self.outcome.is_some() {
            TickResult::Ended
        } else {
            TickResult::Continue
        }
    }

    fn snapshot(&self) -> SnakeSnapshot {
        let mut board = Grid::new(self.grid.width(), self.grid.height());
        for &seg in self.body.iter().skip(1) {
            board.set(seg, CELL_BODY);
        }
        board.set(self.head(), CELL_HEAD);
        if let Some(food) = self.food {
            board.set(food, CELL_FOOD);
        }
        SnakeSnapshot {
            body: self.body.iter().copied().collect(),
            food: self.food,
            heading: self.heading,
            score: self.score,
            interval_ms: self.interval_ms,
            board: board.to_rows(),
            outcome: self.outcome,
        }
    }

    fn final_score(&self) -> u64 {
        self.score.score
    }

    fn level(&self) -> u32 {
        self.score.level
    }
}
