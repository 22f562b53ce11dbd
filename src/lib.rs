//! Arcade Sim - headless tick-loop engine for classic arcade games
//!
//! Core modules:
//! - `sim`: Engine pieces (clock, entity store, grid, collision, session)
//! - `games`: Rule engines for Tetris, Snake, Pong, Tron and Space Shooter
//! - `platform`: Host glue (time source, key bindings, wasm bindings)
//! - `settings`: Data-driven game configuration
//! - `highscores`: In-memory leaderboard

pub mod games;
pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::{Difficulty, Settings};
pub use sim::{FrameToken, GamePhase, Rules, Session};

/// Game configuration constants
pub mod consts {
    /// Tetris board
    pub const TETRIS_COLS: i32 = 10;
    pub const TETRIS_ROWS: i32 = 20;
    /// Auto-drop interval at level 1
    pub const TETRIS_DROP_INTERVAL_MS: f64 = 1000.0;
    /// Line clear score table, indexed by rows cleared in one lock
    pub const LINE_SCORES: [u64; 5] = [0, 40, 100, 300, 1200];

    /// Snake grid (600px canvas / 20px tiles)
    pub const SNAKE_GRID_SIZE: i32 = 30;
    pub const SNAKE_START: (i32, i32) = (10, 10);
    pub const SNAKE_FOOD_SCORE: u64 = 10;

    /// Pong field and paddles (pixels, per-frame speeds)
    pub const PONG_WIDTH: f32 = 900.0;
    pub const PONG_HEIGHT: f32 = 600.0;
    pub const PONG_PADDLE_WIDTH: f32 = 15.0;
    pub const PONG_PADDLE_HEIGHT: f32 = 100.0;
    pub const PONG_PADDLE_INSET: f32 = 30.0;
    pub const PONG_BALL_SIZE: f32 = 15.0;
    pub const PONG_PADDLE_SPEED: f32 = 7.0;
    pub const PONG_BALL_SPEED: f32 = 5.0;
    pub const PONG_WINNING_SCORE: u32 = 5;

    /// Tron grid (600px canvas / 20px units)
    pub const TRON_GRID_SIZE: i32 = 30;
    pub const TRON_TICK_MS: f64 = 100.0;

    /// Space shooter field
    pub const SHOOTER_WIDTH: f32 = 800.0;
    pub const SHOOTER_HEIGHT: f32 = 600.0;
    pub const SHOOTER_LIVES: u32 = 3;

    /// Animation-frame cadence for the continuous games (~60 Hz)
    pub const FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;
}
