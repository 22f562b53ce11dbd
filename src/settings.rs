//! Game settings and tuning
//!
//! Loaded from a JSON file on native hosts; every field falls back to its
//! default when missing.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Snake difficulty presets (tick interval)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Insane,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::Insane => "Insane",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            "insane" => Some(Difficulty::Insane),
            _ => None,
        }
    }

    /// Starting tick interval
    pub fn interval_ms(&self) -> f64 {
        match self {
            Difficulty::Easy => 200.0,
            Difficulty::Normal => 150.0,
            Difficulty::Hard => 100.0,
            Difficulty::Insane => 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TetrisConfig {
    pub cols: i32,
    pub rows: i32,
    pub drop_interval_ms: f64,
    pub min_drop_interval_ms: f64,
    /// Lines per level step
    pub lines_per_level: u32,
    /// Drop interval reduction per level above 1
    pub speedup_per_level_ms: f64,
}

impl Default for TetrisConfig {
    fn default() -> Self {
        Self {
            cols: TETRIS_COLS,
            rows: TETRIS_ROWS,
            drop_interval_ms: TETRIS_DROP_INTERVAL_MS,
            min_drop_interval_ms: 100.0,
            lines_per_level: 10,
            speedup_per_level_ms: 75.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeConfig {
    pub grid_size: i32,
    pub difficulty: Difficulty,
    pub food_score: u64,
    /// Speed up every time the score hits a multiple of this
    pub speedup_every: u64,
    pub speedup_step_ms: f64,
    pub min_interval_ms: f64,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            grid_size: SNAKE_GRID_SIZE,
            difficulty: Difficulty::Normal,
            food_score: SNAKE_FOOD_SCORE,
            speedup_every: 50,
            speedup_step_ms: 15.0,
            min_interval_ms: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PongConfig {
    pub width: f32,
    pub height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Gap between a paddle and its side wall
    pub paddle_inset: f32,
    pub ball_size: f32,
    pub paddle_speed: f32,
    pub initial_ball_speed: f32,
    /// Ball speed gained per paddle hit
    pub speed_gain: f32,
    pub winning_score: u32,
    pub frame_interval_ms: f64,
}

impl Default for PongConfig {
    fn default() -> Self {
        Self {
            width: PONG_WIDTH,
            height: PONG_HEIGHT,
            paddle_width: PONG_PADDLE_WIDTH,
            paddle_height: PONG_PADDLE_HEIGHT,
            paddle_inset: PONG_PADDLE_INSET,
            ball_size: PONG_BALL_SIZE,
            paddle_speed: PONG_PADDLE_SPEED,
            initial_ball_speed: PONG_BALL_SPEED,
            speed_gain: 0.3,
            winning_score: PONG_WINNING_SCORE,
            frame_interval_ms: FRAME_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TronConfig {
    pub grid_size: i32,
    pub tick_interval_ms: f64,
}

impl Default for TronConfig {
    fn default() -> Self {
        Self {
            grid_size: TRON_GRID_SIZE,
            tick_interval_ms: TRON_TICK_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShooterConfig {
    pub width: f32,
    pub height: f32,
    pub lives: u32,
    pub ship_width: f32,
    pub ship_height: f32,
    /// Ship top edge
    pub ship_y: f32,
    pub ship_speed: f32,
    pub bullet_width: f32,
    pub bullet_height: f32,
    pub bullet_speed: f32,
    pub enemy_size: f32,
    pub enemy_base_speed: f32,
    pub enemy_speed_per_level: f32,
    pub spawn_interval_ms: f64,
    pub spawn_step_per_level_ms: f64,
    pub points_per_kill: u64,
    pub points_per_level: u64,
    pub explosion_particles: u32,
    pub particle_life: u32,
    pub frame_interval_ms: f64,
}

impl Default for ShooterConfig {
    fn default() -> Self {
        Self {
            width: SHOOTER_WIDTH,
            height: SHOOTER_HEIGHT,
            lives: SHOOTER_LIVES,
            ship_width: 50.0,
            ship_height: 40.0,
            ship_y: 520.0,
            ship_speed: 5.0,
            bullet_width: 4.0,
            bullet_height: 15.0,
            bullet_speed: 8.0,
            enemy_size: 40.0,
            enemy_base_speed: 1.0,
            enemy_speed_per_level: 0.3,
            spawn_interval_ms: 1000.0,
            spawn_step_per_level_ms: 50.0,
            points_per_kill: 10,
            points_per_level: 100,
            explosion_particles: 15,
            particle_life: 30,
            frame_interval_ms: FRAME_INTERVAL_MS,
        }
    }
}

/// All game settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base seed; `None` lets the host pick one
    pub seed: Option<u64>,
    pub tetris: TetrisConfig,
    pub snake: SnakeConfig,
    pub pong: PongConfig,
    pub tron: TronConfig,
    pub shooter: ShooterConfig,
}

impl Settings {
    /// Parse settings JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str(json) {
            Ok(settings) => Some(settings),
            Err(e) => {
                log::warn!("Invalid settings JSON: {}", e);
                None
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Load settings from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => {
                if let Some(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
            }
            Err(e) => log::warn!("Could not read {}: {}", path.display(), e),
        }

        log::info!("Using default settings");
        Self::default()
    }
}
