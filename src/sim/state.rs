//! Shared session/game state types

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Created, not yet started
    #[default]
    Idle,
    /// Ticking
    Running,
    /// Ticks suspended until resume
    Paused,
    /// Terminal; only restart leaves this phase
    Ended,
}

/// Result of one rule-engine tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    Continue,
    /// A terminal condition fired this tick
    Ended,
}

/// Result of applying one host input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResult {
    /// Applied or ignored; tick timing unchanged
    Applied,
    /// Applied, and the tick timer restarts from the next frame
    ResetClock,
    /// The input triggered a terminal condition
    Ended,
}

/// Score, lives and level for single-player games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    pub score: u64,
    pub lives: u32,
    pub level: u32,
}

impl ScoreState {
    pub fn new(lives: u32) -> Self {
        Self {
            score: 0,
            lives,
            level: 1,
        }
    }
}

/// Seeded RNG for a rule engine
pub fn seeded_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}
