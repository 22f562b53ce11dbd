//! Directional intents
//!
//! The host maps physical keys to `Intent`s; reversal filtering for the
//! trail games lives with the rule engines.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Abstract directional intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Intent {
    Up,
    Down,
    Left,
    Right,
    #[default]
    None,
}

impl Intent {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Intent::Up => Some(Direction::Up),
            Intent::Down => Some(Direction::Down),
            Intent::Left => Some(Direction::Left),
            Intent::Right => Some(Direction::Right),
            Intent::None => None,
        }
    }

    /// Vertical axis value (-1 up, +1 down, 0 otherwise)
    pub fn vertical(self) -> f32 {
        match self {
            Intent::Up => -1.0,
            Intent::Down => 1.0,
            _ => 0.0,
        }
    }

    /// Horizontal axis value (-1 left, +1 right, 0 otherwise)
    pub fn horizontal(self) -> f32 {
        match self {
            Intent::Left => -1.0,
            Intent::Right => 1.0,
            _ => 0.0,
        }
    }
}

/// Heading on a grid (screen coordinates: +y is down)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// Turning onto the same axis (straight ahead or a U-turn) is not a turn
    pub fn is_perpendicular(self, other: Direction) -> bool {
        self.is_vertical() != other.is_vertical()
    }

    /// Quarter turn clockwise on screen
    pub fn turn_cw(self) -> Self {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }
}

impl From<Direction> for Intent {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => Intent::Up,
            Direction::Down => Intent::Down,
            Direction::Left => Intent::Left,
            Direction::Right => Intent::Right,
        }
    }
}
