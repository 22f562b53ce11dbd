//! Rule engines for the five arcade games
//!
//! Each game implements [`Rules`](crate::sim::Rules) and owns its board or
//! entity store, score and RNG. Sessions drive them; hosts only see snapshots.

pub mod pong;
pub mod shooter;
pub mod snake;
pub mod tetris;
pub mod tron;

pub use pong::{PongGame, PongInput, PongSnapshot, Side};
pub use shooter::{ShooterGame, ShooterInput, ShooterOutcome, ShooterSnapshot};
pub use snake::{SnakeGame, SnakeOutcome, SnakeSnapshot};
pub use tetris::{PieceKind, TetrisAction, TetrisGame, TetrisSnapshot};
pub use tron::{Player, TronGame, TronInput, TronOutcome, TronSnapshot};
