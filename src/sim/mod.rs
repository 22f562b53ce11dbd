//! Headless simulation engine
//!
//! Game logic must stay pure and deterministic:
//! - Ticks only advance from host frames
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod entity;
pub mod grid;
pub mod input;
pub mod session;
pub mod state;

pub use clock::{Clock, ClockPolicy};
pub use collision::{
    Aabb, Collide, Crash, aabb_overlap, cell_in_trail, overlapping_pairs, resolve_duel,
};
pub use entity::{Entity, EntityId, EntityKind, EntityStore, Spawn};
pub use grid::Grid;
pub use input::{Direction, Intent};
pub use session::{FrameResult, FrameToken, Rules, Session, SessionState};
pub use state::{GamePhase, InputResult, ScoreState, TickResult, seeded_rng};
