//! Tron light cycles
//!
//! Two cycles race on a walled grid, each leaving a permanent trail. A cycle
//! crashes by leaving the grid or entering any trail cell. Both cycles
//! entering the same cell on the same tick is always a draw.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::settings::TronConfig;
use crate::sim::{
    ClockPolicy, Crash, Direction, Grid, InputResult, Intent, Rules, TickResult, resolve_duel,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Player {
    P1,
    P2,
}

impl Player {
    fn index(self) -> usize {
        match self {
            Player::P1 => 0,
            Player::P2 => 1,
        }
    }

    /// Occupancy value of this player's trail on the board
    pub fn cell_id(self) -> u8 {
        self.index() as u8 + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TronInput {
    pub player: Player,
    pub intent: Intent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TronOutcome {
    Winner(Player),
    Draw,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleView {
    pub head: IVec2,
    pub heading: Direction,
    /// Oldest first; the last cell is the head
    pub trail: Vec<IVec2>,
    pub crash: Option<Crash>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TronSnapshot {
    pub cycles: [CycleView; 2],
    pub board: Vec<Vec<u8>>,
    pub outcome: Option<TronOutcome>,
}

#[derive(Debug, Clone)]
struct Cycle {
    heading: Direction,
    /// Heading used on the last tick
    moved: Direction,
    trail: Vec<IVec2>,
    crash: Option<Crash>,
}

impl Cycle {
    fn new(start: IVec2, heading: Direction) -> Self {
        Self {
            heading,
            moved: heading,
            trail: vec![start],
            crash: None,
        }
    }

    fn head(&self) -> IVec2 {
        self.trail.last().copied().unwrap_or_default()
    }

    fn view(&self) -> CycleView {
        CycleView {
            head: self.head(),
            heading: self.heading,
            trail: self.trail.clone(),
            crash: self.crash,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TronGame {
    config: TronConfig,
    board: Grid,
    cycles: [Cycle; 2],
    outcome: Option<TronOutcome>,
}

impl TronGame {
    pub fn outcome(&self) -> Option<TronOutcome> {
        self.outcome
    }

    pub fn head(&self, player: Player) -> IVec2 {
        self.cycles[player.index()].head()
    }

    pub fn heading(&self, player: Player) -> Direction {
        self.cycles[player.index()].heading
    }

    pub fn trail(&self, player: Player) -> &[IVec2] {
        &self.cycles[player.index()].trail
    }

    pub fn board(&self) -> &Grid {
        &self.board
    }
}

impl Rules for TronGame {
    type Config = TronConfig;
    type Input = TronInput;
    type Snapshot = TronSnapshot;

    const NAME: &'static str = "tron";

    /// Tron has no randomness; the seed is unused
    fn new(config: &TronConfig, _seed: u64) -> Self {
        let mut board = Grid::new(config.grid_size, config.grid_size);
        let mid = board.height() / 2;
        let p1 = board.clamp(IVec2::new(5, mid));
        let p2 = board.clamp(IVec2::new(board.width() - 6, mid));
        board.set(p1, Player::P1.cell_id());
        board.set(p2, Player::P2.cell_id());

        Self {
            config: config.clone(),
            board,
            cycles: [
                Cycle::new(p1, Direction::Right),
                Cycle::new(p2, Direction::Left),
            ],
            outcome: None,
        }
    }

    fn clock_policy(&self) -> ClockPolicy {
        ClockPolicy::FixedInterval
    }

    fn tick_interval_ms(&self) -> f64 {
        self.config.tick_interval_ms
    }

    /// Turns take effect on the next tick. Reversing against the last move
    /// is ignored, so two quick turns cannot fold a cycle onto its trail.
    fn apply_input(&mut self, input: TronInput) -> InputResult {
        let cycle = &mut self.cycles[input.player.index()];
        if self.outcome.is_none()
            && let Some(dir) = input.intent.direction()
            && dir != cycle.moved.opposite()
        {
            cycle.heading = dir;
        }
        InputResult::Applied
    }

    fn tick(&mut self) -> TickResult {
        if self.outcome.is_some() {
            return TickResult::Ended;
        }

        // Move
        let next = [
            self.cycles[0].head() + self.cycles[0].heading.delta(),
            self.cycles[1].head() + self.cycles[1].heading.delta(),
        ];

        // Collide against the trails as they were before this tick
        let crashes = resolve_duel(
            next,
            [self.cycles[0].trail.as_slice(), self.cycles[1].trail.as_slice()],
            self.board.bounds(),
        );

        // Commit
        for (i, player) in [Player::P1, Player::P2].into_iter().enumerate() {
            let cycle = &mut self.cycles[i];
            cycle.moved = cycle.heading;
            cycle.crash = crashes[i];
            if self.board.contains(next[i]) {
                cycle.trail.push(next[i]);
                self.board.set(next[i], player.cell_id());
            }
        }

        self.outcome = match crashes {
            [None, None] => None,
            [Some(_), Some(_)] => Some(TronOutcome::Draw),
            [None, Some(_)] => Some(TronOutcome::Winner(Player::P1)),
            [Some(_), None] => Some(TronOutcome::Winner(Player::P2)),
        };

        match self.outcome {
            Some(outcome) => {
                log::debug!("tron: {:?} ({:?} / {:?})", outcome, crashes[0], crashes[1]);
                TickResult::Ended
            }
            None => TickResult::Continue,
        }
    }

    fn snapshot(&self) -> TronSnapshot {
        TronSnapshot {
            cycles: [self.cycles[0].view(), self.cycles[1].view()],
            board: self.board.to_rows(),
            outcome: self.outcome,
        }
    }

    /// Survivor's trail length; nothing for a draw
    fn final_score(&self) -> u64 {
        match self.outcome {
            Some(TronOutcome::Winner(p)) => self.cycles[p.index()].trail.len() as u64,
            _ => 0,
        }
    }
}
