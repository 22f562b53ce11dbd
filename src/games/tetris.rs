//! Tetris rule engine
//!
//! A falling piece moves over a board of settled blocks. Each tick drops the
//! piece one row; a blocked drop locks it, clears full rows and spawns the
//! next piece. A spawn that overlaps settled blocks ends the game.

use glam::IVec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::LINE_SCORES;
use crate::settings::TetrisConfig;
use crate::sim::grid::EMPTY;
use crate::sim::{
    ClockPolicy, Grid, InputResult, Intent, Rules, ScoreState, TickResult, seeded_rng,
};

/// The seven tetrominoes. Board ids are 1..=7 in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    pub fn id(self) -> u8 {
        self as u8 + 1
    }

    /// Square shape matrix, filled cells carry the piece id
    pub fn shape(self) -> Vec<Vec<u8>> {
        let mask: &[&[u8]] = match self {
            PieceKind::I => &[&[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0], &[0, 0, 0, 0]],
            PieceKind::J => &[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]],
            PieceKind::L => &[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]],
            PieceKind::O => &[&[1, 1], &[1, 1]],
            PieceKind::S => &[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]],
            PieceKind::T => &[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]],
            PieceKind::Z => &[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]],
        };
        let id = self.id();
        mask.iter()
            .map(|row| row.iter().map(|&m| m * id).collect())
            .collect()
    }
}

/// The falling piece
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub matrix: Vec<Vec<u8>>,
    /// Board position of the matrix's top-left corner
    pub pos: IVec2,
}

impl Piece {
    /// A piece at its spawn position: horizontally centered, top row
    pub fn spawn(kind: PieceKind, cols: i32) -> Self {
        let matrix = kind.shape();
        let width = matrix.first().map_or(0, |r| r.len() as i32);
        Self {
            kind,
            matrix,
            pos: IVec2::new(cols / 2 - width / 2, 0),
        }
    }

    pub fn width(&self) -> i32 {
        self.matrix.first().map_or(0, |r| r.len() as i32)
    }

    /// Filled cells in board coordinates
    pub fn cells(&self) -> impl Iterator<Item = (IVec2, u8)> + '_ {
        self.matrix.iter().enumerate().flat_map(move |(y, row)| {
            row.iter().enumerate().filter(|&(_, &v)| v != EMPTY).map(move |(x, &v)| {
                (self.pos + IVec2::new(x as i32, y as i32), v)
            })
        })
    }

    /// Rotate 90° clockwise (transpose, then reverse each row)
    pub fn rotate_cw(&mut self) {
        self.transpose();
        for row in &mut self.matrix {
            row.reverse();
        }
    }

    /// Rotate 90° counter-clockwise (transpose, then reverse row order)
    pub fn rotate_ccw(&mut self) {
        self.transpose();
        self.matrix.reverse();
    }

    fn transpose(&mut self) {
        let n = self.matrix.len();
        for y in 0..n {
            for x in 0..y {
                let tmp = self.matrix[y][x];
                self.matrix[y][x] = self.matrix[x][y];
                self.matrix[x][y] = tmp;
            }
        }
    }
}

/// Host actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TetrisAction {
    Left,
    Right,
    SoftDrop,
    Rotate,
    HardDrop,
}

impl TetrisAction {
    /// Left/right move, down soft-drops, up rotates
    pub fn from_intent(intent: Intent) -> Option<Self> {
        match intent {
            Intent::Left => Some(TetrisAction::Left),
            Intent::Right => Some(TetrisAction::Right),
            Intent::Down => Some(TetrisAction::SoftDrop),
            Intent::Up => Some(TetrisAction::Rotate),
            Intent::None => None,
        }
    }
}

/// Read-only view for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TetrisSnapshot {
    /// Settled blocks, top row first
    pub board: Vec<Vec<u8>>,
    pub piece: Piece,
    pub next: PieceKind,
    pub score: ScoreState,
    pub lines: u32,
    pub topped_out: bool,
}

#[derive(Debug, Clone)]
pub struct TetrisGame {
    config: TetrisConfig,
    rng: Pcg32,
    board: Grid,
    current: Piece,
    next: Piece,
    score: ScoreState,
    lines: u32,
    topped_out: bool,
}

impl TetrisGame {
    pub fn board(&self) -> &Grid {
        &self.board
    }

    pub fn current(&self) -> &Piece {
        &self.current
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn is_topped_out(&self) -> bool {
        self.topped_out
    }

    fn random_piece(&mut self) -> Piece {
        let kind = PieceKind::ALL[self.rng.random_range(0..PieceKind::ALL.len())];
        Piece::spawn(kind, self.config.cols)
    }

    /// Piece overlaps settled blocks or leaves the board
    fn collides(&self, piece: &Piece) -> bool {
        piece.cells().any(|(cell, _)| !self.board.is_empty_at(cell))
    }

    /// Promote the preview piece. Returns true if it cannot be placed.
    fn spawn_next(&mut self) -> bool {
        let upcoming = self.random_piece();
        self.current = std::mem::replace(&mut self.next, upcoming);
        if self.collides(&self.current) {
            log::debug!("tetris: {:?} cannot spawn, topped out", self.current.kind);
            self.topped_out = true;
        }
        self.topped_out
    }

    /// Merge the current piece into the board, clear rows, spawn the next
    fn lock(&mut self) {
        for (cell, value) in self.current.cells().collect::<Vec<_>>() {
            self.board.set(cell, value);
        }
        let cleared = self.board.clear_full_rows();
        if cleared > 0 {
            self.add_lines(cleared);
        }
        self.spawn_next();
    }

    fn add_lines(&mut self, cleared: u32) {
        let points = LINE_SCORES[(cleared as usize).min(LINE_SCORES.len() - 1)];
        self.score.score += points;
        self.lines += cleared;
        self.score.level = self.lines / self.config.lines_per_level.max(1) + 1;
        log::debug!(
            "tetris: cleared {} rows (+{}), lines {}, level {}",
            cleared,
            points,
            self.lines,
            self.score.level
        );
    }

    /// Try to shift the piece; blocked moves are reverted
    fn shift(&mut self, dx: i32) -> bool {
        self.current.pos.x += dx;
        if self.collides(&self.current) {
            self.current.pos.x -= dx;
            return false;
        }
        true
    }

    /// Drop one row, locking when blocked
    fn drop_step(&mut self) {
        self.current.pos.y += 1;
        if self.collides(&self.current) {
            self.current.pos.y -= 1;
            self.lock();
        }
    }

    /// Drop to the lowest free row and lock. A piece that is already
    /// resting stays put and waits for the tick to lock it. Returns the
    /// number of rows dropped.
    fn hard_drop(&mut self) -> i32 {
        let mut landing = self.current.clone();
        loop {
            landing.pos.y += 1;
            if self.collides(&landing) {
                landing.pos.y -= 1;
                break;
            }
        }
        let distance = landing.pos.y - self.current.pos.y;
        if distance > 0 {
            self.current = landing;
            self.lock();
        }
        distance
    }

    /// Rotate clockwise, searching alternating horizontal kicks
    /// (+1, -1, +2, -2, ...) until the kick exceeds the piece width.
    fn rotate(&mut self) -> bool {
        let start_x = self.current.pos.x;
        let mut offset: i32 = 1;
        self.current.rotate_cw();
        while self.collides(&self.current) {
            self.current.pos.x += offset;
            offset = -(offset + offset.signum());
            if offset > self.current.width() {
                self.current.rotate_ccw();
                self.current.pos.x = start_x;
                return false;
            }
        }
        true
    }
}

impl Rules for TetrisGame {
    type Config = TetrisConfig;
    type Input = TetrisAction;
    type Snapshot = TetrisSnapshot;

    const NAME: &'static str = "tetris";

    fn new(config: &TetrisConfig, seed: u64) -> Self {
        let mut rng = seeded_rng(seed);
        let cols = config.cols.max(4);
        let rows = config.rows.max(4);
        let config = TetrisConfig {
            cols,
            rows,
            ..config.clone()
        };
        let first = PieceKind::ALL[rng.random_range(0..PieceKind::ALL.len())];
        let second = PieceKind::ALL[rng.random_range(0..PieceKind::ALL.len())];
        Self {
            board: Grid::new(cols, rows),
            current: Piece::spawn(first, cols),
            next: Piece::spawn(second, cols),
            config,
            rng,
            score: ScoreState::new(0),
            lines: 0,
            topped_out: false,
        }
    }

    fn clock_policy(&self) -> ClockPolicy {
        ClockPolicy::FixedInterval
    }

    fn tick_interval_ms(&self) -> f64 {
        let speedup = (self.score.level.saturating_sub(1)) as f64 * self.config.speedup_per_level_ms;
        (self.config.drop_interval_ms - speedup).max(self.config.min_drop_interval_ms)
    }

    fn apply_input(&mut self, action: TetrisAction) -> InputResult {
        if self.topped_out {
            return InputResult::Applied;
        }
        let mut result = InputResult::Applied;
        match action {
            TetrisAction::Left => {
                self.shift(-1);
            }
            TetrisAction::Right => {
                self.shift(1);
            }
            TetrisAction::SoftDrop => {
                // A manual drop replaces the next gravity step
                self.drop_step();
                result = InputResult::ResetClock;
            }
            TetrisAction::Rotate => {
                self.rotate();
            }
            TetrisAction::HardDrop => {
                self.hard_drop();
            }
        }
        if self.topped_out {
            InputResult::Ended
        } else {
            result
        }
    }

    fn tick(&mut self) -> TickResult {
        if !self.topped_out {
            self.drop_step();
        }
        if self.topped_out {
            TickResult::Ended
        } else {
            TickResult::Continue
        }
    }

    fn snapshot(&self) -> TetrisSnapshot {
        TetrisSnapshot {
            board: self.board.to_rows(),
            piece: self.current.clone(),
            next: self.next.kind,
            score: self.score,
            lines: self.lines,
            topped_out: self.topped_out,
        }
    }

    fn final_score(&self) -> u64 {
        self.score.score
    }

    fn level(&self) -> u32 {
        self.score.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{FrameResult, GamePhase, Session};
    use proptest::prelude::*;

    fn game() -> TetrisGame {
        TetrisGame::new(&TetrisConfig::default(), 42)
    }

    fn fill_row_except(game: &mut TetrisGame, y: i32, gaps: &[i32]) {
        for x in 0..game.config.cols {
            if !gaps.contains(&x) {
                game.board.set(IVec2::new(x, y), 1);
            }
        }
    }

    /// Vertical I piece whose column lands on board column 9
    fn vertical_i_at_right_edge(cols: i32) -> Piece {
        let mut piece = Piece::spawn(PieceKind::I, cols);
        piece.rotate_cw();
        piece.pos.x = 7;
        piece
    }

    #[test]
    fn test_spawn_position_centered() {
        assert_eq!(Piece::spawn(PieceKind::I, 10).pos, IVec2::new(3, 0));
        assert_eq!(Piece::spawn(PieceKind::O, 10).pos, IVec2::new(4, 0));
        assert_eq!(Piece::spawn(PieceKind::T, 10).pos, IVec2::new(4, 0));
    }

    #[test]
    fn test_piece_ids() {
        for (i, kind) in PieceKind::ALL.iter().enumerate() {
            assert_eq!(kind.id() as usize, i + 1);
            assert!(kind.shape().iter().flatten().all(|&v| v == 0 || v == kind.id()));
        }
    }

    #[test]
    fn test_line_clear_score_table() {
        for n in 1..=4 {
            let mut game = game();
            for y in (20 - n)..20 {
                fill_row_except(&mut game, y, &[9]);
            }
            game.current = vertical_i_at_right_edge(10);
            game.apply_input(TetrisAction::HardDrop);

            assert_eq!(game.score.score, LINE_SCORES[n as usize], "{} rows", n);
            assert_eq!(game.lines, n as u32);
        }
    }

    #[test]
    fn test_o_piece_completes_bottom_row() {
        let mut game = game();
        fill_row_except(&mut game, 19, &[8, 9]);
        let mut piece = Piece::spawn(PieceKind::O, 10);
        piece.pos.x = 8;
        game.current = piece;

        game.apply_input(TetrisAction::HardDrop);

        assert_eq!(game.score.score, 40);
        assert_eq!(game.lines, 1);
        let rows = game.board.to_rows();
        assert!(rows[0].iter().all(|&v| v == 0));
        // Top half of the O shifted down into the bottom row
        assert_eq!(rows[19], vec![0, 0, 0, 0, 0, 0, 0, 0, 4, 4]);
        assert_eq!(game.board.occupied(), 2);
    }

    #[test]
    fn test_tick_drops_then_locks() {
        let mut game = game();
        let kind = game.current.kind;
        let start_y = game.current.pos.y;
        assert_eq!(game.tick(), TickResult::Continue);
        assert_eq!(game.current.pos.y, start_y + 1);

        // Keep ticking until the first piece locks
        let mut ticks = 0;
        while game.board.occupied() == 0 {
            game.tick();
            ticks += 1;
            assert!(ticks < 30);
        }
        assert_eq!(game.board.occupied(), 4);
        assert!(game.board.cells().iter().all(|&v| v == 0 || v == kind.id()));
    }

    #[test]
    fn test_spawn_overlap_tops_out() {
        let mut game = game();
        for y in 1..20 {
            fill_row_except(&mut game, y, &[0]);
        }
        assert!(game.spawn_next());
        assert_eq!(game.tick(), TickResult::Ended);
        // Input ignored once topped out
        let before = game.current.clone();
        assert_eq!(game.apply_input(TetrisAction::Left), InputResult::Applied);
        assert_eq!(game.current, before);
    }

    /// Lower the current piece until it rests on the floor or the stack
    fn settle(game: &mut TetrisGame) {
        loop {
            let mut lower = game.current.clone();
            lower.pos.y += 1;
            if game.collides(&lower) {
                break;
            }
            game.current = lower;
        }
    }

    #[test]
    fn test_hard_drop_of_resting_piece_waits_for_tick() {
        let mut game = game();
        settle(&mut game);
        let before = game.current.clone();

        assert_eq!(game.hard_drop(), 0);
        assert_eq!(game.apply_input(TetrisAction::HardDrop), InputResult::Applied);
        assert_eq!(game.current, before);
        assert_eq!(game.board.occupied(), 0);

        // Gravity locks it
        assert_eq!(game.tick(), TickResult::Continue);
        assert_eq!(game.board.occupied(), 4);
    }

    #[test]
    fn test_soft_drop_resets_drop_timer() {
        let mut game = game();
        let start_y = game.current.pos.y;
        assert_eq!(game.apply_input(TetrisAction::SoftDrop), InputResult::ResetClock);
        assert_eq!(game.current.pos.y, start_y + 1);
        assert_eq!(game.apply_input(TetrisAction::Left), InputResult::Applied);
    }

    #[test]
    fn test_hard_drop_that_tops_out_ends_game() {
        let mut game = game();
        for y in 3..20 {
            fill_row_except(&mut game, y, &[0]);
        }
        // O drops one row onto the stack; the next O cannot spawn
        game.current = Piece::spawn(PieceKind::O, 10);
        game.next = Piece::spawn(PieceKind::O, 10);
        assert_eq!(game.apply_input(TetrisAction::HardDrop), InputResult::Ended);
        assert!(game.topped_out);
        assert_eq!(game.tick(), TickResult::Ended);
    }

    #[test]
    fn test_session_never_runs_a_topped_out_game() {
        let mut session = Session::<TetrisGame>::new(TetrisConfig::default(), 9);
        let token = session.start();
        let mut now = 0.0;
        session.frame(token, now);

        for _ in 0..2000 {
            session.input(TetrisAction::HardDrop);
            if session.game().is_topped_out() {
                break;
            }
            now += session.game().tick_interval_ms();
            session.frame(token, now);
            if session.game().is_topped_out() {
                break;
            }
        }

        assert!(session.game().is_topped_out());
        assert_eq!(session.phase(), GamePhase::Ended);
        assert_eq!(session.frame(token, now + 10_000.0), FrameResult::Stale);
        session.pause();
        assert_eq!(session.phase(), GamePhase::Ended);
    }

    #[test]
    fn test_moves_clamped_at_walls() {
        let mut game = game();
        for _ in 0..20 {
            game.apply_input(TetrisAction::Left);
        }
        let min_x = game.current.cells().map(|(c, _)| c.x).min().unwrap();
        assert_eq!(min_x, 0);
        for _ in 0..20 {
            game.apply_input(TetrisAction::Right);
        }
        let max_x = game.current.cells().map(|(c, _)| c.x).max().unwrap();
        assert_eq!(max_x, 9);
    }

    #[test]
    fn test_four_rotations_restore_shape() {
        let mut piece = Piece::spawn(PieceKind::T, 10);
        let original = piece.matrix.clone();
        piece.rotate_cw();
        assert_ne!(piece.matrix, original);
        for _ in 0..3 {
            piece.rotate_cw();
        }
        assert_eq!(piece.matrix, original);
        piece.rotate_cw();
        piece.rotate_ccw();
        assert_eq!(piece.matrix, original);
    }

    // Kick offsets at the walls are an implementation detail: only check
    // that a rotation either lands legally or is fully reverted.
    #[test]
    fn test_rotation_at_wall_is_legal_or_reverted() {
        let mut game = game();
        let mut piece = Piece::spawn(PieceKind::I, 10);
        piece.rotate_cw();
        piece.pos = IVec2::new(-2, 5); // vertical I hugging the left wall
        game.current = piece;
        assert!(!game.collides(&game.current));

        let before = game.current.clone();
        let rotated = game.rotate();
        assert!(!game.collides(&game.current));
        if !rotated {
            assert_eq!(game.current, before);
        }
    }

    #[test]
    fn test_rotation_blocked_everywhere_reverts() {
        let mut game = game();
        // Walls of settled blocks leave only a one-wide shaft at column 4
        for y in 0..20 {
            fill_row_except(&mut game, y, &[4]);
        }
        let mut piece = Piece::spawn(PieceKind::I, 10);
        piece.rotate_cw();
        piece.pos = IVec2::new(2, 0);
        game.current = piece;
        assert!(!game.collides(&game.current));

        let before = game.current.clone();
        assert!(!game.rotate());
        assert_eq!(game.current, before);
    }

    #[test]
    fn test_level_speeds_up_drop() {
        let mut game = game();
        let base = game.tick_interval_ms();
        game.add_lines(4);
        game.add_lines(4);
        game.add_lines(2);
        assert_eq!(game.score.level, 2);
        assert!(game.tick_interval_ms() < base);
        game.add_lines(200);
        assert_eq!(game.tick_interval_ms(), game.config.min_drop_interval_ms);
    }

    proptest! {
        #[test]
        fn prop_board_values_in_piece_range(
            seed in any::<u64>(),
            actions in prop::collection::vec(0u8..6, 0..300),
        ) {
            let mut game = TetrisGame::new(&TetrisConfig::default(), seed);
            for a in actions {
                let action = match a {
                    0 => TetrisAction::Left,
                    1 => TetrisAction::Right,
                    2 => TetrisAction::Rotate,
                    3 => TetrisAction::SoftDrop,
                    4 => TetrisAction::HardDrop,
                    _ => {
                        game.tick();
                        continue;
                    }
                };
                let result = game.apply_input(action);
                prop_assert_eq!(result == InputResult::Ended, game.topped_out);
                prop_assert!(game.board.cells().iter().all(|&v| v <= 7));
                if !game.topped_out {
                    prop_assert!(game.current.cells().all(|(c, _)| c.x >= 0 && c.x < 10));
                }
            }
        }
    }
}
