//! Session orchestration
//!
//! One `Session` owns exactly one game instance (clock, entities, board and
//! score live inside the rule engine) and drives it from host frames.
//! Restart discards the whole instance and builds a fresh one.

use serde::Serialize;

use super::clock::{Clock, ClockPolicy};
use super::state::{GamePhase, InputResult, TickResult};
use crate::highscores::HighScores;

/// A game's transition function plus the data it owns
pub trait Rules: Sized {
    type Config: Clone;
    /// Host intents, already mapped from raw keys
    type Input;
    /// Read-only view handed to the presentation layer
    type Snapshot: Clone + Serialize;

    const NAME: &'static str;

    /// Build a fully initialized game
    fn new(config: &Self::Config, seed: u64) -> Self;

    fn clock_policy(&self) -> ClockPolicy;

    /// Interval between ticks; read after every tick so games can speed up
    fn tick_interval_ms(&self) -> f64;

    /// Apply a host intent. Called only while the session is running.
    fn apply_input(&mut self, input: Self::Input) -> InputResult;

    /// Drop held intents (keys down when the session paused). Release
    /// events sent while paused never reach the game.
    fn release_inputs(&mut self) {}

    /// Advance one tick: movement, then collisions, then rule commits
    fn tick(&mut self) -> TickResult;

    fn snapshot(&self) -> Self::Snapshot;

    /// Score recorded on the leaderboard when the game ends
    fn final_score(&self) -> u64;

    fn level(&self) -> u32 {
        1
    }
}

/// Handle for a scheduled frame callback. Invalidated by pause, stop,
/// restart and game end, so a stale callback can never tick the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

/// What a host frame did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameResult {
    /// Token invalidated or session not running; nothing happened
    Stale,
    /// Running, but no tick was due
    Waiting,
    /// One tick executed
    Ticked,
    /// One tick executed and the game reached a terminal state
    Ended,
}

/// State surfaced to rendering
#[derive(Debug, Clone, Serialize)]
pub struct SessionState<S> {
    pub phase: GamePhase,
    pub ticks: u64,
    pub game: S,
}

pub struct Session<G: Rules> {
    config: G::Config,
    base_seed: u64,
    /// Games built so far (seed derivation)
    runs: u64,
    game: G,
    clock: Clock,
    phase: GamePhase,
    generation: u64,
    ticks: u64,
    high_scores: HighScores,
}

impl<G: Rules> Session<G> {
    pub fn new(config: G::Config, seed: u64) -> Self {
        let game = G::new(&config, seed);
        let clock = Clock::new(game.clock_policy(), game.tick_interval_ms());
        Self {
            config,
            base_seed: seed,
            runs: 1,
            game,
            clock,
            phase: GamePhase::Idle,
            generation: 0,
            ticks: 0,
            high_scores: HighScores::new(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Token for the currently scheduled frame callback
    pub fn token(&self) -> FrameToken {
        FrameToken(self.generation)
    }

    /// Idle -> Running. Other phases are left alone.
    pub fn start(&mut self) -> FrameToken {
        if self.phase == GamePhase::Idle {
            log::info!("{}: start", G::NAME);
            self.run();
        }
        self.token()
    }

    /// Running -> Paused
    pub fn pause(&mut self) {
        if self.phase == GamePhase::Running {
            log::info!("{}: paused", G::NAME);
            self.phase = GamePhase::Paused;
            self.clock.disarm();
            self.game.release_inputs();
            self.invalidate();
        }
    }

    /// Paused -> Running
    pub fn resume(&mut self) -> FrameToken {
        if self.phase == GamePhase::Paused {
            log::info!("{}: resumed", G::NAME);
            self.run();
        }
        self.token()
    }

    /// Pause when running, resume when paused
    pub fn toggle_pause(&mut self) -> FrameToken {
        match self.phase {
            GamePhase::Running => self.pause(),
            GamePhase::Paused => {
                self.resume();
            }
            _ => {}
        }
        self.token()
    }

    /// Discard the current game and start a fresh one. Always succeeds.
    pub fn restart(&mut self) -> FrameToken {
        self.rebuild();
        log::info!("{}: restarted (run {})", G::NAME, self.runs);
        self.run();
        self.token()
    }

    /// Cancel any pending frame and return to Idle with a fresh game
    pub fn stop(&mut self) {
        if self.phase != GamePhase::Idle {
            log::info!("{}: stopped", G::NAME);
        }
        self.rebuild();
        self.phase = GamePhase::Idle;
    }

    /// Forward a host intent. Ignored unless running. An input that ends
    /// the game ends the session right away.
    pub fn input(&mut self, input: G::Input) {
        if self.phase != GamePhase::Running {
            return;
        }
        match self.game.apply_input(input) {
            InputResult::Applied => {}
            InputResult::ResetClock => self.clock.arm(),
            InputResult::Ended => self.end(),
        }
    }

    /// Host frame callback. Fires at most one tick.
    pub fn frame(&mut self, token: FrameToken, now_ms: f64) -> FrameResult {
        if token != self.token() || self.phase != GamePhase::Running {
            return FrameResult::Stale;
        }
        if !self.clock.tick(now_ms) {
            return FrameResult::Waiting;
        }

        let result = self.game.tick();
        self.ticks += 1;
        self.clock.set_interval(self.game.tick_interval_ms());

        match result {
            TickResult::Continue => FrameResult::Ticked,
            TickResult::Ended => {
                self.end();
                FrameResult::Ended
            }
        }
    }

    pub fn current_state(&self) -> SessionState<G::Snapshot> {
        SessionState {
            phase: self.phase,
            ticks: self.ticks,
            game: self.game.snapshot(),
        }
    }

    fn run(&mut self) {
        self.phase = GamePhase::Running;
        self.clock.arm();
        self.invalidate();
    }

    fn end(&mut self) {
        self.phase = GamePhase::Ended;
        self.clock.disarm();
        self.invalidate();

        let score = self.game.final_score();
        log::info!("{}: game over after {} ticks, score {}", G::NAME, self.ticks, score);
        if let Some(rank) = self.high_scores.add_score(score, self.game.level(), self.ticks) {
            log::info!("{}: new high score, rank {}", G::NAME, rank);
        }
    }

    fn rebuild(&mut self) {
        self.clock.disarm();
        self.invalidate();
        let seed = self
            .base_seed
            .wrapping_add(self.runs.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        self.runs += 1;
        self.game = G::new(&self.config, seed);
        self.clock = Clock::new(self.game.clock_policy(), self.game.tick_interval_ms());
        self.ticks = 0;
    }

    fn invalidate(&mut self) {
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts ticks and ends after `limit`. Inputs of 100 or more end it
    /// at once; 0 restarts the tick timer.
    struct Counter {
        limit: u32,
        count: u32,
        boost: u32,
    }

    impl Rules for Counter {
        type Config = u32;
        type Input = u32;
        type Snapshot = u32;

        const NAME: &'static str = "counter";

        fn new(config: &u32, _seed: u64) -> Self {
            Self {
                limit: *config,
                count: 0,
                boost: 0,
            }
        }

        fn clock_policy(&self) -> ClockPolicy {
            ClockPolicy::FixedInterval
        }

        fn tick_interval_ms(&self) -> f64 {
            100.0
        }

        fn apply_input(&mut self, input: u32) -> InputResult {
            self.boost += input;
            match input {
                0 => InputResult::ResetClock,
                1..100 => InputResult::Applied,
                _ => InputResult::Ended,
            }
        }

        fn tick(&mut self) -> TickResult {
            self.count += 1;
            if self.count >= self.limit {
                TickResult::Ended
            } else {
                TickResult::Continue
            }
        }

        fn snapshot(&self) -> u32 {
            self.count
        }

        fn final_score(&self) -> u64 {
            (self.count + self.boost) as u64
        }
    }

    fn running(limit: u32) -> (Session<Counter>, FrameToken) {
        let mut session = Session::<Counter>::new(limit, 1);
        let token = session.start();
        assert_eq!(session.frame(token, 0.0), FrameResult::Waiting);
        (session, token)
    }

    #[test]
    fn test_idle_does_not_tick() {
        let mut session = Session::<Counter>::new(5, 1);
        let token = session.token();
        assert_eq!(session.frame(token, 1000.0), FrameResult::Stale);
        assert_eq!(session.phase(), GamePhase::Idle);
    }

    #[test]
    fn test_start_and_tick() {
        let (mut session, token) = running(5);
        assert_eq!(session.phase(), GamePhase::Running);
        assert_eq!(session.frame(token, 100.0), FrameResult::Ticked);
        assert_eq!(session.current_state().game, 1);
    }

    #[test]
    fn test_pause_invalidates_pending_frame() {
        let (mut session, token) = running(5);
        session.pause();
        assert_eq!(session.frame(token, 500.0), FrameResult::Stale);

        let resumed = session.resume();
        assert_ne!(resumed, token);
        // Old callback still cannot tick after resume
        assert_eq!(session.frame(token, 600.0), FrameResult::Stale);
        assert_eq!(session.frame(resumed, 600.0), FrameResult::Waiting);
        assert_eq!(session.frame(resumed, 700.0), FrameResult::Ticked);
    }

    #[test]
    fn test_end_is_terminal_until_restart() {
        let (mut session, token) = running(2);
        assert_eq!(session.frame(token, 100.0), FrameResult::Ticked);
        assert_eq!(session.frame(token, 200.0), FrameResult::Ended);
        assert_eq!(session.phase(), GamePhase::Ended);
        assert_eq!(session.frame(token, 300.0), FrameResult::Stale);

        // start/resume do not leave Ended
        session.start();
        session.resume();
        assert_eq!(session.phase(), GamePhase::Ended);
        assert_eq!(session.high_scores().top_score(), Some(2));

        let token = session.restart();
        assert_eq!(session.phase(), GamePhase::Running);
        assert_eq!(session.current_state().game, 0);
        assert_eq!(session.ticks(), 0);
        session.frame(token, 1000.0);
        assert_eq!(session.frame(token, 1100.0), FrameResult::Ticked);
    }

    #[test]
    fn test_input_only_while_running() {
        let mut session = Session::<Counter>::new(1, 1);
        session.input(10);
        let token = session.start();
        session.input(3);
        session.frame(token, 0.0);
        session.frame(token, 100.0);
        assert_eq!(session.phase(), GamePhase::Ended);
        session.input(50);
        assert_eq!(session.game().boost, 3);
    }

    #[test]
    fn test_restart_idempotent() {
        let (mut once, _) = running(5);
        once.restart();
        let (mut twice, _) = running(5);
        twice.restart();
        twice.restart();

        let a = once.current_state();
        let b = twice.current_state();
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.ticks, b.ticks);
        assert_eq!(a.game, b.game);
    }

    #[test]
    fn test_stop_cancels_and_resets() {
        let (mut session, token) = running(5);
        session.frame(token, 100.0);
        session.stop();
        assert_eq!(session.phase(), GamePhase::Idle);
        assert_eq!(session.frame(token, 200.0), FrameResult::Stale);
        assert_eq!(session.current_state().game, 0);
    }

    #[test]
    fn test_input_can_end_game() {
        let (mut session, token) = running(50);
        assert_eq!(session.frame(token, 100.0), FrameResult::Ticked);
        session.input(100);
        assert_eq!(session.phase(), GamePhase::Ended);
        assert!(!session.clock.is_armed());
        assert_eq!(session.high_scores().top_score(), Some(101));
        // The pending callback is dead and pause cannot leave Ended
        assert_eq!(session.frame(token, 200.0), FrameResult::Stale);
        session.pause();
        assert_eq!(session.toggle_pause(), session.token());
        assert_eq!(session.phase(), GamePhase::Ended);
        assert_eq!(session.high_scores().entries.len(), 1);
    }

    #[test]
    fn test_input_resets_tick_timer() {
        let (mut session, token) = running(50);
        assert_eq!(session.frame(token, 90.0), FrameResult::Waiting);
        session.input(0);
        // Next frame is the new reference; a full interval follows it
        assert_eq!(session.frame(token, 100.0), FrameResult::Waiting);
        assert_eq!(session.frame(token, 150.0), FrameResult::Waiting);
        assert_eq!(session.frame(token, 200.0), FrameResult::Ticked);
    }

    #[test]
    fn test_pause_disarms_clock() {
        let (mut session, _) = running(5);
        assert!(session.clock.is_armed());
        session.pause();
        assert!(!session.clock.is_armed());
        session.resume();
        assert!(session.clock.is_armed());
    }
}
