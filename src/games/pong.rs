//! Pong rule engine
//!
//! Two paddles and a ball in a continuous field. The ball reflects off the
//! top and bottom walls and the paddles; leaving the field on the left or
//! right scores for the opposite player and re-serves from the center.

use std::f32::consts::FRAC_PI_4;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::settings::PongConfig;
use crate::sim::{
    Aabb, ClockPolicy, Collide, EntityId, EntityKind, EntityStore, InputResult, Intent, Rules,
    Spawn, TickResult, seeded_rng,
};

/// A player, named by the side their paddle defends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// Held vertical intent for one paddle (`Intent::None` on key release)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PongInput {
    pub side: Side,
    pub intent: Intent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PongScore {
    pub left: u32,
    pub right: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PongSnapshot {
    pub left_paddle: Aabb,
    pub right_paddle: Aabb,
    pub ball_center: Vec2,
    pub ball_vel: Vec2,
    pub ball_size: f32,
    pub score: PongScore,
    pub winner: Option<Side>,
}

#[derive(Debug, Clone)]
pub struct PongGame {
    config: PongConfig,
    rng: Pcg32,
    store: EntityStore,
    paddles: [EntityId; 2],
    ball: EntityId,
    ball_speed: f32,
    held: [Intent; 2],
    score: PongScore,
    winner: Option<Side>,
}

impl PongGame {
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn score(&self) -> PongScore {
        self.score
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn ball_center(&self) -> Vec2 {
        self.store.get(self.ball).map(|b| b.center()).unwrap_or_default()
    }

    pub fn ball_vel(&self) -> Vec2 {
        self.store.get(self.ball).and_then(|b| b.vel).unwrap_or_default()
    }

    fn paddle_box(&self, side: Side) -> Aabb {
        self.store
            .get(self.paddles[side.index()])
            .and_then(|p| p.aabb())
            .unwrap_or(Aabb::new(Vec2::ZERO, Vec2::ZERO))
    }

    fn field_center(&self) -> Vec2 {
        Vec2::new(self.config.width / 2.0, self.config.height / 2.0)
    }

    /// Center the ball and launch it at a random angle within ±45° of
    /// horizontal, travelling in the x direction `dir` (±1)
    fn serve(&mut self, dir: f32) {
        self.ball_speed = self.config.initial_ball_speed;
        let angle = self.rng.random_range(-FRAC_PI_4..=FRAC_PI_4);
        let vel = Vec2::new(angle.cos() * dir, angle.sin()) * self.ball_speed;
        let size = Vec2::splat(self.config.ball_size);
        let center = self.field_center();
        if let Some(ball) = self.store.get_mut(self.ball) {
            ball.pos = center - size * 0.5;
            ball.vel = Some(vel);
        }
    }

    /// Outgoing velocity after a paddle hit: the further from the paddle's
    /// center, the steeper the angle (up to 45°)
    fn deflect(&mut self, paddle: &Aabb, ball_center: Vec2, dir: f32) -> Vec2 {
        let half = (paddle.size.y / 2.0).max(f32::EPSILON);
        let hit = ((ball_center.y - paddle.center().y) / half).clamp(-1.0, 1.0);
        let angle = hit * FRAC_PI_4;
        self.ball_speed += self.config.speed_gain;
        Vec2::new(angle.cos() * dir, angle.sin()) * self.ball_speed
    }

    fn point_for(&mut self, side: Side) {
        match side {
            Side::Left => self.score.left += 1,
            Side::Right => self.score.right += 1,
        }
        log::debug!(
            "pong: point {:?}, {} - {}",
            side,
            self.score.left,
            self.score.right
        );
        let total = match side {
            Side::Left => self.score.left,
            Side::Right => self.score.right,
        };
        if total >= self.config.winning_score {
            self.winner = Some(side);
        }
        // Serve away from the scorer, toward the side that conceded
        let dir = match side {
            Side::Left => 1.0,
            Side::Right => -1.0,
        };
        self.serve(dir);
    }
}

impl Rules for PongGame {
    type Config = PongConfig;
    type Input = PongInput;
    type Snapshot = PongSnapshot;

    const NAME: &'static str = "pong";

    fn new(config: &PongConfig, seed: u64) -> Self {
        let mut store = EntityStore::new();
        let paddle_size = Vec2::new(config.paddle_width, config.paddle_height);
        let paddle_y = config.height / 2.0 - config.paddle_height / 2.0;
        let left = store.spawn(
            EntityKind::Paddle,
            Spawn::at(Vec2::new(config.paddle_inset, paddle_y))
                .with_size(paddle_size)
                .with_vel(Vec2::ZERO),
        );
        let right = store.spawn(
            EntityKind::Paddle,
            Spawn::at(Vec2::new(
                config.width - config.paddle_inset - config.paddle_width,
                paddle_y,
            ))
            .with_size(paddle_size)
            .with_vel(Vec2::ZERO),
        );
        let ball = store.spawn(
            EntityKind::Ball,
            Spawn::at(Vec2::ZERO)
                .with_size(Vec2::splat(config.ball_size))
                .with_vel(Vec2::ZERO),
        );

        let mut game = Self {
            config: config.clone(),
            rng: seeded_rng(seed),
            store,
            paddles: [left, right],
            ball,
            ball_speed: config.initial_ball_speed,
            held: [Intent::None; 2],
            score: PongScore::default(),
            winner: None,
        };
        let dir = if game.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        game.serve(dir);
        game
    }

    fn clock_policy(&self) -> ClockPolicy {
        ClockPolicy::Accumulator
    }

    fn tick_interval_ms(&self) -> f64 {
        self.config.frame_interval_ms
    }

    fn apply_input(&mut self, input: PongInput) -> InputResult {
        if self.winner.is_none() {
            self.held[input.side.index()] = input.intent;
        }
        InputResult::Applied
    }

    fn release_inputs(&mut self) {
        self.held = [Intent::None; 2];
    }

    fn tick(&mut self) -> TickResult {
        if self.winner.is_some() {
            return TickResult::Ended;
        }

        // Move: paddles follow held intents, everything advances together
        for side in [Side::Left, Side::Right] {
            let speed = self.held[side.index()].vertical() * self.config.paddle_speed;
            if let Some(paddle) = self.store.get_mut(self.paddles[side.index()]) {
                paddle.vel = Some(Vec2::new(0.0, speed));
            }
        }
        self.store.advance(1.0);

        let max_y = (self.config.height - self.config.paddle_height).max(0.0);
        for id in self.paddles {
            if let Some(paddle) = self.store.get_mut(id) {
                paddle.pos.y = paddle.pos.y.clamp(0.0, max_y);
            }
        }

        // Collide
        let Some(ball) = self.store.get(self.ball).cloned() else {
            return TickResult::Continue;
        };
        let Some(ball_box) = ball.aabb() else {
            return TickResult::Continue;
        };
        let mut pos = ball.pos;
        let mut vel = ball.vel.unwrap_or_default();
        let size = ball_box.size;

        if pos.y <= 0.0 {
            pos.y = 0.0;
            vel.y = vel.y.abs();
        } else if pos.y + size.y >= self.config.height {
            pos.y = self.config.height - size.y;
            vel.y = -vel.y.abs();
        }

        let left = self.paddle_box(Side::Left);
        let right = self.paddle_box(Side::Right);
        if ball_box.collides(&left) {
            vel = self.deflect(&left, ball_box.center(), 1.0);
            pos.x = left.max().x;
        } else if ball_box.collides(&right) {
            vel = self.deflect(&right, ball_box.center(), -1.0);
            pos.x = right.min.x - size.x;
        }

        let scorer = if pos.x > self.config.width {
            Some(Side::Left)
        } else if pos.x + size.x < 0.0 {
            Some(Side::Right)
        } else {
            None
        };

        if let Some(b) = self.store.get_mut(self.ball) {
            b.pos = pos;
            b.vel = Some(vel);
        }

        // Commit
        if let Some(side) = scorer {
            self.point_for(side);
        }
        if let Some(winner) = self.winner {
            log::debug!("pong: {:?} wins", winner);
            return TickResult::Ended;
        }
        TickResult::Continue
    }

    fn snapshot(&self) -> PongSnapshot {
        PongSnapshot {
            left_paddle: self.paddle_box(Side::Left),
            right_paddle: self.paddle_box(Side::Right),
            ball_center: self.ball_center(),
            ball_vel: self.ball_vel(),
            ball_size: self.config.ball_size,
            score: self.score,
            winner: self.winner,
        }
    }

    fn final_score(&self) -> u64 {
        self.score.left.max(self.score.right) as u64
    }
}
