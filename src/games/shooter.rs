//! Space shooter rule engine
//!
//! The ship slides along the bottom of the field firing bullets upward.
//! Enemies fall from above at a rate and speed that rise with the level.
//! An enemy reaching the bottom or touching the ship costs a life.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::settings::ShooterConfig;
use crate::sim::{
    Aabb, ClockPolicy, Collide, EntityId, EntityKind, EntityStore, InputResult, Intent, Rules,
    ScoreState, Spawn, TickResult, overlapping_pairs, seeded_rng,
};

/// Max particle speed on each axis
const PARTICLE_SPREAD: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShooterInput {
    /// Held horizontal steering (`Intent::None` on release)
    Steer(Intent),
    Fire,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShooterOutcome {
    OutOfLives,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleView {
    pub pos: Vec2,
    pub size: f32,
    pub life: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShooterSnapshot {
    pub ship: Aabb,
    pub bullets: Vec<Aabb>,
    pub enemies: Vec<Aabb>,
    pub particles: Vec<ParticleView>,
    pub score: ScoreState,
    pub outcome: Option<ShooterOutcome>,
}

#[derive(Debug, Clone)]
pub struct ShooterGame {
    config: ShooterConfig,
    rng: Pcg32,
    store: EntityStore,
    ship: EntityId,
    steer: Intent,
    /// Shots requested since the last tick
    shots: u32,
    since_spawn_ms: f64,
    score: ScoreState,
    outcome: Option<ShooterOutcome>,
}

impl ShooterGame {
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn outcome(&self) -> Option<ShooterOutcome> {
        self.outcome
    }

    pub fn ship_box(&self) -> Aabb {
        self.store
            .get(self.ship)
            .and_then(|s| s.aabb())
            .unwrap_or(Aabb::new(Vec2::ZERO, Vec2::ZERO))
    }

    pub fn enemy_speed(&self) -> f32 {
        self.config.enemy_base_speed + self.config.enemy_speed_per_level * self.score.level as f32
    }

    pub fn spawn_interval_ms(&self) -> f64 {
        (self.config.spawn_interval_ms
            - self.config.spawn_step_per_level_ms * self.score.level as f64)
            .max(0.0)
    }

    fn fire(&mut self) {
        let ship = self.ship_box();
        let pos = Vec2::new(
            ship.center().x - self.config.bullet_width / 2.0,
            ship.min.y,
        );
        self.store.spawn(
            EntityKind::Bullet,
            Spawn::at(pos)
                .with_size(Vec2::new(self.config.bullet_width, self.config.bullet_height))
                .with_vel(Vec2::new(0.0, -self.config.bullet_speed)),
        );
    }

    fn spawn_enemy(&mut self) {
        let size = self.config.enemy_size;
        let x = self.rng.random::<f32>() * (self.config.width - size).max(0.0);
        self.store.spawn(
            EntityKind::Enemy,
            Spawn::at(Vec2::new(x, -size))
                .with_size(Vec2::splat(size))
                .with_vel(Vec2::new(0.0, self.enemy_speed())),
        );
    }

    fn explode(&mut self, at: Vec2) {
        for _ in 0..self.config.explosion_particles {
            let vel = Vec2::new(
                self.rng.random_range(-PARTICLE_SPREAD..PARTICLE_SPREAD),
                self.rng.random_range(-PARTICLE_SPREAD..PARTICLE_SPREAD),
            );
            let size = self.rng.random_range(2.0..6.0);
            self.store.spawn(
                EntityKind::Particle,
                Spawn::at(at)
                    .with_size(Vec2::splat(size))
                    .with_vel(vel)
                    .with_life(self.config.particle_life),
            );
        }
    }

    fn lose_life(&mut self) {
        self.score.lives = self.score.lives.saturating_sub(1);
        log::debug!("shooter: life lost, {} left", self.score.lives);
    }
}

impl Rules for ShooterGame {
    type Config = ShooterConfig;
    type Input = ShooterInput;
    type Snapshot = ShooterSnapshot;

    const NAME: &'static str = "shooter";

    fn new(config: &ShooterConfig, seed: u64) -> Self {
        let mut store = EntityStore::new();
        let ship = store.spawn(
            EntityKind::Ship,
            Spawn::at(Vec2::new(config.width / 2.0 - config.ship_width / 2.0, config.ship_y))
                .with_size(Vec2::new(config.ship_width, config.ship_height))
                .with_vel(Vec2::ZERO),
        );
        Self {
            config: config.clone(),
            rng: seeded_rng(seed),
            store,
            ship,
            steer: Intent::None,
            shots: 0,
            since_spawn_ms: 0.0,
            score: ScoreState::new(config.lives),
            outcome: None,
        }
    }

    fn clock_policy(&self) -> ClockPolicy {
        ClockPolicy::Accumulator
    }

    fn tick_interval_ms(&self) -> f64 {
        self.config.frame_interval_ms
    }

    fn apply_input(&mut self, input: ShooterInput) -> InputResult {
        if self.outcome.is_none() {
            match input {
                ShooterInput::Steer(intent) => self.steer = intent,
                ShooterInput::Fire => self.shots += 1,
            }
        }
        InputResult::Applied
    }

    /// Steering is held; queued shots were separate presses and still fire
    fn release_inputs(&mut self) {
        self.steer = Intent::None;
    }

    fn tick(&mut self) -> TickResult {
        if self.outcome.is_some() {
            return TickResult::Ended;
        }

        // Move
        let speed = self.steer.horizontal() * self.config.ship_speed;
        if let Some(ship) = self.store.get_mut(self.ship) {
            ship.vel = Some(Vec2::new(speed, 0.0));
        }
        for _ in 0..std::mem::take(&mut self.shots) {
            self.fire();
        }
        self.since_spawn_ms += self.config.frame_interval_ms;
        if self.since_spawn_ms > self.spawn_interval_ms() {
            self.since_spawn_ms = 0.0;
            self.spawn_enemy();
        }

        self.store.advance(1.0);

        let max_x = (self.config.width - self.config.ship_width).max(0.0);
        if let Some(ship) = self.store.get_mut(self.ship) {
            ship.pos.x = ship.pos.x.clamp(0.0, max_x);
        }
        self.store.for_each(EntityKind::Bullet, |b| b.pos.y >= 0.0);
        self.store.for_each(EntityKind::Particle, |p| match p.life {
            Some(life) if life > 1 => {
                p.life = Some(life - 1);
                true
            }
            _ => false,
        });

        // Collide
        let height = self.config.height;
        let mut escaped = 0;
        self.store.for_each(EntityKind::Enemy, |e| {
            let gone = e.aabb().is_some_and(|b| b.max().y > height);
            if gone {
                escaped += 1;
            }
            !gone
        });

        // Each bullet and enemy is consumed by at most one hit
        let mut kills = Vec::new();
        for (bullet, enemy) in overlapping_pairs(&self.store, EntityKind::Bullet, EntityKind::Enemy)
        {
            if !self.store.contains(bullet) || !self.store.contains(enemy) {
                continue;
            }
            self.store.remove(bullet);
            if let Some(e) = self.store.remove(enemy) {
                kills.push(e.center());
            }
        }

        let ship = self.ship_box();
        let rammed: Vec<EntityId> = self
            .store
            .of_kind(EntityKind::Enemy)
            .filter(|e| e.aabb().is_some_and(|b| b.collides(&ship)))
            .map(|e| e.id)
            .collect();

        // Commit
        for _ in 0..escaped {
            self.lose_life();
        }
        for at in kills {
            self.score.score += self.config.points_per_kill;
            self.explode(at);
        }
        for id in rammed {
            self.store.remove(id);
            self.lose_life();
            self.explode(ship.center());
        }

        let level = (self.score.score / self.config.points_per_level.max(1)) as u32 + 1;
        if level != self.score.level {
            self.score.level = level;
            log::debug!("shooter: level {}", level);
        }

        if self.score.lives == 0 {
            self.outcome = Some(ShooterOutcome::OutOfLives);
            log::debug!("shooter: out of lives, score {}", self.score.score);
            return TickResult::Ended;
        }
        TickResult::Continue
    }

    fn snapshot(&self) -> ShooterSnapshot {
        let boxes = |kind| {
            self.store
                .of_kind(kind)
                .filter_map(|e| e.aabb())
                .collect::<Vec<_>>()
        };
        ShooterSnapshot {
            ship: self.ship_box(),
            bullets: boxes(EntityKind::Bullet),
            enemies: boxes(EntityKind::Enemy),
            particles: self
                .store
                .of_kind(EntityKind::Particle)
                .map(|p| ParticleView {
                    pos: p.pos,
                    size: p.size.map(|s| s.x).unwrap_or_default(),
                    life: p.life.unwrap_or_default(),
                })
                .collect(),
            score: self.score,
            outcome: self.outcome,
        }
    }

    fn final_score(&self) -> u64 {
        self.score.score
    }

    fn level(&self) -> u32 {
        self.score.level
    }
}
