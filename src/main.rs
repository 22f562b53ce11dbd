//! Arcade Sim entry point
//!
//! Native: plays every game headless with a simple autopilot on a simulated
//! clock and logs the outcomes. Usage: `arcade-sim [settings.json]`
//!
//! Web: the library's wasm bindings are the entry point; see `platform::web`.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use arcade_sim::games::{
        Player, PongGame, PongInput, ShooterGame, ShooterInput, Side, SnakeGame, TetrisAction,
        TetrisGame, TronGame, TronInput,
    };
    use arcade_sim::Settings;
    use arcade_sim::platform::fresh_seed;
    use arcade_sim::sim::{Direction, EntityKind, FrameResult, GamePhase, Intent, Rules, Session};
    use glam::IVec2;

    /// Give up on games that never end (e.g. two perfect pong paddles)
    const MAX_TICKS: u64 = 50_000;

    /// Scripted player for headless runs
    trait Autopilot: Rules {
        fn steer(&self, tick: u64) -> Vec<Self::Input>;
    }

    impl Autopilot for TetrisGame {
        /// Spread pieces across the board, then hard drop
        fn steer(&self, tick: u64) -> Vec<TetrisAction> {
            let cols = self.board().width();
            let piece = self.current();
            let target = ((tick * 3) % cols.max(1) as u64) as i32;
            let action = if piece.pos.x < target {
                TetrisAction::Right
            } else if piece.pos.x > target {
                TetrisAction::Left
            } else {
                TetrisAction::HardDrop
            };
            vec![action]
        }
    }

    impl Autopilot for SnakeGame {
        /// Chase the food, x first
        fn steer(&self, _tick: u64) -> Vec<Intent> {
            let Some(food) = self.food() else {
                return Vec::new();
            };
            let head = self.head();
            let intent = if food.x > head.x {
                Intent::Right
            } else if food.x < head.x {
                Intent::Left
            } else if food.y > head.y {
                Intent::Down
            } else {
                Intent::Up
            };
            vec![intent]
        }
    }

    impl Autopilot for PongGame {
        /// Left paddle tracks the ball; right paddle lags behind it
        fn steer(&self, tick: u64) -> Vec<PongInput> {
            let snap = self.snapshot();
            let follow = |paddle_y: f32, slack: f32| {
                if snap.ball_center.y < paddle_y - slack {
                    Intent::Up
                } else if snap.ball_center.y > paddle_y + slack {
                    Intent::Down
                } else {
                    Intent::None
                }
            };
            let right = if tick % 3 == 0 {
                Intent::None
            } else {
                follow(snap.right_paddle.center().y, 30.0)
            };
            vec![
                PongInput {
                    side: Side::Left,
                    intent: follow(snap.left_paddle.center().y, 10.0),
                },
                PongInput {
                    side: Side::Right,
                    intent: right,
                },
            ]
        }
    }

    impl Autopilot for TronGame {
        /// Go straight; turn clockwise when the next cell is taken
        fn steer(&self, _tick: u64) -> Vec<TronInput> {
            [Player::P1, Player::P2]
                .into_iter()
                .filter_map(|player| {
                    let heading = self.heading(player);
                    let free = |d: Direction| {
                        let next: IVec2 = self.head(player) + d.delta();
                        self.board().is_empty_at(next)
                    };
                    if free(heading) {
                        return None;
                    }
                    let turn = [heading.turn_cw(), heading.turn_cw().opposite()]
                        .into_iter()
                        .find(|&d| free(d))?;
                    Some(TronInput {
                        player,
                        intent: turn.into(),
                    })
                })
                .collect()
        }
    }

    impl Autopilot for ShooterGame {
        /// Line up under the lowest enemy and keep firing
        fn steer(&self, tick: u64) -> Vec<ShooterInput> {
            let ship = self.ship_box().center().x;
            let target = self
                .store()
                .of_kind(EntityKind::Enemy)
                .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                .map(|e| e.center().x);
            let intent = match target {
                Some(x) if x < ship - 5.0 => Intent::Left,
                Some(x) if x > ship + 5.0 => Intent::Right,
                _ => Intent::None,
            };
            let mut inputs = vec![ShooterInput::Steer(intent)];
            if tick % 10 == 0 {
                inputs.push(ShooterInput::Fire);
            }
            inputs
        }
    }

    fn play<G: Autopilot>(config: G::Config, seed: u64) {
        let mut session = Session::<G>::new(config, seed);
        let token = session.start();
        let mut now = 0.0;

        loop {
            let tick = session.ticks();
            for input in session.game().steer(tick) {
                session.input(input);
            }
            now += session.game().tick_interval_ms();
            match session.frame(token, now) {
                FrameResult::Ended | FrameResult::Stale => break,
                FrameResult::Ticked | FrameResult::Waiting => {}
            }
            if session.ticks() >= MAX_TICKS {
                log::warn!("{}: no result after {} ticks, stopping", G::NAME, MAX_TICKS);
                session.stop();
                return;
            }
        }

        if session.phase() == GamePhase::Ended {
            log::info!(
                "{}: finished in {} ticks ({:.1}s simulated), score {}",
                G::NAME,
                session.ticks(),
                now / 1000.0,
                session.game().final_score()
            );
        }
    }

    pub fn run() {
        let settings = std::env::args()
            .nth(1)
            .map(Settings::load_from)
            .unwrap_or_default();
        let seed = settings.seed.unwrap_or_else(fresh_seed);
        log::info!("Arcade Sim (headless) starting, seed {}", seed);

        play::<TetrisGame>(settings.tetris.clone(), seed);
        play::<SnakeGame>(settings.snake.clone(), seed);
        play::<PongGame>(settings.pong.clone(), seed);
        play::<TronGame>(settings.tron.clone(), seed);
        play::<ShooterGame>(settings.shooter.clone(), seed);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::init, this is just to satisfy the compiler
}
