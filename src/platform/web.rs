//! Browser bindings
//!
//! One exported class per game. The page owns the animation-frame loop and
//! the canvas; it forwards key events and `requestAnimationFrame`
//! timestamps, then paints from `state_json()`.

use wasm_bindgen::prelude::*;

use super::keys::{KeyBindings, SessionCommand, session_command};
use crate::games::{PongGame, ShooterGame, SnakeGame, TetrisGame, TronGame};
use crate::settings::Settings;
use crate::sim::{FrameToken, GamePhase, Session};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier module instance
        return;
    }
    log::info!("arcade-sim ready");
}

fn parse_settings(json: Option<String>) -> Settings {
    json.as_deref()
        .and_then(Settings::from_json)
        .unwrap_or_default()
}

fn phase_name(phase: GamePhase) -> &'static str {
    match phase {
        GamePhase::Idle => "idle",
        GamePhase::Running => "running",
        GamePhase::Paused => "paused",
        GamePhase::Ended => "ended",
    }
}

macro_rules! web_game {
    ($(#[$meta:meta])* $name:ident, $game:ty, $field:ident) => {
        $(#[$meta])*
        #[wasm_bindgen]
        pub struct $name {
            session: Session<$game>,
            token: FrameToken,
        }

        #[wasm_bindgen]
        impl $name {
            /// `settings_json` is optional; missing fields use defaults
            #[wasm_bindgen(constructor)]
            pub fn new(seed: Option<u64>, settings_json: Option<String>) -> Self {
                let settings = parse_settings(settings_json);
                let seed = seed
                    .or(settings.seed)
                    .unwrap_or_else(|| js_sys::Date::now() as u64);
                log::info!("{} created with seed {}", stringify!($field), seed);
                let session = Session::<$game>::new(settings.$field, seed);
                let token = session.token();
                Self { session, token }
            }

            pub fn start(&mut self) {
                self.token = self.session.start();
            }

            pub fn pause(&mut self) {
                self.session.pause();
                self.token = self.session.token();
            }

            pub fn resume(&mut self) {
                self.token = self.session.resume();
            }

            pub fn restart(&mut self) {
                self.token = self.session.restart();
            }

            pub fn stop(&mut self) {
                self.session.stop();
                self.token = self.session.token();
            }

            /// Returns true if the key was used
            pub fn key_down(&mut self, key: &str) -> bool {
                match session_command(key) {
                    Some(SessionCommand::TogglePause) => {
                        self.token = self.session.toggle_pause();
                        true
                    }
                    Some(SessionCommand::Restart) => {
                        self.restart();
                        true
                    }
                    None => match <$game as KeyBindings>::map_key(key, true) {
                        Some(input) => {
                            self.session.input(input);
                            true
                        }
                        None => false,
                    },
                }
            }

            pub fn key_up(&mut self, key: &str) -> bool {
                match <$game as KeyBindings>::map_key(key, false) {
                    Some(input) => {
                        self.session.input(input);
                        true
                    }
                    None => false,
                }
            }

            /// Animation-frame callback. Returns false once the page can stop
            /// scheduling frames (paused, stopped or ended).
            pub fn frame(&mut self, now_ms: f64) -> bool {
                self.session.frame(self.token, now_ms);
                self.session.phase() == GamePhase::Running
            }

            pub fn phase(&self) -> String {
                phase_name(self.session.phase()).to_string()
            }

            pub fn state_json(&self) -> String {
                match serde_json::to_string(&self.session.current_state()) {
                    Ok(json) => json,
                    Err(e) => {
                        log::warn!("Failed to serialize state: {}", e);
                        String::new()
                    }
                }
            }

            pub fn high_scores_json(&self) -> String {
                serde_json::to_string(self.session.high_scores()).unwrap_or_default()
            }
        }
    };
}

web_game!(
    /// Tetris session for the browser
    WebTetris,
    TetrisGame,
    tetris
);
web_game!(WebSnake, SnakeGame, snake);
web_game!(WebPong, PongGame, pong);
web_game!(WebTron, TronGame, tron);
web_game!(WebShooter, ShooterGame, shooter);
