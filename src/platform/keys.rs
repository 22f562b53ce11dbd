//! Key bindings
//!
//! Maps raw key names (browser `KeyboardEvent.key` or `.code` values) to
//! game inputs. Unknown keys map to `None` and are ignored by hosts.

use crate::games::{
    Player, PongGame, PongInput, ShooterGame, ShooterInput, Side, SnakeGame, TetrisAction,
    TetrisGame, TronGame, TronInput,
};
use crate::sim::{Intent, Rules};

/// Session-level commands shared by every game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    TogglePause,
    Restart,
}

/// Per-game key map
pub trait KeyBindings: Rules {
    /// Input for a key transition, or `None` if the game ignores it
    fn map_key(key: &str, pressed: bool) -> Option<Self::Input>;
}

fn normalize(key: &str) -> String {
    key.to_ascii_lowercase()
}

fn arrow_intent(key: &str) -> Option<Intent> {
    match key {
        "arrowup" => Some(Intent::Up),
        "arrowdown" => Some(Intent::Down),
        "arrowleft" => Some(Intent::Left),
        "arrowright" => Some(Intent::Right),
        _ => None,
    }
}

fn wasd_intent(key: &str) -> Option<Intent> {
    match key {
        "w" | "keyw" => Some(Intent::Up),
        "s" | "keys" => Some(Intent::Down),
        "a" | "keya" => Some(Intent::Left),
        "d" | "keyd" => Some(Intent::Right),
        _ => None,
    }
}

fn is_space(key: &str) -> bool {
    matches!(key, " " | "space" | "spacebar")
}

/// Pause and restart keys, checked by hosts before the game's own map
pub fn session_command(key: &str) -> Option<SessionCommand> {
    match normalize(key).as_str() {
        "p" | "keyp" | "escape" => Some(SessionCommand::TogglePause),
        "r" | "keyr" => Some(SessionCommand::Restart),
        _ => None,
    }
}

impl KeyBindings for TetrisGame {
    fn map_key(key: &str, pressed: bool) -> Option<TetrisAction> {
        if !pressed {
            return None;
        }
        let key = normalize(key);
        if is_space(&key) {
            return Some(TetrisAction::HardDrop);
        }
        arrow_intent(&key)
            .or_else(|| wasd_intent(&key))
            .and_then(TetrisAction::from_intent)
    }
}

impl KeyBindings for SnakeGame {
    fn map_key(key: &str, pressed: bool) -> Option<Intent> {
        if !pressed {
            return None;
        }
        let key = normalize(key);
        arrow_intent(&key).or_else(|| wasd_intent(&key))
    }
}

impl KeyBindings for PongGame {
    /// W/S drive the left paddle, up/down arrows the right one. Paddles
    /// move while held, so releases send `Intent::None`.
    fn map_key(key: &str, pressed: bool) -> Option<PongInput> {
        let key = normalize(key);
        let (side, intent) = match (arrow_intent(&key), wasd_intent(&key)) {
            (Some(i @ (Intent::Up | Intent::Down)), _) => (Side::Right, i),
            (_, Some(i @ (Intent::Up | Intent::Down))) => (Side::Left, i),
            _ => return None,
        };
        let intent = if pressed { intent } else { Intent::None };
        Some(PongInput { side, intent })
    }
}

impl KeyBindings for TronGame {
    /// WASD steers player one, arrows player two
    fn map_key(key: &str, pressed: bool) -> Option<TronInput> {
        if !pressed {
            return None;
        }
        let key = normalize(key);
        if let Some(intent) = wasd_intent(&key) {
            return Some(TronInput {
                player: Player::P1,
                intent,
            });
        }
        arrow_intent(&key).map(|intent| TronInput {
            player: Player::P2,
            intent,
        })
    }
}

impl KeyBindings for ShooterGame {
    fn map_key(key: &str, pressed: bool) -> Option<ShooterInput> {
        let key = normalize(key);
        if is_space(&key) {
            return pressed.then_some(ShooterInput::Fire);
        }
        let intent = arrow_intent(&key).or_else(|| wasd_intent(&key))?;
        if intent.horizontal() == 0.0 {
            return None;
        }
        Some(ShooterInput::Steer(if pressed { intent } else { Intent::None }))
    }
}
