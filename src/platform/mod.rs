//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Time (monotonic milliseconds for the clock)
//! - Input (raw key names to game inputs)
//! - Browser bindings (wasm32 only)

pub mod keys;
pub mod time;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use keys::{KeyBindings, SessionCommand, session_command};
pub use time::{MonotonicClock, fresh_seed};
