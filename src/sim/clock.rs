//! Tick clock
//!
//! Decides, from host timestamps, when a logical update fires. At most one
//! update fires per `tick` call; late frames drop ticks instead of queueing
//! a backlog.

use serde::{Deserialize, Serialize};

/// How elapsed time is turned into ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockPolicy {
    /// Re-arm a deadline every interval (timer style). The deadline is fixed
    /// when armed, so interval changes apply from the next fire.
    FixedInterval,
    /// Compare time since the last update against the interval on every
    /// frame (animation-frame style).
    Accumulator,
}

/// Simulation clock driven by a monotonic millisecond timestamp
#[derive(Debug, Clone)]
pub struct Clock {
    policy: ClockPolicy,
    interval_ms: f64,
    armed: bool,
    /// Reference time: last fire (accumulator) or deadline (fixed)
    mark: Option<f64>,
    fired: u64,
}

impl Clock {
    pub fn new(policy: ClockPolicy, interval_ms: f64) -> Self {
        Self {
            policy,
            interval_ms: interval_ms.max(0.0),
            armed: false,
            mark: None,
            fired: 0,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Number of updates fired since creation
    pub fn fired(&self) -> u64 {
        self.fired
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Start timing. The first `tick` after arming only records the
    /// reference time.
    pub fn arm(&mut self) {
        self.armed = true;
        self.mark = None;
    }

    /// Stop timing; no tick fires until re-armed.
    pub fn disarm(&mut self) {
        self.armed = false;
        self.mark = None;
    }

    /// Change the interval. Takes effect on the next fire, never
    /// retroactively for a deadline that is already armed.
    pub fn set_interval(&mut self, interval_ms: f64) {
        self.interval_ms = interval_ms.max(0.0);
    }

    /// Advance to `now_ms`. Returns true if one logical update fires.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        if !self.armed {
            return false;
        }

        let Some(mark) = self.mark else {
            self.mark = Some(match self.policy {
                ClockPolicy::FixedInterval => now_ms + self.interval_ms,
                ClockPolicy::Accumulator => now_ms,
            });
            return false;
        };

        let due = match self.policy {
            ClockPolicy::FixedInterval => now_ms >= mark,
            ClockPolicy::Accumulator => now_ms - mark >= self.interval_ms,
        };
        if !due {
            return false;
        }

        // Re-arm relative to now: missed intervals are dropped
        self.mark = Some(match self.policy {
            ClockPolicy::FixedInterval => now_ms + self.interval_ms,
            ClockPolicy::Accumulator => now_ms,
        });
        self.fired += 1;
        true
    }
}
