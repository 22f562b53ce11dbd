//! Host time source

/// Milliseconds since the clock was created. Never goes backwards.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    #[cfg(not(target_arch = "wasm32"))]
    origin: std::time::Instant,
    #[cfg(target_arch = "wasm32")]
    origin: f64,
    #[cfg(target_arch = "wasm32")]
    last: std::cell::Cell<f64>,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn new() -> Self {
        Self {
            origin: js_sys::Date::now(),
            last: std::cell::Cell::new(0.0),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    /// Wall-clock based, so clamped against the last reading
    #[cfg(target_arch = "wasm32")]
    pub fn now_ms(&self) -> f64 {
        let now = (js_sys::Date::now() - self.origin).max(self.last.get());
        self.last.set(now);
        now
    }
}

/// Seed for a new session when settings don't pin one
pub fn fresh_seed() -> u64 {
    rand::random()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic() {
        let clock = MonotonicClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(a >= 0.0);
        assert!(b >= a);
    }
}
