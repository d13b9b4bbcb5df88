use std::time::{Duration, Instant};

pub const TIMER_DEC_PER_SECOND: u32 = 60;

#[derive(Debug, Default)]
pub struct Timer {
    pub count: u8,
}

impl Timer {
    pub fn new(init_count: u8) -> Self {
        Self { count: init_count }
    }

    pub fn set(&mut self, value: u8) {
        self.count = value;
    }

    /// Counts down one step. Returns false when the timer was already idle.
    pub fn decrement(&mut self) -> bool {
        if self.count == 0 {
            return false;
        }
        self.count -= 1;
        true
    }
}

/// A periodic deadline compared against its own last-fired instant. Fires at
/// most once per poll; missed periods are dropped, not caught up.
#[derive(Debug, Clone, Copy)]
pub struct Cadence {
    period: Duration,
    last_fired: Instant,
}

impl Cadence {
    pub fn new(period: Duration, start: Instant) -> Self {
        Self {
            period,
            last_fired: start,
        }
    }

    pub fn from_hz(hz: u32, start: Instant) -> Self {
        Self::new(Duration::from_secs_f64(1.0 / hz.max(1) as f64), start)
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn fire(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_fired) >= self.period {
            // past deadline
            self.last_fired = now;
            true
        } else {
            false
        }
    }
}
