use std::time::{Duration, Instant};

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Elapsed time derived from a fixed start instant rather than a counter, so missed ticks
/// never cause drift.
#[derive(Debug, Clone)]
pub struct ElapsedClock {
    start: Instant,
    saved_offset: u64,
    last_reported: u64,
    frozen: Option<u64>,
}

impl ElapsedClock {
    pub fn resume(saved_seconds: u64, now: Instant) -> Self {
        let (start, saved_offset) = match now.checked_sub(Duration::from_secs(saved_seconds)) {
            Some(start) => (start, 0),
            // Process uptime shorter than the saved value.
            None => (now, saved_seconds),
        };
        Self {
            start,
            saved_offset,
            last_reported: saved_seconds,
            frozen: None,
        }
    }

    pub fn frozen_at(seconds: u64, now: Instant) -> Self {
        let mut clock = Self::resume(seconds, now);
        clock.frozen = Some(seconds);
        clock
    }

    pub fn elapsed(&mut self, now: Instant) -> u64 {
        if let Some(frozen) = self.frozen {
            return frozen;
        }
        let measured = self.saved_offset + now.saturating_duration_since(self.start).as_secs();
        self.last_reported = self.last_reported.max(measured);
        self.last_reported
    }

    pub fn freeze(&mut self, now: Instant) -> u64 {
        let value = self.elapsed(now);
        self.frozen = Some(value);
        value
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.is_some()
    }
}

#[cfg(test)]
#[path = "tests/clock_tests.rs"]
mod tests;
