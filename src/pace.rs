//! Jittered delays standing in for haircuts, walks and hair regrowth.

use std::thread;
use std::time::Duration;

use rand::Rng;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pace {
    base: Duration,
    jitter: Duration,
}

impl Pace {
    pub fn new(base: Duration, jitter: Duration) -> Self {
        Self { base, jitter }
    }

    pub fn from_millis(base_ms: u64, jitter_ms: u64) -> Self {
        Self::new(Duration::from_millis(base_ms), Duration::from_millis(jitter_ms))
    }

    /// No delay at all, for running agents at full speed in tests.
    #[cfg(test)]
    pub fn instant() -> Self {
        Self::default()
    }

    /// Pick a delay in `base..=base + jitter`.
    pub fn sample(&self) -> Duration {
        if self.jitter.is_zero() {
            return self.base;
        }
        let max = u64::try_from(self.jitter.as_micros()).unwrap_or(u64::MAX);
        let extra = rand::thread_rng().gen_range(0..=max);
        self.base.saturating_add(Duration::from_micros(extra))
    }

    pub fn pause(&self) {
        let delay = self.sample();
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}
