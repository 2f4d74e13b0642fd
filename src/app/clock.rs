//! Frame timing.

use std::time::Instant;

/// Monotonic clock capturing the render loop's start instant.
///
/// Captured once during initialization; every frame reports seconds elapsed
/// since that instant, so successive readings never decrease.
pub struct FrameClock {
    start: Instant,
}

impl FrameClock {
    /// Start the clock now.
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Clock measuring from an explicit start instant.
    pub fn from_start(start: Instant) -> Self {
        Self { start }
    }

    /// Elapsed seconds since the start instant.
    pub fn seconds(&self) -> f32 {
        self.start.elapsed().as_secs_f64() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_seconds_non_decreasing() {
        let clock = FrameClock::start();
        let mut previous = clock.seconds();
        for _ in 0..100 {
            let next = clock.seconds();
            assert!(next >= previous);
            previous = next;
        }
    }

    #[test]
    fn test_seconds_measures_from_start_instant() {
        let start = Instant::now() - Duration::from_millis(1500);
        let clock = FrameClock::from_start(start);
        let seconds = clock.seconds();
        assert!(seconds >= 1.5);
        assert!(seconds < 2.5);
    }

    #[test]
    fn test_fresh_clock_reads_near_zero() {
        let clock = FrameClock::start();
        assert!(clock.seconds() < 1.0);
    }
}
