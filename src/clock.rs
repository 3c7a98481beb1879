use std::time::{Duration, Instant};

use crate::config::MIN_FRAME_INTERVAL;

/// Wall-clock source for the frame loop.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    started: Instant,
}

impl FrameClock {
    #[must_use]
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Time since the session started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Frame length for a speed in cells per second.
#[must_use]
pub fn frame_interval(speed: f64) -> Duration {
    if !speed.is_finite() || speed <= 0.0 {
        return Duration::from_secs(1);
    }

    Duration::try_from_secs_f64(1.0 / speed)
        .map_or(Duration::from_secs(1), |interval| interval.max(MIN_FRAME_INTERVAL))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{FrameClock, frame_interval};
    use crate::config::MIN_FRAME_INTERVAL;

    #[test]
    fn interval_is_the_inverse_of_speed() {
        assert_eq!(frame_interval(10.0), Duration::from_millis(100));
        assert_eq!(frame_interval(20.0), Duration::from_millis(50));
    }

    #[test]
    fn interval_is_clamped() {
        assert_eq!(frame_interval(10_000.0), MIN_FRAME_INTERVAL);
        assert_eq!(frame_interval(0.0), Duration::from_secs(1));
        assert_eq!(frame_interval(f64::NAN), Duration::from_secs(1));
        assert_eq!(frame_interval(1e-30), Duration::from_secs(1));
        assert_eq!(frame_interval(f64::MIN_POSITIVE), Duration::from_secs(1));
    }

    #[test]
    fn elapsed_grows_monotonically() {
        let clock = FrameClock::start();
        let first = clock.elapsed();
        let second = clock.elapsed();
        assert!(second >= first);
    }
}
