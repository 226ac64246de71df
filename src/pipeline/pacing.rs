//! Randomised pauses between browser actions and between tasks.
//!
//! Every pause is `base + jitter` with jitter drawn uniformly from
//! `[jitter_min, jitter_max)`. With the defaults (4 s, −0.5 s, +1.5 s) a pause
//! lasts between 3.5 and 5.5 seconds.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delay policy shared by the converters and the task pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pacing {
    /// Base delay in seconds.
    pub base_secs: f64,
    /// Lower bound of the jitter added to `base_secs` (may be negative).
    pub jitter_min_secs: f64,
    /// Upper bound of the jitter added to `base_secs`.
    pub jitter_max_secs: f64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            base_secs: 4.0,
            jitter_min_secs: -0.5,
            jitter_max_secs: 1.5,
        }
    }
}

impl Pacing {
    /// No pauses at all. Used by tests and `--no-pacing`.
    pub fn none() -> Self {
        Self {
            base_secs: 0.0,
            jitter_min_secs: 0.0,
            jitter_max_secs: 0.0,
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.base_secs + self.jitter_max_secs <= 0.0
    }

    /// Draw one delay using the given RNG. Never negative; a non-finite or
    /// out-of-range delay yields zero.
    pub fn wiggle_with<R: Rng>(&self, rng: &mut R) -> Duration {
        let jitter = if self.jitter_max_secs > self.jitter_min_secs {
            rng.gen_range(self.jitter_min_secs..self.jitter_max_secs)
        } else {
            self.jitter_min_secs
        };
        Duration::try_from_secs_f64((self.base_secs + jitter).max(0.0)).unwrap_or(Duration::ZERO)
    }

    /// Draw one delay from the thread-local RNG.
    pub fn wiggle(&self) -> Duration {
        self.wiggle_with(&mut rand::thread_rng())
    }

    /// Block the current thread for one randomised delay.
    ///
    /// Only call from blocking contexts (`spawn_blocking`).
    pub fn pause_blocking(&self) {
        if self.is_disabled() {
            return;
        }
        std::thread::sleep(self.wiggle());
    }

    /// Sleep asynchronously for one randomised delay.
    pub async fn pause(&self) {
        if self.is_disabled() {
            return;
        }
        tokio::time::sleep(self.wiggle()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn default_wiggle_stays_within_bounds() {
        let pacing = Pacing::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let d = pacing.wiggle_with(&mut rng).as_secs_f64();
            assert!((3.5..=5.5).contains(&d), "delay out of range: {d}");
        }
    }

    #[test]
    fn thread_rng_wiggle_stays_within_bounds() {
        let pacing = Pacing::default();
        for _ in 0..1_000 {
            let d = pacing.wiggle().as_secs_f64();
            assert!((3.5..=5.5).contains(&d), "delay out of range: {d}");
        }
    }

    #[test]
    fn none_is_zero_and_disabled() {
        let pacing = Pacing::none();
        assert!(pacing.is_disabled());
        assert_eq!(pacing.wiggle(), Duration::ZERO);
    }

    #[test]
    fn negative_totals_clamp_to_zero() {
        let pacing = Pacing {
            base_secs: 0.1,
            jitter_min_secs: -1.0,
            jitter_max_secs: -0.5,
        };
        assert_eq!(pacing.wiggle(), Duration::ZERO);
    }

    #[tokio::test]
    async fn disabled_pause_returns_immediately() {
        let start = std::time::Instant::now();
        Pacing::none().pause().await;
        Pacing::none().pause_blocking();
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn non_finite_pacing_does_not_panic() {
        let mut rng = StdRng::seed_from_u64(7);
        let pacing = Pacing {
            base_secs: f64::NAN,
            jitter_min_secs: 0.0,
            jitter_max_secs: 0.0,
        };
        assert_eq!(pacing.wiggle_with(&mut rng), Duration::ZERO);
        let pacing = Pacing {
            base_secs: f64::INFINITY,
            ..Pacing::none()
        };
        assert_eq!(pacing.wiggle_with(&mut rng), Duration::ZERO);
    }
}
