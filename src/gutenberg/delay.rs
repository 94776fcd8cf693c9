// Politeness delay between requests to Project Gutenberg.
//
// Gutenberg asks automated clients to go slowly. Each download waits a
// random interval drawn uniformly from [min, max] seconds, so requests
// never arrive in a fixed rhythm.

use std::time::Duration;

use rand::Rng;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolitenessDelay {
    min: Duration,
    max: Duration,
}

impl PolitenessDelay {
    /// A delay range in seconds. Bounds are swapped if given in reverse.
    pub fn new(min_secs: f64, max_secs: f64) -> Self {
        let (lo, hi) = if min_secs <= max_secs {
            (min_secs, max_secs)
        } else {
            (max_secs, min_secs)
        };
        Self {
            min: Duration::from_secs_f64(lo.max(0.0)),
            max: Duration::from_secs_f64(hi.max(0.0)),
        }
    }

    /// No waiting at all (tests, local mirrors).
    pub fn none() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// Draw the next delay.
    pub fn sample(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let secs = rand::rng().random_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }

    /// Sleep for a freshly drawn delay.
    pub async fn wait(&self) {
        let delay = self.sample();
        if delay.is_zero() {
            return;
        }
        debug!(delay_ms = delay.as_millis() as u64, "Politeness delay");
        tokio::time::sleep(delay).await;
    }
}

impl Default for PolitenessDelay {
    fn default() -> Self {
        Self::new(1.0, 3.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_within_bounds() {
        let delay = PolitenessDelay::new(0.01, 0.05);
        for _ in 0..100 {
            let d = delay.sample();
            assert!(d >= delay.min() && d <= delay.max());
        }
    }

    #[test]
    fn test_reversed_bounds() {
        let delay = PolitenessDelay::new(3.0, 1.0);
        assert_eq!(delay.min(), Duration::from_secs(1));
        assert_eq!(delay.max(), Duration::from_secs(3));
    }

    #[test]
    fn test_none_is_zero() {
        assert_eq!(PolitenessDelay::none().sample(), Duration::ZERO);
    }
}
