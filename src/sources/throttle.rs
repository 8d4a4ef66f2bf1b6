//! Per-provider request pacing.

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::time::Duration;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Spaces consecutive calls to one provider at least `delay` apart.
///
/// The first call passes immediately. Shared by every concurrent request
/// to the provider, so buffered requests still queue behind each other.
pub struct Pacer {
    limiter: Option<DirectRateLimiter>,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self {
            limiter: quota_from_delay(delay).map(RateLimiter::direct),
        }
    }

    /// Wait until the provider may be called again.
    pub async fn until_ready(&self) {
        if let Some(ref limiter) = self.limiter {
            limiter.until_ready().await;
        }
    }
}

/// One cell per `delay`, no burst. A zero delay means no limit.
fn quota_from_delay(delay: Duration) -> Option<Quota> {
    Quota::with_period(delay).map(|quota| quota.allow_burst(NonZeroU32::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_zero_delay_is_unlimited() {
        assert!(quota_from_delay(Duration::ZERO).is_none());

        let pacer = Pacer::new(Duration::ZERO);
        let start = Instant::now();
        tokio_test::block_on(async {
            for _ in 0..100 {
                pacer.until_ready().await;
            }
        });
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn test_calls_are_spaced_by_delay() {
        let pacer = Pacer::new(Duration::from_millis(40));
        let mut stamps = Vec::new();

        tokio_test::block_on(async {
            for _ in 0..4 {
                pacer.until_ready().await;
                stamps.push(Instant::now());
            }
        });

        for pair in stamps.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(35));
        }
    }
}
