use governor::clock::{Clock, DefaultClock};
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Public openrouteservice directions quota.
pub const ORS_REQUESTS_PER_MINUTE: u32 = 40;

/// Longest single sleep while waiting for a permit.
const WAIT_SLICE: Duration = Duration::from_millis(50);

/// Blocking request pacer, shared by every refinement worker.
#[derive(Clone)]
pub struct Limiter {
    inner: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    clock: DefaultClock,
}

impl Limiter {
    /// A zero rate is treated as one request per minute.
    pub fn per_minute(requests: u32) -> Self {
        let requests = NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN);
        let clock = DefaultClock::default();
        Self {
            inner: Arc::new(RateLimiter::direct_with_clock(Quota::per_minute(requests), &clock)),
            clock,
        }
    }

    /// Blocks the calling thread until a request may be sent.
    pub fn wait(&self) {
        self.wait_unless(|| false);
    }

    /// Blocks until a request may be sent or `cancelled` returns true,
    /// whichever comes first. Returns `true` when a permit was taken.
    pub fn wait_unless(&self, cancelled: impl Fn() -> bool) -> bool {
        loop {
            if cancelled() {
                return false;
            }
            match self.inner.check() {
                Ok(()) => return true,
                Err(not_until) => {
                    let delay = not_until.wait_time_from(self.clock.now());
                    log::trace!("Rate limit reached, next permit in {:?}", delay);
                    thread::sleep(delay.min(WAIT_SLICE));
                }
            }
        }
    }
}
