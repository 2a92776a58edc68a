use std::time::{Duration, Instant};

/// Time of the last active reading. Only ever moves forward.
#[derive(Debug, Clone, Copy)]
pub struct IdleTimer {
    last_motion: Instant,
}

impl IdleTimer {
    pub fn new(now: Instant) -> Self {
        Self { last_motion: now }
    }

    pub fn touch(&mut self, now: Instant) {
        self.last_motion = self.last_motion.max(now);
    }

    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_motion)
    }

    /// Strictly longer than `timeout`; exactly `timeout` is not yet expired.
    pub fn expired(&self, now: Instant, timeout: Duration) -> bool {
        self.idle_for(now) > timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_is_not_expired() {
        let t0 = Instant::now();
        let timer = IdleTimer::new(t0);
        let timeout = Duration::from_secs(5);

        assert!(!timer.expired(t0 + timeout, timeout));
        assert!(timer.expired(t0 + timeout + Duration::from_nanos(1), timeout));
    }

    #[test]
    fn touch_never_moves_backwards() {
        let t0 = Instant::now();
        let mut timer = IdleTimer::new(t0 + Duration::from_secs(10));

        timer.touch(t0);
        assert_eq!(timer.idle_for(t0 + Duration::from_secs(12)), Duration::from_secs(2));
        assert_eq!(timer.idle_for(t0), Duration::ZERO);
    }
}
