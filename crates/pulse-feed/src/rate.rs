use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Client-side view of the provider's rolling-window ceiling.
///
/// Calls that would breach it are refused before they reach the network.
#[derive(Debug, Clone)]
pub struct RateBudget {
    limit: usize,
    period: Duration,
    calls: VecDeque<Instant>,
}

impl RateBudget {
    pub fn new(limit: usize, period: Duration) -> Self {
        Self {
            limit,
            period,
            calls: VecDeque::with_capacity(limit),
        }
    }

    /// Spend one call now, or say how long until one frees up.
    pub fn try_acquire(&mut self) -> Result<(), Duration> {
        self.try_acquire_at(Instant::now())
    }

    pub fn try_acquire_at(&mut self, now: Instant) -> Result<(), Duration> {
        self.expire(now);
        if self.calls.len() < self.limit {
            self.calls.push_back(now);
            return Ok(());
        }

        // limit == 0 never frees up; report a full period
        let wait = self
            .calls
            .front()
            .map(|oldest| self.period.saturating_sub(now.duration_since(*oldest)))
            .unwrap_or(self.period);
        Err(wait)
    }

    fn expire(&mut self, now: Instant) {
        while let Some(oldest) = self.calls.front() {
            if now.duration_since(*oldest) >= self.period {
                self.calls.pop_front();
            } else {
                break;
            }
        }
    }
}
