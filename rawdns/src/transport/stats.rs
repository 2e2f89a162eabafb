//! Round-trip-time statistics over a batch of exchanges.

use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RttStats {
    /// Exchanges that got a matching reply.
    pub count: usize,
    pub failures: usize,
    pub min: Option<Duration>,
    pub max: Option<Duration>,
    total: Duration,
}

impl RttStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, rtt: Duration) {
        self.count += 1;
        self.total += rtt;
        self.min = Some(self.min.map_or(rtt, |m| m.min(rtt)));
        self.max = Some(self.max.map_or(rtt, |m| m.max(rtt)));
    }

    pub fn record_failure(&mut self) {
        self.failures += 1;
    }

    pub fn mean(&self) -> Option<Duration> {
        if self.count == 0 {
            return None;
        }
        Some(self.total / self.count as u32)
    }

    pub fn attempts(&self) -> usize {
        self.count + self.failures
    }
}
