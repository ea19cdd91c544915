//! Refresh rate limiting
//!
//! Tracks when the panel was last flushed. Throttled renders that arrive
//! sooner than the minimum interval still draw, but skip the flush.

use embassy_time::{Duration, Instant};

/// Minimum-interval gate for display flushes
#[derive(Debug, Clone)]
pub struct RefreshGovernor {
    /// Required gap between flushes
    min_interval: Duration,
    /// Time of the last successful flush
    last_refresh: Option<Instant>,
}

impl RefreshGovernor {
    /// Create a governor that has never seen a refresh
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_refresh: None,
        }
    }

    /// Check if a throttled refresh may run at `now`
    ///
    /// A clock that reads earlier than the last refresh counts as too soon.
    pub fn ready(&self, now: Instant) -> bool {
        match self.last_refresh {
            None => true,
            Some(last) => now
                .checked_duration_since(last)
                .is_some_and(|elapsed| elapsed >= self.min_interval),
        }
    }

    /// Record a successful refresh at `now`
    pub fn record(&mut self, now: Instant) {
        self.last_refresh = Some(now);
    }

    /// Time of the last successful refresh
    pub fn last_refresh(&self) -> Option<Instant> {
        self.last_refresh
    }

    /// Required gap between throttled refreshes
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn governor() -> RefreshGovernor {
        RefreshGovernor::new(Duration::from_millis(100))
    }

    #[test]
    fn test_first_refresh_allowed() {
        assert!(governor().ready(Instant::from_millis(0)));
    }

    #[test]
    fn test_within_interval_skipped() {
        let mut gov = governor();
        gov.record(Instant::from_millis(1000));

        assert!(!gov.ready(Instant::from_millis(1000)));
        assert!(!gov.ready(Instant::from_millis(1099)));
        assert!(gov.ready(Instant::from_millis(1100)));
        assert!(gov.ready(Instant::from_millis(5000)));
    }

    #[test]
    fn test_clock_behind_last_refresh() {
        let mut gov = governor();
        gov.record(Instant::from_millis(500));
        assert!(!gov.ready(Instant::from_millis(100)));
    }

    #[test]
    fn test_record_moves_window() {
        let mut gov = governor();
        gov.record(Instant::from_millis(0));
        gov.record(Instant::from_millis(150));

        assert!(!gov.ready(Instant::from_millis(200)));
        assert_eq!(gov.last_refresh(), Some(Instant::from_millis(150)));
    }
}
