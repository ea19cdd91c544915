//! Panel timing configuration

use embassy_time::Duration;

use crate::screen::ScreenKind;

/// Minimum interval between throttled refreshes
pub const DEFAULT_MIN_REFRESH_MS: u32 = 100;

/// Lock wait for status and notice screens
pub const DEFAULT_STATUS_LOCK_MS: u32 = 100;

/// Lock wait for content screens
pub const DEFAULT_CONTENT_LOCK_MS: u32 = 200;

/// Timing for [`SharedDisplay`](crate::SharedDisplay)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelConfig {
    /// Throttled screens are not flushed more often than this (ms)
    pub min_refresh_ms: u32,
    /// Longest wait for the display lock on status and notice screens (ms)
    pub status_lock_ms: u32,
    /// Longest wait for the display lock on content screens (ms)
    pub content_lock_ms: u32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            min_refresh_ms: DEFAULT_MIN_REFRESH_MS,
            status_lock_ms: DEFAULT_STATUS_LOCK_MS,
            content_lock_ms: DEFAULT_CONTENT_LOCK_MS,
        }
    }
}

impl PanelConfig {
    /// Minimum refresh interval
    pub fn min_refresh_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.min_refresh_ms))
    }

    /// Lock wait for a screen of `kind`
    pub fn lock_timeout(&self, kind: ScreenKind) -> Duration {
        let ms = match kind {
            ScreenKind::Status | ScreenKind::Notice => self.status_lock_ms,
            ScreenKind::Content => self.content_lock_ms,
        };
        Duration::from_millis(u64::from(ms))
    }
}
