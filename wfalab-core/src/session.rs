//! Session clock — trading-hours and close-all arithmetic.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Intraday session boundaries, in exchange-local wall-clock hours.
///
/// `in_session` covers `[start_hour, end_hour)`. The close-all time is a
/// separate, usually later, cutoff at which open positions are flattened
/// and no new entries are taken.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SessionClock {
    pub start_hour: u32,
    pub end_hour: u32,
    pub close_hour: u32,
    pub close_minute: u32,
}

impl Default for SessionClock {
    fn default() -> Self {
        Self {
            start_hour: 8,
            end_hour: 22,
            close_hour: 22,
            close_minute: 30,
        }
    }
}

impl SessionClock {
    /// True inside the configured trading hours.
    pub fn in_session(&self, ts: NaiveDateTime) -> bool {
        let hour = ts.hour();
        self.start_hour <= hour && hour < self.end_hour
    }

    /// True at or after the close-all time, for the rest of the day.
    pub fn at_or_after_close(&self, ts: NaiveDateTime) -> bool {
        let (h, m) = (ts.hour(), ts.minute());
        h > self.close_hour || (h == self.close_hour && m >= self.close_minute)
    }
}
