//! BarSeries — ordered bar sequence with strictly increasing timestamps.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::bar::Bar;

/// Errors raised when constructing a series from raw bars.
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("timestamps must be strictly increasing: bar {index} at {timestamp} does not advance")]
    NonMonotonic {
        index: usize,
        timestamp: NaiveDateTime,
    },
}

/// An ordered sequence of bars with strictly increasing, unique timestamps.
///
/// The invariant is checked once at construction; every consumer downstream
/// (resampler, pipeline, scheduler) relies on it instead of re-sorting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Build a series from bars already in chronological order.
    pub fn new(bars: Vec<Bar>) -> Result<Self, SeriesError> {
        for i in 1..bars.len() {
            if bars[i].timestamp <= bars[i - 1].timestamp {
                return Err(SeriesError::NonMonotonic {
                    index: i,
                    timestamp: bars[i].timestamp,
                });
            }
        }
        Ok(Self { bars })
    }

    /// Build a series without the monotonicity check.
    ///
    /// Only for callers that construct bars in a loop with known-increasing
    /// timestamps (the resampler, test fixtures).
    pub fn from_sorted_unchecked(bars: Vec<Bar>) -> Self {
        debug_assert!(bars.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        Self { bars }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_timestamp(&self) -> Option<NaiveDateTime> {
        self.bars.first().map(|b| b.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.bars.last().map(|b| b.timestamp)
    }

    /// Slice the series to the half-open timestamp range `[start, end)`.
    ///
    /// Binary searches the boundaries; the result borrows nothing and can
    /// outlive the parent (windows are discarded independently).
    pub fn slice_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> BarSeries {
        let lo = self.bars.partition_point(|b| b.timestamp < start);
        let hi = self.bars.partition_point(|b| b.timestamp < end);
        Self {
            bars: self.bars[lo..hi].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    fn bar_at(t: NaiveDateTime, close: f64) -> Bar {
        Bar {
            timestamp: t,
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 10.0,
        }
    }

    #[test]
    fn rejects_duplicate_timestamps() {
        let bars = vec![bar_at(ts(9, 0), 100.0), bar_at(ts(9, 0), 101.0)];
        assert!(BarSeries::new(bars).is_err());
    }

    #[test]
    fn rejects_out_of_order_timestamps() {
        let bars = vec![bar_at(ts(9, 2), 100.0), bar_at(ts(9, 0), 101.0)];
        assert!(BarSeries::new(bars).is_err());
    }

    #[test]
    fn accepts_increasing_timestamps() {
        let bars = vec![bar_at(ts(9, 0), 100.0), bar_at(ts(9, 2), 101.0)];
        let series = BarSeries::new(bars).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.first_timestamp(), Some(ts(9, 0)));
        assert_eq!(series.last_timestamp(), Some(ts(9, 2)));
    }

    #[test]
    fn slice_range_is_half_open() {
        let bars: Vec<Bar> = (0..10).map(|i| bar_at(ts(9, i * 2), 100.0)).collect();
        let series = BarSeries::new(bars).unwrap();

        let sliced = series.slice_range(ts(9, 4), ts(9, 10));
        assert_eq!(sliced.len(), 3); // 9:04, 9:06, 9:08
        assert_eq!(sliced.first_timestamp(), Some(ts(9, 4)));
        assert_eq!(sliced.last_timestamp(), Some(ts(9, 8)));
    }

    #[test]
    fn slice_range_outside_data_is_empty() {
        let bars = vec![bar_at(ts(9, 0), 100.0)];
        let series = BarSeries::new(bars).unwrap();
        assert!(series.slice_range(ts(10, 0), ts(11, 0)).is_empty());
    }
}
