//! OHLCV resampling across timeframes.
//!
//! Bars are bucketed by flooring their timestamp to the timeframe boundary
//! (epoch-seconds arithmetic, so 1h buckets land on the hour and 2min
//! buckets on even minutes). Aggregation per bucket: Open = first,
//! High = max, Low = min, Close = last, Volume = sum. Buckets with zero
//! volume or a flat range (high == low) are dropped, mirroring the
//! degenerate-bar filter applied to raw data.

use chrono::{DateTime, NaiveDateTime};

use crate::domain::{Bar, BarSeries};

/// A bar resolution expressed in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Timeframe {
    minutes: u32,
}

impl Timeframe {
    pub fn minutes(minutes: u32) -> Self {
        assert!(minutes >= 1, "timeframe must be at least one minute");
        Self { minutes }
    }

    /// Two-minute bars, the default entry-timing resolution.
    pub fn m2() -> Self {
        Self::minutes(2)
    }

    /// Hourly bars, the default trend-filter resolution.
    pub fn h1() -> Self {
        Self::minutes(60)
    }

    pub fn as_minutes(&self) -> u32 {
        self.minutes
    }

    pub fn as_seconds(&self) -> i64 {
        self.minutes as i64 * 60
    }

    /// Floor a timestamp to the start of its bucket.
    pub fn floor(&self, ts: NaiveDateTime) -> NaiveDateTime {
        let secs = ts.and_utc().timestamp();
        let bucket = secs.div_euclid(self.as_seconds()) * self.as_seconds();
        DateTime::from_timestamp(bucket, 0)
            .expect("bucket timestamp in range")
            .naive_utc()
    }
}

/// Resample a series to the given timeframe.
///
/// Input timestamps are strictly increasing, so bars belonging to one bucket
/// are contiguous and a single forward pass suffices. The output carries the
/// bucket start as its timestamp and is itself strictly increasing, which
/// makes resampling an already-aligned series to the same timeframe
/// idempotent.
pub fn resample(series: &BarSeries, tf: Timeframe) -> BarSeries {
    let mut out: Vec<Bar> = Vec::new();
    let mut current: Option<Bar> = None;

    for bar in series.bars() {
        let bucket = tf.floor(bar.timestamp);
        match current.as_mut() {
            Some(agg) if agg.timestamp == bucket => {
                agg.high = agg.high.max(bar.high);
                agg.low = agg.low.min(bar.low);
                agg.close = bar.close;
                agg.volume += bar.volume;
            }
            _ => {
                if let Some(done) = current.take() {
                    push_if_valid(&mut out, done);
                }
                current = Some(Bar {
                    timestamp: bucket,
                    open: bar.open,
                    high: bar.high,
                    low: bar.low,
                    close: bar.close,
                    volume: bar.volume,
                });
            }
        }
    }
    if let Some(done) = current.take() {
        push_if_valid(&mut out, done);
    }

    BarSeries::from_sorted_unchecked(out)
}

fn push_if_valid(out: &mut Vec<Bar>, bar: Bar) {
    if bar.volume > 0.0 && bar.high != bar.low {
        out.push(bar);
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

    fn bar(t: NaiveDateTime, o: f64, h: f64, l: f64, c: f64, v: f64) -> Bar {
        Bar {
            timestamp: t,
            open: o,
            high: h,
            low: l,
            close: c,
            volume: v,
        }
    }

    fn minute_series() -> BarSeries {
        BarSeries::new(vec![
            bar(ts(9, 0), 100.0, 101.0, 99.0, 100.5, 10.0),
            bar(ts(9, 1), 100.5, 103.0, 100.0, 102.0, 20.0),
            bar(ts(9, 2), 102.0, 102.5, 101.0, 101.5, 5.0),
            bar(ts(9, 3), 101.5, 104.0, 101.0, 103.5, 15.0),
        ])
        .unwrap()
    }

    #[test]
    fn floor_lands_on_bucket_start() {
        let tf = Timeframe::minutes(2);
        assert_eq!(tf.floor(ts(9, 3)), ts(9, 2));
        assert_eq!(tf.floor(ts(9, 2)), ts(9, 2));
        assert_eq!(Timeframe::h1().floor(ts(9, 59)), ts(9, 0));
    }

    #[test]
    fn aggregates_ohlcv() {
        let resampled = resample(&minute_series(), Timeframe::minutes(2));
        let bars = resampled.bars();
        assert_eq!(bars.len(), 2);

        // Bucket 9:00 = bars at 9:00 and 9:01
        assert_eq!(bars[0].timestamp, ts(9, 0));
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].high, 103.0);
        assert_eq!(bars[0].low, 99.0);
        assert_eq!(bars[0].close, 102.0);
        assert_eq!(bars[0].volume, 30.0);

        // Bucket 9:02 = bars at 9:02 and 9:03
        assert_eq!(bars[1].timestamp, ts(9, 2));
        assert_eq!(bars[1].open, 102.0);
        assert_eq!(bars[1].high, 104.0);
        assert_eq!(bars[1].close, 103.5);
        assert_eq!(bars[1].volume, 20.0);
    }

    #[test]
    fn drops_flat_buckets() {
        let series = BarSeries::new(vec![
            bar(ts(9, 0), 100.0, 100.0, 100.0, 100.0, 10.0),
            bar(ts(9, 1), 100.0, 100.0, 100.0, 100.0, 10.0),
            bar(ts(9, 2), 100.0, 101.0, 99.0, 100.5, 10.0),
        ])
        .unwrap();
        let resampled = resample(&series, Timeframe::minutes(2));
        assert_eq!(resampled.len(), 1);
        assert_eq!(resampled.bars()[0].timestamp, ts(9, 2));
    }

    #[test]
    fn gap_in_source_produces_no_empty_bucket() {
        let series = BarSeries::new(vec![
            bar(ts(9, 0), 100.0, 101.0, 99.0, 100.5, 10.0),
            // nothing between 9:01 and 9:07
            bar(ts(9, 8), 101.0, 102.0, 100.0, 101.5, 10.0),
        ])
        .unwrap();
        let resampled = resample(&series, Timeframe::minutes(2));
        assert_eq!(resampled.len(), 2);
        assert_eq!(resampled.bars()[1].timestamp, ts(9, 8));
    }

    #[test]
    fn resample_is_idempotent_on_aligned_series() {
        let once = resample(&minute_series(), Timeframe::minutes(2));
        let twice = resample(&once, Timeframe::minutes(2));
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.bars().iter().zip(twice.bars()) {
            assert_eq!(a.timestamp, b.timestamp);
            assert_eq!(a.open, b.open);
            assert_eq!(a.high, b.high);
            assert_eq!(a.low, b.low);
            assert_eq!(a.close, b.close);
            assert_eq!(a.volume, b.volume);
        }
    }

    #[test]
    fn empty_series_resamples_to_empty() {
        let empty = BarSeries::default();
        assert!(resample(&empty, Timeframe::h1()).is_empty());
    }
}
