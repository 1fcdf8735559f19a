//! Dorsey inertia — composite direction/volatility indicator.
//!
//! Per source channel (High, Low):
//! 1. rolling sample stdev over `stdev_len` bars
//! 2. split into "up"/"down" tracks by the sign of the channel's first
//!    difference (change >= 0 counts as up)
//! 3. exponentially smooth each track with span `smooth_rv`
//! 4. ratio = 100·up / (up + down), defaulting to 50 when the denominator
//!    is zero
//! The High- and Low-channel ratios are averaged and the average is passed
//! through a `smooth_di` linear-regression filter. Output is 0–100 with a
//! NaN warmup prefix.

use super::stat::{ewm_span, linreg, rolling_stdev};

/// Relative-volatility ratio for one price channel.
fn channel_ratio(src: &[f64], stdev_len: usize, smooth_rv: usize) -> Vec<f64> {
    let n = src.len();
    let stdev = rolling_stdev(src, stdev_len);

    let mut up = vec![f64::NAN; n];
    let mut down = vec![f64::NAN; n];
    for i in 0..n {
        if stdev[i].is_nan() {
            continue;
        }
        // stdev_len >= 2 guarantees i >= 1 here, so the difference exists.
        let change = src[i] - src[i - 1];
        if change >= 0.0 {
            up[i] = stdev[i];
            down[i] = 0.0;
        } else {
            up[i] = 0.0;
            down[i] = stdev[i];
        }
    }

    let up_sum = ewm_span(&up, smooth_rv);
    let down_sum = ewm_span(&down, smooth_rv);

    (0..n)
        .map(|i| {
            let (u, d) = (up_sum[i], down_sum[i]);
            if u.is_nan() || d.is_nan() {
                f64::NAN
            } else {
                let denom = u + d;
                if denom == 0.0 {
                    50.0
                } else {
                    100.0 * u / denom
                }
            }
        })
        .collect()
}

/// Dorsey inertia over High/Low channels.
pub fn dorsey_inertia(
    highs: &[f64],
    lows: &[f64],
    stdev_len: usize,
    smooth_rv: usize,
    smooth_di: usize,
) -> Vec<f64> {
    assert_eq!(highs.len(), lows.len(), "channel lengths must match");
    assert!(stdev_len >= 2, "inertia stdev lookback must be >= 2");

    let rvi_high = channel_ratio(highs, stdev_len, smooth_rv);
    let rvi_low = channel_ratio(lows, stdev_len, smooth_rv);

    let rv_avg: Vec<f64> = rvi_high
        .iter()
        .zip(&rvi_low)
        .map(|(h, l)| (h + l) / 2.0)
        .collect();

    linreg(&rv_avg, smooth_di)
}
