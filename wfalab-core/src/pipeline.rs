//! Multi-timeframe indicator pipeline.
//!
//! Turns a raw bar series into an LTF-aligned `IndicatorFrame`:
//! - resample to the lower timeframe, compute RSI, ATR and Dorsey inertia
//! - resample to the higher timeframe, compute RSI, **shift it by exactly one
//!   HTF bar**, and forward-fill it onto the LTF timestamps
//! - drop leading LTF bars with incomplete indicator history
//!
//! The one-bar shift is the look-ahead guard: the HTF value visible at any
//! LTF bar comes only from an HTF bar that had fully closed before that LTF
//! bar's HTF bucket began. Appending later HTF data can never change a value
//! already attached to an earlier LTF bar.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Bar, BarSeries};
use crate::indicators::{atr, dorsey_inertia, rsi};
use crate::resample::{resample, Timeframe};

/// Errors from frame construction.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("data unavailable: {0}")]
    DataUnavailable(String),
}

/// Fixed pipeline knobs. The inertia stdev lookback is a tunable and comes
/// from the `ParameterSet` at build time instead.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub ltf: Timeframe,
    pub htf: Timeframe,
    pub rsi_len: usize,
    pub atr_len: usize,
    pub inertia_smooth_rv: usize,
    pub inertia_smooth_di: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ltf: Timeframe::m2(),
            htf: Timeframe::h1(),
            rsi_len: 7,
            atr_len: 5,
            inertia_smooth_rv: 14,
            inertia_smooth_di: 14,
        }
    }
}

/// Per-bar feature view handed to the signal engine.
#[derive(Debug, Clone, Copy)]
pub struct FeatureSnapshot {
    pub timestamp: NaiveDateTime,
    pub close: f64,
    pub rsi_ltf: f64,
    /// NaN when no fully closed HTF bar exists yet.
    pub rsi_htf: f64,
    pub atr: f64,
    pub inertia: f64,
}

/// LTF bar series with its aligned feature columns.
///
/// All columns have the same length as the series. Derived once per window
/// request and discarded after scoring.
#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    series: BarSeries,
    rsi_ltf: Vec<f64>,
    rsi_htf: Vec<f64>,
    atr: Vec<f64>,
    inertia: Vec<f64>,
}

impl IndicatorFrame {
    pub fn series(&self) -> &BarSeries {
        &self.series
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn bar(&self, i: usize) -> &Bar {
        &self.series.bars()[i]
    }

    pub fn snapshot(&self, i: usize) -> FeatureSnapshot {
        let bar = self.bar(i);
        FeatureSnapshot {
            timestamp: bar.timestamp,
            close: bar.close,
            rsi_ltf: self.rsi_ltf[i],
            rsi_htf: self.rsi_htf[i],
            atr: self.atr[i],
            inertia: self.inertia[i],
        }
    }
}

/// Build the LTF feature frame for a window of raw bars.
///
/// Leading bars missing any LTF-derived feature, or preceding the first
/// available HTF value, are dropped. A window containing no fully closed HTF
/// bar keeps an all-missing HTF column instead of failing; the signal engine
/// treats a missing trend filter as "no entry".
pub fn build_frame(
    raw: &BarSeries,
    config: &PipelineConfig,
    inertia_len: usize,
) -> Result<IndicatorFrame, PipelineError> {
    if raw.is_empty() {
        return Err(PipelineError::DataUnavailable("raw series is empty".into()));
    }

    let ltf = resample(raw, config.ltf);
    if ltf.is_empty() {
        return Err(PipelineError::DataUnavailable(
            "resampling produced an empty LTF series".into(),
        ));
    }

    let closes: Vec<f64> = ltf.bars().iter().map(|b| b.close).collect();
    let highs: Vec<f64> = ltf.bars().iter().map(|b| b.high).collect();
    let lows: Vec<f64> = ltf.bars().iter().map(|b| b.low).collect();

    let rsi_ltf = rsi(&closes, config.rsi_len);
    let atr_col = atr(ltf.bars(), config.atr_len);
    let inertia_col = dorsey_inertia(
        &highs,
        &lows,
        inertia_len,
        config.inertia_smooth_rv,
        config.inertia_smooth_di,
    );

    let htf = resample(raw, config.htf);
    let rsi_htf = htf_feature(&htf, &ltf, config.rsi_len);

    // Warmup cut: first index where every LTF feature is finite, pushed out
    // to the first HTF value when the HTF column has one at all.
    let ltf_ready = (0..ltf.len())
        .find(|&i| !rsi_ltf[i].is_nan() && !atr_col[i].is_nan() && !inertia_col[i].is_nan());
    let start = match ltf_ready {
        Some(i) => match rsi_htf.iter().position(|v| !v.is_nan()) {
            Some(h) => i.max(h),
            None => i,
        },
        None => {
            return Err(PipelineError::DataUnavailable(
                "window too short for indicator warmup".into(),
            ))
        }
    };

    let bars = ltf.bars()[start..].to_vec();
    Ok(IndicatorFrame {
        series: BarSeries::from_sorted_unchecked(bars),
        rsi_ltf: rsi_ltf[start..].to_vec(),
        rsi_htf: rsi_htf[start..].to_vec(),
        atr: atr_col[start..].to_vec(),
        inertia: inertia_col[start..].to_vec(),
    })
}

/// HTF RSI shifted by one HTF bar, forward-filled onto LTF timestamps.
///
/// An LTF bar gets the shifted value of the latest HTF bucket whose start is
/// at or before the LTF timestamp, NaN before the first bucket.
fn htf_feature(htf: &BarSeries, ltf: &BarSeries, rsi_len: usize) -> Vec<f64> {
    let htf_closes: Vec<f64> = htf.bars().iter().map(|b| b.close).collect();
    let htf_rsi = rsi(&htf_closes, rsi_len);

    let mut shifted = vec![f64::NAN; htf_rsi.len()];
    for i in 1..htf_rsi.len() {
        shifted[i] = htf_rsi[i - 1];
    }

    let htf_bars = htf.bars();
    let mut out = Vec::with_capacity(ltf.len());
    let mut j = 0usize; // index of the last HTF bucket at or before the LTF bar
    for bar in ltf.bars() {
        while j + 1 < htf_bars.len() && htf_bars[j + 1].timestamp <= bar.timestamp {
            j += 1;
        }
        if htf_bars.is_empty() || htf_bars[j].timestamp > bar.timestamp {
            out.push(f64::NAN);
        } else {
            out.push(shifted[j]);
        }
    }
    out
}
