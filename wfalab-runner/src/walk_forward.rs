//! Walk-forward scheduler — rolling train/test windows over one series.
//!
//! For each window the full grid is searched on the in-sample slice, the
//! winning parameter set is re-evaluated once on the out-of-sample slice,
//! and that out-of-sample result is what lands in the log. Windows that are
//! too thin are skipped, windows whose evaluation errors are recorded as
//! failed, and in both cases the schedule keeps rolling.

use anyhow::Context;
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use wfalab_core::domain::{BarSeries, ParameterSet};

use crate::execution::ExecutionModel;
use crate::grid::{GridSearch, ParamGrid, SearchError};

/// Calendar geometry and minimum-data floors for the schedule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WalkForwardConfig {
    /// In-sample span in calendar days.
    pub window_days: i64,
    /// Out-of-sample span, and how far each iteration advances.
    pub step_days: i64,
    pub min_train_bars: usize,
    pub min_test_bars: usize,
}

impl Default for WalkForwardConfig {
    fn default() -> Self {
        Self {
            window_days: 90,
            step_days: 30,
            min_train_bars: 500,
            min_test_bars: 50,
        }
    }
}

/// One planned train/test window. Ranges are half-open; `train_end` and
/// `test_start` coincide so no bar belongs to both slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub train_start: NaiveDateTime,
    pub train_end: NaiveDateTime,
    pub test_start: NaiveDateTime,
    pub test_end: NaiveDateTime,
}

/// Lay out the rolling schedule over `[first, last]`.
///
/// A window is planned only when its whole test span fits inside the data;
/// the next window starts one step later, so consecutive test spans tile the
/// out-of-sample period without overlap.
pub fn plan_windows(
    first: NaiveDateTime,
    last: NaiveDateTime,
    config: &WalkForwardConfig,
) -> Vec<Window> {
    let window = Duration::days(config.window_days);
    let step = Duration::days(config.step_days);
    let mut windows = Vec::new();
    let mut cur = first;
    while cur + window + step <= last {
        windows.push(Window {
            train_start: cur,
            train_end: cur + window,
            test_start: cur + window,
            test_end: cur + window + step,
        });
        cur += step;
    }
    windows
}

/// Out-of-sample outcome of one window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowRecord {
    pub period_start: NaiveDateTime,
    pub period_end: NaiveDateTime,
    pub params: ParameterSet,
    pub net_profit: f64,
    pub trade_count: usize,
    /// Objective score of the out-of-sample result, not the in-sample one.
    pub score: f64,
}

/// Everything a walk-forward run produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalkForwardLog {
    pub records: Vec<WindowRecord>,
    /// Windows dropped before any evaluation for lack of data.
    pub skipped: usize,
    /// Windows whose evaluation errored after the data checks passed.
    pub failed: usize,
}

/// Errors that stop a run before its first window.
#[derive(Debug, Error)]
pub enum WalkForwardError {
    #[error("series is empty; nothing to schedule")]
    NoData,
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Run the full schedule.
///
/// The grid is validated once up front so a malformed grid fails loudly
/// instead of failing every window one by one. After that, nothing inside a
/// window is fatal: thin slices are skipped and evaluation errors are logged
/// and counted, and the run always returns whatever log it accumulated.
pub fn run_walk_forward(
    series: &BarSeries,
    search: &GridSearch,
    grid: &ParamGrid,
    exec: &dyn ExecutionModel,
    config: &WalkForwardConfig,
) -> Result<WalkForwardLog, WalkForwardError> {
    grid.validate()?;
    let (first, last) = match (series.first_timestamp(), series.last_timestamp()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(WalkForwardError::NoData),
    };

    let windows = plan_windows(first, last, config);
    info!(
        windows = windows.len(),
        from = %first,
        to = %last,
        "walk-forward schedule planned"
    );

    let mut log = WalkForwardLog::default();
    for window in &windows {
        let train = series.slice_range(window.train_start, window.train_end);
        let test = series.slice_range(window.test_start, window.test_end);

        if train.len() < config.min_train_bars || test.len() < config.min_test_bars {
            info!(
                test_start = %window.test_start,
                train_bars = train.len(),
                test_bars = test.len(),
                "window below minimum bar counts; skipping"
            );
            log.skipped += 1;
            continue;
        }

        match run_one_window(window, &train, &test, search, grid, exec) {
            Ok(record) => log.records.push(record),
            Err(err) => {
                warn!(
                    test_start = %window.test_start,
                    error = %format!("{err:#}"),
                    "window evaluation failed; continuing"
                );
                log.failed += 1;
            }
        }
    }

    Ok(log)
}

fn run_one_window(
    window: &Window,
    train: &BarSeries,
    test: &BarSeries,
    search: &GridSearch,
    grid: &ParamGrid,
    exec: &dyn ExecutionModel,
) -> anyhow::Result<WindowRecord> {
    let outcome = search
        .run(train, grid, exec)
        .context("in-sample grid search")?;

    let result = search
        .evaluate(&outcome.best_params, test, exec)
        .context("out-of-sample evaluation")?;

    Ok(WindowRecord {
        period_start: window.test_start,
        period_end: window.test_end,
        score: search.objective.score(&result),
        net_profit: result.net_profit,
        trade_count: result.trade_count,
        params: outcome.best_params,
    })
}
