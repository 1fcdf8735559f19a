//! Execution collaborator — the contract the search drives, plus a
//! reference implementation.
//!
//! The search layers never simulate fills themselves; they hand a window, a
//! parameter set, and a per-bar decision callback to an `ExecutionModel` and
//! get back an `EvaluationResult`. The callback is invoked exactly once per
//! bar, strictly in order, and sees only the current and previous feature
//! snapshots — never anything past the current index.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use wfalab_core::domain::{BarSeries, Direction, ParameterSet, PositionState, SignalAction};
use wfalab_core::pipeline::{build_frame, FeatureSnapshot, PipelineConfig, PipelineError};

/// Per-bar decision callback: (current, previous, position) → action.
pub type DecideFn<'a> =
    dyn FnMut(&FeatureSnapshot, &FeatureSnapshot, PositionState) -> Option<SignalAction> + 'a;

/// What one evaluation of one parameter set over one window produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub net_profit: f64,
    pub final_equity: f64,
    pub trade_count: usize,
    /// Percentage of closed trades with positive net PnL, 0 when no trades.
    pub win_rate: f64,
}

/// Errors from a single evaluation. Always caught at the combination or
/// window level; never fatal to a search.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("insufficient history: {have} bars after warmup, need {need}")]
    InsufficientHistory { have: usize, need: usize },
    #[error(transparent)]
    Data(#[from] PipelineError),
    #[error("evaluation aborted: {0}")]
    Aborted(String),
}

/// The execution collaborator contract.
pub trait ExecutionModel: Send + Sync {
    fn run(
        &self,
        series: &BarSeries,
        params: &ParameterSet,
        decide: &mut DecideFn,
    ) -> Result<EvaluationResult, EvalError>;
}

/// Reference bar-by-bar simulator.
///
/// Builds the indicator frame for the window, then walks it: an open
/// position's stop and target are checked against the bar's range before the
/// decision callback runs; when one bar touches both levels the stop fills
/// (the conservative reading of an ambiguous bar). Entries fill at the bar
/// close, commission is charged on entry and exit notional, and anything
/// still open at the end of the window is closed at the final bar's close.
///
/// No slippage, margin, or multi-instrument accounting.
#[derive(Debug, Clone)]
pub struct SimBroker {
    pub initial_cash: f64,
    /// Commission as a fraction of traded notional, per side.
    pub commission: f64,
    pub pipeline: PipelineConfig,
}

impl Default for SimBroker {
    fn default() -> Self {
        Self {
            initial_cash: 10_000.0,
            commission: 0.000008,
            pipeline: PipelineConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenPosition {
    direction: Direction,
    entry_price: f64,
    units: f64,
    stop: f64,
    target: f64,
}

impl OpenPosition {
    fn state(&self) -> PositionState {
        match self.direction {
            Direction::Long => PositionState::Long,
            Direction::Short => PositionState::Short,
        }
    }

    fn pnl_at(&self, exit_price: f64) -> f64 {
        let sign = match self.direction {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        };
        (exit_price - self.entry_price) * self.units * sign
    }
}

impl SimBroker {
    fn close(&self, pos: &OpenPosition, exit_price: f64, cash: &mut f64, wins: &mut usize) {
        let commission = self.commission * pos.units * (pos.entry_price + exit_price);
        let pnl = pos.pnl_at(exit_price) - commission;
        *cash += pnl;
        if pnl > 0.0 {
            *wins += 1;
        }
    }
}

impl ExecutionModel for SimBroker {
    fn run(
        &self,
        series: &BarSeries,
        params: &ParameterSet,
        decide: &mut DecideFn,
    ) -> Result<EvaluationResult, EvalError> {
        let frame = build_frame(series, &self.pipeline, params.inertia_len)?;
        if frame.len() < 2 {
            return Err(EvalError::InsufficientHistory {
                have: frame.len(),
                need: 2,
            });
        }

        let mut cash = self.initial_cash;
        let mut position: Option<OpenPosition> = None;
        let mut trades = 0usize;
        let mut wins = 0usize;

        for i in 0..frame.len() {
            let bar = frame.bar(i);

            // Protective levels first: the market moves before we decide.
            if let Some(pos) = position {
                let exit = match pos.direction {
                    Direction::Long if bar.low <= pos.stop => Some(pos.stop),
                    Direction::Long if bar.high >= pos.target => Some(pos.target),
                    Direction::Short if bar.high >= pos.stop => Some(pos.stop),
                    Direction::Short if bar.low <= pos.target => Some(pos.target),
                    _ => None,
                };
                if let Some(price) = exit {
                    self.close(&pos, price, &mut cash, &mut wins);
                    trades += 1;
                    position = None;
                }
            }

            let state = position.map_or(PositionState::Flat, |p| p.state());
            let current = frame.snapshot(i);
            let previous = frame.snapshot(i.saturating_sub(1));

            match decide(&current, &previous, state) {
                Some(SignalAction::CloseAll) => {
                    if let Some(pos) = position.take() {
                        self.close(&pos, bar.close, &mut cash, &mut wins);
                        trades += 1;
                    }
                }
                Some(SignalAction::Enter(signal)) if position.is_none() => {
                    let units = cash * signal.size / bar.close;
                    position = Some(OpenPosition {
                        direction: signal.direction,
                        entry_price: bar.close,
                        units,
                        stop: signal.stop,
                        target: signal.target,
                    });
                }
                _ => {}
            }
        }

        // Flatten at window end so equity reflects nothing but closed trades.
        if let Some(pos) = position.take() {
            let last_close = frame.bar(frame.len() - 1).close;
            self.close(&pos, last_close, &mut cash, &mut wins);
            trades += 1;
        }

        let win_rate = if trades > 0 {
            wins as f64 / trades as f64 * 100.0
        } else {
            0.0
        };

        Ok(EvaluationResult {
            net_profit: cash - self.initial_cash,
            final_equity: cash,
            trade_count: trades,
            win_rate,
        })
    }
}
