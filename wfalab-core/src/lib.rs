//! WfaLab Core — domain types, resampling, indicator pipeline, signal engine.
//!
//! This crate contains the leak-free building blocks of the walk-forward lab:
//! - Domain types (bars, series, parameter sets, trade signals)
//! - OHLCV resampling across timeframes
//! - Indicator math (Wilder RSI/ATR, Dorsey inertia, rolling regression)
//! - Multi-timeframe indicator pipeline with a one-bar HTF shift
//! - Session clock and the per-bar signal decision engine
//!
//! Order execution, equity accounting, and search orchestration live in
//! `wfalab-runner`; nothing in this crate owns position state or observes
//! bars beyond the current index.

pub mod domain;
pub mod indicators;
pub mod pipeline;
pub mod resample;
pub mod session;
pub mod signal;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: core types cross the rayon task boundary in the
    /// runner's parallel grid search, so they must all be Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::BarSeries>();
        require_sync::<domain::BarSeries>();
        require_send::<domain::ParameterSet>();
        require_sync::<domain::ParameterSet>();
        require_send::<domain::TradeSignal>();
        require_sync::<domain::TradeSignal>();
        require_send::<domain::SignalAction>();
        require_sync::<domain::SignalAction>();
        require_send::<pipeline::IndicatorFrame>();
        require_sync::<pipeline::IndicatorFrame>();
        require_send::<pipeline::PipelineConfig>();
        require_sync::<pipeline::PipelineConfig>();
        require_send::<session::SessionClock>();
        require_sync::<session::SessionClock>();
        require_send::<signal::SignalEngine>();
        require_sync::<signal::SignalEngine>();
    }
}
