//! Reduce a walk-forward log to headline numbers.

use serde::{Deserialize, Serialize};

use crate::walk_forward::WalkForwardLog;

/// Aggregate out-of-sample performance over every evaluated window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkForwardSummary {
    pub total_net_profit: f64,
    pub mean_net_profit: f64,
    pub total_trades: usize,
    pub windows_evaluated: usize,
    pub windows_skipped: usize,
    pub windows_failed: usize,
}

pub fn summarize(log: &WalkForwardLog) -> WalkForwardSummary {
    let total_net_profit: f64 = log.records.iter().map(|r| r.net_profit).sum();
    let total_trades: usize = log.records.iter().map(|r| r.trade_count).sum();
    let mean_net_profit = if log.records.is_empty() {
        0.0
    } else {
        total_net_profit / log.records.len() as f64
    };
    WalkForwardSummary {
        total_net_profit,
        mean_net_profit,
        total_trades,
        windows_evaluated: log.records.len(),
        windows_skipped: log.skipped,
        windows_failed: log.failed,
    }
}
