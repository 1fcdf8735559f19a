//! Objective functions — map an evaluation result to a score, higher better.

use serde::{Deserialize, Serialize};

use crate::execution::EvaluationResult;

/// Which quantity the grid search maximizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Objective {
    /// Final equity minus initial equity.
    NetProfit,
    /// Win-rate excess over 50% weighted by the square root of the trade
    /// count, so a thousand trades cannot drown out signal quality. Results
    /// with fewer than `min_trades` trades are statistical noise and score
    /// a flat -1.0.
    WinRateEdge { min_trades: usize },
}

impl Default for Objective {
    fn default() -> Self {
        Self::NetProfit
    }
}

impl Objective {
    pub fn score(&self, result: &EvaluationResult) -> f64 {
        match *self {
            Self::NetProfit => result.net_profit,
            Self::WinRateEdge { min_trades } => {
                if result.trade_count < min_trades {
                    -1.0
                } else {
                    (result.win_rate - 50.0) * (result.trade_count as f64).sqrt()
                }
            }
        }
    }
}
