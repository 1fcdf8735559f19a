//! Trade signals — immutable per-bar decisions emitted by the signal engine.

use serde::{Deserialize, Serialize};

/// Directional intent of an entry signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

/// Position state as reported by the execution collaborator.
///
/// The signal engine never tracks this itself; it receives the current state
/// each bar and uses it only to gate entries and close-all decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionState {
    #[default]
    Flat,
    Long,
    Short,
}

impl PositionState {
    pub fn is_flat(&self) -> bool {
        matches!(self, Self::Flat)
    }
}

/// An entry intent with its protective levels, priced off the decision bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSignal {
    pub direction: Direction,
    /// Protective stop price.
    pub stop: f64,
    /// Profit target price.
    pub target: f64,
    /// Position size as a fraction of equity.
    pub size: f64,
}

/// What the signal engine asks the execution collaborator to do on one bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SignalAction {
    /// Open a new position (only emitted when flat).
    Enter(TradeSignal),
    /// Close any open position; fired by the session close-all guard.
    CloseAll,
}
