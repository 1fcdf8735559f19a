//! Signal engine — the per-bar entry/exit decision function.
//!
//! A pure function of (current snapshot, previous snapshot, position state).
//! The engine owns no position state; the execution collaborator reports it
//! each bar. Guards run in fixed order and the first applicable one
//! short-circuits the rest:
//!
//! 1. close-all time → flatten, never enter
//! 2. outside session hours → nothing
//! 3. volatility below the minimum fraction of price → nothing
//! 4. long entry (flat only): HTF filter + upward LTF cross + inertia
//! 5. short entry (flat only): the mirror image
//!
//! A missing (NaN) HTF oscillator fails both entry filters, so a window with
//! no closed HTF bar never trades. At most one signal per bar.

use crate::domain::{Direction, ParameterSet, PositionState, SignalAction, TradeSignal};
use crate::pipeline::FeatureSnapshot;
use crate::session::SessionClock;

/// Position size as a fraction of equity, fixed per the strategy definition.
pub const ENTRY_SIZE: f64 = 0.1;

/// Per-bar decision engine for one parameter set.
#[derive(Debug, Clone)]
pub struct SignalEngine {
    params: ParameterSet,
    session: SessionClock,
    /// Entry guard: skip bars where ATR < close × this fraction.
    min_atr_fraction: f64,
}

impl SignalEngine {
    pub fn new(params: ParameterSet, session: SessionClock, min_atr_fraction: f64) -> Self {
        Self {
            params,
            session,
            min_atr_fraction,
        }
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Decide on one bar. `previous` is the snapshot one LTF bar earlier;
    /// the cross conditions need it.
    pub fn decide(
        &self,
        current: &FeatureSnapshot,
        previous: &FeatureSnapshot,
        position: PositionState,
    ) -> Option<SignalAction> {
        // 1. Session close: flatten and stand down for the day.
        if self.session.at_or_after_close(current.timestamp) {
            return match position {
                PositionState::Flat => None,
                _ => Some(SignalAction::CloseAll),
            };
        }

        // 2. Trading hours.
        if !self.session.in_session(current.timestamp) {
            return None;
        }

        // 3. Volatility floor: too quiet a market produces chop, not trends.
        // A NaN ATR fails the comparison and falls through to "no signal".
        if !(current.atr >= current.close * self.min_atr_fraction) {
            return None;
        }

        if !position.is_flat() {
            return None;
        }

        let p = &self.params;
        let long_threshold = 50.0 - p.rsi_delta_ltf;
        let short_threshold = 50.0 + p.rsi_delta_ltf;

        // 4. Long: HTF strength, upward cross of the lower LTF threshold,
        // inertia confirming. NaN in any feature fails the comparison.
        let long_htf = current.rsi_htf > 50.0 + p.rsi_delta_htf;
        let long_cross =
            previous.rsi_ltf < long_threshold && current.rsi_ltf >= long_threshold;
        let long_inertia = current.inertia > p.inertia_level_long;
        if long_htf && long_cross && long_inertia {
            return Some(SignalAction::Enter(self.entry(current, Direction::Long)));
        }

        // 5. Short: the mirror image.
        let short_htf = current.rsi_htf < 50.0 - p.rsi_delta_htf;
        let short_cross =
            previous.rsi_ltf > short_threshold && current.rsi_ltf <= short_threshold;
        let short_inertia = current.inertia < p.inertia_level_short;
        if short_htf && short_cross && short_inertia {
            return Some(SignalAction::Enter(self.entry(current, Direction::Short)));
        }

        None
    }

    fn entry(&self, snap: &FeatureSnapshot, direction: Direction) -> TradeSignal {
        let stop_dist = snap.atr * self.params.atr_multiplier;
        let target_dist = stop_dist * self.params.risk_reward;
        let (stop, target) = match direction {
            Direction::Long => (snap.close - stop_dist, snap.close + target_dist),
            Direction::Short => (snap.close + stop_dist, snap.close - target_dist),
        };
        TradeSignal {
            direction,
            stop,
            target,
            size: ENTRY_SIZE,
        }
    }
}
