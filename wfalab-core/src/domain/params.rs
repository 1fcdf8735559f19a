//! ParameterSet — the tunable strategy parameters, immutable once built.

use serde::{Deserialize, Serialize};

/// A single point in the optimization space.
///
/// Instances are created by grid enumeration and threaded by value through
/// the search, the signal engine, and the walk-forward log. Nothing mutates
/// a `ParameterSet` after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    /// Entry-threshold delta around 50 for the LTF oscillator.
    pub rsi_delta_ltf: f64,
    /// Entry-threshold delta around 50 for the HTF oscillator.
    pub rsi_delta_htf: f64,
    /// Stop distance as a multiple of ATR.
    pub atr_multiplier: f64,
    /// Target distance as a multiple of the stop distance.
    pub risk_reward: f64,
    /// Rolling-stdev lookback for the inertia indicator.
    pub inertia_len: usize,
    /// Inertia must exceed this level for long entries.
    pub inertia_level_long: f64,
    /// Inertia must be below this level for short entries.
    pub inertia_level_short: f64,
}

impl ParameterSet {
    /// Compact human-readable label, used in logs and exported tables.
    pub fn key(&self) -> String {
        format!(
            "dltf{:.0}_dhtf{:.0}_atr{:.1}_rr{:.1}_il{}_lv{:.0}/{:.0}",
            self.rsi_delta_ltf,
            self.rsi_delta_htf,
            self.atr_multiplier,
            self.risk_reward,
            self.inertia_len,
            self.inertia_level_long,
            self.inertia_level_short
        )
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            rsi_delta_ltf: 10.0,
            rsi_delta_htf: 10.0,
            atr_multiplier: 1.0,
            risk_reward: 1.5,
            inertia_len: 21,
            inertia_level_long: 50.0,
            inertia_level_short: 50.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_stable() {
        let p = ParameterSet::default();
        assert_eq!(p.key(), "dltf10_dhtf10_atr1.0_rr1.5_il21_lv50/50");
    }

    #[test]
    fn serialization_roundtrip() {
        let p = ParameterSet {
            rsi_delta_ltf: 6.0,
            risk_reward: 2.5,
            ..ParameterSet::default()
        };
        let json = serde_json::to_string(&p).unwrap();
        let deser: ParameterSet = serde_json::from_str(&json).unwrap();
        assert_eq!(p, deser);
    }
}
