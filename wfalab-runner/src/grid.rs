//! Exhaustive parameter grid search over one window.
//!
//! Combinations are enumerated in a fixed nested order, evaluated through
//! the execution collaborator, and reduced by a pure fold: strictly greater
//! score wins, ties keep the first-seen combination. Sequential and parallel
//! modes differ only in how evaluations are scheduled — rayon preserves
//! collection order, and the selection fold runs identically afterwards, so
//! both modes return the same winner for the same inputs.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use wfalab_core::domain::{BarSeries, ParameterSet};
use wfalab_core::session::SessionClock;
use wfalab_core::signal::SignalEngine;

use crate::execution::{EvalError, EvaluationResult, ExecutionModel};
use crate::objective::Objective;
use crate::surface::ScoreSurface;

/// How combination evaluations are scheduled.
///
/// Always an explicit caller decision; the search never sniffs the host to
/// pick a mode on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExecMode {
    #[default]
    Sequential,
    Parallel,
}

/// Errors that reject a search before any evaluation starts.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("parameter grid field `{field}` has no candidate values")]
    EmptyGrid { field: &'static str },
}

/// Ordered candidate values per tunable field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamGrid {
    pub rsi_delta_ltf: Vec<f64>,
    pub rsi_delta_htf: Vec<f64>,
    pub atr_multiplier: Vec<f64>,
    pub risk_reward: Vec<f64>,
    pub inertia_len: Vec<usize>,
    pub inertia_level_long: Vec<f64>,
    pub inertia_level_short: Vec<f64>,
}

impl Default for ParamGrid {
    fn default() -> Self {
        Self {
            rsi_delta_ltf: vec![4.0, 6.0, 8.0, 10.0, 12.0, 14.0],
            rsi_delta_htf: vec![10.0, 15.0],
            atr_multiplier: vec![1.0, 1.5, 2.5],
            risk_reward: vec![2.0, 2.5, 3.0],
            inertia_len: vec![21],
            inertia_level_long: vec![50.0],
            inertia_level_short: vec![50.0],
        }
    }
}

impl ParamGrid {
    /// A grid is only usable if every field offers at least one candidate.
    pub fn validate(&self) -> Result<(), SearchError> {
        fn check<T>(values: &[T], field: &'static str) -> Result<(), SearchError> {
            if values.is_empty() {
                Err(SearchError::EmptyGrid { field })
            } else {
                Ok(())
            }
        }
        check(&self.rsi_delta_ltf, "rsi_delta_ltf")?;
        check(&self.rsi_delta_htf, "rsi_delta_htf")?;
        check(&self.atr_multiplier, "atr_multiplier")?;
        check(&self.risk_reward, "risk_reward")?;
        check(&self.inertia_len, "inertia_len")?;
        check(&self.inertia_level_long, "inertia_level_long")?;
        check(&self.inertia_level_short, "inertia_level_short")?;
        Ok(())
    }

    pub fn total_combinations(&self) -> usize {
        self.rsi_delta_ltf.len()
            * self.rsi_delta_htf.len()
            * self.atr_multiplier.len()
            * self.risk_reward.len()
            * self.inertia_len.len()
            * self.inertia_level_long.len()
            * self.inertia_level_short.len()
    }

    /// Enumerate the full Cartesian product.
    ///
    /// The nesting order below is the enumeration order; it never changes,
    /// which is what makes the first-seen-wins tie-break reproducible.
    pub fn combinations(&self) -> Vec<ParameterSet> {
        let mut combos = Vec::with_capacity(self.total_combinations());
        for &rsi_delta_ltf in &self.rsi_delta_ltf {
            for &rsi_delta_htf in &self.rsi_delta_htf {
                for &atr_multiplier in &self.atr_multiplier {
                    for &risk_reward in &self.risk_reward {
                        for &inertia_len in &self.inertia_len {
                            for &inertia_level_long in &self.inertia_level_long {
                                for &inertia_level_short in &self.inertia_level_short {
                                    combos.push(ParameterSet {
                                        rsi_delta_ltf,
                                        rsi_delta_htf,
                                        atr_multiplier,
                                        risk_reward,
                                        inertia_len,
                                        inertia_level_long,
                                        inertia_level_short,
                                    });
                                }
                            }
                        }
                    }
                }
            }
        }
        combos
    }
}

/// Outcome of one grid search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub best_params: ParameterSet,
    /// None only when the whole grid failed and the first combination was
    /// returned as the explicit default.
    pub best_result: Option<EvaluationResult>,
    pub best_score: f64,
    /// True when every combination failed to evaluate.
    pub exhausted: bool,
    pub evaluated: usize,
    pub failed: usize,
    pub surface: ScoreSurface,
}

/// Strategy constants plus the search policy. The tunables come from the
/// grid; everything here is fixed across combinations.
#[derive(Debug, Clone)]
pub struct GridSearch {
    pub objective: Objective,
    pub mode: ExecMode,
    pub session: SessionClock,
    /// Volatility floor passed to every signal engine instance.
    pub min_atr_fraction: f64,
}

impl Default for GridSearch {
    fn default() -> Self {
        Self {
            objective: Objective::default(),
            mode: ExecMode::default(),
            session: SessionClock::default(),
            min_atr_fraction: 0.0005,
        }
    }
}

struct Scored {
    index: usize,
    score: f64,
    result: Option<EvaluationResult>,
}

impl GridSearch {
    /// Search the full grid over one window.
    ///
    /// A combination whose evaluation fails is scored −∞ and skipped, never
    /// fatal. If every combination fails, the first enumerated combination
    /// is returned as an explicit default with `exhausted` set.
    pub fn run(
        &self,
        window: &BarSeries,
        grid: &ParamGrid,
        exec: &dyn ExecutionModel,
    ) -> Result<SearchOutcome, SearchError> {
        grid.validate()?;
        let combos = grid.combinations();

        let scored: Vec<Scored> = match self.mode {
            ExecMode::Sequential => combos
                .iter()
                .enumerate()
                .map(|(index, params)| self.score_one(index, params, window, exec))
                .collect(),
            ExecMode::Parallel => combos
                .par_iter()
                .enumerate()
                .map(|(index, params)| self.score_one(index, params, window, exec))
                .collect(),
        };

        let failed = scored.iter().filter(|s| s.result.is_none()).count();
        let exhausted = failed == scored.len();

        let mut surface = ScoreSurface::new(&grid.rsi_delta_htf, &grid.rsi_delta_ltf);
        for s in &scored {
            if s.result.is_some() {
                let p = &combos[s.index];
                surface.record(p.rsi_delta_htf, p.rsi_delta_ltf, s.score);
            }
        }

        if exhausted {
            warn!(
                combinations = combos.len(),
                "every grid combination failed; falling back to the first enumerated one"
            );
            return Ok(SearchOutcome {
                best_params: combos[0].clone(),
                best_result: None,
                best_score: f64::NEG_INFINITY,
                exhausted: true,
                evaluated: scored.len(),
                failed,
                surface,
            });
        }

        // Pure selection fold, shared by both modes: strictly greater score
        // replaces the incumbent, so equal scores keep the earliest index.
        let mut best = &scored[0];
        for s in &scored[1..] {
            if s.score > best.score {
                best = s;
            }
        }

        Ok(SearchOutcome {
            best_params: combos[best.index].clone(),
            best_result: best.result.clone(),
            best_score: best.score,
            exhausted: false,
            evaluated: scored.len(),
            failed,
            surface,
        })
    }

    fn score_one(
        &self,
        index: usize,
        params: &ParameterSet,
        window: &BarSeries,
        exec: &dyn ExecutionModel,
    ) -> Scored {
        match self.evaluate(params, window, exec) {
            Ok(result) => {
                let score = self.objective.score(&result);
                if score.is_nan() {
                    debug!(combo = %params.key(), "objective returned NaN; treating as failure");
                    Scored {
                        index,
                        score: f64::NEG_INFINITY,
                        result: None,
                    }
                } else {
                    Scored {
                        index,
                        score,
                        result: Some(result),
                    }
                }
            }
            Err(err) => {
                debug!(combo = %params.key(), error = %err, "combination evaluation failed");
                Scored {
                    index,
                    score: f64::NEG_INFINITY,
                    result: None,
                }
            }
        }
    }

    /// Instantiate a signal engine for one combination and drive it through
    /// the execution collaborator.
    pub fn evaluate(
        &self,
        params: &ParameterSet,
        window: &BarSeries,
        exec: &dyn ExecutionModel,
    ) -> Result<EvaluationResult, EvalError> {
        let engine = SignalEngine::new(params.clone(), self.session, self.min_atr_fraction);
        exec.run(window, params, &mut |cur, prev, pos| {
            engine.decide(cur, prev, pos)
        })
    }
}
