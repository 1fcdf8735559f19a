//! Score surface — a 2-D view of the grid for inspection.
//!
//! Keyed by the two oscillator deltas; each cell holds the maximum score
//! seen across all other parameter dimensions, the shape a heatmap renderer
//! wants. Cells whose every evaluation failed stay NaN.

use serde::{Deserialize, Serialize};

/// Max score per (rsi_delta_htf row, rsi_delta_ltf column).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreSurface {
    rows: Vec<f64>,
    cols: Vec<f64>,
    cells: Vec<Vec<f64>>,
}

impl ScoreSurface {
    /// Build an all-NaN surface over the given axes.
    pub fn new(delta_htf: &[f64], delta_ltf: &[f64]) -> Self {
        Self {
            rows: delta_htf.to_vec(),
            cols: delta_ltf.to_vec(),
            cells: vec![vec![f64::NAN; delta_ltf.len()]; delta_htf.len()],
        }
    }

    /// Fold one scored combination into its cell.
    pub fn record(&mut self, delta_htf: f64, delta_ltf: f64, score: f64) {
        let Some(r) = self.rows.iter().position(|&v| v == delta_htf) else {
            return;
        };
        let Some(c) = self.cols.iter().position(|&v| v == delta_ltf) else {
            return;
        };
        let cell = &mut self.cells[r][c];
        if cell.is_nan() || score > *cell {
            *cell = score;
        }
    }

    pub fn delta_htf_axis(&self) -> &[f64] {
        &self.rows
    }

    pub fn delta_ltf_axis(&self) -> &[f64] {
        &self.cols
    }

    /// Cell value, NaN when nothing scored there.
    pub fn get(&self, delta_htf: f64, delta_ltf: f64) -> f64 {
        let r = self.rows.iter().position(|&v| v == delta_htf);
        let c = self.cols.iter().position(|&v| v == delta_ltf);
        match (r, c) {
            (Some(r), Some(c)) => self.cells[r][c],
            _ => f64::NAN,
        }
    }

    pub fn cells(&self) -> &[Vec<f64>] {
        &self.cells
    }
}
