//! WfaLab Runner — search orchestration on top of `wfalab-core`.
//!
//! This crate provides:
//! - The execution-collaborator contract and a reference bar simulator
//! - Objective functions for ranking evaluation results
//! - Exhaustive parameter grid search, sequential or rayon-parallel,
//!   with a deterministic first-seen-wins tie-break
//! - The rolling walk-forward scheduler and its out-of-sample log
//! - Log aggregation and CSV export of the research artifacts

pub mod aggregate;
pub mod execution;
pub mod export;
pub mod grid;
pub mod objective;
pub mod surface;
pub mod walk_forward;
