//! Indicator math — pure functions over slices.
//!
//! Every function returns a vector of the same length as its input with the
//! warmup prefix set to `f64::NAN`. No value at index t depends on data past
//! index t; the pipeline's look-ahead guarantees rest on that.

pub mod atr;
pub mod inertia;
pub mod rsi;
pub mod stat;

pub use atr::{atr, true_range};
pub use inertia::dorsey_inertia;
pub use rsi::rsi;
pub use stat::{ewm_span, linreg, rolling_stdev};

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
