//! Rolling statistics shared by the composite indicators.
//!
//! `rolling_stdev` uses the sample standard deviation (ddof = 1), `ewm_span`
//! matches span-parameterized exponential smoothing with the recursion
//! seeded at the first finite input, and `linreg` returns the endpoint of
//! the least-squares line fitted over each trailing window.

/// Rolling sample standard deviation over `len` values.
///
/// Outputs NaN for the first `len - 1` indices and wherever the window
/// contains a NaN. A window of fewer than two values has no sample variance,
/// so `len < 2` yields all NaN.
pub fn rolling_stdev(values: &[f64], len: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if len < 2 || n < len {
        return result;
    }

    for i in (len - 1)..n {
        let window = &values[i + 1 - len..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        let mean = window.iter().sum::<f64>() / len as f64;
        let var = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (len - 1) as f64;
        result[i] = var.sqrt();
    }

    result
}

/// Exponential smoothing with span parameterization: alpha = 2 / (span + 1).
///
/// The recursion starts at the first finite input (y0 = x0). A NaN after the
/// start carries the previous smoothed value forward instead of poisoning
/// the tail, matching how the reference smoother treats missing values.
pub fn ewm_span(values: &[f64], span: usize) -> Vec<f64> {
    assert!(span >= 1, "EWM span must be >= 1");
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    let alpha = 2.0 / (span as f64 + 1.0);

    let mut prev: Option<f64> = None;
    for i in 0..n {
        let x = values[i];
        match prev {
            None => {
                if !x.is_nan() {
                    result[i] = x;
                    prev = Some(x);
                }
            }
            Some(p) => {
                let y = if x.is_nan() { p } else { alpha * x + (1.0 - alpha) * p };
                result[i] = y;
                prev = Some(y);
            }
        }
    }

    result
}

/// Rolling linear regression: the value of the least-squares line at the
/// last bar of each trailing `len` window.
pub fn linreg(values: &[f64], len: usize) -> Vec<f64> {
    assert!(len >= 1, "linreg length must be >= 1");
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if n < len {
        return result;
    }
    if len == 1 {
        result.copy_from_slice(values);
        return result;
    }

    // x = 0, 1, …, len-1; these sums are window-independent.
    let m = len as f64;
    let sum_x = m * (m - 1.0) / 2.0;
    let sum_x2 = m * (m - 1.0) * (2.0 * m - 1.0) / 6.0;
    let denom = m * sum_x2 - sum_x * sum_x;

    for i in (len - 1)..n {
        let window = &values[i + 1 - len..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        let sum_y: f64 = window.iter().sum();
        let sum_xy: f64 = window.iter().enumerate().map(|(x, y)| x as f64 * y).sum();
        let slope = (m * sum_xy - sum_x * sum_y) / denom;
        let intercept = (sum_y - slope * sum_x) / m;
        result[i] = intercept + slope * (m - 1.0);
    }

    result
}
