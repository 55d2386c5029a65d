//! Ordinary least squares for a single regressor plus intercept.
//!
//! The model is `y = slope * x + intercept`, solved through the SVD of the
//! k x 2 design matrix `[x / s | 1]`. The regressor is scaled by
//! `s = max|x|` before solving so that wildly different bases (`log n`
//! against `n^3`) are equally well conditioned; the slope is rescaled
//! afterwards.

use nalgebra::{DMatrix, DVector};

/// Singular values below this (relative to unit-scaled columns) are treated as zero.
const SVD_EPS: f64 = 1e-12;

/// Relative range below which a regressor is considered constant.
const DEGENERATE_RANGE: f64 = 1e-12;

/// Least-squares fit of one regressor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    /// Coefficient of the regressor.
    pub slope: f64,
    /// Constant term.
    pub intercept: f64,
    /// Sum of squared errors over the fitted points.
    pub sse: f64,
    /// Predicted change of `y` across the observed range of `x`.
    pub span: f64,
}

/// Arithmetic mean. Zero for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sum of squared deviations from a constant prediction.
pub fn sse_about(values: &[f64], level: f64) -> f64 {
    values.iter().map(|v| (v - level) * (v - level)).sum()
}

/// Fit `y = slope * x + intercept`.
///
/// Returns `None` when the slope is not identifiable: fewer than two points,
/// a non-finite regressor, or a regressor that is constant over the data
/// (collinear with the intercept).
///
/// # Panics
///
/// Panics if `x` and `y` differ in length.
pub fn least_squares(x: &[f64], y: &[f64]) -> Option<LinearFit> {
    assert_eq!(x.len(), y.len(), "regressor and response lengths differ");

    let k = x.len();
    if k < 2 || x.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let (lo, hi) = x
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let scale = lo.abs().max(hi.abs());
    if scale == 0.0 || (hi - lo) <= scale * DEGENERATE_RANGE {
        return None;
    }

    let design = DMatrix::from_fn(k, 2, |i, j| if j == 0 { x[i] / scale } else { 1.0 });
    let response = DVector::from_column_slice(y);
    let coefficients = design.clone().svd(true, true).solve(&response, SVD_EPS).ok()?;

    let scaled_slope = coefficients[0];
    let intercept = coefficients[1];
    if !scaled_slope.is_finite() || !intercept.is_finite() {
        return None;
    }

    let predicted = &design * &coefficients;
    let sse = (response - predicted).norm_squared();

    Some(LinearFit {
        slope: scaled_slope / scale,
        intercept,
        sse,
        span: scaled_slope * (hi - lo) / scale,
    })
}
