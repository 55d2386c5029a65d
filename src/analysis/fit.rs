//! Fitting one candidate model to aggregated timings.
//!
//! Every model except `O(1)` is a two-parameter line in its own basis, so
//! it can never fit worse than the constant. Three situations reduce such a
//! fit to the constant one ("flattening"):
//!
//! - the basis is degenerate over the sampled sizes (collinear with the
//!   intercept),
//! - the fitted slope is not positive (cost shrinking with size is not
//!   growth; this is the slope >= 0 constrained optimum),
//! - the predicted growth across the sampled range does not exceed the
//!   noise floor.
//!
//! A flattened fit has exactly the constant model's residual, so the
//! priority tie-break hands the rank to `O(1)`.

use crate::result::ModelFit;
use crate::statistics::{least_squares, mean, sse_about};

use super::models::ComplexityClass;

/// Fit `class` to the points `(sizes[i], times[i])`.
///
/// `noise_floor` is in seconds; pass 0.0 to disable the resolution check.
pub fn fit_model(class: ComplexityClass, sizes: &[f64], times: &[f64], noise_floor: f64) -> ModelFit {
    let level = mean(times);
    let energy: f64 = times.iter().map(|t| t * t).sum();
    let flat = ModelFit {
        class,
        coefficient: if class == ComplexityClass::Constant { level } else { 0.0 },
        intercept: if class == ComplexityClass::Constant { 0.0 } else { level },
        sse: sse_about(times, level),
        residual: normalize(sse_about(times, level), energy),
        flattened: class != ComplexityClass::Constant,
    };

    if class == ComplexityClass::Constant {
        return flat;
    }

    let n_max = sizes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let basis: Vec<f64> = sizes.iter().map(|&n| class.basis(n, n_max)).collect();

    match least_squares(&basis, times) {
        Some(line) if line.slope > 0.0 && line.span > noise_floor => ModelFit {
            class,
            coefficient: line.slope,
            intercept: line.intercept,
            sse: line.sse,
            residual: normalize(line.sse, energy),
            flattened: false,
        },
        _ => flat,
    }
}

/// Dimensionless residual: SSE over the total signal energy.
fn normalize(sse: f64, energy: f64) -> f64 {
    let residual = if energy > 0.0 { sse / energy } else { 0.0 };
    if residual.is_finite() {
        residual
    } else {
        f64::INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes() -> Vec<f64> {
        (1..=10).map(|i| i as f64 * 1_000.0).collect()
    }

    #[test]
    fn test_constant_fit_is_mean() {
        let fit = fit_model(ComplexityClass::Constant, &[1.0, 2.0], &[2.0, 4.0], 0.0);
        assert_eq!(fit.coefficient, 3.0);
        assert_eq!(fit.sse, 2.0);
        assert!((fit.residual - 0.1).abs() < 1e-12);
        assert!(!fit.flattened);
    }

    #[test]
    fn test_linear_fit_recovers_slope() {
        let xs = sizes();
        let ys: Vec<f64> = xs.iter().map(|n| 2e-9 * n + 1e-6).collect();
        let fit = fit_model(ComplexityClass::Linear, &xs, &ys, 0.0);

        assert!(!fit.flattened);
        assert!((fit.coefficient - 2e-9).abs() / 2e-9 < 1e-6);
        assert!(fit.residual < 1e-12);
    }

    #[test]
    fn test_decreasing_data_flattens() {
        let xs = sizes();
        let ys: Vec<f64> = xs.iter().map(|n| 1e-3 - 1e-8 * n).collect();
        let fit = fit_model(ComplexityClass::Linear, &xs, &ys, 0.0);
        let constant = fit_model(ComplexityClass::Constant, &xs, &ys, 0.0);

        assert!(fit.flattened);
        assert_eq!(fit.coefficient, 0.0);
        assert_eq!(fit.residual, constant.residual);
    }

    #[test]
    fn test_growth_below_noise_flattens() {
        let xs = sizes();
        // 9 ns of growth across the range
        let ys: Vec<f64> = xs.iter().map(|n| 1e-6 + 1e-12 * n).collect();

        assert!(!fit_model(ComplexityClass::Linear, &xs, &ys, 1e-9).flattened);
        assert!(fit_model(ComplexityClass::Linear, &xs, &ys, 1e-8).flattened);
    }

    #[test]
    fn test_zero_times_have_zero_residual() {
        let xs = sizes();
        let ys = vec![0.0; xs.len()];
        for class in ComplexityClass::ALL {
            assert_eq!(fit_model(class, &xs, &ys, 0.0).residual, 0.0);
        }
    }
}
