//! Complexity classification of timing samples.
//!
//! The pipeline is pure and deterministic for a given set of samples:
//!
//! 1. **Aggregation**: reduce the repeated measurements of each size
//! 2. **Noise floor**: median per-size spread, the smallest resolvable growth
//! 3. **Fitting** ([`fit`]): least squares of every [`ComplexityClass`]
//! 4. **Ranking** ([`ranking`]): ascending residual, ties by priority

mod fit;
mod models;
mod ranking;

pub use fit::fit_model;
pub use models::ComplexityClass;
pub use ranking::rank_fits;

use crate::config::Config;
use crate::error::ProfileError;
use crate::result::ModelFit;
use crate::statistics::{noise_floor, summarize, SizeSummary};
use crate::types::Sample;

/// Outcome of fitting every candidate model to a set of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Lowest-residual model; equal to `ranked_fits[0]`.
    pub best_fit: ModelFit,
    /// All candidates, ascending by residual.
    pub ranked_fits: Vec<ModelFit>,
    /// Aggregated timing per size, ascending by size.
    pub points: Vec<SizeSummary>,
    /// Growth threshold in seconds applied while fitting.
    pub noise_floor_secs: f64,
}

/// Fit and rank every candidate model against `samples`.
///
/// Uses `config.aggregation`, `config.tie_epsilon` and
/// `config.resolve_noise`; the size schedule fields are ignored.
///
/// # Errors
///
/// - `InsufficientData` if fewer than two distinct sizes are present.
/// - `InvalidConfig` if a sample time is negative or not finite, or the
///   tie epsilon is invalid.
pub fn classify(samples: &[Sample], config: &Config) -> Result<Classification, ProfileError> {
    classify_with_floor(samples, config, 0.0)
}

/// [`classify`] with a lower bound on the noise floor, in seconds.
///
/// The profiler passes the per-call share of a few timer ticks here, since
/// growth smaller than the clock can resolve is never measurable, however
/// repeatable the raw timings look. Ignored when `config.resolve_noise` is
/// false.
pub fn classify_with_floor(
    samples: &[Sample],
    config: &Config,
    min_noise_floor: f64,
) -> Result<Classification, ProfileError> {
    if !(config.tie_epsilon >= 0.0 && config.tie_epsilon.is_finite()) {
        return Err(ProfileError::InvalidConfig(format!(
            "tie_epsilon must be finite and >= 0, got {}",
            config.tie_epsilon
        )));
    }
    if let Some(bad) = samples
        .iter()
        .find(|s| !(s.elapsed_secs >= 0.0 && s.elapsed_secs.is_finite()))
    {
        return Err(ProfileError::InvalidConfig(format!(
            "sample at n={} has invalid time {}",
            bad.n, bad.elapsed_secs
        )));
    }

    let points = summarize(samples, config.aggregation);
    if points.len() < 2 {
        return Err(ProfileError::InsufficientData {
            distinct_sizes: points.len(),
        });
    }

    let floor = if config.resolve_noise {
        noise_floor(&points).max(min_noise_floor.max(0.0))
    } else {
        0.0
    };

    let sizes: Vec<f64> = points.iter().map(|p| p.n as f64).collect();
    let times: Vec<f64> = points.iter().map(|p| p.elapsed_secs).collect();

    let fits = ComplexityClass::ALL
        .iter()
        .map(|&class| fit_model(class, &sizes, &times, floor))
        .collect();
    let ranked_fits = rank_fits(fits, config.tie_epsilon);
    let best_fit = ranked_fits[0].clone();

    Ok(Classification {
        best_fit,
        ranked_fits,
        points,
        noise_floor_secs: floor,
    })
}
