//! Profiling result types and run outcomes.

use serde::{Deserialize, Serialize};

use crate::analysis::ComplexityClass;
use crate::config::Aggregation;
use crate::error::RunError;
use crate::preflight::ResolutionWarning;
use crate::statistics::SizeSummary;

/// A candidate model after fitting: `t(n) = coefficient * basis(n) + intercept`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFit {
    /// The growth model.
    pub class: ComplexityClass,

    /// Fitted `a`. For `O(1)` this is the mean time; for `O(2^n)` it
    /// multiplies `2^(n - n_max)`.
    pub coefficient: f64,

    /// Fitted `b` in seconds.
    pub intercept: f64,

    /// Sum of squared errors in seconds squared.
    pub sse: f64,

    /// `sse` divided by the sum of squared observed times. Used for ranking.
    pub residual: f64,

    /// The model's growth was not resolvable and it was reduced to the
    /// constant fit.
    pub flattened: bool,
}

/// Complete result of one profiling sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResult {
    /// Work item name.
    pub name: String,

    /// Lowest-residual model. Always equal to `ranked_fits[0]`.
    pub best_fit: ModelFit,

    /// Every candidate model, ascending by residual.
    pub ranked_fits: Vec<ModelFit>,

    /// Aggregated timing per size, ascending by size.
    pub points: Vec<SizeSummary>,

    /// Minimum resolvable growth in seconds (0 when disabled or unmeasured).
    pub noise_floor_secs: f64,

    /// Measurement-quality warnings. Empty when the timings look sound.
    #[serde(default)]
    pub warnings: Vec<ResolutionWarning>,

    /// Metadata for debugging.
    pub metadata: Metadata,
}

impl ProfileResult {
    /// Every candidate except the best fit, in rank order.
    pub fn other_fits(&self) -> &[ModelFit] {
        self.ranked_fits.get(1..).unwrap_or(&[])
    }

    /// Fit of a specific model.
    pub fn fit(&self, class: ComplexityClass) -> Option<&ModelFit> {
        self.ranked_fits.iter().find(|fit| fit.class == class)
    }

    /// Zero-based rank of a model.
    pub fn rank_of(&self, class: ComplexityClass) -> Option<usize> {
        self.ranked_fits.iter().position(|fit| fit.class == class)
    }
}

/// Metadata about how a profile was measured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Raw samples recorded.
    pub sample_count: usize,
    /// Measurements taken per size.
    pub measurements_per_size: usize,
    /// Repeat count requested by the work item.
    pub repeat_count: usize,
    /// Target calls per measurement after calibration; never below
    /// `repeat_count`.
    #[serde(default)]
    pub batch_size: usize,
    /// Reduction applied per size.
    pub aggregation: Aggregation,
    /// Clock resolution in nanoseconds.
    pub timer_resolution_ns: f64,
    /// Wall-clock duration of the sweep in seconds.
    pub runtime_secs: f64,
}

/// How one attempt of the resilient runner ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttemptStatus {
    /// The work produced a value.
    Succeeded,
    /// The work returned an error.
    Failed {
        /// Display form of the error.
        error: String,
    },
    /// The deadline passed; the attempt was cancelled.
    TimedOut {
        /// The attempt stopped on its own after the cancel signal. When
        /// false it had to be aborted after the grace period.
        acknowledged: bool,
    },
}

/// One entry of the attempt history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Attempt index, 1-based.
    pub attempt: usize,
    /// How it ended.
    pub status: AttemptStatus,
    /// Time from start to termination (including cancellation) in milliseconds.
    pub elapsed_ms: f64,
}

/// A successful run: the value and the attempt that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempted<T> {
    /// The work's output.
    pub value: T,
    /// Attempt that succeeded, 1-based.
    pub attempt: usize,
    /// Every attempt made, the successful one last.
    pub history: Vec<AttemptRecord>,
}

/// Outcome of a resilient run.
pub type RunOutcome<T = ProfileResult> = Result<Attempted<T>, RunError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn fit(class: ComplexityClass, residual: f64) -> ModelFit {
        ModelFit {
            class,
            coefficient: 1.0,
            intercept: 0.0,
            sse: residual,
            residual,
            flattened: false,
        }
    }

    fn result() -> ProfileResult {
        let ranked_fits = vec![
            fit(ComplexityClass::Linear, 0.001),
            fit(ComplexityClass::Linearithmic, 0.01),
            fit(ComplexityClass::Constant, 0.5),
        ];
        ProfileResult {
            name: "sum".into(),
            best_fit: ranked_fits[0].clone(),
            ranked_fits,
            points: Vec::new(),
            noise_floor_secs: 0.0,
            warnings: Vec::new(),
            metadata: Metadata {
                sample_count: 50,
                measurements_per_size: 5,
                repeat_count: 10,
                batch_size: 10,
                aggregation: Aggregation::Min,
                timer_resolution_ns: 20.0,
                runtime_secs: 0.5,
            },
        }
    }

    #[test]
    fn test_lookup_helpers() {
        let result = result();
        assert_eq!(result.other_fits().len(), 2);
        assert_eq!(result.rank_of(ComplexityClass::Constant), Some(2));
        assert_eq!(result.fit(ComplexityClass::Linearithmic).unwrap().residual, 0.01);
        assert!(result.fit(ComplexityClass::Cubic).is_none());
    }

    #[test]
    fn test_attempt_status_serialization() {
        let record = AttemptRecord {
            attempt: 2,
            status: AttemptStatus::TimedOut { acknowledged: true },
            elapsed_ms: 12.5,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"status\":\"timed_out\""));
        assert!(json.contains("\"acknowledged\":true"));
    }
}
