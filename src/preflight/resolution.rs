//! Timer resolution check.
//!
//! A timed batch that lasts only a few clock ticks is dominated by
//! quantization: sizes that differ in real cost report the same time and
//! the fitted curves describe the clock rather than the target. The fix is
//! a larger `repeat_count`, so each batch spans more ticks.

use serde::{Deserialize, Serialize};

use crate::types::Sample;

/// Batches shorter than this many timer ticks are flagged.
pub const MIN_TICKS_PER_BATCH: f64 = 10.0;

/// Fraction of zero timings that makes the data unusable.
const CRITICAL_ZERO_FRACTION: f64 = 0.5;

/// Warning from the resolution check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionWarning {
    /// Most measurements read as zero: the target is faster than the clock.
    ///
    /// The fit is unreliable.
    InsufficientResolution {
        /// Fraction of samples that were exactly zero.
        zero_fraction: f64,
        /// Timer resolution in nanoseconds.
        timer_resolution_ns: f64,
    },

    /// The shortest timed batch covers only a few clock ticks.
    CoarseBatches {
        /// Duration of the shortest batch in nanoseconds.
        shortest_batch_ns: f64,
        /// Timer resolution in nanoseconds.
        timer_resolution_ns: f64,
        /// Calls per batch that produced it.
        repeat_count: usize,
    },
}

impl ResolutionWarning {
    /// Check if this warning indicates a critical issue.
    pub fn is_critical(&self) -> bool {
        matches!(self, ResolutionWarning::InsufficientResolution { .. })
    }

    /// Get a human-readable description of the warning.
    pub fn description(&self) -> String {
        match self {
            ResolutionWarning::InsufficientResolution {
                zero_fraction,
                timer_resolution_ns,
            } => format!(
                "CRITICAL: {:.0}% of measurements are zero at a timer resolution of ~{:.0}ns. \
                 Increase the work item's repeat_count or profile larger sizes.",
                zero_fraction * 100.0,
                timer_resolution_ns
            ),
            ResolutionWarning::CoarseBatches {
                shortest_batch_ns,
                timer_resolution_ns,
                repeat_count,
            } => format!(
                "Shortest batch of {} call(s) took {:.0}ns, under {:.0} ticks of the ~{:.0}ns timer. \
                 Small sizes may be quantized; consider a larger repeat_count.",
                repeat_count, shortest_batch_ns, MIN_TICKS_PER_BATCH, timer_resolution_ns
            ),
        }
    }
}

/// Check whether the samples were resolvable by the timer.
///
/// `samples` hold per-call seconds; each came from a batch of
/// `repeat_count` calls.
pub fn resolution_check(
    samples: &[Sample],
    repeat_count: usize,
    timer_resolution_ns: f64,
) -> Option<ResolutionWarning> {
    if samples.is_empty() || !(timer_resolution_ns > 0.0) {
        return None;
    }

    let zeros = samples.iter().filter(|s| s.elapsed_secs == 0.0).count();
    let zero_fraction = zeros as f64 / samples.len() as f64;
    if zero_fraction > CRITICAL_ZERO_FRACTION {
        return Some(ResolutionWarning::InsufficientResolution {
            zero_fraction,
            timer_resolution_ns,
        });
    }

    let shortest_per_call = samples
        .iter()
        .map(|s| s.elapsed_secs)
        .fold(f64::INFINITY, f64::min);
    let shortest_batch_ns = shortest_per_call * repeat_count.max(1) as f64 * 1e9;
    if shortest_batch_ns < MIN_TICKS_PER_BATCH * timer_resolution_ns {
        return Some(ResolutionWarning::CoarseBatches {
            shortest_batch_ns,
            timer_resolution_ns,
            repeat_count,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_good_resolution() {
        let samples: Vec<Sample> = (1..=20).map(|n| Sample::new(n, 1e-6 * n as f64)).collect();
        assert!(resolution_check(&samples, 10, 20.0).is_none());
    }

    #[test]
    fn test_insufficient_resolution() {
        let mut samples = vec![Sample::new(10, 0.0); 8];
        samples.push(Sample::new(20, 4.1e-8));
        let warning = resolution_check(&samples, 1, 41.0).unwrap();
        assert!(warning.is_critical());
        assert!(warning.description().contains("CRITICAL"));
    }

    #[test]
    fn test_coarse_batches() {
        // 10 calls of 5ns each = 50ns, under 10 ticks of a 41ns clock
        let samples = vec![Sample::new(10, 5e-9), Sample::new(20, 1e-6)];
        let warning = resolution_check(&samples, 10, 41.0).unwrap();
        assert!(!warning.is_critical());
        assert!(matches!(warning, ResolutionWarning::CoarseBatches { repeat_count: 10, .. }));
    }

    #[test]
    fn test_empty_is_silent() {
        assert!(resolution_check(&[], 10, 41.0).is_none());
    }
}
