//! Configuration for profiling sweeps and the retry loop.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Largest accepted `measurements_per_size`.
pub const MAX_MEASUREMENTS_PER_SIZE: usize = 100_000;

/// Configuration options for `ComplexityProfiler`.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Smallest input size in the sweep (default: 100).
    pub min_size: usize,

    /// Largest input size in the sweep (default: 10,000).
    pub max_size: usize,

    /// Number of distinct sizes between `min_size` and `max_size` (default: 10).
    pub size_samples: usize,

    /// Explicit size schedule. Overrides the linear spacing when set.
    pub sizes: Option<Vec<usize>>,

    /// Timed measurements per size (default: 5).
    pub measurements_per_size: usize,

    /// Untimed target calls per size before measuring (default: 1).
    pub warmup: usize,

    /// Shortest timed batch at the smallest size (default: 50 µs).
    ///
    /// The item's repeat count is doubled until one batch of calls lasts at
    /// least this long. `Duration::ZERO` times exactly `repeat_count` calls.
    pub min_batch_time: Duration,

    /// How repeated measurements of one size are reduced (default: `Min`).
    pub aggregation: Aggregation,

    /// Residuals closer than this are ties, resolved by model priority (default: 1e-9).
    pub tie_epsilon: f64,

    /// Flatten fits whose predicted growth stays inside the measurement noise
    /// floor (default: true).
    ///
    /// Without this, any two-parameter model beats `O(1)` on noisy data from
    /// a constant-time target.
    pub resolve_noise: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_size: 100,
            max_size: 10_000,
            size_samples: 10,
            sizes: None,
            measurements_per_size: 5,
            warmup: 1,
            min_batch_time: Duration::from_micros(50),
            aggregation: Aggregation::Min,
            tie_epsilon: 1e-9,
            resolve_noise: true,
        }
    }
}

impl Config {
    /// Merge overrides from `CO_*` environment variables.
    ///
    /// Unset or unparsable variables leave the current value untouched.
    pub fn from_env(mut self) -> Self {
        if let Some(v) = parse_env("CO_MIN_SIZE") {
            self.min_size = v;
        }
        if let Some(v) = parse_env("CO_MAX_SIZE") {
            self.max_size = v;
        }
        if let Some(v) = parse_env("CO_SIZE_SAMPLES") {
            self.size_samples = v;
        }
        if let Some(v) = parse_env("CO_MEASUREMENTS") {
            self.measurements_per_size = v;
        }
        if let Some(v) = parse_env("CO_WARMUP") {
            self.warmup = v;
        }
        if let Some(v) = parse_env("CO_AGGREGATION") {
            self.aggregation = v;
        }
        if let Some(us) = parse_env::<u64>("CO_MIN_BATCH_US") {
            self.min_batch_time = Duration::from_micros(us);
        }
        self
    }

    /// Resolve the ascending, deduplicated size schedule.
    ///
    /// Linear spacing rounds each point to the nearest integer, so a narrow
    /// range can yield fewer sizes than `size_samples`.
    pub fn size_schedule(&self) -> Vec<usize> {
        let mut sizes = match &self.sizes {
            Some(explicit) => explicit.clone(),
            None => linspace(self.min_size, self.max_size, self.size_samples),
        };
        sizes.sort_unstable();
        sizes.dedup();
        sizes
    }

    /// Check the sweep parameters before any measurement runs.
    pub fn validate(&self) -> Result<(), String> {
        if self.measurements_per_size == 0 {
            return Err("measurements_per_size must be at least 1".into());
        }
        if self.measurements_per_size > MAX_MEASUREMENTS_PER_SIZE {
            return Err(format!(
                "measurements_per_size ({}) exceeds {MAX_MEASUREMENTS_PER_SIZE}",
                self.measurements_per_size
            ));
        }
        if self.sizes.is_none() {
            if self.size_samples == 0 {
                return Err("size_samples must be at least 1".into());
            }
            if self.min_size > self.max_size {
                return Err(format!(
                    "min_size ({}) exceeds max_size ({})",
                    self.min_size, self.max_size
                ));
            }
        }
        if !(self.tie_epsilon >= 0.0 && self.tie_epsilon.is_finite()) {
            return Err(format!("tie_epsilon must be finite and >= 0, got {}", self.tie_epsilon));
        }
        Ok(())
    }
}

/// Reduction applied to the repeated measurements of one size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Fastest observation. Least sensitive to preemption and cache noise.
    #[default]
    Min,
    /// Middle observation.
    Median,
    /// Arithmetic mean.
    Mean,
}

impl FromStr for Aggregation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "min" => Ok(Self::Min),
            "median" => Ok(Self::Median),
            "mean" => Ok(Self::Mean),
            other => Err(format!("unknown aggregation `{other}`")),
        }
    }
}

/// Retry and deadline policy for `ResilientRunner`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (default: 3).
    pub attempts: usize,

    /// Deadline for a single attempt (default: 10 s).
    pub attempt_timeout: Duration,

    /// How long a cancelled attempt may take to acknowledge before it is
    /// aborted (default: 1 s).
    pub cancel_grace: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            attempt_timeout: Duration::from_secs(10),
            cancel_grace: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Merge overrides from `CO_RETRY_ATTEMPTS` and `CO_ATTEMPT_TIMEOUT_MS`.
    pub fn from_env(mut self) -> Self {
        if let Some(attempts) = parse_env::<usize>("CO_RETRY_ATTEMPTS") {
            self.attempts = attempts.max(1);
        }
        if let Some(ms) = parse_env::<u64>("CO_ATTEMPT_TIMEOUT_MS") {
            self.attempt_timeout = Duration::from_millis(ms);
        }
        self
    }
}

fn linspace(min: usize, max: usize, count: usize) -> Vec<usize> {
    match count {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max as f64 - min as f64) / (count - 1) as f64;
            (0..count)
                .map(|i| (min as f64 + step * i as f64).round() as usize)
                .collect()
        }
    }
}

fn parse_env<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_is_linear() {
        let sizes = Config::default().size_schedule();
        assert_eq!(sizes.len(), 10);
        assert_eq!(sizes[0], 100);
        assert_eq!(sizes[1], 1_200);
        assert_eq!(sizes[9], 10_000);
    }

    #[test]
    fn explicit_sizes_are_sorted_and_deduplicated() {
        let config = Config {
            sizes: Some(vec![10_000, 100, 1_000, 100]),
            ..Config::default()
        };
        assert_eq!(config.size_schedule(), vec![100, 1_000, 10_000]);
    }

    #[test]
    fn narrow_range_collapses() {
        let config = Config {
            min_size: 5,
            max_size: 6,
            size_samples: 10,
            ..Config::default()
        };
        assert_eq!(config.size_schedule(), vec![5, 6]);
    }

    #[test]
    fn validation_rejects_bad_sweeps() {
        let zero = Config {
            measurements_per_size: 0,
            ..Config::default()
        };
        assert!(zero.validate().is_err());

        let inverted = Config {
            min_size: 10,
            max_size: 1,
            ..Config::default()
        };
        assert!(inverted.validate().is_err());

        let absurd = Config {
            measurements_per_size: usize::MAX,
            ..Config::default()
        };
        assert!(absurd.validate().unwrap_err().contains("exceeds"));

        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn aggregation_parses_case_insensitively() {
        assert_eq!("MEDIAN".parse::<Aggregation>(), Ok(Aggregation::Median));
        assert_eq!("min".parse::<Aggregation>(), Ok(Aggregation::Min));
        assert!("mode".parse::<Aggregation>().is_err());
    }

    #[test]
    fn retry_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts, 3);
        assert_eq!(policy.attempt_timeout, Duration::from_secs(10));
    }
}
