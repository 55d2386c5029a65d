//! Main `ComplexityProfiler` entry point and builder.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::analysis::classify_with_floor;
use crate::cancel::CancelSignal;
use crate::config::{Aggregation, Config};
use crate::error::ProfileError;
use crate::measurement::{Collector, Timer};
use crate::preflight::resolution_check;
use crate::result::{Metadata, ProfileResult};
use crate::statistics::median;
use crate::types::{Sample, WorkItem};

/// Growth under this many timer ticks per batch is treated as noise.
const RESOLUTION_FLOOR_TICKS: f64 = 2.0;

/// Growth under this share of the median timing is treated as noise.
/// Back-to-back batches of an unchanged workload drift by about this much.
const RELATIVE_NOISE_FLOOR: f64 = 0.01;

/// Main entry point for complexity profiling.
///
/// Use the builder pattern to configure the sweep, then profile a
/// [`WorkItem`].
///
/// # Example
///
/// ```ignore
/// use complexity_oracle::{ComplexityProfiler, WorkItem};
///
/// let item = WorkItem::new("sum", |n| (0..n as u64).collect::<Vec<_>>(), |v| v.iter().sum::<u64>());
///
/// let result = ComplexityProfiler::new()
///     .sizes([1_000, 10_000, 100_000])
///     .measurements_per_size(5)
///     .profile(&item)?;
///
/// println!("{}", result.best_fit.class);
/// ```
///
/// A sweep is blocking. Use [`ResilientRunner`](crate::ResilientRunner) to
/// run it with a deadline and retries.
#[derive(Debug, Clone)]
pub struct ComplexityProfiler {
    config: Config,
    timer: Timer,
}

impl Default for ComplexityProfiler {
    fn default() -> Self {
        Self::new()
    }
}

impl ComplexityProfiler {
    /// Create with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create from an explicit configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            timer: Timer::new(),
        }
    }

    /// Create with a fast configuration for smoke tests.
    ///
    /// Settings:
    /// - 5 sizes from 100 to 5,000 (vs 10 from 100 to 10,000)
    /// - 3 measurements per size (vs 5)
    pub fn quick() -> Self {
        Self::with_config(Config {
            max_size: 5_000,
            size_samples: 5,
            measurements_per_size: 3,
            ..Config::default()
        })
    }

    /// Create with a configuration that trades runtime for stability.
    ///
    /// Settings:
    /// - 20 sizes from 100 to 100,000
    /// - 10 measurements per size, aggregated by median
    /// - 3 warmup calls per size
    pub fn thorough() -> Self {
        Self::with_config(Config {
            max_size: 100_000,
            size_samples: 20,
            measurements_per_size: 10,
            warmup: 3,
            aggregation: Aggregation::Median,
            ..Config::default()
        })
    }

    /// Merge overrides from `CO_*` environment variables.
    pub fn from_env(mut self) -> Self {
        self.config = self.config.from_env();
        self
    }

    /// Use a timer with a known resolution instead of calibrating one.
    pub fn timer(mut self, timer: Timer) -> Self {
        self.timer = timer;
        self
    }

    /// Set the smallest size of the linear schedule.
    pub fn min_size(mut self, n: usize) -> Self {
        self.config.min_size = n;
        self
    }

    /// Set the largest size of the linear schedule.
    pub fn max_size(mut self, n: usize) -> Self {
        self.config.max_size = n;
        self
    }

    /// Set the number of sizes of the linear schedule.
    pub fn size_samples(mut self, n: usize) -> Self {
        self.config.size_samples = n;
        self
    }

    /// Use an explicit size schedule instead of linear spacing.
    pub fn sizes(mut self, sizes: impl IntoIterator<Item = usize>) -> Self {
        self.config.sizes = Some(sizes.into_iter().collect());
        self
    }

    /// Set timed measurements per size.
    pub fn measurements_per_size(mut self, n: usize) -> Self {
        self.config.measurements_per_size = n;
        self
    }

    /// Set untimed calls per size.
    pub fn warmup(mut self, n: usize) -> Self {
        self.config.warmup = n;
        self
    }

    /// Set the shortest timed batch; `Duration::ZERO` disables calibration.
    pub fn min_batch_time(mut self, min_batch: Duration) -> Self {
        self.config.min_batch_time = min_batch;
        self
    }

    /// Set the per-size aggregation policy.
    pub fn aggregation(mut self, policy: Aggregation) -> Self {
        self.config.aggregation = policy;
        self
    }

    /// Set the residual tie tolerance.
    pub fn tie_epsilon(mut self, epsilon: f64) -> Self {
        self.config.tie_epsilon = epsilon;
        self
    }

    /// Enable or disable noise-floor flattening.
    pub fn resolve_noise(mut self, enabled: bool) -> Self {
        self.config.resolve_noise = enabled;
        self
    }

    /// Get the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Profile `item` across the size schedule.
    ///
    /// Equivalent to [`profile_cancellable`](Self::profile_cancellable) with
    /// a signal that never fires.
    pub fn profile<I: 'static>(&self, item: &WorkItem<I>) -> Result<ProfileResult, ProfileError> {
        self.profile_cancellable(item, &CancelSignal::new())
    }

    /// Profile `item`, stopping with [`ProfileError::Cancelled`] once
    /// `cancel` fires.
    ///
    /// # How It Works
    ///
    /// 1. Validates the configuration and the item's repeat count
    /// 2. For each size: generates one input, warms up, then measures. The
    ///    batch size is calibrated on the smallest size first
    /// 3. Aggregates each size and fits every complexity model
    /// 4. Ranks the fits by residual
    /// 5. Flags timings too close to the timer's resolution
    ///
    /// Each call starts from an empty sample set; nothing is carried over
    /// from earlier calls.
    pub fn profile_cancellable<I: 'static>(
        &self,
        item: &WorkItem<I>,
        cancel: &CancelSignal,
    ) -> Result<ProfileResult, ProfileError> {
        let start_time = Instant::now();

        self.config.validate().map_err(ProfileError::InvalidConfig)?;
        if item.repeats() == 0 {
            return Err(ProfileError::InvalidConfig(format!(
                "work `{}` has repeat_count 0",
                item.name()
            )));
        }

        let sizes = self.config.size_schedule();
        if sizes.len() < 2 {
            return Err(ProfileError::InsufficientData {
                distinct_sizes: sizes.len(),
            });
        }

        let collector = Collector::new(
            self.timer.clone(),
            self.config.warmup,
            self.config.measurements_per_size,
        )
        .min_batch(self.config.min_batch_time);
        debug!(work = item.name(), sizes = sizes.len(), "starting sweep");
        let sweep = collector.collect(item, &sizes, cancel)?;
        let samples = sweep.samples;

        let resolution_secs = collector.timer().resolution().as_secs_f64();
        let min_floor = (RESOLUTION_FLOOR_TICKS * resolution_secs / sweep.batch_size as f64)
            .max(RELATIVE_NOISE_FLOOR * median_time(&samples));
        let classification = classify_with_floor(&samples, &self.config, min_floor)?;

        let timer_resolution_ns = resolution_secs * 1e9;
        let warnings: Vec<_> = resolution_check(&samples, sweep.batch_size, timer_resolution_ns)
            .into_iter()
            .collect();
        for warning in &warnings {
            warn!(work = item.name(), "{}", warning.description());
        }

        Ok(ProfileResult {
            name: item.name().to_string(),
            best_fit: classification.best_fit,
            ranked_fits: classification.ranked_fits,
            points: classification.points,
            noise_floor_secs: classification.noise_floor_secs,
            warnings,
            metadata: Metadata {
                sample_count: samples.len(),
                measurements_per_size: self.config.measurements_per_size,
                repeat_count: item.repeats(),
                batch_size: sweep.batch_size,
                aggregation: self.config.aggregation,
                timer_resolution_ns,
                runtime_secs: start_time.elapsed().as_secs_f64(),
            },
        })
    }
}

fn median_time(samples: &[Sample]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut times: Vec<f64> = samples.iter().map(|s| s.elapsed_secs).collect();
    median(&mut times)
}
