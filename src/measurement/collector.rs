//! Sample collection across a size sweep.
//!
//! Sizes are visited in ascending order and measured sequentially; nothing
//! runs in parallel so the timings are not contended. The sweep checks its
//! cancel signal before generating each input and before every measurement,
//! so a cancelled attempt stops within one measurement.
//!
//! Before the first measurement the batch size is calibrated on the
//! smallest input: the item's repeat count is doubled until one batch lasts
//! at least `min_batch`. The whole sweep then uses that batch size, so the
//! cheapest size is still timed well above clock jitter.

use std::time::Duration;

use tracing::debug;

use crate::cancel::CancelSignal;
use crate::error::{MeasurementError, ProfileError};
use crate::types::{Sample, WorkItem};

use super::timer::Timer;

/// Upper bound on calls per timed batch.
pub const MAX_BATCH_CALLS: usize = 1 << 20;

/// Upper bound on samples reserved up front.
const MAX_PREALLOCATED_SAMPLES: usize = 1 << 16;

/// Time `calls` back-to-back calls of the target on `input`.
///
/// Returns the mean seconds per call at size `n`. A target error aborts the
/// measurement and is returned as-is; nothing is retried here.
pub fn measure<I: 'static>(
    timer: &Timer,
    item: &WorkItem<I>,
    input: &I,
    n: usize,
    calls: usize,
) -> Result<Sample, MeasurementError> {
    let elapsed_secs = timer
        .try_measure_batched(calls, || item.call(input))
        .map_err(|source| MeasurementError { n, source })?;
    Ok(Sample::new(n, elapsed_secs))
}

/// Samples of one sweep and the batch size they were timed with.
#[derive(Debug, Clone)]
pub struct Sweep {
    /// Samples in measurement order.
    pub samples: Vec<Sample>,
    /// Target calls per timed batch.
    pub batch_size: usize,
}

/// Collector for gathering timing samples over a size schedule.
#[derive(Debug, Clone)]
pub struct Collector {
    /// The timer used for measurements.
    timer: Timer,
    /// Untimed calls per size before measuring.
    warmup_iterations: usize,
    /// Timed measurements per size.
    measurements_per_size: usize,
    /// Shortest batch the calibration aims for.
    min_batch: Duration,
}

impl Collector {
    /// Create a collector with a pre-calibrated timer.
    ///
    /// Batches default to the item's repeat count; see
    /// [`min_batch`](Self::min_batch).
    pub fn new(timer: Timer, warmup_iterations: usize, measurements_per_size: usize) -> Self {
        Self {
            timer,
            warmup_iterations,
            measurements_per_size,
            min_batch: Duration::ZERO,
        }
    }

    /// Grow batches until one lasts at least `min_batch` at the smallest size.
    pub fn min_batch(mut self, min_batch: Duration) -> Self {
        self.min_batch = min_batch;
        self
    }

    /// Get a reference to the internal timer.
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Collect `measurements_per_size` samples for every size in `sizes`.
    ///
    /// One input is generated per size and shared by all of its
    /// measurements. The batch size is calibrated on the first size.
    pub fn collect<I: 'static>(
        &self,
        item: &WorkItem<I>,
        sizes: &[usize],
        cancel: &CancelSignal,
    ) -> Result<Sweep, ProfileError> {
        let reserved = sizes
            .len()
            .saturating_mul(self.measurements_per_size)
            .min(MAX_PREALLOCATED_SAMPLES);
        let mut samples = Vec::with_capacity(reserved);
        let mut batch_size = None;

        for &n in sizes {
            if cancel.is_cancelled() {
                return Err(ProfileError::Cancelled {
                    samples: samples.len(),
                });
            }
            let input = item.generate(n);

            for _ in 0..self.warmup_iterations {
                item.call(&input)
                    .map_err(|source| MeasurementError { n, source })?;
            }

            let calls = match batch_size {
                Some(calls) => calls,
                None => {
                    let calls = self.calibrate(item, &input, n, cancel)?;
                    debug!(work = item.name(), n, calls, "calibrated batch size");
                    *batch_size.insert(calls)
                }
            };

            for _ in 0..self.measurements_per_size {
                if cancel.is_cancelled() {
                    return Err(ProfileError::Cancelled {
                        samples: samples.len(),
                    });
                }
                samples.push(measure(&self.timer, item, &input, n, calls)?);
            }
        }

        Ok(Sweep {
            samples,
            batch_size: batch_size.unwrap_or_else(|| item.repeats()),
        })
    }

    /// Pick the calls per batch for `input`: at least `item.repeats()`,
    /// doubled until a batch lasts `min_batch`, capped at [`MAX_BATCH_CALLS`].
    pub fn calibrate<I: 'static>(
        &self,
        item: &WorkItem<I>,
        input: &I,
        n: usize,
        cancel: &CancelSignal,
    ) -> Result<usize, ProfileError> {
        let mut calls = item.repeats().max(1);
        if self.min_batch.is_zero() {
            return Ok(calls);
        }

        let min_secs = self.min_batch.as_secs_f64();
        while calls < MAX_BATCH_CALLS {
            if cancel.is_cancelled() {
                return Err(ProfileError::Cancelled { samples: 0 });
            }
            let per_call = self
                .timer
                .try_measure_batched(calls, || item.call(input))
                .map_err(|source| MeasurementError { n, source })?;
            if per_call * calls as f64 >= min_secs {
                break;
            }
            calls = calls.saturating_mul(2).min(MAX_BATCH_CALLS);
        }
        Ok(calls)
    }
}
