//! Monotonic wall-clock timing.
//!
//! All measurements use `std::time::Instant`, which is monotonic on every
//! supported platform. Targets are timed in batches so that per-call cost
//! stays above the clock's resolution.

use std::hint::black_box;
use std::time::{Duration, Instant};

/// Empirically measure clock resolution by finding the minimum non-zero
/// difference between consecutive reads.
fn measure_resolution() -> Duration {
    let mut min_diff = Duration::MAX;

    for _ in 0..1000 {
        let t1 = Instant::now();
        let mut t2 = Instant::now();
        while t2 == t1 {
            t2 = Instant::now();
        }
        let diff = t2 - t1;
        if diff < min_diff {
            min_diff = diff;
        }
    }

    if min_diff == Duration::MAX {
        Duration::from_nanos(1)
    } else {
        min_diff
    }
}

/// High-level timer for measuring function execution.
#[derive(Debug, Clone)]
pub struct Timer {
    resolution: Duration,
}

impl Timer {
    /// Create a new timer, measuring the clock's resolution.
    pub fn new() -> Self {
        Self {
            resolution: measure_resolution(),
        }
    }

    /// Create a timer with a known resolution. Skips calibration.
    pub fn with_resolution(resolution: Duration) -> Self {
        Self { resolution }
    }

    /// Smallest observable tick of the underlying clock.
    pub fn resolution(&self) -> Duration {
        self.resolution
    }

    /// Run `f` `iterations` times back-to-back and return the mean seconds
    /// per call.
    ///
    /// Stops at the first error; the partial batch is not reported.
    #[inline]
    pub fn try_measure_batched<F, T, E>(&self, iterations: usize, mut f: F) -> Result<f64, E>
    where
        F: FnMut() -> Result<T, E>,
    {
        let iterations = iterations.max(1);
        let start = Instant::now();
        for _ in 0..iterations {
            black_box(f()?);
        }
        let total = start.elapsed();
        Ok(total.as_secs_f64() / iterations as f64)
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
