//! Work items and raw timing samples.

use std::fmt;
use std::hint::black_box;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::BoxError;

/// Calls per timed measurement when the caller does not set one.
pub const DEFAULT_REPEAT_COUNT: usize = 10;

type Target<I> = Arc<dyn Fn(&I) -> Result<(), BoxError> + Send + Sync>;
type Generator<I> = Arc<dyn Fn(usize) -> I + Send + Sync>;

/// One timing observation: per-call seconds at input size `n`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Nominal input size.
    pub n: usize,
    /// Mean wall-clock seconds per target call.
    pub elapsed_secs: f64,
}

impl Sample {
    /// Create a new sample.
    pub fn new(n: usize, elapsed_secs: f64) -> Self {
        Self { n, elapsed_secs }
    }
}

/// A named unit to profile: a target, a size generator and a repeat count.
///
/// The target's output is discarded through `black_box`, so only its
/// cost is observed. Cloning is cheap; the callables are shared.
pub struct WorkItem<I> {
    name: String,
    target: Target<I>,
    generator: Generator<I>,
    repeat_count: usize,
}

impl<I: 'static> WorkItem<I> {
    /// Build a work item from an infallible target.
    ///
    /// ```ignore
    /// let item = WorkItem::new("sum", |n| (0..n as u64).collect::<Vec<_>>(), |v| v.iter().sum::<u64>());
    /// ```
    pub fn new<G, F, O>(name: impl Into<String>, generator: G, target: F) -> Self
    where
        G: Fn(usize) -> I + Send + Sync + 'static,
        F: Fn(&I) -> O + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            target: Arc::new(move |input: &I| {
                black_box(target(input));
                Ok(())
            }),
            generator: Arc::new(generator),
            repeat_count: DEFAULT_REPEAT_COUNT,
        }
    }

    /// Build a work item whose target may fail.
    ///
    /// A failure aborts the profiling sweep it happens in.
    pub fn fallible<G, F, O, E>(name: impl Into<String>, generator: G, target: F) -> Self
    where
        G: Fn(usize) -> I + Send + Sync + 'static,
        F: Fn(&I) -> Result<O, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Self {
            name: name.into(),
            target: Arc::new(move |input: &I| {
                black_box(target(input).map_err(Into::into)?);
                Ok(())
            }),
            generator: Arc::new(generator),
            repeat_count: DEFAULT_REPEAT_COUNT,
        }
    }

    /// Set the number of target calls per timed measurement.
    pub fn repeat_count(mut self, repeat_count: usize) -> Self {
        self.repeat_count = repeat_count;
        self
    }

    /// Name used in logs and reports.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Target calls per timed measurement.
    pub fn repeats(&self) -> usize {
        self.repeat_count
    }

    /// Generate an input of nominal size `n`.
    pub fn generate(&self, n: usize) -> I {
        (self.generator)(n)
    }

    /// Invoke the target once.
    #[inline]
    pub fn call(&self, input: &I) -> Result<(), BoxError> {
        (self.target)(input)
    }
}

impl<I> Clone for WorkItem<I> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            target: Arc::clone(&self.target),
            generator: Arc::clone(&self.generator),
            repeat_count: self.repeat_count,
        }
    }
}

impl<I> fmt::Debug for WorkItem<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkItem")
            .field("name", &self.name)
            .field("repeat_count", &self.repeat_count)
            .finish_non_exhaustive()
    }
}
