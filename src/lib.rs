//! # complexity-oracle
//!
//! Estimate the asymptotic complexity of a function from wall-clock timings.
//!
//! The crate runs a target over inputs of growing size, then fits a closed
//! set of growth models (`O(1)`, `O(log n)`, `O(n)`, `O(n log n)`,
//! `O(n^2)`, `O(n^3)`, `O(2^n)`) by least squares and ranks them by
//! residual:
//! - Best-fitting complexity class, with every other candidate's residual
//! - Aggregated timing per size and the noise floor used while fitting
//! - Bounded retries with per-attempt deadlines and cooperative cancellation
//!
//! ## Pitfall: generation inside the target
//!
//! Only the target is timed. Build inputs in the generator, never in the
//! target, or the generator's cost ends up in the fit.
//!
//! ```ignore
//! // WRONG: allocation is timed
//! WorkItem::new("sum", |n| n, |&n| (0..n as u64).collect::<Vec<_>>().iter().sum::<u64>());
//!
//! // CORRECT: the vector is built once per size, untimed
//! WorkItem::new("sum", |n| (0..n as u64).collect::<Vec<_>>(), |v| v.iter().sum::<u64>());
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use complexity_oracle::{profile, WorkItem};
//!
//! let item = WorkItem::new("sum", |n| (0..n as u64).collect::<Vec<_>>(), |v| v.iter().sum::<u64>());
//! let outcome = profile(&item).await?;
//!
//! println!("{}", outcome.value.best_fit.class); // O(n)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod cancel;
mod config;
mod error;
mod profiler;
mod result;
mod runner;
mod types;

// Functional modules
pub mod analysis;
pub mod generators;
pub mod inputs;
pub mod logging;
pub mod measurement;
pub mod output;
pub mod preflight;
pub mod statistics;

// Re-exports for public API
pub use analysis::{classify, classify_with_floor, Classification, ComplexityClass};
pub use cancel::CancelSignal;
pub use config::{Aggregation, Config, RetryPolicy};
pub use error::{
    BoxError, FailureKind, InputError, MeasurementError, ProfileError, RunError, WorkError,
};
pub use inputs::InputCache;
pub use measurement::Timer;
pub use profiler::ComplexityProfiler;
pub use result::{
    AttemptRecord, AttemptStatus, Attempted, Metadata, ModelFit, ProfileResult, RunOutcome,
};
pub use runner::{AttemptContext, ResilientRunner};
pub use statistics::SizeSummary;
pub use types::{Sample, WorkItem, DEFAULT_REPEAT_COUNT};

/// Profile `item` with the default profiler and retry policy.
///
/// Runs up to 3 attempts of 10 s each over 10 sizes between 100 and
/// 10,000. Must be awaited inside a tokio runtime.
///
/// # Returns
///
/// The ranked fits and the attempt that produced them, or the terminal
/// error after retries are exhausted.
pub async fn profile<I: 'static>(item: &WorkItem<I>) -> RunOutcome {
    ResilientRunner::new()
        .run_profile(&ComplexityProfiler::new(), item)
        .await
}
