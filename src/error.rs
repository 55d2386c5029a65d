//! Error types for profiling and retry orchestration.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error returned by profiled targets and async work.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The target function failed while being timed.
#[derive(Debug, Error)]
#[error("target failed at n={n}: {source}")]
pub struct MeasurementError {
    /// Input size that was being measured.
    pub n: usize,
    /// Error raised by the target.
    #[source]
    pub source: BoxError,
}

/// Errors from a single profiling sweep.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The target raised during a measurement. The sweep is abandoned.
    #[error(transparent)]
    Measurement(#[from] MeasurementError),

    /// Fewer than two distinct sizes were sampled, so no curve can be fitted.
    #[error("insufficient data: {distinct_sizes} distinct size(s) sampled, at least 2 required")]
    InsufficientData {
        /// Number of distinct sizes present in the samples.
        distinct_sizes: usize,
    },

    /// The profiler or work item is misconfigured.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The sweep observed its cancel signal and stopped.
    #[error("profiling cancelled after {samples} sample(s)")]
    Cancelled {
        /// Samples recorded before the signal was observed.
        samples: usize,
    },
}

impl ProfileError {
    /// Whether retrying the sweep cannot change the outcome.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InsufficientData { .. } | Self::InvalidConfig(_))
    }
}

/// Failure of one attempt, classified for the retry loop.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct WorkError {
    fatal: bool,
    #[source]
    source: BoxError,
}

impl WorkError {
    /// A failure worth another attempt.
    pub fn retryable(source: impl Into<BoxError>) -> Self {
        Self {
            fatal: false,
            source: source.into(),
        }
    }

    /// A failure that ends the run immediately.
    pub fn fatal(source: impl Into<BoxError>) -> Self {
        Self {
            fatal: true,
            source: source.into(),
        }
    }

    /// Whether the runner must stop retrying.
    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    /// Consume into the underlying error.
    pub fn into_source(self) -> BoxError {
        self.source
    }
}

impl From<ProfileError> for WorkError {
    fn from(err: ProfileError) -> Self {
        let fatal = err.is_fatal();
        Self {
            fatal,
            source: Box::new(err),
        }
    }
}

impl From<BoxError> for WorkError {
    fn from(source: BoxError) -> Self {
        Self {
            fatal: false,
            source,
        }
    }
}

impl From<tokio::task::JoinError> for WorkError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::retryable(err)
    }
}

/// Coarse failure kind reported by terminal run errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Attempts kept hitting their deadline.
    Timeout,
    /// Attempts kept failing.
    Error,
}

/// Terminal error of the resilient runner. No retry follows.
#[derive(Debug, Error)]
pub enum RunError {
    /// Every attempt timed out.
    #[error("work `{name}` timed out on all {attempts} attempt(s)")]
    ExhaustedTimeout {
        /// Work item name.
        name: String,
        /// Attempts made.
        attempts: usize,
    },

    /// The final attempt failed after all retries were used.
    #[error("work `{name}` failed after {attempts} attempt(s): {source}")]
    Exhausted {
        /// Work item name.
        name: String,
        /// Attempts made.
        attempts: usize,
        /// Error of the final attempt.
        #[source]
        source: BoxError,
    },

    /// An attempt failed in a way retrying cannot fix.
    #[error("work `{name}` failed fatally on attempt {attempt}: {source}")]
    Fatal {
        /// Work item name.
        name: String,
        /// Attempt that raised the error (1-based).
        attempt: usize,
        /// The fatal error.
        #[source]
        source: BoxError,
    },
}

impl RunError {
    /// Name of the work item that failed.
    pub fn name(&self) -> &str {
        match self {
            Self::ExhaustedTimeout { name, .. }
            | Self::Exhausted { name, .. }
            | Self::Fatal { name, .. } => name,
        }
    }

    /// Number of attempts made before giving up.
    pub fn attempts(&self) -> usize {
        match self {
            Self::ExhaustedTimeout { attempts, .. } | Self::Exhausted { attempts, .. } => *attempts,
            Self::Fatal { attempt, .. } => *attempt,
        }
    }

    /// Timeout vs. generic failure.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::ExhaustedTimeout { .. } => FailureKind::Timeout,
            Self::Exhausted { .. } | Self::Fatal { .. } => FailureKind::Error,
        }
    }
}

/// Errors from the puzzle input cache.
#[derive(Debug, Error)]
pub enum InputError {
    /// The input file never appeared within the allowed attempts.
    #[error("input file not found after {attempts} attempt(s): {}", path.display())]
    NotFound {
        /// Path that was probed.
        path: PathBuf,
        /// Attempts made.
        attempts: usize,
    },

    /// Reading the file failed for another reason.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}
