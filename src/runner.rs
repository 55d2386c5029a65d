//! Bounded retry with per-attempt deadlines and cooperative cancellation.
//!
//! Each attempt runs as its own task with a fresh [`CancelSignal`]. When the
//! deadline passes the runner fires the signal and waits up to
//! `cancel_grace` for the task to wind down; past that it aborts the task
//! and still awaits its handle. Attempt `k + 1` is only spawned once attempt
//! `k` has fully terminated, so two attempts never overlap.
//!
//! Blocking sweeps started with [`ResilientRunner::run_profile`] run on the
//! blocking pool, where `abort` has no effect. The sweep polls the signal
//! between measurements, so a cancelled attempt finishes the target call it
//! is in, stops, and only then does the next attempt start. Its result is
//! discarded. A target call that never returns blocks the run.

use std::future::Future;
use std::time::Instant;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::cancel::CancelSignal;
use crate::config::RetryPolicy;
use crate::error::{RunError, WorkError};
use crate::profiler::ComplexityProfiler;
use crate::result::{AttemptRecord, AttemptStatus, Attempted, ProfileResult, RunOutcome};
use crate::types::WorkItem;

/// What an attempt gets to see about itself.
#[derive(Debug, Clone)]
pub struct AttemptContext {
    /// Attempt index, 1-based.
    pub attempt: usize,
    /// Total attempts allowed.
    pub attempts: usize,
    /// Fires when this attempt's deadline passes.
    pub cancel: CancelSignal,
}

/// Runs fallible async work under a [`RetryPolicy`].
#[derive(Debug, Clone, Default)]
pub struct ResilientRunner {
    policy: RetryPolicy,
}

impl ResilientRunner {
    /// Create with the default policy (3 attempts, 10 s each).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from an explicit policy.
    pub fn with_policy(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Merge overrides from `CO_*` environment variables.
    pub fn from_env(mut self) -> Self {
        self.policy = self.policy.from_env();
        self
    }

    /// Set the maximum number of attempts (at least 1).
    pub fn attempts(mut self, attempts: usize) -> Self {
        self.policy.attempts = attempts.max(1);
        self
    }

    /// Set the per-attempt deadline.
    pub fn attempt_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.policy.attempt_timeout = timeout;
        self
    }

    /// Set how long a cancelled attempt may take to stop before it is aborted.
    pub fn cancel_grace(mut self, grace: std::time::Duration) -> Self {
        self.policy.cancel_grace = grace;
        self
    }

    /// Get the current policy.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `work` until it succeeds, fails fatally or runs out of attempts.
    ///
    /// `work` is called once per attempt and its future is spawned onto the
    /// current tokio runtime. Must be called from within a runtime.
    ///
    /// The terminal error follows the last attempt: `ExhaustedTimeout` if it
    /// timed out, `Exhausted` if it failed. A fatal [`WorkError`] ends the
    /// run at once with `Fatal`.
    pub async fn run<T, E, F, Fut>(&self, name: &str, mut work: F) -> RunOutcome<T>
    where
        F: FnMut(AttemptContext) -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Into<WorkError> + Send + 'static,
    {
        self.run_attempts(name, move |ctx| tokio::spawn(work(ctx))).await
    }

    /// The retry loop. `spawn` starts one attempt and hands back its task;
    /// the loop owns that handle until the task has finished.
    async fn run_attempts<T, E, S>(&self, name: &str, mut spawn: S) -> RunOutcome<T>
    where
        S: FnMut(AttemptContext) -> JoinHandle<Result<T, E>>,
        E: Into<WorkError>,
    {
        let attempts = self.policy.attempts.max(1);
        let mut history = Vec::with_capacity(attempts);
        // None after a timeout, Some after an error.
        let mut last_failure: Option<WorkError> = None;

        for attempt in 1..=attempts {
            let cancel = CancelSignal::new();
            let started = Instant::now();
            let mut handle = spawn(AttemptContext {
                attempt,
                attempts,
                cancel: cancel.clone(),
            });

            match tokio::time::timeout(self.policy.attempt_timeout, &mut handle).await {
                Ok(joined) => {
                    let elapsed_ms = elapsed_ms(started);
                    let result = joined
                        .map_err(WorkError::from)
                        .and_then(|r| r.map_err(Into::into));

                    match result {
                        Ok(value) => {
                            info!(work = name, attempt, attempts, elapsed_ms, "attempt succeeded");
                            history.push(AttemptRecord {
                                attempt,
                                status: AttemptStatus::Succeeded,
                                elapsed_ms,
                            });
                            return Ok(Attempted {
                                value,
                                attempt,
                                history,
                            });
                        }
                        Err(err) if err.is_fatal() => {
                            error!(
                                work = name,
                                attempt,
                                attempts,
                                elapsed_ms,
                                error = %err,
                                "attempt failed fatally, not retrying"
                            );
                            return Err(RunError::Fatal {
                                name: name.to_string(),
                                attempt,
                                source: err.into_source(),
                            });
                        }
                        Err(err) => {
                            warn!(work = name, attempt, attempts, elapsed_ms, error = %err, "attempt failed");
                            history.push(AttemptRecord {
                                attempt,
                                status: AttemptStatus::Failed {
                                    error: err.to_string(),
                                },
                                elapsed_ms,
                            });
                            last_failure = Some(err);
                        }
                    }
                }
                Err(_) => {
                    cancel.cancel();
                    let acknowledged =
                        match tokio::time::timeout(self.policy.cancel_grace, &mut handle).await {
                            Ok(_) => true,
                            Err(_) => {
                                // No-op for a running blocking task; either
                                // way the handle resolves once it has stopped.
                                handle.abort();
                                let _ = (&mut handle).await;
                                false
                            }
                        };
                    let elapsed_ms = elapsed_ms(started);
                    warn!(
                        work = name,
                        attempt,
                        attempts,
                        elapsed_ms,
                        acknowledged,
                        timeout_ms = self.policy.attempt_timeout.as_millis() as u64,
                        "attempt timed out"
                    );
                    history.push(AttemptRecord {
                        attempt,
                        status: AttemptStatus::TimedOut { acknowledged },
                        elapsed_ms,
                    });
                    last_failure = None;
                }
            }
        }

        let err = match last_failure {
            Some(err) => RunError::Exhausted {
                name: name.to_string(),
                attempts,
                source: err.into_source(),
            },
            None => RunError::ExhaustedTimeout {
                name: name.to_string(),
                attempts,
            },
        };
        error!(work = name, attempts, kind = ?err.kind(), "giving up: {err}");
        Err(err)
    }

    /// Profile `item` with `profiler`, one blocking sweep per attempt.
    ///
    /// A timed-out sweep is always awaited to completion before the next
    /// attempt starts, so no two sweeps ever call the target concurrently.
    ///
    /// On success the best fit and the residual of every other candidate
    /// are logged.
    pub async fn run_profile<I: 'static>(
        &self,
        profiler: &ComplexityProfiler,
        item: &WorkItem<I>,
    ) -> RunOutcome {
        let profiler = profiler.clone();
        let sweep_item = item.clone();

        let outcome = self
            .run_attempts(item.name(), move |ctx| {
                let profiler = profiler.clone();
                let item = sweep_item.clone();
                tokio::task::spawn_blocking(move || profiler.profile_cancellable(&item, &ctx.cancel))
            })
            .await;

        if let Ok(attempted) = &outcome {
            log_result(&attempted.value);
        }
        outcome
    }

    /// Profile several items in sequence. A failing item is logged and
    /// skipped; the batch always returns one outcome per item.
    pub async fn run_batch<I: 'static>(
        &self,
        profiler: &ComplexityProfiler,
        items: &[WorkItem<I>],
    ) -> Vec<RunOutcome> {
        let mut outcomes = Vec::with_capacity(items.len());
        for item in items {
            outcomes.push(self.run_profile(profiler, item).await);
        }

        let failed = outcomes.iter().filter(|o| o.is_err()).count();
        info!(items = items.len(), failed, "batch finished");
        outcomes
    }
}

fn log_result(result: &ProfileResult) {
    info!(
        work = %result.name,
        class = %result.best_fit.class,
        residual = result.best_fit.residual,
        runtime_secs = result.metadata.runtime_secs,
        "best fit"
    );
    for fit in result.other_fits() {
        info!(
            work = %result.name,
            class = %fit.class,
            residual = fit.residual,
            flattened = fit.flattened,
            "candidate"
        );
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1e3
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use crate::error::{BoxError, FailureKind, ProfileError};

    fn runner() -> ResilientRunner {
        ResilientRunner::new()
            .attempt_timeout(Duration::from_millis(200))
            .cancel_grace(Duration::from_millis(200))
    }

    #[tokio::test]
    async fn test_first_success_is_returned() {
        let outcome = runner()
            .run("ok", |ctx| async move { Ok::<_, BoxError>(ctx.attempt * 10) })
            .await
            .unwrap();
        assert_eq!(outcome.value, 10);
        assert_eq!(outcome.attempt, 1);
        assert_eq!(outcome.history.len(), 1);
    }

    #[tokio::test]
    async fn test_history_records_failures() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let outcome = runner()
            .run("flaky", move |_| {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(BoxError::from("first call fails"))
                    } else {
                        Ok(n)
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(outcome.attempt, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(matches!(outcome.history[0].status, AttemptStatus::Failed { .. }));
        assert_eq!(outcome.history[1].status, AttemptStatus::Succeeded);
    }

    #[tokio::test]
    async fn test_fatal_error_stops_immediately() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let err = runner()
            .run("fatal", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(ProfileError::InvalidConfig("bad".into())) }
            })
            .await
            .unwrap_err();

        assert!(matches!(err, RunError::Fatal { attempt: 1, .. }));
        assert_eq!(err.kind(), FailureKind::Error);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_panic_is_retryable() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let outcome = runner()
            .attempts(2)
            .run("panics once", move |_| {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        panic!("boom");
                    }
                    Ok::<_, BoxError>(())
                }
            })
            .await
            .unwrap();
        assert_eq!(outcome.attempt, 2);
    }

    #[tokio::test]
    async fn test_unacknowledged_timeout_is_aborted() {
        let err = runner()
            .attempts(1)
            .attempt_timeout(Duration::from_millis(20))
            .cancel_grace(Duration::from_millis(20))
            .run("stubborn", |_| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok::<_, BoxError>(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RunError::ExhaustedTimeout { attempts: 1, .. }));
    }
}
