//! Environment overrides. Kept in its own test binary since it mutates the
//! process environment.

use std::env;
use std::time::Duration;

use complexity_oracle::{Aggregation, Config, RetryPolicy};

#[test]
fn env_overrides_defaults() {
    env::set_var("CO_MIN_SIZE", "50");
    env::set_var("CO_MAX_SIZE", "500");
    env::set_var("CO_MEASUREMENTS", "7");
    env::set_var("CO_AGGREGATION", "median");
    env::set_var("CO_WARMUP", "not a number");
    env::set_var("CO_RETRY_ATTEMPTS", "5");
    env::set_var("CO_ATTEMPT_TIMEOUT_MS", "250");
    env::set_var("CO_MIN_BATCH_US", "0");

    let config = Config::default().from_env();
    assert_eq!(config.min_size, 50);
    assert_eq!(config.max_size, 500);
    assert_eq!(config.measurements_per_size, 7);
    assert_eq!(config.aggregation, Aggregation::Median);
    assert_eq!(config.warmup, Config::default().warmup);
    assert_eq!(config.min_batch_time, Duration::ZERO);

    let policy = RetryPolicy::default().from_env();
    assert_eq!(policy.attempts, 5);
    assert_eq!(policy.attempt_timeout, Duration::from_millis(250));
    assert_eq!(policy.cancel_grace, RetryPolicy::default().cancel_grace);
}
