//! Measurement infrastructure for complexity profiling.
//!
//! This module provides:
//! - Monotonic wall-clock timing with batched calls per measurement
//! - The single-measurement primitive ([`measure`])
//! - Sequential sample collection across a size sweep

mod collector;
mod timer;

pub use collector::{measure, Collector, Sweep, MAX_BATCH_CALLS};
pub use timer::Timer;
