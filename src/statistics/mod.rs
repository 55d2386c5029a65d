//! Statistical methods for complexity fitting.
//!
//! - Median by O(n) selection
//! - Per-size aggregation of repeated measurements and the noise floor
//! - Single-regressor least squares via nalgebra

mod aggregate;
mod quantile;
mod regression;

pub use aggregate::{aggregate, noise_floor, summarize, SizeSummary};
pub use quantile::median;
pub use regression::{least_squares, mean, sse_about, LinearFit};
