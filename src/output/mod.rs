//! Rendering of profiling results for terminals and machines.

mod json;
mod terminal;

pub use json::{to_json, to_json_pretty};
pub use terminal::{format_outcome, format_result};
