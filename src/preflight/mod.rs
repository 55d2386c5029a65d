//! Checks on the collected samples before their fits are trusted.
//!
//! Warnings never fail a profile; they are attached to the result and logged.

mod resolution;

pub use resolution::{resolution_check, ResolutionWarning, MIN_TICKS_PER_BATCH};
