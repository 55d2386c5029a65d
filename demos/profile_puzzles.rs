//! Profile two puzzle-style routines and print their complexity reports.
//!
//! Run with `cargo run --example profile_puzzles`. Set `RUST_LOG=debug` for
//! per-attempt logs and `CO_*` variables to adjust the sweep.

use complexity_oracle::generators::{self, LineGenerator};
use complexity_oracle::{logging, output, ComplexityProfiler, ResilientRunner, WorkItem};

fn binary_search(data: &[u64], target: u64) -> Option<usize> {
    let (mut lo, mut hi) = (0usize, data.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match data[mid].cmp(&target) {
            std::cmp::Ordering::Equal => return Some(mid),
            std::cmp::Ordering::Less => lo = mid + 1,
            std::cmp::Ordering::Greater => hi = mid,
        }
    }
    None
}

/// Order-preserving dedup by linear membership scans.
fn dedup_words(text: &str) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for word in text.lines() {
        if !seen.contains(&word) {
            seen.push(word);
        }
    }
    seen
}

#[tokio::main]
async fn main() {
    logging::init_tracing();

    let search = WorkItem::new("binary search", generators::sorted, |data: &Vec<u64>| {
        binary_search(data, data.len() as u64 / 2)
    })
    .repeat_count(1_000);

    let dedup = WorkItem::new("dedup words", LineGenerator::words(2025).into_fn(), |text: &String| {
        dedup_words(text).len()
    })
    .repeat_count(2);

    let runner = ResilientRunner::new().from_env();

    let search_profile = ComplexityProfiler::new()
        .min_size(1_000)
        .max_size(1_000_000)
        .from_env();
    let outcome = runner.run_profile(&search_profile, &search).await;
    println!("{}", output::format_outcome(&outcome));

    let dedup_profile = ComplexityProfiler::new()
        .min_size(200)
        .max_size(4_000)
        .from_env();
    let outcome = runner.run_profile(&dedup_profile, &dedup).await;
    println!("{}", output::format_outcome(&outcome));
}
