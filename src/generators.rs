//! Input generators for profiling targets.
//!
//! A generator maps a nominal size `n` to an input whose size is exactly
//! `n` (elements, lines, ...). Input generation is never timed, so
//! generators are free to allocate.
//!
//! # Example
//!
//! ```ignore
//! use complexity_oracle::generators::LineGenerator;
//! use complexity_oracle::WorkItem;
//!
//! let lines = LineGenerator::mixed(7);
//! let item = WorkItem::new("count words", lines.into_fn(), |text: &String| {
//!     text.lines().filter(|l| l.chars().all(char::is_alphabetic)).count()
//! });
//! ```

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

const LETTERS: &[u8] = b"abcdefghijk";

/// The size itself. For targets parameterized by a plain count.
pub fn identity(n: usize) -> usize {
    n
}

/// `0..n` as a sorted vector.
pub fn sorted(n: usize) -> Vec<u64> {
    (0..n as u64).collect()
}

/// Shape of each generated line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Integers in `1..=1000`.
    Numbers,
    /// Five-letter words over `a..=k`.
    Words,
    /// A mix of numbers, words and `"<count> <tag>"` pairs.
    Mixed,
}

/// Seeded generator of newline-separated text.
///
/// The same seed and size always yield the same text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineGenerator {
    kind: LineKind,
    seed: u64,
}

impl LineGenerator {
    /// Lines holding one integer in `1..=1000`.
    pub fn numbers(seed: u64) -> Self {
        Self {
            kind: LineKind::Numbers,
            seed,
        }
    }

    /// Lines holding one five-letter word.
    pub fn words(seed: u64) -> Self {
        Self {
            kind: LineKind::Words,
            seed,
        }
    }

    /// Lines that are a number, a word, or `"<1..=100> <3 letters>"`,
    /// chosen uniformly.
    pub fn mixed(seed: u64) -> Self {
        Self {
            kind: LineKind::Mixed,
            seed,
        }
    }

    /// Line shape.
    pub fn kind(&self) -> LineKind {
        self.kind
    }

    /// Generate exactly `n` lines.
    pub fn generate(&self, n: usize) -> String {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.seed);
        let mut lines = Vec::with_capacity(n);
        for _ in 0..n {
            let line = match self.kind {
                LineKind::Numbers => number(&mut rng),
                LineKind::Words => word(&mut rng, 5),
                LineKind::Mixed => match rng.random_range(0..3u8) {
                    0 => number(&mut rng),
                    1 => word(&mut rng, 5),
                    _ => format!("{} {}", rng.random_range(1..=100u32), word(&mut rng, 3)),
                },
            };
            lines.push(line);
        }
        lines.join("\n")
    }

    /// Convert into a closure usable as a `WorkItem` generator.
    pub fn into_fn(self) -> impl Fn(usize) -> String + Send + Sync + 'static {
        move |n| self.generate(n)
    }
}

fn number(rng: &mut Xoshiro256PlusPlus) -> String {
    rng.random_range(1..=1000u32).to_string()
}

fn word(rng: &mut Xoshiro256PlusPlus, len: usize) -> String {
    (0..len)
        .map(|_| LETTERS[rng.random_range(0..LETTERS.len())] as char)
        .collect()
}
