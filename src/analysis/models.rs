//! The closed set of candidate growth models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Asymptotic growth hypothesis `t(n) = a * basis(n) + b`.
///
/// Declaration order is the tie-break priority: simpler models first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComplexityClass {
    /// `O(1)`
    #[serde(rename = "O(1)")]
    Constant,
    /// `O(log n)`
    #[serde(rename = "O(log n)")]
    Logarithmic,
    /// `O(n)`
    #[serde(rename = "O(n)")]
    Linear,
    /// `O(n log n)`
    #[serde(rename = "O(n log n)")]
    Linearithmic,
    /// `O(n^2)`
    #[serde(rename = "O(n^2)")]
    Quadratic,
    /// `O(n^3)`
    #[serde(rename = "O(n^3)")]
    Cubic,
    /// `O(2^n)`
    #[serde(rename = "O(2^n)")]
    Exponential,
}

impl ComplexityClass {
    /// Every candidate, in priority order.
    pub const ALL: [Self; 7] = [
        Self::Constant,
        Self::Logarithmic,
        Self::Linear,
        Self::Linearithmic,
        Self::Quadratic,
        Self::Cubic,
        Self::Exponential,
    ];

    /// Display name, e.g. `O(n log n)`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Constant => "O(1)",
            Self::Logarithmic => "O(log n)",
            Self::Linear => "O(n)",
            Self::Linearithmic => "O(n log n)",
            Self::Quadratic => "O(n^2)",
            Self::Cubic => "O(n^3)",
            Self::Exponential => "O(2^n)",
        }
    }

    /// Tie-break rank; lower wins.
    pub fn priority(self) -> usize {
        self as usize
    }

    /// Basis function evaluated at `n`.
    ///
    /// Logarithms use `ln(max(n, 1))` so that `n = 0` stays finite.
    /// The exponential basis is `2^(n - n_max)`: it differs from `2^n` only
    /// by a constant factor, which the fitted coefficient absorbs, and it
    /// stays finite for any `n <= n_max`.
    pub fn basis(self, n: f64, n_max: f64) -> f64 {
        match self {
            Self::Constant => 1.0,
            Self::Logarithmic => n.max(1.0).ln(),
            Self::Linear => n,
            Self::Linearithmic => n * n.max(1.0).ln(),
            Self::Quadratic => n * n,
            Self::Cubic => n * n * n,
            Self::Exponential => (n - n_max).exp2(),
        }
    }
}

impl fmt::Display for ComplexityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_follows_declaration_order() {
        for pair in ComplexityClass::ALL.windows(2) {
            assert!(pair[0].priority() < pair[1].priority());
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn basis_values() {
        assert_eq!(ComplexityClass::Constant.basis(50.0, 100.0), 1.0);
        assert_eq!(ComplexityClass::Logarithmic.basis(0.0, 100.0), 0.0);
        assert_eq!(ComplexityClass::Quadratic.basis(3.0, 100.0), 9.0);
        assert_eq!(ComplexityClass::Exponential.basis(100.0, 100.0), 1.0);
        assert_eq!(ComplexityClass::Exponential.basis(98.0, 100.0), 0.25);
        assert_eq!(ComplexityClass::Exponential.basis(100.0, 10_000.0), 0.0);
    }

    #[test]
    fn serializes_as_display_name() {
        let json = serde_json::to_string(&ComplexityClass::Linearithmic).unwrap();
        assert_eq!(json, "\"O(n log n)\"");
        assert_eq!(ComplexityClass::Cubic.to_string(), "O(n^3)");
    }
}
