//! Median by selection.
//!
//! `select_nth_unstable_by` partitions in O(n); no full sort is needed for
//! the handful of measurements a size has.

/// Median of `data`, averaging the two middle values for even lengths.
///
/// The slice is partially reordered as a side effect.
///
/// # Panics
///
/// Panics if `data` is empty.
pub fn median(data: &mut [f64]) -> f64 {
    assert!(!data.is_empty(), "median of an empty slice");

    let len = data.len();
    let (lower, &mut upper, _) = data.select_nth_unstable_by(len / 2, |a, b| a.total_cmp(b));
    if len % 2 == 1 {
        return upper;
    }
    // Largest element left of the pivot is the other middle value
    let below = lower.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (below + upper) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_length_takes_middle() {
        let mut data = vec![5.0, 1.0, 4.0, 2.0, 3.0];
        assert_eq!(median(&mut data), 3.0);
    }

    #[test]
    fn even_length_averages_middle_pair() {
        let mut data = vec![4.0, 1.0, 3.0, 2.0];
        assert_eq!(median(&mut data), 2.5);
    }

    #[test]
    fn single_value() {
        assert_eq!(median(&mut [7.5]), 7.5);
    }

    #[test]
    #[should_panic(expected = "median of an empty slice")]
    fn empty_slice_panics() {
        median(&mut []);
    }
}
