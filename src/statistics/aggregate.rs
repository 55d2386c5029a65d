//! Per-size reduction of repeated measurements.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::Aggregation;
use crate::types::Sample;

use super::quantile::median;

/// Aggregated timing of one input size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeSummary {
    /// Nominal input size.
    pub n: usize,
    /// Aggregated seconds per call.
    pub elapsed_secs: f64,
    /// Max minus min of the raw measurements.
    pub spread_secs: f64,
    /// Number of raw measurements reduced into this point.
    pub measurements: usize,
}

/// Reduce a non-empty slice of timings with the given policy.
///
/// # Panics
///
/// Panics if `values` is empty.
pub fn aggregate(values: &[f64], policy: Aggregation) -> f64 {
    assert!(!values.is_empty(), "Cannot aggregate empty slice");
    match policy {
        Aggregation::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
        Aggregation::Median => {
            let mut scratch = values.to_vec();
            median(&mut scratch)
        }
        Aggregation::Mean => values.iter().sum::<f64>() / values.len() as f64,
    }
}

/// Group samples by size (ascending) and reduce each group.
pub fn summarize(samples: &[Sample], policy: Aggregation) -> Vec<SizeSummary> {
    let mut groups: BTreeMap<usize, Vec<f64>> = BTreeMap::new();
    for sample in samples {
        groups.entry(sample.n).or_default().push(sample.elapsed_secs);
    }

    groups
        .into_iter()
        .map(|(n, values)| {
            let (lo, hi) = values
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
            SizeSummary {
                n,
                elapsed_secs: aggregate(&values, policy),
                spread_secs: hi - lo,
                measurements: values.len(),
            }
        })
        .collect()
}

/// Median spread across sizes: the timing variation a single size shows
/// on its own. Zero when every size has one measurement.
pub fn noise_floor(points: &[SizeSummary]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let mut spreads: Vec<f64> = points.iter().map(|p| p.spread_secs).collect();
    median(&mut spreads)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregation_policies() {
        let values = [3.0, 1.0, 2.0, 10.0];
        assert_eq!(aggregate(&values, Aggregation::Min), 1.0);
        assert_eq!(aggregate(&values, Aggregation::Median), 2.5);
        assert_eq!(aggregate(&values, Aggregation::Mean), 4.0);
    }

    #[test]
    fn test_summarize_groups_in_size_order() {
        let samples = [
            Sample::new(200, 4.0),
            Sample::new(100, 2.0),
            Sample::new(200, 6.0),
            Sample::new(100, 1.0),
        ];
        let points = summarize(&samples, Aggregation::Min);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].n, 100);
        assert_eq!(points[0].elapsed_secs, 1.0);
        assert_eq!(points[0].spread_secs, 1.0);
        assert_eq!(points[1].n, 200);
        assert_eq!(points[1].elapsed_secs, 4.0);
        assert_eq!(points[1].measurements, 2);
    }

    #[test]
    fn test_noise_floor_is_median_spread() {
        let samples = [
            Sample::new(1, 1.0),
            Sample::new(1, 1.5),
            Sample::new(2, 2.0),
            Sample::new(2, 2.1),
            Sample::new(3, 3.0),
            Sample::new(3, 9.0),
        ];
        let floor = noise_floor(&summarize(&samples, Aggregation::Min));
        assert!((floor - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_single_measurement_has_no_noise() {
        let samples = [Sample::new(1, 1.0), Sample::new(2, 2.0)];
        assert_eq!(noise_floor(&summarize(&samples, Aggregation::Mean)), 0.0);
    }
}
