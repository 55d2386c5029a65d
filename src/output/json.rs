//! JSON serialization for profiling results.

use crate::result::ProfileResult;

/// Serialize a ProfileResult to a compact JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (a non-finite residual is
/// written as `null`, so this should not happen in practice).
pub fn to_json(result: &ProfileResult) -> Result<String, serde_json::Error> {
    serde_json::to_string(result)
}

/// Serialize a ProfileResult to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_pretty(result: &ProfileResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ComplexityClass;
    use crate::config::Aggregation;
    use crate::result::{Metadata, ModelFit};
    use crate::statistics::SizeSummary;

    fn make_result() -> ProfileResult {
        let best = ModelFit {
            class: ComplexityClass::Linear,
            coefficient: 2e-9,
            intercept: 1e-7,
            sse: 1e-20,
            residual: 1e-6,
            flattened: false,
        };
        ProfileResult {
            name: "sum".to_string(),
            best_fit: best.clone(),
            ranked_fits: vec![best],
            points: vec![SizeSummary {
                n: 100,
                elapsed_secs: 3e-7,
                spread_secs: 1e-8,
                measurements: 5,
            }],
            noise_floor_secs: 1e-8,
            warnings: Vec::new(),
            metadata: Metadata {
                sample_count: 5,
                measurements_per_size: 5,
                repeat_count: 10,
                batch_size: 10,
                aggregation: Aggregation::Median,
                timer_resolution_ns: 20.0,
                runtime_secs: 0.25,
            },
        }
    }

    #[test]
    fn test_to_json() {
        let json = to_json(&make_result()).unwrap();
        assert!(json.contains("\"class\":\"O(n)\""));
        assert!(json.contains("\"aggregation\":\"median\""));
        assert!(json.contains("\"name\":\"sum\""));
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json_pretty(&make_result()).unwrap();
        assert!(json.contains('\n'));
        let back: ProfileResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.best_fit, make_result().best_fit);
    }
}
