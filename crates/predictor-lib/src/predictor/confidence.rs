//! Heuristic confidence estimation
//!
//! Intervals come from the spread of ensemble members; the overall score
//! is a fixed-base heuristic penalized at feature extremes. Neither is a
//! calibrated statistical guarantee.

use crate::models::{ConfidenceInterval, FeatureVector};

/// z-factor for a 95% interval
pub const Z_95: f64 = 1.96;

/// Number of final boosting stages whose spread feeds the cost interval
pub const STAGED_WINDOW: usize = 10;

const BASE_CONFIDENCE: f64 = 85.0;
const EXTREME_PENALTY: f64 = 5.0;
const MIN_CONFIDENCE: f64 = 60.0;
const MAX_CONFIDENCE: f64 = 95.0;

/// Interval around the mean of per-estimator predictions (random forest)
pub fn ensemble_interval(member_predictions: &[f64]) -> ConfidenceInterval {
    let (mean, std) = mean_and_std(member_predictions);
    interval_around(mean, std)
}

/// Interval from the spread of the last [`STAGED_WINDOW`] boosting stages,
/// centered on the final staged prediction
pub fn staged_interval(staged_predictions: &[f64]) -> ConfidenceInterval {
    let center = staged_predictions.last().copied().unwrap_or(0.0);
    let window_start = staged_predictions.len().saturating_sub(STAGED_WINDOW);
    let (_, std) = mean_and_std(&staged_predictions[window_start..]);
    interval_around(center, std)
}

/// Overall confidence score in [60, 95].
///
/// Starts at 85 and loses 5 points for every engineered feature sitting
/// near the edge of the unit interval, where training coverage is thin.
pub fn overall_confidence(features: &FeatureVector) -> f64 {
    let mut confidence = BASE_CONFIDENCE;
    for value in features.as_array() {
        if value < 0.1 || value > 0.9 {
            confidence -= EXTREME_PENALTY;
        }
    }
    confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

fn interval_around(center: f64, std: f64) -> ConfidenceInterval {
    ConfidenceInterval {
        lower: (center - Z_95 * std).max(0.0),
        upper: center + Z_95 * std,
    }
}

fn mean_and_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}
