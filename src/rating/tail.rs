use statrs::distribution::{ContinuousCDF, Normal};

use super::types::TailProbability;
use crate::errors::{AnalysisError, AnalysisResult};

/// P(X > threshold) for X ~ Normal(mean, std_dev)
pub fn tail_probability(
    mean: f64,
    std_dev: f64,
    threshold: f64,
) -> AnalysisResult<TailProbability> {
    validate_inputs(mean, std_dev, threshold)?;

    let normal = Normal::new(mean, std_dev)
        .map_err(|e| AnalysisError::InvalidParameter(e.to_string()))?;

    Ok(TailProbability {
        threshold,
        probability: normal.sf(threshold),
    })
}

fn validate_inputs(mean: f64, std_dev: f64, threshold: f64) -> AnalysisResult<()> {
    if !mean.is_finite() || !threshold.is_finite() {
        return Err(AnalysisError::InvalidParameter(format!(
            "mean and threshold must be finite, got mean={}, threshold={}",
            mean, threshold
        )));
    }

    if !std_dev.is_finite() || std_dev <= 0.0 {
        return Err(AnalysisError::InvalidParameter(format!(
            "standard deviation must be positive, got {}",
            std_dev
        )));
    }

    Ok(())
}
