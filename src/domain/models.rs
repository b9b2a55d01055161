use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::errors::{AnalysisError, AnalysisResult};

/// Observed rating interval of a sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingBounds {
    pub min: f64,
    pub max: f64,
}

impl RatingBounds {
    /// Bounds of a non-empty slice, `None` when there is nothing to bound
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(Self { min, max })
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    pub fn is_degenerate(&self) -> bool {
        self.range() == 0.0
    }
}

/// Ordered ratings as read from the dataset.
///
/// Never empty and only holds finite values.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingSample {
    values: Array1<f64>,
    bounds: RatingBounds,
}

impl RatingSample {
    pub fn new(values: Vec<f64>) -> AnalysisResult<Self> {
        if let Some((idx, value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(AnalysisError::DataLoad(format!(
                "rating #{} is not a finite number: {}",
                idx + 1,
                value
            )));
        }

        let bounds = RatingBounds::from_values(&values)
            .ok_or_else(|| AnalysisError::InvalidParameter("rating sample is empty".to_string()))?;

        Ok(Self {
            values: Array1::from_vec(values),
            bounds,
        })
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn as_slice(&self) -> &[f64] {
        // Built from a Vec, so always contiguous
        self.values.as_slice().unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn bounds(&self) -> RatingBounds {
        self.bounds
    }

    /// Arithmetic mean of the raw ratings
    pub fn mean(&self) -> f64 {
        self.values.mean().unwrap_or(f64::NAN)
    }
}

/// Ratings mapped onto [0, 1] with the bounds they were mapped from
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSample {
    values: Array1<f64>,
    bounds: RatingBounds,
}

impl NormalizedSample {
    pub(crate) fn new(values: Array1<f64>, bounds: RatingBounds) -> Self {
        Self { values, bounds }
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn bounds(&self) -> RatingBounds {
        self.bounds
    }
}
