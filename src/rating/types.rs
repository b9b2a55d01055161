use serde::{Deserialize, Serialize};

use crate::errors::{AnalysisError, AnalysisResult};

/// Maximum likelihood Beta shape parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetaFit {
    pub alpha: f64,
    pub beta: f64,
    pub iterations: usize,
    /// Mean log-likelihood per observation at the optimum
    pub log_likelihood: f64,
}

impl BetaFit {
    pub fn new(
        alpha: f64,
        beta: f64,
        iterations: usize,
        log_likelihood: f64,
    ) -> AnalysisResult<Self> {
        if !is_valid_shape(alpha) || !is_valid_shape(beta) {
            return Err(AnalysisError::FitConvergence(format!(
                "shape parameters must be positive and finite, got alpha={}, beta={}",
                alpha, beta
            )));
        }

        Ok(Self {
            alpha,
            beta,
            iterations,
            log_likelihood,
        })
    }
}

fn is_valid_shape(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// First two moments, either on [0, 1] or on the rating scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MomentEstimate {
    pub mean: f64,
    pub variance: f64,
}

impl MomentEstimate {
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }

    /// Standard deviation of the mean of `n` draws
    pub fn standard_error(&self, n: usize) -> f64 {
        self.std_dev() / (n as f64).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TailProbability {
    pub threshold: f64,
    pub probability: f64,
}

/// Which spread the Normal approximation uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SpreadMode {
    /// Standard error of the mean rating
    #[default]
    SampleMean,
    /// Standard deviation of a single rating under the fitted Beta
    Distribution,
}

impl SpreadMode {
    pub fn spread_of(&self, moments: &MomentEstimate, sample_size: usize) -> f64 {
        match self {
            SpreadMode::SampleMean => moments.standard_error(sample_size),
            SpreadMode::Distribution => moments.std_dev(),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SpreadMode::SampleMean => "sample-mean",
            SpreadMode::Distribution => "distribution",
        }
    }
}
