use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::rating::SpreadMode;

const DATASET_ENV: &str = "RATINGS_DATASET";
const THRESHOLD_ENV: &str = "RATINGS_THRESHOLD";

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub dataset_path: PathBuf,
    pub rating_column: String,
    pub delimiter: char,
    pub threshold: f64,
    pub spread: SpreadMode,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("SuperMarketData.csv"),
            rating_column: "Rating".to_string(),
            delimiter: ',',
            threshold: 8.5,
            spread: SpreadMode::SampleMean,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FitSettings {
    pub convergence_tolerance: f64,
    pub max_iterations: usize,
}

impl Default for FitSettings {
    fn default() -> Self {
        Self {
            convergence_tolerance: 1e-9,
            max_iterations: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSettings {
    pub enabled: bool,
    pub bins: usize,
    pub bar_width: usize,
}

impl Default for HistogramSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            bins: 20,
            bar_width: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub analysis: AnalysisSettings,
    pub fit: FitSettings,
    pub histogram: HistogramSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            analysis: AnalysisSettings::default(),
            fit: FitSettings::default(),
            histogram: HistogramSettings::default(),
        }
    }

    /// Defaults overridden by `RATINGS_DATASET` and `RATINGS_THRESHOLD`
    pub fn from_env() -> Result<Self> {
        Self::new().with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(DATASET_ENV) {
            self.analysis.dataset_path = PathBuf::from(path);
        }

        if let Some(raw) = lookup(THRESHOLD_ENV) {
            self.analysis.threshold = raw
                .trim()
                .parse()
                .with_context(|| format!("{} is not a number: {}", THRESHOLD_ENV, raw))?;
        }

        Ok(self)
    }
}
