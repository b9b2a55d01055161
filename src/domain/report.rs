use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use super::models::RatingBounds;
use crate::rating::{BetaFit, MomentEstimate, SpreadMode, TailProbability};

/// Everything a single analysis run reports
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub row_count: usize,
    pub bounds: RatingBounds,
    pub fit: BetaFit,
    pub normalized: MomentEstimate,
    pub rescaled: MomentEstimate,
    pub spread_mode: SpreadMode,
    /// Standard deviation handed to the Normal approximation
    pub spread: f64,
    pub tail: TailProbability,
    pub calculated_at: DateTime<Utc>,
}

impl AnalysisReport {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize analysis report")
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ratings:              {}", self.row_count)?;
        writeln!(
            f,
            "Observed range:       [{}, {}]",
            self.bounds.min, self.bounds.max
        )?;
        writeln!(
            f,
            "Beta parameters:      alpha = {:.6}, beta = {:.6}",
            self.fit.alpha, self.fit.beta
        )?;
        writeln!(
            f,
            "Normalized moments:   mean = {:.6}, variance = {:.6}",
            self.normalized.mean, self.normalized.variance
        )?;
        writeln!(
            f,
            "Rating-scale moments: mean = {:.6}, variance = {:.6}",
            self.rescaled.mean, self.rescaled.variance
        )?;
        writeln!(
            f,
            "Spread ({}): {:.6}",
            self.spread_mode.as_str(),
            self.spread
        )?;
        let subject = match self.spread_mode {
            SpreadMode::SampleMean => "mean rating",
            SpreadMode::Distribution => "rating",
        };
        write!(
            f,
            "P({} > {}) = {:.6}",
            subject, self.tail.threshold, self.tail.probability
        )
    }
}
