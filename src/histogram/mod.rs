pub mod terminal;

pub use terminal::TerminalRenderer;

use crate::domain::RatingBounds;
use crate::errors::{AnalysisError, AnalysisResult};

/// Draws the distribution of a sequence of values
pub trait HistogramRenderer {
    fn render(&mut self, values: &[f64], bin_count: usize) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width bins over the observed range.
///
/// Every bin is half-open except the last, which also holds the maximum.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    bins: Vec<Bin>,
}

impl Histogram {
    pub fn from_values(values: &[f64], bin_count: usize) -> AnalysisResult<Self> {
        if bin_count == 0 {
            return Err(AnalysisError::InvalidParameter(
                "histogram needs at least one bin".to_string(),
            ));
        }

        let bounds = RatingBounds::from_values(values).ok_or_else(|| {
            AnalysisError::InvalidParameter("cannot build a histogram of no values".to_string())
        })?;

        let width = bounds.range() / bin_count as f64;
        let mut counts = vec![0usize; bin_count];
        for &value in values {
            counts[bin_index(value, &bounds, width, bin_count)] += 1;
        }

        Ok(Self {
            bins: build_bins(&counts, &bounds, width),
        })
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|bin| bin.count).sum()
    }

    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|bin| bin.count).max().unwrap_or(0)
    }
}

fn bin_index(value: f64, bounds: &RatingBounds, width: f64, bin_count: usize) -> usize {
    if width == 0.0 {
        return 0;
    }

    let idx = ((value - bounds.min) / width) as usize;
    idx.min(bin_count - 1)
}

fn build_bins(counts: &[usize], bounds: &RatingBounds, width: f64) -> Vec<Bin> {
    let last = counts.len() - 1;

    counts
        .iter()
        .enumerate()
        .map(|(idx, &count)| Bin {
            lower: bounds.min + idx as f64 * width,
            upper: if idx == last {
                bounds.max
            } else {
                bounds.min + (idx + 1) as f64 * width
            },
            count,
        })
        .collect()
}
