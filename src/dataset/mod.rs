pub mod csv;

pub use csv::{CsvDataset, CsvRatingSource};

use crate::domain::RatingSample;
use crate::errors::AnalysisResult;

/// Where the ratings come from
pub trait RatingSource {
    /// Human readable location, used in logs and error context
    fn location(&self) -> String;

    fn load(&self) -> AnalysisResult<RatingSample>;
}
