use crate::domain::{NormalizedSample, RatingBounds, RatingSample};
use crate::errors::{AnalysisError, AnalysisResult};

/// Maps every rating onto [0, 1] using the sample's own min and max
pub fn normalize(sample: &RatingSample) -> AnalysisResult<NormalizedSample> {
    let bounds = sample.bounds();
    ensure_spread(&bounds)?;

    let values = sample
        .values()
        .mapv(|rating| transform_rating(rating, &bounds));
    Ok(NormalizedSample::new(values, bounds))
}

fn ensure_spread(bounds: &RatingBounds) -> AnalysisResult<()> {
    if bounds.is_degenerate() {
        return Err(AnalysisError::DegenerateRange(bounds.min));
    }
    Ok(())
}

fn transform_rating(rating: f64, bounds: &RatingBounds) -> f64 {
    (rating - bounds.min) / bounds.range()
}
