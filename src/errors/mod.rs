use anyhow::Context as _;
use thiserror::Error;

/// Failures of the rating statistics pipeline
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// Source data missing, malformed, or without a numeric rating column
    #[error("failed to load ratings: {0}")]
    DataLoad(String),

    /// Every rating has the same value, so the [0, 1] mapping is undefined
    #[error("rating range is degenerate: every value equals {0}")]
    DegenerateRange(f64),

    #[error("beta fit did not converge: {0}")]
    FitConvergence(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Add context to a failed pipeline stage
pub fn stage_context(stage: &str) -> String {
    format!("Stage '{}' failed", stage)
}

/// Add context to dataset errors
pub fn load_context(location: &str) -> String {
    format!("Failed to load ratings from: {}", location)
}

/// Wrap result with stage context
pub fn with_stage_context<T, E>(result: Result<T, E>, stage: &str) -> anyhow::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    result.context(stage_context(stage))
}

/// Wrap result with load context
pub fn with_load_context<T, E>(result: Result<T, E>, location: &str) -> anyhow::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    result.context(load_context(location))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_context_names_stage() {
        let result: AnalysisResult<()> = Err(AnalysisError::DegenerateRange(7.0));
        let err = with_stage_context(result, "normalize").unwrap_err();

        let message = format!("{:#}", err);
        assert!(message.starts_with("Stage 'normalize' failed"));
        assert!(message.contains("every value equals 7"));
    }

    #[test]
    fn test_context_keeps_underlying_error() {
        let result: AnalysisResult<()> = Err(AnalysisError::DataLoad("no such column".to_string()));
        let err = with_load_context(result, "ratings.csv").unwrap_err();

        assert_eq!(
            err.downcast_ref::<AnalysisError>(),
            Some(&AnalysisError::DataLoad("no such column".to_string()))
        );
        assert_eq!(err.to_string(), "Failed to load ratings from: ratings.csv");
    }
}
