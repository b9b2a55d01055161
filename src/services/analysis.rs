use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, info};

use crate::config::settings::AppConfig;
use crate::dataset::RatingSource;
use crate::domain::{AnalysisReport, RatingSample};
use crate::errors::{load_context, stage_context, with_stage_context};
use crate::histogram::HistogramRenderer;
use crate::rating;

/// Runs load → histogram → normalize → fit → moments → rescale → tail, in order
pub struct AnalysisService {
    config: AppConfig,
}

impl AnalysisService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn run(
        &self,
        source: &dyn RatingSource,
        renderer: &mut dyn HistogramRenderer,
    ) -> Result<AnalysisReport> {
        info!("=== Starting Rating Analysis ===");

        let sample = self.load_sample(source)?;
        info!("  → Number of records in the dataset: {}", sample.len());

        if self.config.histogram.enabled {
            self.render_histogram(&sample, renderer)?;
        }

        let report = self.analyze(&sample)?;

        info!("=== Analysis Complete ===");
        Ok(report)
    }

    /// Only loads the ratings and draws their histogram
    pub fn run_histogram(
        &self,
        source: &dyn RatingSource,
        renderer: &mut dyn HistogramRenderer,
    ) -> Result<()> {
        let sample = self.load_sample(source)?;
        self.render_histogram(&sample, renderer)
    }

    /// The statistical core on an in-memory sample
    pub fn analyze(&self, sample: &RatingSample) -> Result<AnalysisReport> {
        let normalized = with_stage_context(rating::normalize(sample), "normalize")?;
        debug!(
            "  → Normalized {} ratings from [{}, {}]",
            normalized.len(),
            normalized.bounds().min,
            normalized.bounds().max
        );

        let fit = with_stage_context(rating::fit_beta(sample, &self.config.fit), "fit")?;
        info!(
            "  → Beta parameters: alpha = {:.6}, beta = {:.6} ({} iterations)",
            fit.alpha, fit.beta, fit.iterations
        );

        let normalized_moments = rating::moments_from_beta(&fit);
        info!(
            "  → Normalized mean = {:.6}, variance = {:.6}",
            normalized_moments.mean, normalized_moments.variance
        );

        let rescaled = rating::rescale(&normalized_moments, &normalized.bounds());
        info!(
            "  → Rating-scale mean = {:.6}, variance = {:.6}",
            rescaled.mean, rescaled.variance
        );

        let spread_mode = self.config.analysis.spread;
        let spread = spread_mode.spread_of(&rescaled, sample.len());
        let tail = with_stage_context(
            rating::tail_probability(rescaled.mean, spread, self.config.analysis.threshold),
            "tail probability",
        )?;
        info!(
            "  → P(X > {}) = {:.6} using {} spread {:.6}",
            tail.threshold,
            tail.probability,
            spread_mode.as_str(),
            spread
        );

        Ok(AnalysisReport {
            row_count: sample.len(),
            bounds: normalized.bounds(),
            fit,
            normalized: normalized_moments,
            rescaled,
            spread_mode,
            spread,
            tail,
            calculated_at: Utc::now(),
        })
    }

    fn load_sample(&self, source: &dyn RatingSource) -> Result<RatingSample> {
        source
            .load()
            .context(load_context(&source.location()))
            .context(stage_context("load"))
    }

    fn render_histogram(
        &self,
        sample: &RatingSample,
        renderer: &mut dyn HistogramRenderer,
    ) -> Result<()> {
        renderer
            .render(sample.as_slice(), self.config.histogram.bins)
            .context(stage_context("histogram"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{AnalysisError, AnalysisResult};
    use crate::rating::SpreadMode;

    struct MemorySource(Vec<f64>);

    impl RatingSource for MemorySource {
        fn location(&self) -> String {
            "memory".to_string()
        }

        fn load(&self) -> AnalysisResult<RatingSample> {
            RatingSample::new(self.0.clone())
        }
    }

    struct FailingSource;

    impl RatingSource for FailingSource {
        fn location(&self) -> String {
            "broken.csv".to_string()
        }

        fn load(&self) -> AnalysisResult<RatingSample> {
            Err(AnalysisError::DataLoad(
                "column 'Rating' not found".to_string(),
            ))
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        calls: Vec<(usize, usize)>,
    }

    impl HistogramRenderer for RecordingRenderer {
        fn render(&mut self, values: &[f64], bin_count: usize) -> Result<()> {
            self.calls.push((values.len(), bin_count));
            Ok(())
        }
    }

    fn one_to_ten() -> RatingSample {
        RatingSample::new((1..=10).map(f64::from).collect()).unwrap()
    }

    #[test]
    fn test_one_to_ten_scenario() {
        let service = AnalysisService::new(AppConfig::new());
        let report = service.analyze(&one_to_ten()).unwrap();

        assert_eq!(report.row_count, 10);
        assert!((report.fit.alpha - report.fit.beta).abs() < 1e-6);
        assert!((report.normalized.mean - 0.5).abs() < 1e-9);
        assert!((report.rescaled.mean - 5.5).abs() < 1e-9);
        assert_eq!(report.tail.threshold, 8.5);
        assert!(report.tail.probability < 0.1);
    }

    #[test]
    fn test_distribution_spread_matches_single_rating_tail() {
        let mut config = AppConfig::new();
        config.analysis.spread = SpreadMode::Distribution;
        let report = AnalysisService::new(config).analyze(&one_to_ten()).unwrap();

        // Beta(1.108, 1.108) scaled onto [1, 10]: variance 6.2965
        assert!((report.rescaled.variance - 6.2965).abs() < 1e-3);
        assert!((report.tail.probability - 0.1159).abs() < 1e-3);
        assert_eq!(report.spread, report.rescaled.std_dev());
    }

    #[test]
    fn test_degenerate_sample_fails_at_normalize() {
        let service = AnalysisService::new(AppConfig::new());
        let sample = RatingSample::new(vec![7.0, 7.0, 7.0, 7.0]).unwrap();
        let err = service.analyze(&sample).unwrap_err();

        assert_eq!(err.to_string(), "Stage 'normalize' failed");
        assert_eq!(
            err.downcast_ref::<AnalysisError>(),
            Some(&AnalysisError::DegenerateRange(7.0))
        );
    }

    #[test]
    fn test_run_renders_configured_bins() {
        let service = AnalysisService::new(AppConfig::new());
        let mut renderer = RecordingRenderer::default();
        let source = MemorySource(vec![4.0, 5.5, 6.1, 7.3, 8.8, 9.9, 6.6, 7.0]);

        let report = service.run(&source, &mut renderer).unwrap();

        assert_eq!(renderer.calls, vec![(8, 20)]);
        assert_eq!(report.row_count, 8);
        assert!((0.0..=1.0).contains(&report.tail.probability));
    }

    #[test]
    fn test_histogram_can_be_disabled() {
        let mut config = AppConfig::new();
        config.histogram.enabled = false;
        let mut renderer = RecordingRenderer::default();

        AnalysisService::new(config)
            .run(&MemorySource(vec![4.0, 6.0, 9.0]), &mut renderer)
            .unwrap();

        assert!(renderer.calls.is_empty());
    }

    #[test]
    fn test_load_failure_names_stage_and_source() {
        let service = AnalysisService::new(AppConfig::new());
        let mut renderer = RecordingRenderer::default();
        let err = service.run(&FailingSource, &mut renderer).unwrap_err();

        let message = format!("{:#}", err);
        assert!(
            message.starts_with("Stage 'load' failed: Failed to load ratings from: broken.csv")
        );
        assert!(message.contains("column 'Rating' not found"));
        assert!(renderer.calls.is_empty());
    }

    #[test]
    fn test_empty_source_fails_before_fit() {
        let service = AnalysisService::new(AppConfig::new());
        let mut renderer = RecordingRenderer::default();
        let err = service.run(&MemorySource(Vec::new()), &mut renderer).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<AnalysisError>(),
            Some(AnalysisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_report_serializes() {
        let service = AnalysisService::new(AppConfig::new());
        let report = service.analyze(&one_to_ten()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(json["row_count"], 10);
        assert_eq!(json["spread_mode"], "sample-mean");
        assert_eq!(json["tail"]["threshold"], 8.5);
    }
}
