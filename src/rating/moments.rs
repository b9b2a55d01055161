use super::types::{BetaFit, MomentEstimate};
use crate::domain::RatingBounds;

/// Closed-form mean and variance of Beta(alpha, beta) on [0, 1]
pub fn moments_from_beta(fit: &BetaFit) -> MomentEstimate {
    let total = fit.alpha + fit.beta;

    MomentEstimate {
        mean: fit.alpha / total,
        variance: (fit.alpha * fit.beta) / (total.powi(2) * (total + 1.0)),
    }
}

/// Maps [0, 1] moments back onto the rating scale
pub fn rescale(moments: &MomentEstimate, bounds: &RatingBounds) -> MomentEstimate {
    let range = bounds.range();

    MomentEstimate {
        mean: moments.mean * range + bounds.min,
        variance: moments.variance * range.powi(2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::FitSettings;
    use crate::domain::RatingSample;
    use crate::rating::fit_beta;

    fn beta_fit(alpha: f64, beta: f64) -> BetaFit {
        BetaFit::new(alpha, beta, 0, 0.0).unwrap()
    }

    #[test]
    fn test_uniform_beta_moments() {
        let moments = moments_from_beta(&beta_fit(1.0, 1.0));

        assert_eq!(moments.mean, 0.5);
        assert!((moments.variance - 1.0 / 12.0).abs() < 1e-15);
    }

    #[test]
    fn test_moments_stay_inside_unit_interval() {
        let shapes = [
            (0.05, 40.0),
            (40.0, 0.05),
            (0.5, 0.5),
            (3.0, 7.0),
            (250.0, 90.0),
        ];

        for (alpha, beta) in shapes {
            let moments = moments_from_beta(&beta_fit(alpha, beta));

            assert!(moments.mean > 0.0 && moments.mean < 1.0);
            assert!(moments.variance > 0.0);
        }
    }

    #[test]
    fn test_rescale_onto_rating_scale() {
        let normalized = MomentEstimate {
            mean: 0.25,
            variance: 0.01,
        };
        let bounds = RatingBounds {
            min: 4.0,
            max: 10.0,
        };
        let rescaled = rescale(&normalized, &bounds);

        assert!((rescaled.mean - 5.5).abs() < 1e-12);
        assert!((rescaled.variance - 0.36).abs() < 1e-12);
        assert!((rescaled.std_dev() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_uniform_sample_round_trip() {
        let values: Vec<f64> = (0..=90).map(|i| 1.0 + i as f64 * 0.1).collect();
        let sample = RatingSample::new(values).unwrap();

        let fit = fit_beta(&sample, &FitSettings::default()).unwrap();
        let rescaled = rescale(&moments_from_beta(&fit), &sample.bounds());

        assert!((rescaled.mean - sample.mean()).abs() < 1e-6);
    }
}
