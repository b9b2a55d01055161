use log::debug;
use nalgebra::{Matrix2, Vector2};
use ndarray::Array1;
use statrs::function::gamma::{digamma, ln_gamma};
use statrs::statistics::Statistics;

use super::convergence::{has_converged, should_continue};
use super::normalization::normalize;
use super::special::trigamma;
use super::types::BetaFit;
use crate::config::settings::FitSettings;
use crate::domain::RatingSample;
use crate::errors::{AnalysisError, AnalysisResult};

const MAX_STEP_HALVINGS: usize = 60;
const LIKELIHOOD_SLACK: f64 = 1e-12;

/// Fits a Beta distribution to the ratings by maximum likelihood.
///
/// Location and scale are pinned to the sample's observed min and max: the
/// ratings are normalized onto [0, 1] and then pulled into the open interval
/// with `(z (n - 1) + 1/2) / n` so the endpoints keep a finite likelihood.
/// The shape parameters come from Newton-Raphson on the score equations,
/// started at the method-of-moments estimate.
pub fn fit_beta(sample: &RatingSample, settings: &FitSettings) -> AnalysisResult<BetaFit> {
    ensure_fittable(sample)?;

    let normalized = normalize(sample)
        .map_err(|e| AnalysisError::FitConvergence(e.to_string()))?;
    let squeezed = squeeze(normalized.values());

    let stats = SufficientStats::from_values(&squeezed);
    let start = method_of_moments(&squeezed);
    debug!(
        "Method of moments start: alpha={:.6}, beta={:.6}",
        start[0], start[1]
    );

    newton_raphson(&stats, start, settings)
}

fn ensure_fittable(sample: &RatingSample) -> AnalysisResult<()> {
    if sample.len() < 2 {
        return Err(AnalysisError::FitConvergence(format!(
            "need at least two ratings, got {}",
            sample.len()
        )));
    }

    if sample.bounds().is_degenerate() {
        return Err(AnalysisError::FitConvergence(format!(
            "all ratings equal {}, the shape is not identifiable",
            sample.bounds().min
        )));
    }

    Ok(())
}

fn squeeze(values: &Array1<f64>) -> Array1<f64> {
    let n = values.len() as f64;
    values.mapv(|z| (z * (n - 1.0) + 0.5) / n)
}

/// Mean log terms; the Beta log-likelihood depends on the data only through these
struct SufficientStats {
    mean_ln: f64,
    mean_ln_complement: f64,
}

impl SufficientStats {
    fn from_values(values: &Array1<f64>) -> Self {
        Self {
            mean_ln: values.iter().map(|z| z.ln()).mean(),
            mean_ln_complement: values.iter().map(|z| (1.0 - z).ln()).mean(),
        }
    }

    fn log_likelihood(&self, params: &Vector2<f64>) -> f64 {
        let (alpha, beta) = (params[0], params[1]);
        let ln_beta_fn = ln_gamma(alpha) + ln_gamma(beta) - ln_gamma(alpha + beta);
        (alpha - 1.0) * self.mean_ln + (beta - 1.0) * self.mean_ln_complement - ln_beta_fn
    }

    fn gradient(&self, params: &Vector2<f64>) -> Vector2<f64> {
        let (alpha, beta) = (params[0], params[1]);
        let psi_total = digamma(alpha + beta);
        Vector2::new(
            self.mean_ln - digamma(alpha) + psi_total,
            self.mean_ln_complement - digamma(beta) + psi_total,
        )
    }
}

fn hessian(params: &Vector2<f64>) -> Matrix2<f64> {
    let (alpha, beta) = (params[0], params[1]);
    let total = trigamma(alpha + beta);
    Matrix2::new(
        total - trigamma(alpha),
        total,
        total,
        total - trigamma(beta),
    )
}

fn method_of_moments(values: &Array1<f64>) -> Vector2<f64> {
    let mean = Statistics::mean(values.iter());
    let variance = Statistics::variance(values.iter());
    let common = mean * (1.0 - mean) / variance - 1.0;

    if common.is_finite() && common > 0.0 {
        Vector2::new(mean * common, (1.0 - mean) * common)
    } else {
        Vector2::new(1.0, 1.0)
    }
}

fn newton_raphson(
    stats: &SufficientStats,
    start: Vector2<f64>,
    settings: &FitSettings,
) -> AnalysisResult<BetaFit> {
    let mut params = start;
    let mut log_likelihood = stats.log_likelihood(&params);
    let mut iteration = 0;

    while should_continue(iteration, settings.max_iterations) {
        iteration += 1;

        let step = newton_step(stats, &params)?;
        let (next, next_log_likelihood) = damp_step(stats, &params, log_likelihood, &step)?;
        let change = next - params;

        params = next;
        log_likelihood = next_log_likelihood;

        if has_converged(&params, &change, settings.convergence_tolerance) {
            debug!("Beta fit converged in {} iterations", iteration);
            return BetaFit::new(params[0], params[1], iteration, log_likelihood);
        }
    }

    Err(AnalysisError::FitConvergence(format!(
        "no convergence after {} iterations (alpha={}, beta={})",
        settings.max_iterations, params[0], params[1]
    )))
}

fn newton_step(stats: &SufficientStats, params: &Vector2<f64>) -> AnalysisResult<Vector2<f64>> {
    let gradient = stats.gradient(params);
    let inverse = hessian(params).try_inverse().ok_or_else(|| {
        AnalysisError::FitConvergence(format!(
            "singular Hessian at alpha={}, beta={}",
            params[0], params[1]
        ))
    })?;

    Ok(-(inverse * gradient))
}

/// Halves the step until both shapes stay positive and the likelihood does not drop
fn damp_step(
    stats: &SufficientStats,
    params: &Vector2<f64>,
    log_likelihood: f64,
    step: &Vector2<f64>,
) -> AnalysisResult<(Vector2<f64>, f64)> {
    let floor = log_likelihood - LIKELIHOOD_SLACK * (1.0 + log_likelihood.abs());
    let mut scale = 1.0;

    for _ in 0..MAX_STEP_HALVINGS {
        let candidate = params + step * scale;

        if is_admissible(&candidate) {
            let candidate_log_likelihood = stats.log_likelihood(&candidate);
            if candidate_log_likelihood >= floor {
                return Ok((candidate, candidate_log_likelihood));
            }
        }

        scale *= 0.5;
    }

    Err(AnalysisError::FitConvergence(format!(
        "no step improves the likelihood at alpha={}, beta={}",
        params[0], params[1]
    )))
}

fn is_admissible(params: &Vector2<f64>) -> bool {
    params.iter().all(|&p| p.is_finite() && p > 0.0)
}
