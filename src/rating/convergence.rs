use nalgebra::Vector2;

/// Largest parameter change relative to the parameter's size
pub fn has_converged(params: &Vector2<f64>, step: &Vector2<f64>, tolerance: f64) -> bool {
    let max_change = calculate_max_change(params, step);
    max_change < tolerance
}

fn calculate_max_change(params: &Vector2<f64>, step: &Vector2<f64>) -> f64 {
    params
        .iter()
        .zip(step.iter())
        .map(|(&value, &delta)| compute_change(value, delta))
        .fold(0.0, f64::max)
}

fn compute_change(value: f64, delta: f64) -> f64 {
    delta.abs() / value.abs().max(1.0)
}

pub fn should_continue(iteration: usize, max_iterations: usize) -> bool {
    iteration < max_iterations
}
