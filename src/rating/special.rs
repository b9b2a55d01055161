// Below this the recurrence shifts the argument up before the series is used
const ASYMPTOTIC_THRESHOLD: f64 = 10.0;

/// Trigamma function, the derivative of digamma.
///
/// Uses ψ₁(x) = ψ₁(x + 1) + 1/x² to move the argument above the
/// threshold, then the asymptotic expansion
/// 1/x + 1/(2x²) + 1/(6x³) - 1/(30x⁵) + 1/(42x⁷) - 1/(30x⁹) + 5/(66x¹¹).
pub fn trigamma(x: f64) -> f64 {
    if x.is_nan() || x <= 0.0 {
        return f64::NAN;
    }

    let mut x = x;
    let mut acc = 0.0;
    while x < ASYMPTOTIC_THRESHOLD {
        acc += 1.0 / (x * x);
        x += 1.0;
    }

    let inv = 1.0 / x;
    let inv2 = inv * inv;
    let series = 1.0 / 30.0 - inv2 * 5.0 / 66.0;
    let series = 1.0 / 42.0 - inv2 * series;
    let series = 1.0 / 30.0 - inv2 * series;
    let series = 1.0 / 6.0 - inv2 * series;
    acc + inv + inv2 / 2.0 + inv2 * inv * series
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_known_values() {
        assert!((trigamma(1.0) - PI * PI / 6.0).abs() < 1e-12);
        assert!((trigamma(0.5) - PI * PI / 2.0).abs() < 1e-12);
        assert!((trigamma(2.0) - (PI * PI / 6.0 - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_large_argument() {
        // ψ₁(x) ~ 1/x for large x
        assert!((trigamma(1e6) - 1e-6).abs() < 1e-11);
    }

    #[test]
    fn test_outside_domain() {
        assert!(trigamma(0.0).is_nan());
        assert!(trigamma(-1.5).is_nan());
    }
}
