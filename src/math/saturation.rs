//! Elementwise saturation functions.
//!
//! Each function maps a non-negative input `x` (e.g. spend) to a concave or
//! S-shaped response. They are scalar and pure so that symbolic evaluation and
//! curve sampling can share them.
//!
//! - `logistic(x, λ) = (1 - exp(-λx)) / (1 + exp(-λx))`
//! - `inverse_scaled_logistic(x, λ) = logistic(x, ln(3) / λ)`
//! - `tanh(x, b, c) = b · tanh(x / (b·c))`
//! - `tanh_baselined(x, x0, gain, r) = gain · x0 · tanh(x · atanh(r) / x0) / r`
//! - `michaelis_menten(x, α, λ) = α·x / (λ + x)`
//! - `hill(x, σ, β, λ) = σ / (1 + exp(-β(x - λ)))`
//! - `root(x, α) = x^α`

/// `ln 3`, the factor mapping the inverse-scaled `lam` to the logistic rate
/// so that the curve reaches one half of its asymptote at `x = lam`.
pub const INVERSE_SCALED_EPS: f64 = 1.098_612_288_668_109_6;

/// Logistic saturation, 0 at the origin and tending to 1.
pub fn logistic_saturation(x: f64, lam: f64) -> f64 {
    // (1 - e^{-z}) / (1 + e^{-z}) == tanh(z / 2), which stays finite for large z.
    (lam * x / 2.0).tanh()
}

/// Logistic saturation parameterized by the half-saturation point `lam`.
pub fn inverse_scaled_logistic_saturation(x: f64, lam: f64) -> f64 {
    logistic_saturation(x, INVERSE_SCALED_EPS / lam)
}

/// Tanh saturation with asymptote `b` and initial cost-per-acquisition `c`.
pub fn tanh_saturation(x: f64, b: f64, c: f64) -> f64 {
    b * (x / (b * c)).tanh()
}

/// Tanh saturation re-parameterized around a reference point `x0`.
///
/// `gain` is the slope at the origin relative to `x0` and `r` the fraction of
/// the asymptote reached at `x0`. Values of `r` outside `(0, 1)` give NaN.
pub fn tanh_saturation_baselined(x: f64, x0: f64, gain: f64, r: f64) -> f64 {
    gain * x0 * (x * r.atanh() / x0).tanh() / r
}

pub fn michaelis_menten(x: f64, alpha: f64, lam: f64) -> f64 {
    alpha * x / (lam + x)
}

/// Sigmoid Hill-style saturation with ceiling `sigma`, slope `beta` and
/// inflection point `lam`.
pub fn hill_saturation(x: f64, sigma: f64, beta: f64, lam: f64) -> f64 {
    sigma / (1.0 + (-beta * (x - lam)).exp())
}

pub fn root_saturation(x: f64, alpha: f64) -> f64 {
    x.powf(alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logistic_matches_closed_form() {
        for lam in [0.1_f64, 1.0, 4.0] {
            for x in [0.0_f64, 0.3, 1.0, 7.5] {
                let e = (-lam * x).exp();
                let expected = (1.0 - e) / (1.0 + e);
                let got = logistic_saturation(x, lam);
                assert!((got - expected).abs() < 1e-12, "lam={lam} x={x}: {got} vs {expected}");
            }
        }
    }

    #[test]
    fn logistic_is_finite_for_large_inputs() {
        let v = logistic_saturation(1e6, 50.0);
        assert!((v - 1.0).abs() < 1e-12);
    }

    #[test]
    fn inverse_scaled_eps_is_ln_three() {
        assert!((INVERSE_SCALED_EPS - 3.0_f64.ln()).abs() < 1e-15);
    }

    #[test]
    fn inverse_scaled_logistic_is_half_at_lam() {
        let v = inverse_scaled_logistic_saturation(2.0, 2.0);
        assert!((v - 0.5).abs() < 1e-12, "got {v}");
    }

    #[test]
    fn tanh_baselined_passes_through_reference_point() {
        // At x = x0 the curve equals gain * x0.
        let (x0, gain, r) = (3.0, 0.8, 0.5);
        let v = tanh_saturation_baselined(x0, x0, gain, r);
        assert!((v - gain * x0).abs() < 1e-12, "got {v}");
    }

    #[test]
    fn michaelis_menten_is_half_at_lam() {
        let v = michaelis_menten(4.0, 10.0, 4.0);
        assert!((v - 5.0).abs() < 1e-12);
    }

    #[test]
    fn hill_is_half_of_sigma_at_lam() {
        let v = hill_saturation(1.5, 2.0, 3.0, 1.5);
        assert!((v - 1.0).abs() < 1e-12);
    }

    #[test]
    fn curves_vanish_at_origin() {
        assert_eq!(logistic_saturation(0.0, 1.3), 0.0);
        assert_eq!(tanh_saturation(0.0, 1.0, 2.0), 0.0);
        assert_eq!(michaelis_menten(0.0, 1.0, 2.0), 0.0);
        assert_eq!(root_saturation(0.0, 0.4), 0.0);
    }
}
