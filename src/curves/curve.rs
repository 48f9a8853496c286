//! Curve evaluation for each saturation kind.
//!
//! Transforms rely on two primitive operations:
//! - the ordered parameter list of a curve (excluding the input `x`)
//! - evaluate `y(x)` given parameter values in that order
//!
//! Both are implemented here for each curve kind.

use serde::{Deserialize, Serialize};

use crate::error::{TransformError, TransformResult};
use crate::math::{
    hill_saturation, inverse_scaled_logistic_saturation, logistic_saturation, michaelis_menten,
    root_saturation, tanh_saturation, tanh_saturation_baselined,
};

/// Saturation curve kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    Logistic,
    InverseScaledLogistic,
    Tanh,
    TanhBaselined,
    MichaelisMenten,
    Hill,
    Root,
}

impl CurveKind {
    pub const ALL: [CurveKind; 7] = [
        CurveKind::Logistic,
        CurveKind::InverseScaledLogistic,
        CurveKind::Tanh,
        CurveKind::TanhBaselined,
        CurveKind::MichaelisMenten,
        CurveKind::Hill,
        CurveKind::Root,
    ];

    /// Canonical registry name.
    pub fn lookup_name(self) -> &'static str {
        match self {
            CurveKind::Logistic => "logistic",
            CurveKind::InverseScaledLogistic => "inverse_scaled_logistic",
            CurveKind::Tanh => "tanh",
            CurveKind::TanhBaselined => "tanh_baselined",
            CurveKind::MichaelisMenten => "michaelis_menten",
            CurveKind::Hill => "hill",
            CurveKind::Root => "root",
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            CurveKind::Logistic => "Logistic",
            CurveKind::InverseScaledLogistic => "Inverse-scaled logistic",
            CurveKind::Tanh => "Tanh",
            CurveKind::TanhBaselined => "Tanh (baselined)",
            CurveKind::MichaelisMenten => "Michaelis-Menten",
            CurveKind::Hill => "Hill",
            CurveKind::Root => "Root",
        }
    }

    /// Parameter names in call order, excluding the input.
    pub fn parameters(self) -> &'static [&'static str] {
        match self {
            CurveKind::Logistic | CurveKind::InverseScaledLogistic => &["lam", "beta"],
            CurveKind::Tanh => &["b", "c"],
            CurveKind::TanhBaselined => &["x0", "gain", "r", "beta"],
            CurveKind::MichaelisMenten => &["alpha", "lam"],
            CurveKind::Hill => &["sigma", "beta", "lam"],
            CurveKind::Root => &["alpha", "beta"],
        }
    }

    /// Evaluate the curve at `x`.
    ///
    /// # Panics
    /// Panics if `params` is shorter than `self.parameters()`.
    pub fn evaluate(self, x: f64, params: &[f64]) -> f64 {
        debug_assert_eq!(params.len(), self.parameters().len());
        match self {
            CurveKind::Logistic => params[1] * logistic_saturation(x, params[0]),
            CurveKind::InverseScaledLogistic => {
                params[1] * inverse_scaled_logistic_saturation(x, params[0])
            }
            CurveKind::Tanh => tanh_saturation(x, params[0], params[1]),
            CurveKind::TanhBaselined => {
                params[3] * tanh_saturation_baselined(x, params[0], params[1], params[2])
            }
            CurveKind::MichaelisMenten => michaelis_menten(x, params[0], params[1]),
            CurveKind::Hill => hill_saturation(x, params[0], params[1], params[2]),
            CurveKind::Root => params[1] * root_saturation(x, params[0]),
        }
    }

    /// [`evaluate`](Self::evaluate) after checking the parameter count.
    pub fn checked_evaluate(self, x: f64, params: &[f64]) -> TransformResult<f64> {
        let expected = self.parameters().len();
        if params.len() != expected {
            return Err(TransformError::invalid(format!(
                "`{self}` takes {expected} parameters ({}), got {}",
                self.parameters().join(", "),
                params.len()
            )));
        }
        Ok(self.evaluate(x, params))
    }
}

impl std::fmt::Display for CurveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.lookup_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_smoke() {
        for kind in CurveKind::ALL {
            let params = vec![0.5; kind.parameters().len()];
            let y = kind.evaluate(0.7, &params);
            assert!(y.is_finite(), "{kind} produced {y}");
        }
    }

    #[test]
    fn lookup_names_are_unique() {
        let mut names: Vec<&str> = CurveKind::ALL.iter().map(|k| k.lookup_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), CurveKind::ALL.len());
    }

    #[test]
    fn checked_evaluate_rejects_wrong_arity() {
        assert!(matches!(
            CurveKind::Hill.checked_evaluate(1.0, &[1.0, 2.0]),
            Err(TransformError::InvalidConfiguration(_))
        ));
        assert!(CurveKind::Hill.checked_evaluate(1.0, &[1.0, 2.0, 3.0, 4.0]).is_err());
        assert_eq!(CurveKind::MichaelisMenten.checked_evaluate(1.0, &[2.0, 1.0]).unwrap(), 1.0);
    }

    #[test]
    fn scaled_curves_apply_beta() {
        let y = CurveKind::Root.evaluate(4.0, &[0.5, 3.0]);
        assert!((y - 6.0).abs() < 1e-12);
    }
}
