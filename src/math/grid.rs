//! Evaluation grids for sampled curves.

use crate::error::{TransformError, TransformResult};

/// Number of grid points used when sampling a curve.
pub const DEFAULT_CURVE_POINTS: usize = 100;

/// Generate `steps` evenly spaced points between `min` and `max` (inclusive).
pub fn lin_space(min: f64, max: f64, steps: usize) -> TransformResult<Vec<f64>> {
    if !(min.is_finite() && max.is_finite() && max > min) {
        return Err(TransformError::invalid(format!(
            "Invalid grid range: min={min}, max={max} (must be finite and max>min)."
        )));
    }
    if steps < 2 {
        return Err(TransformError::invalid("Grid steps must be >= 2."));
    }

    let step = (max - min) / (steps as f64 - 1.0);
    let mut out = Vec::with_capacity(steps);
    for i in 0..steps {
        out.push(min + step * i as f64);
    }
    // Pin the last point so rounding never overshoots `max`.
    out[steps - 1] = max;
    Ok(out)
}

/// Grid on `[0, max_value]` used by curve sampling.
pub fn curve_grid(max_value: f64, steps: usize) -> TransformResult<Vec<f64>> {
    if !(max_value.is_finite() && max_value > 0.0) {
        return Err(TransformError::invalid(format!(
            "max_value must be a finite number > 0, got {max_value}"
        )));
    }
    lin_space(0.0, max_value, steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lin_space_includes_endpoints() {
        let v = lin_space(0.0, 2.0, 5).unwrap();
        assert_eq!(v, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn curve_grid_rejects_non_positive_max() {
        for bad in [0.0, -1.0, f64::NAN] {
            assert!(matches!(
                curve_grid(bad, DEFAULT_CURVE_POINTS),
                Err(TransformError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn lin_space_rejects_single_step() {
        assert!(lin_space(0.0, 1.0, 1).is_err());
    }
}
