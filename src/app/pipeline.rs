//! Shared "curve pipeline" logic used by the CLI commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! resolve transform -> apply overrides -> sample prior -> sample curve -> summarize
//!
//! The commands can then focus on presentation (printing vs exporting).

use tracing::info;

use crate::domain::{CurveFile, CurveRequest};
use crate::error::AppError;
use crate::labeled::{DataArray, Dataset};
use crate::transform::{SaturationTransform, resolve_by_name};

/// All computed outputs of a single `mmm curve` run.
#[derive(Debug, Clone)]
pub struct CurveRun {
    pub transform: SaturationTransform,
    pub parameters: Dataset,
    pub curve: DataArray,
    pub summary: CurveFile,
}

/// Resolve a transform by name and apply any prior overrides.
pub fn build_transform(request: &CurveRequest) -> Result<SaturationTransform, AppError> {
    let mut transform = resolve_by_name(&request.transform)?;
    transform.update_priors(request.priors.clone())?;
    Ok(transform)
}

/// Execute the prior-curve pipeline and return the computed outputs.
pub fn run_curve(request: &CurveRequest) -> Result<CurveRun, AppError> {
    // 1) Resolve the transform.
    let transform = build_transform(request)?;

    // 2) Draw its parameters from their priors.
    let parameters = transform.sample_prior(&request.sampling, &request.coords)?;

    // 3) Evaluate the curve for every draw.
    let curve = transform.sample_curve_with_points(&parameters, request.max_value, request.sampling.curve_points)?;
    info!(
        transform = transform.lookup_name(),
        shape = ?curve.shape(),
        "sampled prior curve"
    );

    // 4) Summarize.
    let summary = crate::report::build_curve_file(&transform, &curve, &request.sampling, request.max_value)?;

    Ok(CurveRun {
        transform,
        parameters,
        curve,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::{Coords, SamplingConfig};
    use crate::labeled::CoordValues;
    use crate::prior::Prior;

    fn request(name: &str) -> CurveRequest {
        CurveRequest {
            transform: name.to_string(),
            priors: BTreeMap::new(),
            coords: Coords::new(),
            max_value: 1.0,
            sampling: SamplingConfig {
                draws: 40,
                curve_points: 21,
                ..SamplingConfig::default()
            }
            .with_seed(3),
            rows: 5,
            export: None,
        }
    }

    #[test]
    fn run_curve_produces_one_band() {
        let run = run_curve(&request("hill")).unwrap();
        assert_eq!(run.curve.shape(), &[1, 40, 21]);
        assert_eq!(run.summary.x.len(), 21);
        assert_eq!(run.summary.bands.len(), 1);
        assert_eq!(run.summary.transform["lookup_name"], "hill");
    }

    #[test]
    fn overrides_with_dims_give_one_band_per_label() {
        let mut req = request("michaelis_menten");
        req.priors.insert(
            "alpha".to_string(),
            Prior::half_normal(2.0).unwrap().with_dims(["channel"]).unwrap(),
        );
        req.coords
            .insert("channel".to_string(), CoordValues::labels(["tv", "radio"]));
        let run = run_curve(&req).unwrap();
        assert_eq!(run.curve.dims(), &["chain", "draw", "x", "channel"]);
        assert_eq!(run.summary.bands.len(), 2);
    }

    #[test]
    fn unknown_transform_is_a_user_error() {
        let err = run_curve(&request("unknown")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().starts_with("Unknown saturation function: unknown. Choose from"));
    }
}
