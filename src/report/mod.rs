//! Reporting utilities: curve summaries and formatted terminal output.

pub mod format;

use std::collections::BTreeMap;

use crate::domain::{CHAIN_DIM, CurveBand, CurveFile, DRAW_DIM, GRID_DIM, SamplingConfig};
use crate::error::{DataError, TransformError, TransformResult};
use crate::labeled::{CoordValues, DataArray};
use crate::transform::SaturationTransform;

pub use format::*;

/// Interval mass reported around the mean.
pub const DEFAULT_INTERVAL: f64 = 0.94;

/// Band key used when a curve has no dims beyond `(chain, draw, x)`.
pub const SINGLE_BAND: &str = "all";

/// Mean and central interval over `(chain, draw)` for every grid point, one
/// band per label combination of the extra dims.
pub fn summarize_curve(curve: &DataArray, interval: f64) -> TransformResult<BTreeMap<String, CurveBand>> {
    if !(interval > 0.0 && interval < 1.0) {
        return Err(TransformError::invalid(format!("interval must be in (0, 1), got {interval}")));
    }
    let dims = curve.dims();
    if dims.len() < 3 || dims[0] != CHAIN_DIM || dims[1] != DRAW_DIM || dims[2] != GRID_DIM {
        return Err(TransformError::invalid(format!(
            "curve dims must start with ({CHAIN_DIM}, {DRAW_DIM}, {GRID_DIM}), got {dims:?}"
        )));
    }

    let shape = curve.shape();
    let samples = shape[0] * shape[1];
    let points = shape[2];
    let extra: usize = shape[3..].iter().product();
    if samples == 0 {
        return Err(TransformError::invalid("curve has no draws"));
    }

    let values = curve
        .values()
        .as_standard_layout()
        .into_owned()
        .into_shape((samples, points, extra))
        .map_err(|_| DataError::Broadcast {
            from: shape.to_vec(),
            to: vec![samples, points, extra],
        })?;

    let labels = band_labels(curve);
    let tail = (1.0 - interval) / 2.0;
    let mut bands = BTreeMap::new();
    for (e, label) in labels.into_iter().enumerate() {
        let mut band = CurveBand {
            mean: Vec::with_capacity(points),
            lower: Vec::with_capacity(points),
            upper: Vec::with_capacity(points),
        };
        for j in 0..points {
            let mut column: Vec<f64> = (0..samples).map(|s| values[[s, j, e]]).collect();
            column.sort_by(f64::total_cmp);
            band.mean.push(column.iter().sum::<f64>() / samples as f64);
            band.lower.push(quantile(&column, tail));
            band.upper.push(quantile(&column, 1.0 - tail));
        }
        bands.insert(label, band);
    }
    Ok(bands)
}

/// Build the exported summary of a sampled curve.
pub fn build_curve_file(
    transform: &SaturationTransform,
    curve: &DataArray,
    sampling: &SamplingConfig,
    max_value: f64,
) -> TransformResult<CurveFile> {
    let x = match curve.coord(GRID_DIM) {
        Some(CoordValues::Float(x)) => x.clone(),
        _ => return Err(TransformError::invalid("curve has no numeric `x` coordinate")),
    };
    Ok(CurveFile {
        tool: "mmm".to_string(),
        transform: transform.to_dict()?,
        sampling: sampling.clone(),
        max_value,
        x,
        interval: DEFAULT_INTERVAL,
        bands: summarize_curve(curve, DEFAULT_INTERVAL)?,
    })
}

/// Linear-interpolated quantile of sorted, non-empty data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let w = pos - lo as f64;
    sorted[lo] * (1.0 - w) + sorted[hi] * w
}

/// `"a"`, `"b"`, ... (or `"a,geo1"` for several extra dims), row-major.
fn band_labels(curve: &DataArray) -> Vec<String> {
    let extra_dims = &curve.dims()[3..];
    if extra_dims.is_empty() {
        return vec![SINGLE_BAND.to_string()];
    }
    let per_dim: Vec<Vec<String>> = extra_dims
        .iter()
        .map(|dim| match curve.coord(dim) {
            Some(coord) => coord.to_strings(),
            None => (0..curve.dim_len(dim).unwrap_or(0)).map(|i| i.to_string()).collect(),
        })
        .collect();

    let mut out = vec![String::new()];
    for labels in &per_dim {
        out = out
            .iter()
            .flat_map(|prefix| {
                labels.iter().map(move |l| {
                    if prefix.is_empty() {
                        l.clone()
                    } else {
                        format!("{prefix},{l}")
                    }
                })
            })
            .collect();
    }
    out
}
