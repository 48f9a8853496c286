//! Read/write curve JSON files.
//!
//! Curve JSON is the portable summary of a sampled prior curve:
//! - the transform in dict form (curve name, prefix, priors)
//! - the sampling settings that produced it
//! - the grid plus mean / interval bands per extra-dim label
//!
//! The schema is defined by `domain::CurveFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::CurveFile;
use crate::error::AppError;

/// Write a curve JSON file.
pub fn write_curve_json(path: &Path, curve: &CurveFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create curve JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, curve)
        .map_err(|e| AppError::new(2, format!("Failed to write curve JSON: {e}")))?;
    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open curve JSON '{}': {e}", path.display())))?;
    let curve: CurveFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid curve JSON: {e}")))?;
    Ok(curve)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::{CurveBand, SamplingConfig};

    #[test]
    fn curve_json_round_trips_through_disk() {
        let curve = CurveFile {
            tool: "mmm".to_string(),
            transform: serde_json::json!({"lookup_name": "hill", "prefix": "saturation", "priors": {}}),
            sampling: SamplingConfig::default().with_seed(1),
            max_value: 2.0,
            x: vec![0.0, 2.0],
            interval: 0.94,
            bands: BTreeMap::from([(
                "all".to_string(),
                CurveBand {
                    mean: vec![0.0, 0.5],
                    lower: vec![0.0, 0.25],
                    upper: vec![0.0, 0.75],
                },
            )]),
        };
        let path = std::env::temp_dir().join(format!("mmm-curve-{}.json", std::process::id()));
        write_curve_json(&path, &curve).unwrap();
        let back = read_curve_json(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(back, curve);
    }

    #[test]
    fn missing_file_is_a_user_error() {
        let err = read_curve_json(Path::new("/nonexistent/curve.json")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
