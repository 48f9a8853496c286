//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - built from defaults, the environment, or CLI flags
//! - exported to JSON
//! - reloaded later for comparisons

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{TransformError, TransformResult};
use crate::labeled::CoordValues;
use crate::math::DEFAULT_CURVE_POINTS;
use crate::prior::Prior;

/// Dimension name → coordinate labels.
pub type Coords = BTreeMap<String, CoordValues>;

/// Dimension names used for sampled draws.
pub const CHAIN_DIM: &str = "chain";
pub const DRAW_DIM: &str = "draw";
/// Dimension name of the input grid in sampled curves.
pub const GRID_DIM: &str = "x";

/// Default number of prior draws per chain.
pub const DEFAULT_DRAWS: usize = 500;

/// How prior samples and curves are drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingConfig {
    pub draws: usize,
    pub chains: usize,
    /// Fixed seed for reproducible draws; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Number of grid points between 0 and `max_value` for sampled curves.
    pub curve_points: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            draws: DEFAULT_DRAWS,
            chains: 1,
            seed: None,
            curve_points: DEFAULT_CURVE_POINTS,
        }
    }
}

impl SamplingConfig {
    /// Defaults overridden by `MMM_DRAWS`, `MMM_CHAINS`, `MMM_SEED` and
    /// `MMM_CURVE_POINTS` (a `.env` file is loaded first if present).
    pub fn from_env() -> TransformResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> TransformResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = lookup("MMM_DRAWS") {
            config.draws = parse_count("MMM_DRAWS", &v)?;
        }
        if let Some(v) = lookup("MMM_CHAINS") {
            config.chains = parse_count("MMM_CHAINS", &v)?;
        }
        if let Some(v) = lookup("MMM_SEED") {
            let seed = v
                .trim()
                .parse::<u64>()
                .map_err(|e| TransformError::invalid(format!("MMM_SEED='{v}': {e}")))?;
            config.seed = Some(seed);
        }
        if let Some(v) = lookup("MMM_CURVE_POINTS") {
            config.curve_points = parse_count("MMM_CURVE_POINTS", &v)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> TransformResult<()> {
        if self.draws == 0 || self.chains == 0 {
            return Err(TransformError::invalid("draws and chains must be > 0"));
        }
        if self.curve_points < 2 {
            return Err(TransformError::invalid("curve_points must be >= 2"));
        }
        Ok(())
    }
}

fn parse_count(key: &str, value: &str) -> TransformResult<usize> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        Ok(_) => Err(TransformError::invalid(format!("{key} must be > 0"))),
        Err(e) => Err(TransformError::invalid(format!("{key}='{value}': {e}"))),
    }
}

/// Everything needed to sample and summarize one prior curve.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveRequest {
    pub transform: String,
    /// Prior overrides by parameter name.
    pub priors: BTreeMap<String, Prior>,
    /// Labels for any dims the priors carry.
    pub coords: Coords,
    pub max_value: f64,
    pub sampling: SamplingConfig,
    /// Rows printed per band in the terminal table.
    pub rows: usize,
    pub export: Option<PathBuf>,
}

/// Per-grid-point summary of a sampled curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveBand {
    pub mean: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

/// A saved curve summary (JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    /// The transform as produced by `SaturationTransform::to_dict`.
    pub transform: serde_json::Value,
    pub sampling: SamplingConfig,
    pub max_value: f64,
    pub x: Vec<f64>,
    /// Interval mass of `lower`/`upper` (e.g. 0.94).
    pub interval: f64,
    /// One band per label combination of extra dims (a single band when none).
    pub bands: BTreeMap<String, CurveBand>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_overrides_defaults() {
        let config = SamplingConfig::from_lookup(|key| match key {
            "MMM_DRAWS" => Some("250".to_string()),
            "MMM_SEED" => Some(" 42 ".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.draws, 250);
        assert_eq!(config.chains, 1);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.curve_points, DEFAULT_CURVE_POINTS);
    }

    #[test]
    fn lookup_rejects_zero_and_garbage() {
        assert!(SamplingConfig::from_lookup(|k| (k == "MMM_CHAINS").then(|| "0".to_string())).is_err());
        assert!(SamplingConfig::from_lookup(|k| (k == "MMM_DRAWS").then(|| "many".to_string())).is_err());
    }
}
