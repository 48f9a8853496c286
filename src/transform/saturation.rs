//! Saturation transforms: a registered curve plus priors for its parameters.
//!
//! A transform owns one prior per curve parameter and a variable prefix. Each
//! parameter becomes a model variable named `{prefix}_{parameter}`. The
//! transform can:
//!
//! - declare those variables on a `Model` and return the unevaluated curve (`apply`)
//! - draw them from their priors (`sample_prior`)
//! - evaluate the curve on a grid for every draw (`sample_curve`)
//! - round-trip through a JSON dict (`to_dict` / `from_dict`)

use std::collections::BTreeMap;

use ndarray::{ArrayD, ArrayViewD, IxDyn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::context::model::array_from_vec;
use crate::context::{Model, SymbolicTensor};
use crate::curves::CurveKind;
use crate::domain::{CHAIN_DIM, Coords, DRAW_DIM, GRID_DIM, SamplingConfig};
use crate::error::{DataError, TransformError, TransformResult};
use crate::labeled::{CoordValues, DataArray, Dataset};
use crate::math::{DEFAULT_CURVE_POINTS, curve_grid};
use crate::prior::Prior;
use crate::transform::registry::{registry, resolve_by_name};

/// A configured saturation curve.
///
/// Equality compares the curve, the full prior mapping and the prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "TransformSpec", try_from = "TransformSpec")]
pub struct SaturationTransform {
    kind: CurveKind,
    priors: BTreeMap<String, Prior>,
    prefix: String,
}

/// Dict form: `{"lookup_name": ..., "prefix": ..., "priors": {param: prior}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformSpec {
    pub lookup_name: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default)]
    pub priors: BTreeMap<String, Prior>,
}

fn default_prefix() -> String {
    crate::transform::registry::SATURATION_PREFIX.to_string()
}

impl SaturationTransform {
    /// Transform with the registered default priors and prefix.
    pub fn new(kind: CurveKind) -> Self {
        let entry = registry().entry(kind);
        Self {
            kind,
            priors: entry.default_priors().clone(),
            prefix: entry.prefix().to_string(),
        }
    }

    /// Transform with some priors replaced.
    pub fn with_priors<I, K>(kind: CurveKind, overrides: I) -> TransformResult<Self>
    where
        I: IntoIterator<Item = (K, Prior)>,
        K: Into<String>,
    {
        let mut transform = Self::new(kind);
        transform.update_priors(overrides)?;
        Ok(transform)
    }

    /// Replace priors for named parameters; others keep their current prior.
    pub fn update_priors<I, K>(&mut self, overrides: I) -> TransformResult<()>
    where
        I: IntoIterator<Item = (K, Prior)>,
        K: Into<String>,
    {
        let overrides: Vec<(String, Prior)> = overrides.into_iter().map(|(k, p)| (k.into(), p)).collect();
        if let Some((unknown, _)) = overrides.iter().find(|(k, _)| !self.priors.contains_key(k)) {
            return Err(TransformError::invalid(format!(
                "`{}` has no parameter `{unknown}` (parameters: {})",
                self.kind,
                self.kind.parameters().join(", ")
            )));
        }
        self.priors.extend(overrides);
        Ok(())
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.set_prefix(prefix);
        self
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    pub fn kind(&self) -> CurveKind {
        self.kind
    }

    pub fn lookup_name(&self) -> &'static str {
        self.kind.lookup_name()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn parameters(&self) -> &'static [&'static str] {
        self.kind.parameters()
    }

    pub fn priors(&self) -> &BTreeMap<String, Prior> {
        &self.priors
    }

    pub fn default_priors(&self) -> &'static BTreeMap<String, Prior> {
        registry().entry(self.kind).default_priors()
    }

    /// Evaluate the underlying curve at one point, `params` in
    /// [`parameters`](Self::parameters) order.
    pub fn function(&self, x: f64, params: &[f64]) -> TransformResult<f64> {
        self.kind.checked_evaluate(x, params)
    }

    /// Parameter name → model variable name, in curve parameter order.
    pub fn variable_mapping(&self) -> Vec<(&'static str, String)> {
        self.parameters()
            .iter()
            .map(|&param| (param, format!("{}_{param}", self.prefix)))
            .collect()
    }

    fn prior_for(&self, param: &str) -> TransformResult<&Prior> {
        self.priors
            .get(param)
            .ok_or_else(|| TransformError::invalid(format!("no prior for parameter `{param}`")))
    }

    /// Declare the parameter variables on `model` and return the curve applied
    /// to `x`.
    ///
    /// `dims` labels the trailing axes of `x` (empty for none); every label must
    /// be a coordinate of the model. Parameter priors may only carry dims from
    /// `dims`. The result has the shape of `x`.
    pub fn apply(&self, model: &mut Model, x: ArrayD<f64>, dims: &[&str]) -> TransformResult<SymbolicTensor> {
        if dims.len() > x.ndim() {
            return Err(TransformError::invalid(format!(
                "dims {dims:?} label more axes than the input has ({})",
                x.ndim()
            )));
        }
        let offset = x.ndim() - dims.len();
        for (i, dim) in dims.iter().enumerate() {
            if dims[..i].contains(dim) {
                return Err(DataError::DuplicateDim(dim.to_string()).into());
            }
            let expected = model.dim_len(dim)?;
            let got = x.shape()[offset + i];
            if expected != got {
                return Err(DataError::CoordLength {
                    dim: dim.to_string(),
                    expected,
                    got,
                }
                .into());
            }
        }

        // Check every parameter before declaring any, so a failure leaves
        // `model` as it was.
        let mut declared = Vec::with_capacity(self.parameters().len());
        for (param, var_name) in self.variable_mapping() {
            let prior = self.prior_for(param)?;
            check_dims_subset(&var_name, prior.dims(), dims)?;
            let var_dims = model.check_variable(&var_name, prior)?;
            check_dims_subset(&var_name, &var_dims, dims)?;
            declared.push((var_name, prior));
        }
        let parameters = declared
            .into_iter()
            .map(|(var_name, prior)| model.register_variable(&var_name, prior))
            .collect::<TransformResult<Vec<_>>>()?;

        debug!(
            transform = self.lookup_name(),
            shape = ?x.shape(),
            ?dims,
            "applied saturation transform"
        );
        Ok(SymbolicTensor::new(
            self.kind,
            x,
            dims.iter().map(|d| d.to_string()).collect(),
            parameters,
        ))
    }

    /// Draw this transform's variables from their priors.
    ///
    /// `coords` must cover every dim used by the priors.
    pub fn sample_prior(&self, config: &SamplingConfig, coords: &Coords) -> TransformResult<Dataset> {
        let mut model = Model::with_coords(coords.clone());
        for (param, var_name) in self.variable_mapping() {
            model.register_variable(&var_name, self.prior_for(param)?)?;
        }
        model.sample_prior(config)
    }

    /// Evaluate the curve on `[0, max_value]` for every `(chain, draw)`.
    pub fn sample_curve(&self, parameters: &Dataset, max_value: f64) -> TransformResult<DataArray> {
        self.sample_curve_with_points(parameters, max_value, DEFAULT_CURVE_POINTS)
    }

    /// Same as [`sample_curve`](Self::sample_curve) with an explicit grid size.
    ///
    /// The result has dims `(chain, draw, x, *extra)` where `extra` are the
    /// non-sample dims of this transform's own variables, in first-seen order.
    /// Unrelated variables in `parameters` are ignored.
    pub fn sample_curve_with_points(
        &self,
        parameters: &Dataset,
        max_value: f64,
        points: usize,
    ) -> TransformResult<DataArray> {
        let grid = curve_grid(max_value, points)?;

        let mut own = Vec::with_capacity(self.parameters().len());
        for (_, var_name) in self.variable_mapping() {
            let var = parameters
                .get(&var_name)
                .ok_or_else(|| TransformError::invalid(format!("parameters have no variable `{var_name}`")))?;
            if !(var.has_dim(CHAIN_DIM) && var.has_dim(DRAW_DIM)) {
                return Err(TransformError::invalid(format!(
                    "variable `{var_name}` must have `{CHAIN_DIM}` and `{DRAW_DIM}` dims, got {:?}",
                    var.dims()
                )));
            }
            if var.has_dim(GRID_DIM) {
                return Err(TransformError::invalid(format!(
                    "variable `{var_name}` uses the reserved curve grid dim `{GRID_DIM}`"
                )));
            }
            own.push(var);
        }
        let Some(first) = own.first() else {
            return Err(TransformError::invalid(format!("`{}` has no parameters", self.kind)));
        };

        let mut dims = vec![CHAIN_DIM.to_string(), DRAW_DIM.to_string(), GRID_DIM.to_string()];
        let mut shape = vec![
            first.dim_len(CHAIN_DIM).unwrap_or(0),
            first.dim_len(DRAW_DIM).unwrap_or(0),
            grid.len(),
        ];
        for var in &own {
            for (dim, &len) in var.dims().iter().zip(var.shape()) {
                match dims.iter().position(|d| d == dim) {
                    Some(pos) if shape[pos] != len => {
                        return Err(DataError::DimConflict {
                            dim: dim.clone(),
                            left: shape[pos],
                            right: len,
                        }
                        .into());
                    }
                    Some(_) => {}
                    None => {
                        dims.push(dim.clone());
                        shape.push(len);
                    }
                }
            }
        }

        let aligned = own
            .iter()
            .map(|var| var.align_to(&dims))
            .collect::<Result<Vec<_>, _>>()?;
        let target = IxDyn(&shape);
        let views = aligned
            .iter()
            .map(|a| {
                a.broadcast(target.clone()).ok_or_else(|| DataError::Broadcast {
                    from: a.shape().to_vec(),
                    to: shape.clone(),
                })
            })
            .collect::<Result<Vec<ArrayViewD<'_, f64>>, _>>()?;

        debug!(
            transform = self.lookup_name(),
            ?dims,
            ?shape,
            "sampling curve"
        );

        let total: usize = shape.iter().product();
        let kind = self.kind;
        let values: Vec<f64> = (0..total)
            .into_par_iter()
            .map_init(
                || (vec![0usize; shape.len()], vec![0.0; views.len()]),
                |(index, params), flat| {
                    unravel(flat, &shape, index);
                    for (slot, view) in params.iter_mut().zip(&views) {
                        *slot = view[index.as_slice()];
                    }
                    kind.evaluate(grid[index[2]], params)
                },
            )
            .collect();

        let mut curve = DataArray::new(dims.clone(), array_from_vec(&shape, values)?)?
            .with_name(self.prefix.clone())
            .with_coord(GRID_DIM, CoordValues::Float(grid))?;
        for (pos, dim) in dims.iter().enumerate().filter(|(pos, _)| *pos != 2) {
            match own.iter().find_map(|var| var.coord(dim)) {
                Some(labels) => curve = curve.with_coord(dim, labels.clone())?,
                None if pos < 2 => curve = curve.with_coord(dim, CoordValues::range(shape[pos]))?,
                None => {}
            }
        }
        Ok(curve)
    }

    /// Dict form of this transform.
    pub fn to_dict(&self) -> TransformResult<Value> {
        serde_json::to_value(TransformSpec::from(self.clone()))
            .map_err(|e| TransformError::invalid(format!("cannot serialize transform: {e}")))
    }

    /// Rebuild a transform from its dict form.
    ///
    /// Priors not mentioned keep their registered defaults; a missing prefix
    /// falls back to the registered prefix.
    pub fn from_dict(data: &Value) -> TransformResult<Self> {
        let spec: TransformSpec = serde_json::from_value(data.clone())
            .map_err(|e| TransformError::invalid(format!("invalid transform dict: {e}")))?;
        Self::try_from(spec)
    }
}

fn check_dims_subset(var_name: &str, var_dims: &[String], dims: &[&str]) -> TransformResult<()> {
    match var_dims.iter().find(|d| !dims.contains(&d.as_str())) {
        Some(dim) => Err(TransformError::invalid(format!(
            "variable `{var_name}` has dim `{dim}` which is not among the input dims {dims:?}"
        ))),
        None => Ok(()),
    }
}

/// Row-major multi-index of `flat` within `shape`.
fn unravel(mut flat: usize, shape: &[usize], index: &mut [usize]) {
    for (slot, &len) in index.iter_mut().zip(shape).rev() {
        *slot = flat % len;
        flat /= len;
    }
}

impl From<SaturationTransform> for TransformSpec {
    fn from(transform: SaturationTransform) -> Self {
        TransformSpec {
            lookup_name: transform.kind.lookup_name().to_string(),
            prefix: transform.prefix,
            priors: transform.priors,
        }
    }
}

impl TryFrom<TransformSpec> for SaturationTransform {
    type Error = TransformError;

    fn try_from(spec: TransformSpec) -> Result<Self, Self::Error> {
        let mut transform = resolve_by_name(&spec.lookup_name)?;
        transform.update_priors(spec.priors)?;
        transform.set_prefix(spec.prefix);
        Ok(transform)
    }
}
