//! Unevaluated curve nodes.
//!
//! `SaturationTransform::apply` returns a `SymbolicTensor`: the curve kind, the
//! input array and references to the model variables feeding each parameter.
//! Nothing is computed until `eval` / `eval_with`.

use std::collections::BTreeMap;

use ndarray::{ArrayD, ArrayViewD};
use rand::Rng;

use crate::context::model::{Model, VariableRef};
use crate::curves::CurveKind;
use crate::error::{DataError, TransformError, TransformResult};
use crate::labeled::DataArray;

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolicTensor {
    curve: CurveKind,
    input: ArrayD<f64>,
    /// Labels of the trailing axes of `input`.
    dims: Vec<String>,
    /// One variable per curve parameter, in call order.
    parameters: Vec<VariableRef>,
}

impl SymbolicTensor {
    pub(crate) fn new(
        curve: CurveKind,
        input: ArrayD<f64>,
        dims: Vec<String>,
        parameters: Vec<VariableRef>,
    ) -> Self {
        Self {
            curve,
            input,
            dims,
            parameters,
        }
    }

    pub fn curve(&self) -> CurveKind {
        self.curve
    }

    /// Output shape (always the input's shape).
    pub fn shape(&self) -> &[usize] {
        self.input.shape()
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn parameters(&self) -> &[VariableRef] {
        &self.parameters
    }

    /// Evaluate with one fresh prior draw per parameter variable.
    pub fn eval<R: Rng + ?Sized>(&self, model: &Model, rng: &mut R) -> TransformResult<ArrayD<f64>> {
        let mut values = BTreeMap::new();
        for param in &self.parameters {
            values.insert(param.name.clone(), model.draw_variable(&param.name, rng)?);
        }
        self.eval_with(&values)
    }

    /// Evaluate against explicit parameter values keyed by variable name.
    ///
    /// Each value must be laid out along its variable's dims.
    pub fn eval_with(&self, values: &BTreeMap<String, ArrayD<f64>>) -> TransformResult<ArrayD<f64>> {
        let mut aligned = Vec::with_capacity(self.parameters.len());
        for param in &self.parameters {
            let value = values
                .get(&param.name)
                .ok_or_else(|| TransformError::invalid(format!("no value for variable `{}`", param.name)))?;
            let labeled = DataArray::new(param.dims.clone(), value.clone())?;
            aligned.push(labeled.align_to(&self.dims)?);
        }

        let views = aligned
            .iter()
            .map(|a| {
                a.broadcast(self.input.raw_dim()).ok_or_else(|| DataError::Broadcast {
                    from: a.shape().to_vec(),
                    to: self.input.shape().to_vec(),
                })
            })
            .collect::<Result<Vec<ArrayViewD<'_, f64>>, _>>()?;

        let mut params = vec![0.0; views.len()];
        Ok(ArrayD::from_shape_fn(self.input.raw_dim(), |idx| {
            for (slot, view) in params.iter_mut().zip(&views) {
                *slot = view[&idx];
            }
            self.curve.evaluate(self.input[&idx], &params)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, IxDyn, array};

    fn var(name: &str, dims: &[&str]) -> VariableRef {
        VariableRef {
            name: name.to_string(),
            dims: dims.iter().map(|d| d.to_string()).collect(),
        }
    }

    #[test]
    fn eval_with_broadcasts_per_channel_parameters() {
        let input = ArrayD::from_elem(IxDyn(&[4, 2]), 1.0);
        let node = SymbolicTensor::new(
            CurveKind::MichaelisMenten,
            input,
            vec!["channel".to_string()],
            vec![var("alpha", &["channel"]), var("lam", &[])],
        );
        let values = BTreeMap::from([
            ("alpha".to_string(), array![2.0, 4.0].into_dyn()),
            ("lam".to_string(), ArrayD::from_elem(IxDyn(&[]), 1.0)),
        ]);
        let out = node.eval_with(&values).unwrap();
        assert_eq!(out.shape(), &[4, 2]);
        // alpha * 1 / (1 + 1)
        assert_eq!(out[[3, 0]], 1.0);
        assert_eq!(out[[3, 1]], 2.0);
    }

    #[test]
    fn eval_with_requires_every_parameter() {
        let node = SymbolicTensor::new(
            CurveKind::Root,
            Array1::linspace(0.0, 1.0, 5).into_dyn(),
            Vec::new(),
            vec![var("alpha", &[]), var("beta", &[])],
        );
        let values = BTreeMap::from([("alpha".to_string(), ArrayD::from_elem(IxDyn(&[]), 0.5))]);
        assert!(node.eval_with(&values).is_err());
    }
}
