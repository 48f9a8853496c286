//! Labeled N-dimensional arrays.
//!
//! A `DataArray` is an `ndarray::ArrayD<f64>` whose axes carry names (dims)
//! and, optionally, coordinate labels. Dims are matched by name, never by
//! position, when arrays are combined.

use std::collections::BTreeMap;

use ndarray::{ArrayD, Axis};
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Coordinate labels along one dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoordValues {
    Int(Vec<i64>),
    Float(Vec<f64>),
    Label(Vec<String>),
}

impl CoordValues {
    /// `0..n` integer labels (used for `chain` / `draw`).
    pub fn range(n: usize) -> Self {
        CoordValues::Int((0..n as i64).collect())
    }

    pub fn labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CoordValues::Label(labels.into_iter().map(Into::into).collect())
    }

    pub fn len(&self) -> usize {
        match self {
            CoordValues::Int(v) => v.len(),
            CoordValues::Float(v) => v.len(),
            CoordValues::Label(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Labels rendered as strings (for terminal output).
    pub fn to_strings(&self) -> Vec<String> {
        match self {
            CoordValues::Int(v) => v.iter().map(|x| x.to_string()).collect(),
            CoordValues::Float(v) => v.iter().map(|x| format!("{x}")).collect(),
            CoordValues::Label(v) => v.clone(),
        }
    }
}

/// An array with named dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    name: Option<String>,
    dims: Vec<String>,
    coords: BTreeMap<String, CoordValues>,
    values: ArrayD<f64>,
}

impl DataArray {
    /// Wrap `values`, naming its axes in order.
    pub fn new<I, S>(dims: I, values: ArrayD<f64>) -> Result<Self, DataError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dims: Vec<String> = dims.into_iter().map(Into::into).collect();
        if dims.len() != values.ndim() {
            return Err(DataError::RankMismatch {
                dims,
                ndim: values.ndim(),
            });
        }
        for (i, dim) in dims.iter().enumerate() {
            if dims[..i].contains(dim) {
                return Err(DataError::DuplicateDim(dim.clone()));
            }
        }
        Ok(Self {
            name: None,
            dims,
            coords: BTreeMap::new(),
            values,
        })
    }

    /// Attach coordinate labels to an existing dimension.
    pub fn with_coord(mut self, dim: &str, coord: CoordValues) -> Result<Self, DataError> {
        let Some(expected) = self.dim_len(dim) else {
            return Err(DataError::UnknownDim {
                dim: dim.to_string(),
                target: self.dims.clone(),
            });
        };
        if coord.len() != expected {
            return Err(DataError::CoordLength {
                dim: dim.to_string(),
                expected,
                got: coord.len(),
            });
        }
        self.coords.insert(dim.to_string(), coord);
        Ok(self)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }

    pub fn values(&self) -> &ArrayD<f64> {
        &self.values
    }

    pub fn coords(&self) -> &BTreeMap<String, CoordValues> {
        &self.coords
    }

    pub fn coord(&self, dim: &str) -> Option<&CoordValues> {
        self.coords.get(dim)
    }

    pub fn has_dim(&self, dim: &str) -> bool {
        self.dims.iter().any(|d| d == dim)
    }

    pub fn dim_len(&self, dim: &str) -> Option<usize> {
        let axis = self.dims.iter().position(|d| d == dim)?;
        Some(self.values.len_of(Axis(axis)))
    }

    /// Reorder axes to follow `target` and insert length-1 axes for target dims
    /// this array does not carry. The result broadcasts against any array
    /// laid out along `target`.
    pub fn align_to(&self, target: &[String]) -> Result<ArrayD<f64>, DataError> {
        let mut positions = Vec::with_capacity(self.dims.len());
        for dim in &self.dims {
            let Some(pos) = target.iter().position(|t| t == dim) else {
                return Err(DataError::UnknownDim {
                    dim: dim.clone(),
                    target: target.to_vec(),
                });
            };
            positions.push(pos);
        }

        let mut perm: Vec<usize> = (0..self.dims.len()).collect();
        perm.sort_by_key(|&axis| positions[axis]);

        let mut view = self.values.view().permuted_axes(perm);
        for (i, dim) in target.iter().enumerate() {
            if !self.has_dim(dim) {
                view = view.insert_axis(Axis(i));
            }
        }
        Ok(view.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{IxDyn, array};

    fn dims(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn new_rejects_rank_mismatch() {
        let values = ArrayD::zeros(IxDyn(&[2, 3]));
        assert!(matches!(
            DataArray::new(["chain"], values),
            Err(DataError::RankMismatch { ndim: 2, .. })
        ));
    }

    #[test]
    fn with_coord_checks_length() {
        let arr = DataArray::new(["channel"], ArrayD::zeros(IxDyn(&[3]))).unwrap();
        let err = arr.with_coord("channel", CoordValues::labels(["a", "b"]));
        assert!(matches!(err, Err(DataError::CoordLength { expected: 3, got: 2, .. })));
    }

    #[test]
    fn align_to_permutes_and_expands() {
        // (channel=2, draw=3) aligned to (draw, x, channel) -> (3, 1, 2)
        let values = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]].into_dyn();
        let arr = DataArray::new(["channel", "draw"], values).unwrap();
        let aligned = arr.align_to(&dims(&["draw", "x", "channel"])).unwrap();
        assert_eq!(aligned.shape(), &[3, 1, 2]);
        assert_eq!(aligned[[2, 0, 1]], 6.0);
        assert_eq!(aligned[[0, 0, 1]], 4.0);
    }

    #[test]
    fn align_to_rejects_foreign_dims() {
        let arr = DataArray::new(["random_dim"], ArrayD::zeros(IxDyn(&[2]))).unwrap();
        assert!(arr.align_to(&dims(&["chain", "draw"])).is_err());
    }
}
