//! A named collection of labeled arrays sharing dimension lengths.

use std::collections::BTreeMap;

use crate::error::DataError;
use crate::labeled::array::{CoordValues, DataArray};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    variables: BTreeMap<String, DataArray>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a variable.
    ///
    /// Dimensions shared with existing variables must have the same length.
    pub fn insert(&mut self, name: impl Into<String>, array: DataArray) -> Result<(), DataError> {
        let name = name.into();
        for (dim, &len) in array.dims().iter().zip(array.shape()) {
            let existing = self
                .variables
                .iter()
                .filter(|(other, _)| **other != name)
                .find_map(|(_, var)| var.dim_len(dim));
            if let Some(other_len) = existing {
                if other_len != len {
                    return Err(DataError::DimConflict {
                        dim: dim.clone(),
                        left: other_len,
                        right: len,
                    });
                }
            }
        }
        let array = array.with_name(name.clone());
        self.variables.insert(name, array);
        Ok(())
    }

    pub fn with_variable(mut self, name: impl Into<String>, array: DataArray) -> Result<Self, DataError> {
        self.insert(name, array)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&DataArray> {
        self.variables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Length of `dim` on any variable that carries it.
    pub fn dim_len(&self, dim: &str) -> Option<usize> {
        self.variables.values().find_map(|var| var.dim_len(dim))
    }

    /// First coordinate found for `dim` across variables.
    pub fn coord(&self, dim: &str) -> Option<&CoordValues> {
        self.variables.values().find_map(|var| var.coord(dim))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};

    #[test]
    fn insert_names_the_array() {
        let arr = DataArray::new(["draw"], ArrayD::zeros(IxDyn(&[4]))).unwrap();
        let ds = Dataset::new().with_variable("saturation_lam", arr).unwrap();
        assert_eq!(ds.get("saturation_lam").unwrap().name(), Some("saturation_lam"));
        assert_eq!(ds.dim_len("draw"), Some(4));
    }

    #[test]
    fn insert_rejects_conflicting_dim_lengths() {
        let a = DataArray::new(["draw"], ArrayD::zeros(IxDyn(&[4]))).unwrap();
        let b = DataArray::new(["draw"], ArrayD::zeros(IxDyn(&[5]))).unwrap();
        let mut ds = Dataset::new().with_variable("a", a).unwrap();
        assert!(matches!(
            ds.insert("b", b),
            Err(DataError::DimConflict { left: 4, right: 5, .. })
        ));
    }
}
