//! Model context: coordinates plus named random variables.
//!
//! Building a model is single-threaded by construction: declaring a variable
//! needs `&mut Model`, so whoever holds the mutable borrow owns the context
//! for the duration of the build.

use ndarray::{ArrayD, IxDyn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::domain::{CHAIN_DIM, Coords, DRAW_DIM, SamplingConfig};
use crate::error::{DataError, TransformError, TransformResult};
use crate::labeled::{CoordValues, DataArray, Dataset};
use crate::prior::Prior;

/// A declared random variable.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomVariable {
    name: String,
    prior: Prior,
}

impl RandomVariable {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prior(&self) -> &Prior {
        &self.prior
    }

    pub fn dims(&self) -> &[String] {
        self.prior.dims()
    }
}

/// Handle to a declared variable, held by symbolic nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableRef {
    pub name: String,
    pub dims: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    coords: Coords,
    variables: Vec<RandomVariable>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_coords(coords: Coords) -> Self {
        Self {
            coords,
            variables: Vec::new(),
        }
    }

    /// Register labels for a dimension. Re-registering identical labels is a no-op.
    pub fn add_coord(&mut self, dim: impl Into<String>, labels: CoordValues) -> TransformResult<()> {
        let dim = dim.into();
        if let Some(existing) = self.coords.get(&dim) {
            if *existing != labels {
                return Err(TransformError::invalid(format!(
                    "dimension `{dim}` already has different coordinates"
                )));
            }
            return Ok(());
        }
        self.coords.insert(dim, labels);
        Ok(())
    }

    pub fn coords(&self) -> &Coords {
        &self.coords
    }

    pub fn dim_len(&self, dim: &str) -> TransformResult<usize> {
        self.coords
            .get(dim)
            .map(CoordValues::len)
            .ok_or_else(|| TransformError::invalid(format!("dimension `{dim}` has no coordinates in the model")))
    }

    fn dim_sizes(&self, dims: &[String]) -> TransformResult<Vec<usize>> {
        dims.iter().map(|d| self.dim_len(d)).collect()
    }

    pub fn variables(&self) -> &[RandomVariable] {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<&RandomVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Dims `name` would have after [`register_variable`](Self::register_variable),
    /// without touching the model.
    ///
    /// An existing variable keeps its own dims; a new one must have coordinates
    /// for every prior dim and matching vector kwargs.
    pub fn check_variable(&self, name: &str, prior: &Prior) -> TransformResult<Vec<String>> {
        if let Some(existing) = self.variable(name) {
            return Ok(existing.dims().to_vec());
        }
        let sizes = self.dim_sizes(prior.dims())?;
        prior.check_dim_sizes(&sizes)?;
        Ok(prior.dims().to_vec())
    }

    /// Declare a random variable, or return the existing one with that name.
    pub fn register_variable(&mut self, name: &str, prior: &Prior) -> TransformResult<VariableRef> {
        let dims = self.check_variable(name, prior)?;
        if self.variable(name).is_some() {
            debug!(variable = name, "reusing declared variable");
        } else {
            debug!(variable = name, prior = %prior, "declaring variable");
            self.variables.push(RandomVariable {
                name: name.to_string(),
                prior: prior.clone(),
            });
        }
        Ok(VariableRef {
            name: name.to_string(),
            dims,
        })
    }

    /// Draw one value of a variable (shape = its dim sizes).
    pub fn draw_variable<R: Rng + ?Sized>(&self, name: &str, rng: &mut R) -> TransformResult<ArrayD<f64>> {
        let variable = self
            .variable(name)
            .ok_or_else(|| TransformError::invalid(format!("variable `{name}` is not declared in the model")))?;
        let sizes = self.dim_sizes(variable.dims())?;
        let values = variable.prior.sample(&sizes, 1, rng)?;
        Ok(array_from_vec(&sizes, values)?)
    }

    /// Unconditioned draws of every declared variable.
    ///
    /// Each variable gets dims `(chain, draw, *prior dims)`.
    pub fn sample_prior(&self, config: &SamplingConfig) -> TransformResult<Dataset> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        info!(
            variables = self.variables.len(),
            chains = config.chains,
            draws = config.draws,
            "sampling prior"
        );
        self.sample_prior_with_rng(config.chains, config.draws, &mut rng)
    }

    pub fn sample_prior_with_rng<R: Rng + ?Sized>(
        &self,
        chains: usize,
        draws: usize,
        rng: &mut R,
    ) -> TransformResult<Dataset> {
        let mut dataset = Dataset::new();
        for variable in &self.variables {
            let sizes = self.dim_sizes(variable.dims())?;
            let values = variable.prior.sample(&sizes, chains * draws, rng)?;

            let mut shape = vec![chains, draws];
            shape.extend_from_slice(&sizes);
            let mut dims = vec![CHAIN_DIM.to_string(), DRAW_DIM.to_string()];
            dims.extend(variable.dims().iter().cloned());

            let mut array = DataArray::new(dims, array_from_vec(&shape, values)?)?
                .with_coord(CHAIN_DIM, CoordValues::range(chains))?
                .with_coord(DRAW_DIM, CoordValues::range(draws))?;
            for dim in variable.dims() {
                if let Some(labels) = self.coords.get(dim) {
                    array = array.with_coord(dim, labels.clone())?;
                }
            }
            dataset.insert(variable.name.clone(), array)?;
        }
        Ok(dataset)
    }
}

pub(crate) fn array_from_vec(shape: &[usize], values: Vec<f64>) -> Result<ArrayD<f64>, DataError> {
    let len = values.len();
    ArrayD::from_shape_vec(IxDyn(shape), values).map_err(|_| DataError::Broadcast {
        from: vec![len],
        to: shape.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel_model() -> Model {
        let mut model = Model::new();
        model
            .add_coord("channel", CoordValues::labels(["a", "b", "c"]))
            .unwrap();
        model
    }

    #[test]
    fn register_reuses_existing_name() {
        let mut model = Model::new();
        let prior = Prior::half_normal(1.0).unwrap();
        model.register_variable("saturation_lam", &prior).unwrap();
        let other = Prior::half_normal(5.0).unwrap();
        model.register_variable("saturation_lam", &other).unwrap();
        assert_eq!(model.variables().len(), 1);
        assert_eq!(model.variable("saturation_lam").unwrap().prior(), &prior);
    }

    #[test]
    fn check_variable_leaves_model_untouched() {
        let model = channel_model();
        let prior = Prior::half_normal(1.0).unwrap().with_dims(["channel"]).unwrap();
        assert_eq!(model.check_variable("saturation_lam", &prior).unwrap(), vec!["channel"]);
        assert!(model.variables().is_empty());
    }

    #[test]
    fn register_requires_known_dims() {
        let mut model = Model::new();
        let prior = Prior::half_normal(1.0).unwrap().with_dims(["channel"]).unwrap();
        assert!(matches!(
            model.register_variable("x", &prior),
            Err(TransformError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn sample_prior_has_chain_draw_and_prior_dims() {
        let mut model = channel_model();
        let prior = Prior::half_normal(1.0).unwrap().with_dims(["channel"]).unwrap();
        model.register_variable("saturation_alpha", &prior).unwrap();
        model
            .register_variable("saturation_lam", &Prior::half_normal(1.0).unwrap())
            .unwrap();

        let config = SamplingConfig {
            draws: 50,
            chains: 2,
            ..SamplingConfig::default()
        }
        .with_seed(11);
        let ds = model.sample_prior(&config).unwrap();

        let alpha = ds.get("saturation_alpha").unwrap();
        assert_eq!(alpha.dims(), &["chain", "draw", "channel"]);
        assert_eq!(alpha.shape(), &[2, 50, 3]);
        assert_eq!(alpha.coord("channel"), Some(&CoordValues::labels(["a", "b", "c"])));
        assert_eq!(ds.get("saturation_lam").unwrap().shape(), &[2, 50]);
    }

    #[test]
    fn seeded_sampling_is_reproducible() {
        let mut model = Model::new();
        model
            .register_variable("v", &Prior::gamma(3.0, 1.0).unwrap())
            .unwrap();
        let config = SamplingConfig::default().with_seed(5);
        assert_eq!(model.sample_prior(&config).unwrap(), model.sample_prior(&config).unwrap());
    }
}
