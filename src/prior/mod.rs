//! Prior distributions for transform parameters.
//!
//! A `Prior` is a distribution name, keyword arguments and optional dims, e.g.
//! `HalfNormal(sigma=2)` or `Gamma(mu=2, sigma=1, dims=channel)`. Keyword values
//! are either scalars or, for a prior with one dim, one value per label.
//!
//! Priors are validated when built: unknown keywords, incomplete
//! parameterizations and out-of-domain values fail immediately.

pub mod distribution;

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{TransformError, TransformResult};
pub use distribution::DistributionKind;
use distribution::Sampler;

/// A keyword value: one number, or one number per label of the prior's dim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriorArg {
    Scalar(f64),
    Vector(Vec<f64>),
}

impl PriorArg {
    fn len(&self) -> Option<usize> {
        match self {
            PriorArg::Scalar(_) => None,
            PriorArg::Vector(v) => Some(v.len()),
        }
    }

    fn at(&self, i: usize) -> f64 {
        match self {
            PriorArg::Scalar(v) => *v,
            PriorArg::Vector(v) => v[i],
        }
    }
}

impl From<f64> for PriorArg {
    fn from(value: f64) -> Self {
        PriorArg::Scalar(value)
    }
}

impl From<Vec<f64>> for PriorArg {
    fn from(value: Vec<f64>) -> Self {
        PriorArg::Vector(value)
    }
}

/// Serialized form of a prior: `{"dist": ..., "kwargs": {...}, "dims": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorSpec {
    pub dist: String,
    #[serde(default)]
    pub kwargs: BTreeMap<String, PriorArg>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dims: Vec<String>,
}

/// A validated prior distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "PriorSpec", try_from = "PriorSpec")]
pub struct Prior {
    dist: DistributionKind,
    kwargs: BTreeMap<String, PriorArg>,
    dims: Vec<String>,
}

impl Prior {
    /// Build a prior from a distribution and keyword arguments.
    pub fn new<I, K, V>(dist: DistributionKind, kwargs: I) -> TransformResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<PriorArg>,
    {
        let prior = Self {
            dist,
            kwargs: kwargs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            dims: Vec::new(),
        };
        prior.check()?;
        Ok(prior)
    }

    /// Same as [`Prior::new`] with the distribution given by name.
    pub fn named<I, K, V>(dist: &str, kwargs: I) -> TransformResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<PriorArg>,
    {
        Self::new(dist.parse()?, kwargs)
    }

    pub fn half_normal(sigma: f64) -> TransformResult<Self> {
        Self::new(DistributionKind::HalfNormal, [("sigma", sigma)])
    }

    pub fn gamma(alpha: f64, beta: f64) -> TransformResult<Self> {
        Self::new(DistributionKind::Gamma, [("alpha", alpha), ("beta", beta)])
    }

    pub fn gamma_mu_sigma(mu: f64, sigma: f64) -> TransformResult<Self> {
        Self::new(DistributionKind::Gamma, [("mu", mu), ("sigma", sigma)])
    }

    pub fn beta(alpha: f64, beta: f64) -> TransformResult<Self> {
        Self::new(DistributionKind::Beta, [("alpha", alpha), ("beta", beta)])
    }

    /// Attach dims (e.g. `["channel"]`) so the prior yields one value per label.
    pub fn with_dims<I, S>(mut self, dims: I) -> TransformResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dims = dims.into_iter().map(Into::into).collect();
        self.check()?;
        Ok(self)
    }

    pub fn dist(&self) -> DistributionKind {
        self.dist
    }

    pub fn kwargs(&self) -> &BTreeMap<String, PriorArg> {
        &self.kwargs
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    fn check(&self) -> TransformResult<()> {
        self.dist.check_keywords(self.kwargs.keys().map(String::as_str))?;

        for (i, dim) in self.dims.iter().enumerate() {
            if self.dims[..i].contains(dim) {
                return Err(TransformError::invalid(format!("prior dim `{dim}` is repeated")));
            }
        }

        // Vector lengths are matched against labels when the prior is declared.
        let vector_len = self.vector_len()?;
        if vector_len.is_some() && self.dims.len() > 1 {
            return Err(TransformError::invalid(format!(
                "{}: per-label keyword values need exactly one dim, got {:?}",
                self.dist, self.dims
            )));
        }
        // Building every element's sampler surfaces domain errors now rather
        // than at sampling time.
        self.samplers(vector_len.unwrap_or(1)).map(|_| ())
    }

    fn vector_len(&self) -> TransformResult<Option<usize>> {
        let mut len = None;
        for (key, arg) in &self.kwargs {
            let Some(n) = arg.len() else { continue };
            match len {
                None => len = Some(n),
                Some(m) if m != n => {
                    return Err(TransformError::invalid(format!(
                        "{}: keyword `{key}` has {n} values, others have {m}",
                        self.dist
                    )));
                }
                _ => {}
            }
        }
        Ok(len)
    }

    fn samplers(&self, elements: usize) -> TransformResult<Vec<Sampler>> {
        (0..elements)
            .map(|i| {
                self.dist
                    .sampler(|key| self.kwargs.get(key).map(|arg| arg.at(i)))
            })
            .collect()
    }

    /// Check keyword vectors against the sizes of this prior's dims.
    pub fn check_dim_sizes(&self, dim_sizes: &[usize]) -> TransformResult<()> {
        if dim_sizes.len() != self.dims.len() {
            return Err(TransformError::invalid(format!(
                "prior with dims {:?} given {} dim sizes",
                self.dims,
                dim_sizes.len()
            )));
        }
        let elements: usize = dim_sizes.iter().product();
        if let Some(n) = self.vector_len()? {
            if n != elements {
                return Err(TransformError::invalid(format!(
                    "{}: keyword vectors have {n} values but dims {:?} have {elements} labels",
                    self.dist, self.dims
                )));
            }
        }
        Ok(())
    }

    /// Draw `draws` independent samples of the whole prior.
    ///
    /// Returns `draws * prod(dim_sizes)` values in row-major `(draw, *dims)`
    /// order.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        dim_sizes: &[usize],
        draws: usize,
        rng: &mut R,
    ) -> TransformResult<Vec<f64>> {
        self.check_dim_sizes(dim_sizes)?;
        let elements: usize = dim_sizes.iter().product();
        let samplers = match self.vector_len()? {
            Some(_) => self.samplers(elements)?,
            None => {
                let one = self.samplers(1)?;
                vec![one[0].clone(); elements]
            }
        };

        let mut out = Vec::with_capacity(draws * elements);
        for _ in 0..draws {
            for sampler in &samplers {
                out.push(sampler.draw(rng));
            }
        }
        Ok(out)
    }
}

impl std::fmt::Display for Prior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts: Vec<String> = self
            .kwargs
            .iter()
            .map(|(k, v)| match v {
                PriorArg::Scalar(x) => format!("{k}={x}"),
                PriorArg::Vector(xs) => format!("{k}={xs:?}"),
            })
            .collect();
        if !self.dims.is_empty() {
            parts.push(format!("dims={}", self.dims.join(",")));
        }
        write!(f, "{}({})", self.dist, parts.join(", "))
    }
}

impl From<Prior> for PriorSpec {
    fn from(prior: Prior) -> Self {
        PriorSpec {
            dist: prior.dist.name().to_string(),
            kwargs: prior.kwargs,
            dims: prior.dims,
        }
    }
}

impl TryFrom<PriorSpec> for Prior {
    type Error = TransformError;

    fn try_from(spec: PriorSpec) -> Result<Self, Self::Error> {
        Prior::named(&spec.dist, spec.kwargs)?.with_dims(spec.dims)
    }
}
