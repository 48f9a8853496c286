//! Distribution kinds and their samplers.
//!
//! A prior is described by a distribution name plus keyword arguments, the way
//! model configs are written by hand. This module maps those keywords onto
//! concrete `rand_distr` samplers.
//!
//! Parameterizations:
//! - `Gamma` / `Beta` accept `alpha`+`beta` or `mu`+`sigma` (moment form)
//! - `Gamma` `beta` is a rate; `rand_distr::Gamma` takes a scale, so we invert it
//! - half distributions are the absolute value of their symmetric parent

use std::str::FromStr;

use rand::Rng;
use rand::distributions::Uniform;
use rand_distr::{Beta, Cauchy, Distribution, Exp, Gamma, LogNormal, Normal};
use serde::{Deserialize, Serialize};

use crate::error::{TransformError, TransformResult};

/// Supported prior distributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistributionKind {
    Normal,
    HalfNormal,
    LogNormal,
    Gamma,
    Beta,
    Exponential,
    Uniform,
    HalfCauchy,
}

impl DistributionKind {
    pub const ALL: [DistributionKind; 8] = [
        DistributionKind::Normal,
        DistributionKind::HalfNormal,
        DistributionKind::LogNormal,
        DistributionKind::Gamma,
        DistributionKind::Beta,
        DistributionKind::Exponential,
        DistributionKind::Uniform,
        DistributionKind::HalfCauchy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DistributionKind::Normal => "Normal",
            DistributionKind::HalfNormal => "HalfNormal",
            DistributionKind::LogNormal => "LogNormal",
            DistributionKind::Gamma => "Gamma",
            DistributionKind::Beta => "Beta",
            DistributionKind::Exponential => "Exponential",
            DistributionKind::Uniform => "Uniform",
            DistributionKind::HalfCauchy => "HalfCauchy",
        }
    }

    /// Keywords this distribution accepts.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            DistributionKind::Normal | DistributionKind::LogNormal => &["mu", "sigma"],
            DistributionKind::HalfNormal => &["sigma"],
            DistributionKind::Gamma | DistributionKind::Beta => &["alpha", "beta", "mu", "sigma"],
            DistributionKind::Exponential => &["lam"],
            DistributionKind::Uniform => &["lower", "upper"],
            DistributionKind::HalfCauchy => &["beta"],
        }
    }

    /// Check that the supplied keywords form a complete parameterization.
    pub(crate) fn check_keywords<'a, I>(self, keys: I) -> TransformResult<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let keys: Vec<&str> = keys.into_iter().collect();
        let accepted = self.keywords();
        if let Some(bad) = keys.iter().find(|k| !accepted.contains(k)) {
            return Err(TransformError::invalid(format!(
                "{} does not accept `{bad}`; expected one of: {}",
                self.name(),
                accepted.join(", ")
            )));
        }

        if matches!(self, DistributionKind::Gamma | DistributionKind::Beta) {
            let has = |k: &str| keys.contains(&k);
            let rate_form = has("alpha") && has("beta") && !has("mu") && !has("sigma");
            let moment_form = has("mu") && has("sigma") && !has("alpha") && !has("beta");
            if !(rate_form || moment_form) {
                return Err(TransformError::invalid(format!(
                    "{} requires either `alpha` and `beta`, or `mu` and `sigma`",
                    self.name()
                )));
            }
        }
        Ok(())
    }

    /// Build a sampler from resolved scalar keywords.
    pub(crate) fn sampler<F>(self, arg: F) -> TransformResult<Sampler>
    where
        F: Fn(&str) -> Option<f64>,
    {
        let or = |key: &str, default: f64| arg(key).unwrap_or(default);
        let bad = |e: &dyn std::fmt::Display| TransformError::invalid(format!("{}: {e}", self.name()));

        let sampler = match self {
            DistributionKind::Normal => {
                Sampler::Normal(Normal::new(or("mu", 0.0), positive(self, "sigma", or("sigma", 1.0))?).map_err(|e| bad(&e))?)
            }
            DistributionKind::HalfNormal => {
                Sampler::HalfNormal(Normal::new(0.0, positive(self, "sigma", or("sigma", 1.0))?).map_err(|e| bad(&e))?)
            }
            DistributionKind::LogNormal => Sampler::LogNormal(
                LogNormal::new(or("mu", 0.0), positive(self, "sigma", or("sigma", 1.0))?).map_err(|e| bad(&e))?,
            ),
            DistributionKind::Gamma => {
                let (alpha, rate) = match (arg("alpha"), arg("beta")) {
                    (Some(alpha), Some(rate)) => (alpha, rate),
                    _ => {
                        let mu = positive(self, "mu", or("mu", f64::NAN))?;
                        let sigma = positive(self, "sigma", or("sigma", f64::NAN))?;
                        let var = sigma * sigma;
                        (mu * mu / var, mu / var)
                    }
                };
                let alpha = positive(self, "alpha", alpha)?;
                let rate = positive(self, "beta", rate)?;
                Sampler::Gamma(Gamma::new(alpha, 1.0 / rate).map_err(|e| bad(&e))?)
            }
            DistributionKind::Beta => {
                let (alpha, beta) = match (arg("alpha"), arg("beta")) {
                    (Some(alpha), Some(beta)) => (alpha, beta),
                    _ => {
                        let mu = or("mu", f64::NAN);
                        let sigma = positive(self, "sigma", or("sigma", f64::NAN))?;
                        if !(mu > 0.0 && mu < 1.0) {
                            return Err(TransformError::invalid(format!(
                                "Beta `mu` must lie in (0, 1), got {mu}"
                            )));
                        }
                        let kappa = mu * (1.0 - mu) / (sigma * sigma) - 1.0;
                        if kappa <= 0.0 {
                            return Err(TransformError::invalid(format!(
                                "Beta `sigma` too large for mu={mu}: sigma^2 must be < mu(1-mu)"
                            )));
                        }
                        (mu * kappa, (1.0 - mu) * kappa)
                    }
                };
                let alpha = positive(self, "alpha", alpha)?;
                let beta = positive(self, "beta", beta)?;
                Sampler::Beta(Beta::new(alpha, beta).map_err(|e| bad(&e))?)
            }
            DistributionKind::Exponential => {
                Sampler::Exponential(Exp::new(positive(self, "lam", or("lam", 1.0))?).map_err(|e| bad(&e))?)
            }
            DistributionKind::Uniform => {
                let lower = or("lower", 0.0);
                let upper = or("upper", 1.0);
                if !(lower.is_finite() && upper.is_finite() && lower < upper) {
                    return Err(TransformError::invalid(format!(
                        "Uniform requires finite lower < upper, got lower={lower}, upper={upper}"
                    )));
                }
                Sampler::Uniform(Uniform::new(lower, upper))
            }
            DistributionKind::HalfCauchy => {
                Sampler::HalfCauchy(Cauchy::new(0.0, positive(self, "beta", or("beta", 1.0))?).map_err(|e| bad(&e))?)
            }
        };
        Ok(sampler)
    }
}

impl std::fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DistributionKind {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DistributionKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = DistributionKind::ALL.iter().map(|k| k.name()).collect();
                TransformError::invalid(format!(
                    "Unknown distribution `{s}`. Choose from: {}",
                    names.join(", ")
                ))
            })
    }
}

fn positive(kind: DistributionKind, key: &str, value: f64) -> TransformResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(TransformError::invalid(format!(
            "{} `{key}` must be finite and > 0, got {value}",
            kind.name()
        )))
    }
}

/// A ready-to-draw distribution for one prior element.
#[derive(Debug, Clone)]
pub(crate) enum Sampler {
    Normal(Normal<f64>),
    HalfNormal(Normal<f64>),
    LogNormal(LogNormal<f64>),
    Gamma(Gamma<f64>),
    Beta(Beta<f64>),
    Exponential(Exp<f64>),
    Uniform(Uniform<f64>),
    HalfCauchy(Cauchy<f64>),
}

impl Sampler {
    pub(crate) fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Sampler::Normal(d) => d.sample(rng),
            Sampler::HalfNormal(d) => d.sample(rng).abs(),
            Sampler::LogNormal(d) => d.sample(rng),
            Sampler::Gamma(d) => d.sample(rng),
            Sampler::Beta(d) => d.sample(rng),
            Sampler::Exponential(d) => d.sample(rng),
            Sampler::Uniform(d) => d.sample(rng),
            Sampler::HalfCauchy(d) => d.sample(rng).abs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn parse_rejects_unknown_name() {
        let err = "Weibull".parse::<DistributionKind>().unwrap_err();
        assert!(err.to_string().contains("HalfNormal"));
    }

    #[test]
    fn gamma_requires_complete_parameterization() {
        assert!(DistributionKind::Gamma.check_keywords(["alpha", "beta"]).is_ok());
        assert!(DistributionKind::Gamma.check_keywords(["mu", "sigma"]).is_ok());
        assert!(DistributionKind::Gamma.check_keywords(["alpha", "sigma"]).is_err());
        assert!(DistributionKind::Gamma.check_keywords(["alpha"]).is_err());
    }

    #[test]
    fn half_normal_rejects_unknown_keyword() {
        assert!(DistributionKind::HalfNormal.check_keywords(["mu"]).is_err());
    }

    #[test]
    fn gamma_moment_form_matches_mean() {
        let sampler = DistributionKind::Gamma
            .sampler(|k| match k {
                "mu" => Some(2.0),
                "sigma" => Some(1.0),
                _ => None,
            })
            .unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let n = 20_000;
        let mean = (0..n).map(|_| sampler.draw(&mut rng)).sum::<f64>() / n as f64;
        assert!((mean - 2.0).abs() < 0.05, "mean {mean}");
    }

    #[test]
    fn half_normal_draws_are_non_negative() {
        let sampler = DistributionKind::HalfNormal.sampler(|_| None).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!((0..1000).all(|_| sampler.draw(&mut rng) >= 0.0));
    }

    #[test]
    fn beta_moment_form_rejects_infeasible_sigma() {
        let err = DistributionKind::Beta.sampler(|k| match k {
            "mu" => Some(0.5),
            "sigma" => Some(0.6),
            _ => None,
        });
        assert!(err.is_err());
    }
}
