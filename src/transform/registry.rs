//! Saturation registry: curve entries, default priors and name lookup.
//!
//! The table is built once, on first access. Building it checks that each
//! curve's declared parameter list matches the keys of its default priors, so
//! a mismatch fails loudly the first time anything touches the registry.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::curves::CurveKind;
use crate::error::{TransformError, TransformResult};
use crate::prior::Prior;
use crate::transform::saturation::SaturationTransform;

/// Prefix shared by every saturation transform's variables.
pub const SATURATION_PREFIX: &str = "saturation";

/// One registered curve.
#[derive(Debug, Clone)]
pub struct CurveEntry {
    kind: CurveKind,
    prefix: &'static str,
    default_priors: BTreeMap<String, Prior>,
}

impl CurveEntry {
    /// Bind a curve to its default priors.
    ///
    /// Fails if the prior keys differ from the curve's parameter list.
    pub fn new(
        kind: CurveKind,
        prefix: &'static str,
        default_priors: BTreeMap<String, Prior>,
    ) -> TransformResult<Self> {
        let declared: BTreeSet<&str> = kind.parameters().iter().copied().collect();
        let bound: BTreeSet<&str> = default_priors.keys().map(String::as_str).collect();
        if declared.len() != kind.parameters().len() || declared != bound {
            return Err(TransformError::invalid(format!(
                "curve `{kind}` declares parameters {:?} but default priors cover {:?}",
                kind.parameters(),
                bound
            )));
        }
        Ok(Self {
            kind,
            prefix,
            default_priors,
        })
    }

    pub fn kind(&self) -> CurveKind {
        self.kind
    }

    pub fn lookup_name(&self) -> &'static str {
        self.kind.lookup_name()
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    pub fn parameters(&self) -> &'static [&'static str] {
        self.kind.parameters()
    }

    pub fn default_priors(&self) -> &BTreeMap<String, Prior> {
        &self.default_priors
    }

    pub fn function(&self, x: f64, params: &[f64]) -> TransformResult<f64> {
        self.kind.checked_evaluate(x, params)
    }
}

#[derive(Debug)]
pub struct Registry {
    entries: Vec<CurveEntry>,
}

impl Registry {
    fn try_new(entries: Vec<CurveEntry>) -> TransformResult<Self> {
        for kind in CurveKind::ALL {
            let count = entries.iter().filter(|e| e.kind == kind).count();
            if count != 1 {
                return Err(TransformError::invalid(format!(
                    "curve `{kind}` registered {count} times"
                )));
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CurveEntry] {
        &self.entries
    }

    pub fn lookup(&self, name: &str) -> Option<&CurveEntry> {
        self.entries.iter().find(|e| e.lookup_name() == name)
    }

    /// Entry for a curve kind. Every kind is registered.
    pub fn entry(&self, kind: CurveKind) -> &CurveEntry {
        match self.entries.iter().find(|e| e.kind == kind) {
            Some(entry) => entry,
            None => unreachable!("registry construction checks every curve kind"),
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(CurveEntry::lookup_name).collect()
    }
}

fn default_priors(kind: CurveKind) -> TransformResult<BTreeMap<String, Prior>> {
    let priors = match kind {
        CurveKind::Logistic | CurveKind::InverseScaledLogistic => vec![
            ("lam", Prior::gamma(3.0, 1.0)?),
            ("beta", Prior::half_normal(2.0)?),
        ],
        CurveKind::Tanh => vec![("b", Prior::half_normal(1.0)?), ("c", Prior::half_normal(1.0)?)],
        CurveKind::TanhBaselined => vec![
            ("x0", Prior::half_normal(1.0)?),
            ("gain", Prior::half_normal(1.0)?),
            ("r", Prior::half_normal(1.0)?),
            ("beta", Prior::half_normal(1.0)?),
        ],
        CurveKind::MichaelisMenten => vec![
            ("alpha", Prior::gamma_mu_sigma(2.0, 1.0)?),
            ("lam", Prior::half_normal(1.0)?),
        ],
        CurveKind::Hill => vec![
            ("sigma", Prior::half_normal(1.5)?),
            ("beta", Prior::half_normal(1.5)?),
            ("lam", Prior::half_normal(1.5)?),
        ],
        CurveKind::Root => vec![
            ("alpha", Prior::beta(1.0, 2.0)?),
            ("beta", Prior::gamma_mu_sigma(1.0, 1.0)?),
        ],
    };
    Ok(priors.into_iter().map(|(k, p)| (k.to_string(), p)).collect())
}

fn build_registry() -> TransformResult<Registry> {
    let entries = CurveKind::ALL
        .into_iter()
        .map(|kind| CurveEntry::new(kind, SATURATION_PREFIX, default_priors(kind)?))
        .collect::<TransformResult<Vec<_>>>()?;
    Registry::try_new(entries)
}

static REGISTRY: LazyLock<Registry> = LazyLock::new(|| match build_registry() {
    Ok(registry) => registry,
    Err(err) => panic!("saturation registry is inconsistent: {err}"),
});

/// The process-wide registry.
///
/// # Panics
/// Panics on first access if a registered curve's parameters and default
/// priors disagree.
pub fn registry() -> &'static Registry {
    &REGISTRY
}

/// Canonical names, in registration order.
pub fn registered_names() -> Vec<&'static str> {
    registry().names()
}

/// Default-configured transform for a canonical (case-sensitive) name.
pub fn resolve_by_name(name: &str) -> TransformResult<SaturationTransform> {
    match registry().lookup(name) {
        Some(entry) => {
            debug!(name, "resolved saturation transform");
            Ok(SaturationTransform::new(entry.kind()))
        }
        None => Err(TransformError::UnknownTransform {
            name: name.to_string(),
            choices: registered_names().into_iter().map(str::to_string).collect(),
        }),
    }
}

/// Already-built transforms resolve to themselves.
pub fn resolve_instance(transform: &SaturationTransform) -> &SaturationTransform {
    transform
}

/// A transform picked by name or supplied fully configured (e.g. in a config file).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SaturationChoice {
    Named(String),
    Transform(SaturationTransform),
}

impl SaturationChoice {
    pub fn resolve(&self) -> TransformResult<Cow<'_, SaturationTransform>> {
        match self {
            SaturationChoice::Named(name) => resolve_by_name(name).map(Cow::Owned),
            SaturationChoice::Transform(transform) => Ok(Cow::Borrowed(resolve_instance(transform))),
        }
    }
}

impl From<&str> for SaturationChoice {
    fn from(name: &str) -> Self {
        SaturationChoice::Named(name.to_string())
    }
}

impl From<SaturationTransform> for SaturationChoice {
    fn from(transform: SaturationTransform) -> Self {
        SaturationChoice::Transform(transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_builds_and_covers_every_kind() {
        let names = registered_names();
        assert_eq!(
            names,
            vec![
                "logistic",
                "inverse_scaled_logistic",
                "tanh",
                "tanh_baselined",
                "michaelis_menten",
                "hill",
                "root"
            ]
        );
    }

    #[test]
    fn entry_rejects_mismatched_prior_keys() {
        let priors = BTreeMap::from([("alpha".to_string(), Prior::half_normal(1.0).unwrap())]);
        assert!(CurveEntry::new(CurveKind::MichaelisMenten, SATURATION_PREFIX, priors).is_err());
    }

    #[test]
    fn entry_function_rejects_short_parameter_slice() {
        let entry = registry().entry(CurveKind::Root);
        assert!(entry.function(4.0, &[0.5]).is_err());
        assert!((entry.function(4.0, &[0.5, 1.0]).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn resolve_is_case_sensitive() {
        assert!(resolve_by_name("hill").is_ok());
        assert!(matches!(
            resolve_by_name("Hill"),
            Err(TransformError::UnknownTransform { .. })
        ));
    }

    #[test]
    fn choice_resolves_instances_by_reference() {
        let choice = SaturationChoice::from(SaturationTransform::new(CurveKind::Root));
        let SaturationChoice::Transform(inner) = &choice else {
            unreachable!()
        };
        let resolved = choice.resolve().unwrap();
        assert!(matches!(resolved, Cow::Borrowed(_)));
        assert!(std::ptr::eq(&*resolved, inner));
    }

    #[test]
    fn choice_deserializes_from_name_or_dict() {
        let named: SaturationChoice = serde_json::from_str("\"tanh\"").unwrap();
        assert_eq!(named.resolve().unwrap().kind(), CurveKind::Tanh);

        let dict: SaturationChoice =
            serde_json::from_value(serde_json::json!({"lookup_name": "hill", "priors": {}})).unwrap();
        assert_eq!(dict.resolve().unwrap().kind(), CurveKind::Hill);
    }
}
