//! Saturation transforms and the registry that resolves them by name.
//!
//! - `registry`: registered curves, default priors, name resolution
//! - `saturation`: `SaturationTransform` (apply, prior and curve sampling, dict form)

pub mod registry;
pub mod saturation;

pub use registry::*;
pub use saturation::*;
