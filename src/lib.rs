//! `mmm-curves` library crate.
//!
//! Saturation curves with priors for marketing-mix models, plus precondition
//! checks on tabular model input. The binary (`mmm`) is a thin wrapper around
//! this library so that:
//!
//! - core logic is testable without spawning processes
//! - transforms and validators are reusable by a larger model builder
//!
//! Entry points: [`transform::resolve_by_name`],
//! [`transform::SaturationTransform`] and [`validation::ValidationRunner`].

pub mod app;
pub mod cli;
pub mod context;
pub mod curves;
pub mod domain;
pub mod error;
pub mod io;
pub mod labeled;
pub mod math;
pub mod prior;
pub mod report;
pub mod transform;
pub mod validation;
