//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - sampling configuration (`SamplingConfig`)
//! - well-known dimension names (`chain`, `draw`, `x`)
//! - curve requests and exported summaries (`CurveRequest`, `CurveFile`, `CurveBand`)

pub mod types;

pub use types::*;
