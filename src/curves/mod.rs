//! Saturation curve kinds.
//!
//! Curves are small, pure functions dispatched by kind so that transform code
//! can stay generic over which curve is configured.

pub mod curve;

pub use curve::*;
