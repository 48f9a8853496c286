//! Probabilistic model context used while applying transforms.
//!
//! - `Model`: coordinates, named random variables, prior sampling
//! - `SymbolicTensor`: an unevaluated curve over an input array

pub mod model;
pub mod tensor;

pub use model::*;
pub use tensor::*;
