//! Labeled arrays and datasets used for parameter draws and sampled curves.

pub mod array;
pub mod dataset;

pub use array::*;
pub use dataset::*;
