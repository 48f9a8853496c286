//! Mathematical utilities: saturation functions and evaluation grids.

pub mod grid;
pub mod saturation;

pub use grid::*;
pub use saturation::*;
