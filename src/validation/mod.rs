//! Precondition checks on tabular model input.
//!
//! - `table`: the column store validators read
//! - `traits`: the four column validators and `ColumnList`
//! - `runner`: `Validate` composites, `ValidationRunner`, `ValidationSuite`

pub mod runner;
pub mod table;
pub mod traits;

pub use runner::*;
pub use table::*;
pub use traits::*;
