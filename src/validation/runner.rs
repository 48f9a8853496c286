//! Running validators a composite carries.
//!
//! A composite implements [`Validate`] by listing its validators in the order
//! they should run. [`ValidationRunner::run`] executes them in that order and
//! stops at the first failure.

use tracing::debug;

use crate::error::ValidationResult;
use crate::validation::table::Table;
use crate::validation::traits::{
    ColumnList, ValidateChannelColumns, ValidateControlColumns, ValidateDateColumn, ValidateTargetColumn,
    ValidationMethod,
};

/// A type composed of zero or more validators.
pub trait Validate {
    /// Validators in execution order.
    fn validation_methods(&self) -> Vec<&dyn ValidationMethod>;

    fn validate(&self, data: &Table) -> ValidationResult<()> {
        ValidationRunner::run(self, data)
    }
}

pub struct ValidationRunner;

impl ValidationRunner {
    pub fn run<V: Validate + ?Sized>(composite: &V, data: &Table) -> ValidationResult<()> {
        let methods = composite.validation_methods();
        debug!(validators = methods.len(), rows = data.n_rows(), "running validation");
        for method in methods {
            if let Err(err) = method.validate(data) {
                debug!(validator = method.name(), error = %err, "validation failed");
                return Err(err);
            }
        }
        Ok(())
    }
}

/// An owned, ordered list of validators.
#[derive(Default)]
pub struct ValidationSuite {
    methods: Vec<Box<dyn ValidationMethod>>,
}

impl ValidationSuite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<M: ValidationMethod + 'static>(mut self, method: M) -> Self {
        self.methods.push(Box::new(method));
        self
    }

    pub fn with_target(self, column: impl Into<String>) -> Self {
        self.with(ValidateTargetColumn::new(column))
    }

    pub fn with_date(self, column: impl Into<String>) -> Self {
        self.with(ValidateDateColumn::new(column))
    }

    pub fn with_channels(self, columns: impl Into<ColumnList>) -> Self {
        self.with(ValidateChannelColumns::new(columns))
    }

    pub fn with_controls(self, columns: Option<ColumnList>) -> Self {
        self.with(ValidateControlColumns::new(columns))
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl Validate for ValidationSuite {
    fn validation_methods(&self) -> Vec<&dyn ValidationMethod> {
        self.methods.iter().map(|m| &**m).collect()
    }
}
