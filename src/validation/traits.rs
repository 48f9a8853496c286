//! Column validators.
//!
//! Each validator owns exactly one attribute (a column name or a list of
//! column names) and checks it against a `Table`. A type implementing
//! `ValidationMethod` is a validator; composites list the ones they carry.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ValidationError, ValidationResult};
use crate::validation::table::Table;

/// A single precondition check on tabular input.
pub trait ValidationMethod: Send + Sync {
    /// Attribute name used in messages (e.g. `channel_columns`).
    fn name(&self) -> &'static str;

    fn validate(&self, data: &Table) -> ValidationResult<()>;
}

/// Column names as they arrive from configuration: a sequence, or a bare name
/// (rejected where a sequence is required).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnList {
    Sequence(Vec<String>),
    Scalar(String),
}

impl ColumnList {
    pub fn sequence<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ColumnList::Sequence(names.into_iter().map(Into::into).collect())
    }
}

impl From<Vec<String>> for ColumnList {
    fn from(names: Vec<String>) -> Self {
        ColumnList::Sequence(names)
    }
}

impl From<Vec<&str>> for ColumnList {
    fn from(names: Vec<&str>) -> Self {
        ColumnList::sequence(names)
    }
}

impl From<&str> for ColumnList {
    fn from(name: &str) -> Self {
        ColumnList::Scalar(name.to_string())
    }
}

/// Target column must be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateTargetColumn {
    pub target_column: String,
}

impl ValidateTargetColumn {
    pub fn new(target_column: impl Into<String>) -> Self {
        Self {
            target_column: target_column.into(),
        }
    }
}

impl ValidationMethod for ValidateTargetColumn {
    fn name(&self) -> &'static str {
        "target"
    }

    fn validate(&self, data: &Table) -> ValidationResult<()> {
        debug!(column = %self.target_column, "validating target column");
        require_column(self.name(), &self.target_column, data)
    }
}

/// Date column must be present with no repeated values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateDateColumn {
    pub date_column: String,
}

impl ValidateDateColumn {
    pub fn new(date_column: impl Into<String>) -> Self {
        Self {
            date_column: date_column.into(),
        }
    }
}

impl ValidationMethod for ValidateDateColumn {
    fn name(&self) -> &'static str {
        "date_col"
    }

    fn validate(&self, data: &Table) -> ValidationResult<()> {
        debug!(column = %self.date_column, "validating date column");
        let Some(column) = data.column(&self.date_column) else {
            return Err(ValidationError::MissingColumn {
                attribute: self.name(),
                column: self.date_column.clone(),
            });
        };
        if !column.is_unique() {
            return Err(ValidationError::DuplicateValues {
                attribute: self.name(),
                subject: self.date_column.clone(),
            });
        }
        Ok(())
    }
}

/// Channel columns: a non-empty sequence of distinct, present, non-negative
/// numeric columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateChannelColumns {
    pub channel_columns: ColumnList,
}

impl ValidateChannelColumns {
    pub fn new(channel_columns: impl Into<ColumnList>) -> Self {
        Self {
            channel_columns: channel_columns.into(),
        }
    }
}

impl ValidationMethod for ValidateChannelColumns {
    fn name(&self) -> &'static str {
        "channel_columns"
    }

    fn validate(&self, data: &Table) -> ValidationResult<()> {
        debug!(columns = ?self.channel_columns, "validating channel columns");
        let columns = check_column_list(self.name(), &self.channel_columns, data)?;

        let mut negative = Vec::new();
        for name in columns {
            let Some(column) = data.column(name) else { continue };
            match column.any_negative() {
                Some(true) => negative.push(name.clone()),
                Some(false) => {}
                None => {
                    return Err(ValidationError::InvalidType {
                        attribute: self.name(),
                        reason: format!("column `{name}` is {}, expected numeric", column.type_name()),
                    });
                }
            }
        }
        if !negative.is_empty() {
            return Err(ValidationError::NegativeValue {
                attribute: self.name(),
                columns: negative,
            });
        }
        Ok(())
    }
}

/// Control columns: optional; when given, same structural checks as channels.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidateControlColumns {
    pub control_columns: Option<ColumnList>,
}

impl ValidateControlColumns {
    pub fn new(control_columns: Option<ColumnList>) -> Self {
        Self { control_columns }
    }
}

impl ValidationMethod for ValidateControlColumns {
    fn name(&self) -> &'static str {
        "control_columns"
    }

    fn validate(&self, data: &Table) -> ValidationResult<()> {
        let Some(controls) = &self.control_columns else {
            debug!("no control columns declared");
            return Ok(());
        };
        debug!(columns = ?controls, "validating control columns");
        check_column_list(self.name(), controls, data).map(|_| ())
    }
}

fn require_column(attribute: &'static str, column: &str, data: &Table) -> ValidationResult<()> {
    if data.has_column(column) {
        Ok(())
    } else {
        Err(ValidationError::MissingColumn {
            attribute,
            column: column.to_string(),
        })
    }
}

/// Sequence, non-empty, all present, no repeats (in that order).
fn check_column_list<'a>(
    attribute: &'static str,
    list: &'a ColumnList,
    data: &Table,
) -> ValidationResult<&'a [String]> {
    let columns = match list {
        ColumnList::Sequence(columns) => columns.as_slice(),
        ColumnList::Scalar(name) => {
            return Err(ValidationError::InvalidType {
                attribute,
                reason: format!("must be a sequence of column names, got the single name `{name}`"),
            });
        }
    };
    if columns.is_empty() {
        return Err(ValidationError::EmptyCollection { attribute });
    }
    for column in columns {
        require_column(attribute, column, data)?;
    }
    for (i, column) in columns.iter().enumerate() {
        if columns[..i].contains(column) {
            return Err(ValidationError::DuplicateValues {
                attribute,
                subject: format!("{columns:?}"),
            });
        }
    }
    Ok(columns)
}
