//! Minimal tabular input for validators.
//!
//! A `Table` is an ordered set of named, equal-length columns. Validators only
//! need column membership, uniqueness and a sign check, so that is all it
//! offers beyond construction.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::error::DataError;

/// One column of values.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Float(Vec<f64>),
    Int(Vec<i64>),
    Date(Vec<NaiveDate>),
    Text(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Float(v) => v.len(),
            Column::Int(v) => v.len(),
            Column::Date(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Column::Float(_) => "float",
            Column::Int(_) => "int",
            Column::Date(_) => "date",
            Column::Text(_) => "text",
        }
    }

    /// True when no value appears twice.
    ///
    /// Floats compare by value: `-0.0` equals `0.0` and all NaNs are equal.
    pub fn is_unique(&self) -> bool {
        match self {
            Column::Float(v) => all_distinct(v.iter().map(|&x| float_key(x))),
            Column::Int(v) => all_distinct(v.iter()),
            Column::Date(v) => all_distinct(v.iter()),
            Column::Text(v) => all_distinct(v.iter()),
        }
    }

    /// `Some(true)` if any value is below zero; `None` for non-numeric columns.
    pub fn any_negative(&self) -> Option<bool> {
        match self {
            Column::Float(v) => Some(v.iter().any(|&x| x < 0.0)),
            Column::Int(v) => Some(v.iter().any(|&x| x < 0)),
            Column::Date(_) | Column::Text(_) => None,
        }
    }
}

fn float_key(x: f64) -> u64 {
    if x.is_nan() {
        f64::NAN.to_bits()
    } else if x == 0.0 {
        0.0_f64.to_bits()
    } else {
        x.to_bits()
    }
}

fn all_distinct<T: Eq + std::hash::Hash>(values: impl Iterator<Item = T>) -> bool {
    let mut seen = HashSet::new();
    values.into_iter().all(|v| seen.insert(v))
}

impl From<Vec<f64>> for Column {
    fn from(v: Vec<f64>) -> Self {
        Column::Float(v)
    }
}

impl From<Vec<i64>> for Column {
    fn from(v: Vec<i64>) -> Self {
        Column::Int(v)
    }
}

impl From<Vec<NaiveDate>> for Column {
    fn from(v: Vec<NaiveDate>) -> Self {
        Column::Date(v)
    }
}

impl From<Vec<String>> for Column {
    fn from(v: Vec<String>) -> Self {
        Column::Text(v)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<(String, Column)>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a column. All columns must have the same length.
    pub fn with_column(mut self, name: impl Into<String>, column: impl Into<Column>) -> Result<Self, DataError> {
        let name = name.into();
        let column = column.into();
        if let Some((first, existing)) = self.columns.iter().find(|(n, _)| *n != name) {
            if existing.len() != column.len() {
                return Err(DataError::DimConflict {
                    dim: format!("rows ({first} vs {name})"),
                    left: existing.len(),
                    right: column.len(),
                });
            }
        }
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = column,
            None => self.columns.push((name, column)),
        }
        Ok(self)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, |(_, c)| c.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_column_keeps_order_and_checks_length() {
        let table = Table::new()
            .with_column("b", vec![1.0, 2.0])
            .unwrap()
            .with_column("a", vec![3_i64, 4])
            .unwrap();
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(table.n_rows(), 2);
        assert!(table.with_column("c", vec![1.0]).is_err());
    }

    #[test]
    fn float_uniqueness_ignores_zero_sign_and_nan_payload() {
        assert!(!Column::Float(vec![0.0, -0.0]).is_unique());
        let other_nan = f64::from_bits(f64::NAN.to_bits() | 1);
        assert!(!Column::Float(vec![f64::NAN, other_nan]).is_unique());
        assert!(Column::Float(vec![0.0, 1.0, f64::NAN]).is_unique());
    }

    #[test]
    fn uniqueness_and_sign() {
        let dates = Column::Date(vec![
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        ]);
        assert!(!dates.is_unique());
        assert_eq!(dates.any_negative(), None);

        let spend = Column::Float(vec![0.0, 1.5, -0.1]);
        assert!(spend.is_unique());
        assert_eq!(spend.any_negative(), Some(true));
    }
}
