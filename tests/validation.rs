use chrono::NaiveDate;

use mmm_curves::error::ValidationError;
use mmm_curves::validation::{
    ColumnList, Table, Validate, ValidateChannelColumns, ValidateControlColumns, ValidateDateColumn,
    ValidateTargetColumn, ValidationMethod, ValidationRunner, ValidationSuite,
};

fn dates(n: u32) -> Vec<NaiveDate> {
    (1..=n).map(|d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap()).collect()
}

fn toy_data() -> Table {
    Table::new()
        .with_column("date", dates(4))
        .unwrap()
        .with_column("y", vec![10.0, 12.0, 11.0, 13.0])
        .unwrap()
        .with_column("channel_1", vec![1.0, 0.0, 2.5, 3.0])
        .unwrap()
        .with_column("channel_2", vec![0.0, 4.0, 1.0, 0.5])
        .unwrap()
        .with_column("control_1", vec![-1.0, 0.0, 1.0, 0.0])
        .unwrap()
}

/// A model that validates its inputs with all four validators.
struct ToyModel {
    target: ValidateTargetColumn,
    date: ValidateDateColumn,
    channels: ValidateChannelColumns,
    controls: ValidateControlColumns,
}

impl ToyModel {
    fn new(channels: impl Into<ColumnList>, controls: Option<ColumnList>) -> Self {
        Self {
            target: ValidateTargetColumn::new("y"),
            date: ValidateDateColumn::new("date"),
            channels: ValidateChannelColumns::new(channels),
            controls: ValidateControlColumns::new(controls),
        }
    }
}

impl Validate for ToyModel {
    fn validation_methods(&self) -> Vec<&dyn ValidationMethod> {
        vec![&self.target as &dyn ValidationMethod, &self.date, &self.channels, &self.controls]
    }
}

#[test]
fn valid_input_passes_every_validator() {
    let model = ToyModel::new(vec!["channel_1", "channel_2"], Some(vec!["control_1"].into()));
    assert!(ValidationRunner::run(&model, &toy_data()).is_ok());
}

#[test]
fn missing_target_column() {
    let data = Table::new()
        .with_column("date", dates(2))
        .unwrap()
        .with_column("channel_1", vec![1.0, 2.0])
        .unwrap();
    let model = ToyModel::new(vec!["channel_1"], None);
    assert_eq!(
        model.validate(&data),
        Err(ValidationError::MissingColumn {
            attribute: "target",
            column: "y".to_string()
        })
    );
}

#[test]
fn repeated_dates() {
    let mut days = dates(3);
    days.push(days[0]);
    let data = toy_data().with_column("date", days).unwrap();
    let err = ValidateDateColumn::new("date").validate(&data).unwrap_err();
    assert!(matches!(err, ValidationError::DuplicateValues { attribute: "date_col", .. }));
}

#[test]
fn empty_channel_columns() {
    let model = ToyModel::new(Vec::<String>::new(), None);
    assert_eq!(
        model.validate(&toy_data()),
        Err(ValidationError::EmptyCollection {
            attribute: "channel_columns"
        })
    );
}

#[test]
fn negative_channel_values() {
    let data = toy_data().with_column("channel_2", vec![0.0, -4.0, 1.0, 0.5]).unwrap();
    let model = ToyModel::new(vec!["channel_1", "channel_2"], None);
    assert!(matches!(
        model.validate(&data),
        Err(ValidationError::NegativeValue { columns, .. }) if columns == vec!["channel_2".to_string()]
    ));
}

#[test]
fn channel_columns_must_be_a_sequence() {
    let model = ToyModel::new("channel_1", None);
    assert!(matches!(
        model.validate(&toy_data()),
        Err(ValidationError::InvalidType {
            attribute: "channel_columns",
            ..
        })
    ));
}

#[test]
fn absent_controls_are_trivially_valid() {
    assert!(ValidateControlColumns::new(None).validate(&Table::new()).is_ok());
}

#[test]
fn first_failure_wins() {
    // Both the target and the channels are wrong; the target validator runs first.
    let data = Table::new().with_column("date", dates(2)).unwrap();
    let suite = ValidationSuite::new()
        .with_target("y")
        .with_channels(Vec::<String>::new());
    assert!(matches!(
        suite.validate(&data),
        Err(ValidationError::MissingColumn { attribute: "target", .. })
    ));
}
