use thiserror::Error;

/// Input checks that block an action and raise a notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter both Operator and Part.")]
    MissingHeader,

    #[error("Nominal value must be a number.")]
    InvalidNominal,

    #[error("Tolerance must be a number.")]
    InvalidTolerance,

    #[error("Please enter a name for the new operator.")]
    MissingOperatorName,

    #[error("Operator '{0}' already has a column.")]
    DuplicateOperator(String),
}
