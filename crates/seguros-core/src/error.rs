//! # Error Hierarchy
//!
//! - [`ValidationError`]: a candidate record broke one rule. Every variant
//!   names the offending field and renders a client-facing message.
//! - [`StoreError`]: the repository failed.
//! - [`InsuredError`]: what the service returns; the API maps it to HTTP.

use thiserror::Error;

use crate::model::InsuredId;
use crate::repository::UniqueField;
use crate::validation::Field;

/// A candidate record was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is empty or absent.
    #[error("{} is required.", .0.label())]
    MissingField(Field),

    /// A numeric field is out of range.
    #[error("{} must be greater than zero.", .0.label())]
    InvalidValue(Field),

    /// A field could not be parsed.
    #[error("Invalid {} format.", .0.label().to_lowercase())]
    InvalidFormat(Field),

    /// A date lies after the validation instant.
    #[error("{} cannot be in the future.", .0.label())]
    FutureDate(Field),

    /// Another record already holds this value.
    #[error("{} {value} is already in use.", .field.label())]
    DuplicateValue {
        /// The unique field.
        field: Field,
        /// The conflicting value.
        value: String,
    },
}

impl ValidationError {
    /// Machine-readable code for API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidValue(_) => "INVALID_VALUE",
            Self::InvalidFormat(_) => "INVALID_FORMAT",
            Self::FutureDate(_) => "FUTURE_DATE",
            Self::DuplicateValue { .. } => "DUPLICATE_VALUE",
        }
    }

    /// The field the rule applies to.
    pub fn field(&self) -> Field {
        match self {
            Self::MissingField(f)
            | Self::InvalidValue(f)
            | Self::InvalidFormat(f)
            | Self::FutureDate(f) => *f,
            Self::DuplicateValue { field, .. } => *field,
        }
    }
}

/// Repository failure.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record with this id.
    #[error("insured {0} not found")]
    NotFound(InsuredId),

    /// A storage-level uniqueness guarantee rejected the write.
    #[error("unique constraint on {field} violated by {value:?}")]
    Duplicate {
        /// The unique field.
        field: UniqueField,
        /// The conflicting value.
        value: String,
    },

    /// Any other storage failure (connectivity, decoding, exhaustion).
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Outcome of a failed service operation.
#[derive(Error, Debug)]
pub enum InsuredError {
    /// Client input was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The target record does not exist.
    #[error("Insured with ID {0} not found.")]
    NotFound(InsuredId),

    /// The store failed unexpectedly.
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl From<StoreError> for InsuredError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::Duplicate { field, value } => Self::Validation(ValidationError::DuplicateValue {
                field: field.into(),
                value,
            }),
            StoreError::Backend(message) => Self::Persistence(message),
        }
    }
}
