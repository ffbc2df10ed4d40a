//! FILENAME: close-rate-engine/src/error.rs

use table::TableError;
use thiserror::Error;

use crate::classify::FieldKind;

/// Configuration errors raised before a stage computes anything.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid range for '{field}': [{lo}, {hi}]")]
    InvalidRange { field: String, lo: f64, hi: f64 },

    #[error("Constraint does not fit {kind:?} field '{field}'")]
    ConstraintMismatch { field: String, kind: FieldKind },

    #[error("Dataset is missing required column: {0}")]
    MissingColumn(String),

    #[error("At most {max} {what} slots are supported, got {actual}")]
    TooManySlots {
        what: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("Table error: {0}")]
    Table(#[from] TableError),
}
