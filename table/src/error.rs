//! FILENAME: table/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("Column '{name}' has {actual} rows, expected {expected}")]
    RaggedColumn {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("Row mask has {actual} entries, dataset has {expected} rows")]
    MaskLength { expected: usize, actual: usize },
}
