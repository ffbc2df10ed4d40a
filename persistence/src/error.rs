//! FILENAME: persistence/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV read error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Invalid dataset: {0}")]
    Table(#[from] table::TableError),

    #[error("Input has no header row")]
    Empty,
}
