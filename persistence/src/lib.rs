//! FILENAME: persistence/src/lib.rs
//! PURPOSE: Loads quote datasets from delimited text files.

pub mod csv_reader;
pub mod error;

pub use csv_reader::{load_csv, read_csv, CsvOptions};
pub use error::PersistenceError;
