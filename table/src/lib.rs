//! FILENAME: table/src/lib.rs
//! PURPOSE: Immutable in-memory tabular dataset shared by the query crates.
//! CONTEXT: Re-exports public types for use by other crates.

pub mod dataset;
pub mod error;
pub mod value;

pub use dataset::{Column, Dataset};
pub use error::TableError;
pub use value::{KeyValue, OrderedFloat, StorageType, Value};
