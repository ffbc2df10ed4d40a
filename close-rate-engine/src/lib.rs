//! FILENAME: close-rate-engine/src/lib.rs
//! Quote close-rate summary engine.
//!
//! Computes a grouped, multi-filtered summary over an immutable quote dataset:
//! per group, the number of distinct quotes, the number of those that sold,
//! and the close rate between them. The crate depends on `table` only for the
//! dataset types.
//!
//! Layers:
//! - `classify`: Field kinds, computed once per dataset
//! - `definition`: Serializable query configuration (what the query IS)
//! - `domain`: Constraint choices a caller can offer per field
//! - `filter`: Filter slots to a row mask
//! - `aggregate`: Grouping and per-group measures
//! - `view`: Result rows (WHAT we hand back)
//! - `format`: Display strings for the exhibit table
//! - `engine`: Facade tying the stages together

pub mod aggregate;
pub mod classify;
pub mod definition;
pub mod domain;
pub mod engine;
pub mod error;
pub mod filter;
pub mod format;
pub mod view;

pub use aggregate::{aggregate, effective_group_fields};
pub use classify::{classify, FieldInfo, FieldKind, FieldKinds};
pub use definition::*;
pub use domain::{filter_domain, FilterDomain};
pub use engine::CloseRateEngine;
pub use error::QueryError;
pub use filter::{apply_filters, filter_mask};
pub use format::{format_close_rate, format_count, render_table, DisplayTable, FieldCatalog};
pub use view::{AggregationRow, CloseRate, SummaryTable};
