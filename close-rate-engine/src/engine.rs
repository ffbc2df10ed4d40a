//! FILENAME: close-rate-engine/src/engine.rs
//! Close Rate Engine - the entry point the presentation layer calls.
//!
//! Holds the immutable dataset and its field classification, computed on
//! first use and kept for the lifetime of the engine. Every query is a pure
//! function of the dataset and the query definition, so one engine can serve
//! concurrent callers.

use std::sync::Arc;

use log::{debug, info, warn};
use once_cell::sync::OnceCell;
use table::Dataset;

use crate::aggregate;
use crate::classify::{classify, FieldKinds};
use crate::definition::{FilterSpec, GroupSpec, QueryDefinition};
use crate::domain::{self, FilterDomain};
use crate::error::QueryError;
use crate::filter;
use crate::view::SummaryTable;

pub struct CloseRateEngine {
    dataset: Arc<Dataset>,
    kinds: OnceCell<FieldKinds>,
}

impl CloseRateEngine {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        CloseRateEngine {
            dataset,
            kinds: OnceCell::new(),
        }
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    /// Field classification, computed once.
    pub fn kinds(&self) -> &FieldKinds {
        self.kinds.get_or_init(|| {
            let kinds = classify(&self.dataset);
            info!(
                "classified {} fields over {} rows",
                kinds.len(),
                self.dataset.row_count()
            );
            kinds
        })
    }

    /// What the caller may offer as a constraint for `field`.
    pub fn filter_domain(&self, field: &str) -> Result<FilterDomain, QueryError> {
        domain::filter_domain(&self.dataset, self.kinds(), field)
    }

    /// Applies filter slots to the engine's dataset.
    pub fn apply_filters(&self, filters: &[FilterSpec]) -> Result<Dataset, QueryError> {
        filter::apply_filters(&self.dataset, self.kinds(), filters)
            .inspect_err(|e| warn!("filter stage rejected: {}", e))
    }

    /// Aggregates an already filtered dataset derived from the engine's dataset.
    pub fn aggregate(&self, dataset: &Dataset, group: &GroupSpec) -> Result<SummaryTable, QueryError> {
        aggregate::aggregate(dataset, self.kinds(), group)
            .inspect_err(|e| warn!("aggregation stage rejected: {}", e))
    }

    /// Runs a full query: filters, then grouping.
    pub fn run(&self, query: &QueryDefinition) -> Result<SummaryTable, QueryError> {
        let filtered = self.apply_filters(&query.filters)?;
        debug!(
            "query kept {} of {} rows",
            filtered.row_count(),
            self.dataset.row_count()
        );
        self.aggregate(&filtered, &query.group)
    }
}
