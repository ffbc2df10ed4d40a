//! FILENAME: close-rate-engine/src/domain.rs
//! Filter Domain - what a caller can offer as a constraint for one field.
//!
//! Numeric fields get their observed range (integer steps for integer fields),
//! categorical fields get their sorted distinct labels, and numeric fields
//! without any data get nothing to filter on.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use table::Dataset;

use crate::classify::{FieldKind, FieldKinds};
use crate::definition::FilterConstraint;
use crate::error::QueryError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterDomain {
    /// Numeric field without a single present value.
    NoData,
    IntegerRange { min: i64, max: i64 },
    ContinuousRange { min: f64, max: f64 },
    /// Sorted distinct string forms of the present values.
    Values(Vec<String>),
}

impl FilterDomain {
    /// The constraint that narrows nothing yet: the full range, or no selection.
    pub fn default_constraint(&self) -> FilterConstraint {
        match self {
            FilterDomain::NoData => FilterConstraint::Unset,
            FilterDomain::IntegerRange { min, max } => FilterConstraint::Range {
                lo: *min as f64,
                hi: *max as f64,
            },
            FilterDomain::ContinuousRange { min, max } => FilterConstraint::Range {
                lo: *min,
                hi: *max,
            },
            FilterDomain::Values(_) => FilterConstraint::Values(BTreeSet::new()),
        }
    }
}

/// Computes the filter domain of `field`.
pub fn filter_domain(
    dataset: &Dataset,
    kinds: &FieldKinds,
    field: &str,
) -> Result<FilterDomain, QueryError> {
    let column = dataset
        .column(field)
        .ok_or_else(|| QueryError::UnknownField(field.to_string()))?;
    let kind = kinds
        .kind(field)
        .ok_or_else(|| QueryError::UnknownField(field.to_string()))?;

    if kind == FieldKind::Categorical {
        let labels: BTreeSet<String> = column
            .present_values()
            .filter_map(|v| v.display_string())
            .collect();
        return Ok(FilterDomain::Values(labels.into_iter().collect()));
    }

    let bounds = column
        .present_values()
        .filter_map(|v| v.as_f64())
        .fold(None, |acc: Option<(f64, f64)>, n| match acc {
            None => Some((n, n)),
            Some((lo, hi)) => Some((lo.min(n), hi.max(n))),
        });

    let domain = match (bounds, kind) {
        (None, _) => FilterDomain::NoData,
        (Some((min, max)), FieldKind::IntegerNumeric) => FilterDomain::IntegerRange {
            min: min as i64,
            max: max as i64,
        },
        (Some((min, max)), _) => FilterDomain::ContinuousRange { min, max },
    };

    Ok(domain)
}
