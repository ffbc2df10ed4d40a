//! FILENAME: close-rate-engine/src/definition.rs
//! Query Definition - The serializable configuration of one summary query.
//!
//! This module contains all the types needed to DESCRIBE a query:
//! up to four filter slots and up to four grouping slots, each possibly empty.
//! These structures are designed to be:
//! - Serializable (a query can be stored or sent as JSON)
//! - Constructed fresh per query and never mutated by the engine

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// Number of filter slots and grouping slots a query can carry.
pub const MAX_SLOTS: usize = 4;

/// Identifier column. Also the fallback grouping key.
pub const QUOTE_ID_FIELD: &str = "quote_id";

/// Column telling whether a quote converted into a sale.
pub const ISSUED_FIELD: &str = "issued";

/// Value of `issued` that marks a sale.
pub const SALE_SENTINEL: &str = "Y";

// ============================================================================
// FILTERS
// ============================================================================

/// What a filter slot constrains its field to.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum FilterConstraint {
    /// No constraint chosen yet. Always a no-op.
    #[default]
    Unset,
    /// Closed numeric interval, inclusive at both ends.
    Range { lo: f64, hi: f64 },
    /// Set of category labels compared against the value's string form.
    /// An empty set is a no-op.
    Values(BTreeSet<String>),
}

/// One filter slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// The field to filter on. `None` makes the slot inert.
    #[serde(default)]
    pub field: Option<String>,

    #[serde(default)]
    pub constraint: FilterConstraint,

    /// `true` keeps matching rows, `false` keeps non-matching rows.
    #[serde(default = "default_true")]
    pub include: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FilterSpec {
    fn default() -> Self {
        FilterSpec::none()
    }
}

impl FilterSpec {
    /// An inert slot.
    pub fn none() -> Self {
        FilterSpec {
            field: None,
            constraint: FilterConstraint::Unset,
            include: true,
        }
    }

    pub fn range(field: impl Into<String>, lo: f64, hi: f64) -> Self {
        FilterSpec {
            field: Some(field.into()),
            constraint: FilterConstraint::Range { lo, hi },
            include: true,
        }
    }

    pub fn values<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterSpec {
            field: Some(field.into()),
            constraint: FilterConstraint::Values(values.into_iter().map(Into::into).collect()),
            include: true,
        }
    }

    /// A field with no constraint chosen yet.
    pub fn unset(field: impl Into<String>) -> Self {
        FilterSpec {
            field: Some(field.into()),
            constraint: FilterConstraint::Unset,
            include: true,
        }
    }

    /// Turns the slot into an exclude filter.
    pub fn excluding(mut self) -> Self {
        self.include = false;
        self
    }
}

// ============================================================================
// GROUPING
// ============================================================================

/// The grouping slots of a query, outer to inner.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupSpec {
    #[serde(default)]
    pub fields: [Option<String>; MAX_SLOTS],
}

impl GroupSpec {
    /// Fills slots in order. More than `MAX_SLOTS` fields is an error.
    pub fn from_fields<I, S>(fields: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut spec = GroupSpec::default();
        for (i, field) in fields.into_iter().enumerate() {
            if i >= MAX_SLOTS {
                return Err(QueryError::TooManySlots {
                    what: "grouping",
                    max: MAX_SLOTS,
                    actual: i + 1,
                });
            }
            spec.fields[i] = Some(field.into());
        }
        Ok(spec)
    }

    /// The selected fields in slot order, empty slots dropped.
    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().filter_map(|f| f.as_deref())
    }
}

// ============================================================================
// MAIN DEFINITION STRUCT
// ============================================================================

/// A complete summary query: filters first, then grouping.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryDefinition {
    #[serde(default)]
    pub filters: [FilterSpec; MAX_SLOTS],

    #[serde(default)]
    pub group: GroupSpec,
}

impl QueryDefinition {
    pub fn builder() -> QueryBuilder {
        QueryBuilder::default()
    }
}

/// Fills filter and grouping slots in order.
#[derive(Debug, Default)]
pub struct QueryBuilder {
    filters: Vec<FilterSpec>,
    group: Vec<String>,
}

impl QueryBuilder {
    pub fn filter(mut self, filter: FilterSpec) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn group_by(mut self, field: impl Into<String>) -> Self {
        self.group.push(field.into());
        self
    }

    pub fn build(self) -> Result<QueryDefinition, QueryError> {
        if self.filters.len() > MAX_SLOTS {
            return Err(QueryError::TooManySlots {
                what: "filter",
                max: MAX_SLOTS,
                actual: self.filters.len(),
            });
        }

        let mut definition = QueryDefinition {
            group: GroupSpec::from_fields(self.group)?,
            ..QueryDefinition::default()
        };
        for (slot, filter) in definition.filters.iter_mut().zip(self.filters) {
            *slot = filter;
        }
        Ok(definition)
    }
}
