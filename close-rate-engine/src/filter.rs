//! FILENAME: close-rate-engine/src/filter.rs
//! Filter Engine - turns up to four filter slots into one row mask.
//!
//! Algorithm:
//! 1. Compile every slot into a predicate, validating all of them before any
//!    row is touched (a bad slot aborts the whole stage)
//! 2. Inert slots (no field, unset constraint, empty value set, field
//!    without data) compile to nothing
//! 3. Each predicate evaluates a row to `Some(matched)` or `None` when the
//!    value is missing; include/exclude only flips `Some`
//! 4. Masks are intersected, so slot order never matters

use std::collections::BTreeSet;

use log::debug;
use table::{Column, Dataset, Value};

use crate::classify::{FieldKind, FieldKinds};
use crate::definition::{FilterConstraint, FilterSpec, MAX_SLOTS};
use crate::error::QueryError;

/// A validated, active filter slot.
#[derive(Debug)]
enum SlotPredicate<'a> {
    Range {
        column: &'a Column,
        lo: f64,
        hi: f64,
        include: bool,
    },
    Values {
        column: &'a Column,
        values: &'a BTreeSet<String>,
        include: bool,
    },
}

impl<'a> SlotPredicate<'a> {
    fn column(&self) -> &'a Column {
        match self {
            SlotPredicate::Range { column, .. } | SlotPredicate::Values { column, .. } => *column,
        }
    }

    fn include(&self) -> bool {
        match self {
            SlotPredicate::Range { include, .. } | SlotPredicate::Values { include, .. } => *include,
        }
    }

    /// Substantive match for one value. `None` when the value is missing.
    fn matches(&self, value: &Value) -> Option<bool> {
        match self {
            SlotPredicate::Range { lo, hi, .. } => {
                value.as_f64().map(|n| *lo <= n && n <= *hi)
            }
            SlotPredicate::Values { values, .. } => {
                value.display_string().map(|s| values.contains(&s))
            }
        }
    }

    /// Clears mask entries for rows this slot rejects.
    fn apply(&self, mask: &mut [bool]) {
        let include = self.include();
        for (keep, value) in mask.iter_mut().zip(&self.column().values) {
            if !*keep {
                continue;
            }
            *keep = match self.matches(value) {
                Some(matched) => matched == include,
                // Missing data never passes an active slot, include or exclude.
                None => false,
            };
        }
    }
}

/// Validates one slot and compiles it. `Ok(None)` means the slot is inert.
fn compile<'a>(
    dataset: &'a Dataset,
    kinds: &FieldKinds,
    spec: &'a FilterSpec,
) -> Result<Option<SlotPredicate<'a>>, QueryError> {
    let field = match spec.field.as_deref() {
        Some(field) => field,
        None => return Ok(None),
    };

    let column = dataset
        .column(field)
        .ok_or_else(|| QueryError::UnknownField(field.to_string()))?;
    let info = kinds
        .get(field)
        .ok_or_else(|| QueryError::UnknownField(field.to_string()))?;

    match &spec.constraint {
        FilterConstraint::Unset => Ok(None),

        FilterConstraint::Range { lo, hi } => {
            if info.kind == FieldKind::Categorical {
                return Err(QueryError::ConstraintMismatch {
                    field: field.to_string(),
                    kind: info.kind,
                });
            }
            if lo.is_nan() || hi.is_nan() || lo > hi {
                return Err(QueryError::InvalidRange {
                    field: field.to_string(),
                    lo: *lo,
                    hi: *hi,
                });
            }
            if !info.has_data {
                return Ok(None);
            }
            Ok(Some(SlotPredicate::Range {
                column,
                lo: *lo,
                hi: *hi,
                include: spec.include,
            }))
        }

        FilterConstraint::Values(values) => {
            if info.kind.is_numeric() {
                return Err(QueryError::ConstraintMismatch {
                    field: field.to_string(),
                    kind: info.kind,
                });
            }
            if values.is_empty() || !info.has_data {
                return Ok(None);
            }
            Ok(Some(SlotPredicate::Values {
                column,
                values,
                include: spec.include,
            }))
        }
    }
}

/// Computes the combined row mask of all filter slots.
pub fn filter_mask(
    dataset: &Dataset,
    kinds: &FieldKinds,
    filters: &[FilterSpec],
) -> Result<Vec<bool>, QueryError> {
    if filters.len() > MAX_SLOTS {
        return Err(QueryError::TooManySlots {
            what: "filter",
            max: MAX_SLOTS,
            actual: filters.len(),
        });
    }

    let predicates = filters
        .iter()
        .map(|spec| compile(dataset, kinds, spec))
        .collect::<Result<Vec<_>, _>>()?;

    let mut mask = vec![true; dataset.row_count()];
    for (slot, predicate) in predicates.iter().enumerate() {
        if let Some(predicate) = predicate {
            predicate.apply(&mut mask);
            debug!(
                "filter slot {} on '{}' leaves {} of {} rows",
                slot + 1,
                predicate.column().name,
                mask.iter().filter(|&&keep| keep).count(),
                dataset.row_count()
            );
        }
    }

    Ok(mask)
}

/// Applies all filter slots and returns the surviving rows.
pub fn apply_filters(
    dataset: &Dataset,
    kinds: &FieldKinds,
    filters: &[FilterSpec],
) -> Result<Dataset, QueryError> {
    let mask = filter_mask(dataset, kinds, filters)?;
    Ok(dataset.filter(&mask)?)
}
