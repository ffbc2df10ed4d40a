//! FILENAME: close-rate-engine/src/classify.rs
//! Field Classifier - decides once per dataset how each column is queried.
//!
//! A column is categorical unless its storage type is numeric. Numeric columns
//! are integer-valued when every present value has no fractional part, and
//! continuous otherwise. The result drives filter predicate shape and the
//! filter domain offered to callers.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use table::{Column, Dataset, StorageType};

/// How a field is filtered and grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Categorical,
    IntegerNumeric,
    ContinuousNumeric,
}

impl FieldKind {
    pub fn is_numeric(&self) -> bool {
        !matches!(self, FieldKind::Categorical)
    }
}

/// Classification of a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub kind: FieldKind,
    /// Whether the column holds at least one non-missing value.
    pub has_data: bool,
}

/// Per-field classification for a whole dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldKinds {
    fields: FxHashMap<String, FieldInfo>,
}

impl FieldKinds {
    pub fn get(&self, field: &str) -> Option<&FieldInfo> {
        self.fields.get(field)
    }

    pub fn kind(&self, field: &str) -> Option<FieldKind> {
        self.fields.get(field).map(|info| info.kind)
    }

    pub fn has_data(&self, field: &str) -> bool {
        self.fields.get(field).is_some_and(|info| info.has_data)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldInfo)> {
        self.fields.iter().map(|(name, info)| (name.as_str(), info))
    }
}

/// Classifies every column of the dataset.
pub fn classify(dataset: &Dataset) -> FieldKinds {
    let fields = dataset
        .columns()
        .iter()
        .map(|column| (column.name.clone(), classify_column(column)))
        .collect();

    FieldKinds { fields }
}

fn classify_column(column: &Column) -> FieldInfo {
    let has_data = column.present_values().next().is_some();

    let kind = match column.storage {
        StorageType::Integer => FieldKind::IntegerNumeric,
        StorageType::Float => {
            let integral = column
                .present_values()
                .filter_map(|v| v.as_f64())
                .all(|n| n.is_finite() && n.fract() == 0.0);
            if integral {
                FieldKind::IntegerNumeric
            } else {
                FieldKind::ContinuousNumeric
            }
        }
        StorageType::Text | StorageType::Boolean => FieldKind::Categorical,
    };

    FieldInfo { kind, has_data }
}
