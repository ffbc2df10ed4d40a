//! FILENAME: close-rate-engine/src/aggregate.rs
//! Aggregation Engine - partitions filtered rows and derives close rates.
//!
//! Algorithm:
//! 1. Validate grouping fields and required columns (nothing is computed on error)
//! 2. Resolve the effective group fields, falling back to the quote id
//! 3. Fold every row into its group: distinct quote ids, and distinct quote
//!    ids of rows marked as sold
//! 4. Emit groups in ascending key order with missing values last

use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use table::{Column, Dataset, KeyValue, Value};

use crate::classify::FieldKinds;
use crate::definition::{GroupSpec, ISSUED_FIELD, MAX_SLOTS, QUOTE_ID_FIELD, SALE_SENTINEL};
use crate::error::QueryError;
use crate::view::{AggregationRow, CloseRate, SummaryTable};

/// Values of the effective group fields for one row.
type GroupKey = SmallVec<[KeyValue; MAX_SLOTS]>;

/// Distinct quote ids seen in one group.
#[derive(Debug, Default)]
struct GroupTally {
    quotes: FxHashSet<KeyValue>,
    sales: FxHashSet<KeyValue>,
}

impl GroupTally {
    fn add(&mut self, quote_id: &Value, issued: &Value) {
        // Rows without an id still open their group but are not counted.
        if quote_id.is_missing() {
            return;
        }
        let id = quote_id.key();
        if is_sale(issued) {
            self.sales.insert(id.clone());
        }
        self.quotes.insert(id);
    }

    fn into_row(self, key: GroupKey) -> AggregationRow {
        let quote_count = self.quotes.len() as u64;
        let sale_count = self.sales.len() as u64;
        AggregationRow {
            group_key: key.iter().map(KeyValue::to_value).collect(),
            quote_count,
            sale_count,
            close_rate: CloseRate::new(sale_count, quote_count),
        }
    }
}

fn is_sale(issued: &Value) -> bool {
    matches!(issued, Value::Text(s) if s == SALE_SENTINEL)
}

/// Resolves the grouping slots into the fields actually grouped on.
///
/// Empty slots are dropped, as are fields without any data. When nothing is
/// left, every quote becomes its own group.
pub fn effective_group_fields(kinds: &FieldKinds, group: &GroupSpec) -> Vec<String> {
    let fields: Vec<String> = group
        .selected()
        .filter(|field| kinds.has_data(field))
        .map(str::to_string)
        .collect();

    if fields.is_empty() {
        vec![QUOTE_ID_FIELD.to_string()]
    } else {
        fields
    }
}

fn required_column<'a>(dataset: &'a Dataset, name: &str) -> Result<&'a Column, QueryError> {
    dataset
        .column(name)
        .ok_or_else(|| QueryError::MissingColumn(name.to_string()))
}

/// Groups the dataset and computes quote count, sale count and close rate per group.
///
/// Rows with a missing key value keep their own group, so the quote id
/// fallback yields one extra group when some rows have no id.
pub fn aggregate(
    dataset: &Dataset,
    kinds: &FieldKinds,
    group: &GroupSpec,
) -> Result<SummaryTable, QueryError> {
    for field in group.selected() {
        if !dataset.contains(field) || kinds.get(field).is_none() {
            return Err(QueryError::UnknownField(field.to_string()));
        }
    }
    let quote_ids = required_column(dataset, QUOTE_ID_FIELD)?;
    let issued = required_column(dataset, ISSUED_FIELD)?;

    let group_fields = effective_group_fields(kinds, group);
    let key_columns = group_fields
        .iter()
        .map(|field| required_column(dataset, field))
        .collect::<Result<Vec<_>, _>>()?;

    let mut groups: FxHashMap<GroupKey, GroupTally> = FxHashMap::default();
    for row in 0..dataset.row_count() {
        let key: GroupKey = key_columns.iter().map(|c| c.values[row].key()).collect();
        groups
            .entry(key)
            .or_default()
            .add(&quote_ids.values[row], &issued.values[row]);
    }

    let mut ordered: Vec<(GroupKey, GroupTally)> = groups.into_iter().collect();
    ordered.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));

    let rows: Vec<AggregationRow> = ordered
        .into_iter()
        .map(|(key, tally)| tally.into_row(key))
        .collect();

    debug!(
        "aggregated {} rows into {} groups by {:?}",
        dataset.row_count(),
        rows.len(),
        group_fields
    );

    Ok(SummaryTable { group_fields, rows })
}
