//! FILENAME: close-rate-engine/src/view.rs
//! Summary View - the result rows handed back to the presentation layer.
//!
//! Counts are exact integers and the close rate is kept as an exact ratio,
//! so formatting decisions stay with the caller.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use table::Value;

// ============================================================================
// CLOSE RATE
// ============================================================================

/// Sales over quotes, kept as an exact ratio.
/// A ratio with zero quotes is defined as 0.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CloseRate {
    pub sales: u64,
    pub quotes: u64,
}

impl CloseRate {
    pub fn new(sales: u64, quotes: u64) -> Self {
        CloseRate { sales, quotes }
    }

    pub fn value(&self) -> f64 {
        if self.quotes == 0 {
            0.0
        } else {
            self.sales as f64 / self.quotes as f64
        }
    }

    /// Numerator and denominator with the zero-quote case mapped to 0/1.
    fn normalized(&self) -> (u128, u128) {
        if self.quotes == 0 {
            (0, 1)
        } else {
            (self.sales as u128, self.quotes as u128)
        }
    }
}

impl PartialEq for CloseRate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CloseRate {}

impl PartialOrd for CloseRate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CloseRate {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a_num, a_den) = self.normalized();
        let (b_num, b_den) = other.normalized();
        (a_num * b_den).cmp(&(b_num * a_den))
    }
}

impl fmt::Display for CloseRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.sales, self.quotes)
    }
}

// ============================================================================
// AGGREGATION ROW
// ============================================================================

/// One output row: a distinct combination of group field values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationRow {
    /// Values of the effective group fields, same order as `SummaryTable::group_fields`.
    /// Missing values appear as `Value::Empty`.
    pub group_key: Vec<Value>,

    /// Distinct quote ids in the group.
    pub quote_count: u64,

    /// Distinct quote ids in the group whose `issued` is the sale sentinel.
    pub sale_count: u64,

    pub close_rate: CloseRate,
}

// ============================================================================
// SUMMARY TABLE
// ============================================================================

/// Ordered result of one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryTable {
    /// The effective group fields, after dropping empty slots and applying
    /// the quote id fallback.
    pub group_fields: Vec<String>,

    pub rows: Vec<AggregationRow>,
}

impl SummaryTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AggregationRow> {
        self.rows.iter()
    }

    /// Sum of group quote counts (the table footer).
    pub fn total_quotes(&self) -> u64 {
        self.rows.iter().map(|r| r.quote_count).sum()
    }

    /// Sum of group sale counts (the table footer).
    pub fn total_sales(&self) -> u64 {
        self.rows.iter().map(|r| r.sale_count).sum()
    }

    /// Finds the row whose key matches `key` exactly.
    pub fn find(&self, key: &[Value]) -> Option<&AggregationRow> {
        self.rows.iter().find(|r| r.group_key == key)
    }
}

impl<'a> IntoIterator for &'a SummaryTable {
    type Item = &'a AggregationRow;
    type IntoIter = std::slice::Iter<'a, AggregationRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
