//! FILENAME: close-rate-engine/src/format.rs
//! PURPOSE: Display formatting for summary tables.
//! CONTEXT: Turns exact counts and ratios into the strings the exhibit table
//! shows: labelled group columns, comma-separated counts and a one-decimal
//! percentage close rate.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::view::{CloseRate, SummaryTable};

pub const QUOTE_COUNT_HEADER: &str = "Quote Count";
pub const SALE_COUNT_HEADER: &str = "Sale Count";
pub const CLOSE_RATE_HEADER: &str = "Close Rate";

// ============================================================================
// FIELD CATALOG
// ============================================================================

/// Display labels for fields. Unknown fields display under their raw name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldCatalog {
    labels: BTreeMap<String, String>,
}

impl FieldCatalog {
    pub fn new() -> Self {
        FieldCatalog::default()
    }

    /// Labels for the columns of the quote dataset.
    pub fn quote_fields() -> Self {
        [
            ("quote_id", "Quote ID"),
            ("agency", "Agency Name"),
            ("issued", "Issued Indicator"),
            ("quote_platform", "Quote Platform"),
            ("eff_date", "Effective Date"),
            ("liab_only", "Liability Only Indicator"),
            ("st", "State"),
            ("zipcode", "Zip Code"),
            ("terr", "Territory"),
            ("min_veh_yr", "Minimum Vehicle Year"),
            ("max_veh_yr", "Maximum Vehicle Year"),
            ("multiproduct_discount", "Multi-Product Discount Indicator"),
            ("life_discount", "Life Discount Indicator"),
            ("multicar", "Multi-Car Discount Indicator"),
            ("acc_viol_score", "Accident/Violation Score"),
            ("ins_score", "Insurance Score"),
            ("bi_limit", "CSL/BI Limit"),
            ("driver1_age", "Driver 1 Age"),
            ("driver2_age", "Driver 2 Age"),
        ]
        .into_iter()
        .fold(FieldCatalog::new(), |catalog, (field, label)| {
            catalog.with_label(field, label)
        })
    }

    pub fn with_label(mut self, field: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(field.into(), label.into());
        self
    }

    pub fn label<'a>(&'a self, field: &'a str) -> &'a str {
        self.labels.get(field).map_or(field, String::as_str)
    }

    /// Fields with a label, in name order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.labels.keys().map(String::as_str)
    }
}

// ============================================================================
// NUMBER FORMATTING
// ============================================================================

/// Add thousands separators to an unsigned numeric string.
fn add_thousands_separator(s: &str) -> String {
    let (digits, decimal) = match s.split_once('.') {
        Some((int, dec)) => (int, Some(dec)),
        None => (s, None),
    };

    let mut result = String::with_capacity(s.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    if let Some(decimal) = decimal {
        result.push('.');
        result.push_str(decimal);
    }

    result
}

/// Formats a count with thousands separators (`12,345`).
pub fn format_count(count: u64) -> String {
    add_thousands_separator(&count.to_string())
}

/// Formats a close rate as a percentage with one decimal (`50.0%`).
pub fn format_close_rate(rate: &CloseRate) -> String {
    format!("{}%", add_thousands_separator(&format!("{:.1}", rate.value() * 100.0)))
}

// ============================================================================
// DISPLAY TABLE
// ============================================================================

/// A summary table rendered to strings, ready for a grid widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Renders group columns under their labels followed by the three measures.
/// Missing group values render as empty cells.
pub fn render_table(table: &SummaryTable, catalog: &FieldCatalog) -> DisplayTable {
    let headers: Vec<String> = table
        .group_fields
        .iter()
        .map(|field| catalog.label(field).to_string())
        .chain(
            [QUOTE_COUNT_HEADER, SALE_COUNT_HEADER, CLOSE_RATE_HEADER]
                .into_iter()
                .map(str::to_string),
        )
        .collect();

    let rows: Vec<Vec<String>> = table
        .iter()
        .map(|row| {
            row.group_key
                .iter()
                .map(|v| v.display_string().unwrap_or_default())
                .chain([
                    format_count(row.quote_count),
                    format_count(row.sale_count),
                    format_close_rate(&row.close_rate),
                ])
                .collect::<Vec<String>>()
        })
        .collect();

    DisplayTable { headers, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::AggregationRow;
    use table::Value;

    #[test]
    fn test_thousands_separator() {
        assert_eq!(add_thousands_separator("1234567"), "1,234,567");
        assert_eq!(add_thousands_separator("123"), "123");
        assert_eq!(add_thousands_separator("1234.5"), "1,234.5");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(9876543), "9,876,543");
    }

    #[test]
    fn test_format_close_rate() {
        assert_eq!(format_close_rate(&CloseRate::new(1, 2)), "50.0%");
        assert_eq!(format_close_rate(&CloseRate::new(1, 3)), "33.3%");
        assert_eq!(format_close_rate(&CloseRate::new(2, 3)), "66.7%");
        assert_eq!(format_close_rate(&CloseRate::new(0, 0)), "0.0%");
        assert_eq!(format_close_rate(&CloseRate::new(1, 1)), "100.0%");
    }

    #[test]
    fn test_catalog_labels() {
        let catalog = FieldCatalog::quote_fields();
        assert_eq!(catalog.label("st"), "State");
        assert_eq!(catalog.label("bi_limit"), "CSL/BI Limit");
        assert_eq!(catalog.label("not_a_field"), "not_a_field");
        assert_eq!(catalog.fields().count(), 19);
    }

    #[test]
    fn test_catalog_from_json() {
        let catalog: FieldCatalog =
            serde_json::from_str(r#"{ "st": "Policy State" }"#).unwrap();
        assert_eq!(catalog.label("st"), "Policy State");
    }

    #[test]
    fn test_render_table() {
        let table = SummaryTable {
            group_fields: vec!["st".to_string()],
            rows: vec![
                AggregationRow {
                    group_key: vec![Value::text("OH")],
                    quote_count: 1200,
                    sale_count: 600,
                    close_rate: CloseRate::new(600, 1200),
                },
                AggregationRow {
                    group_key: vec![Value::Empty],
                    quote_count: 3,
                    sale_count: 0,
                    close_rate: CloseRate::new(0, 3),
                },
            ],
        };

        let display = render_table(&table, &FieldCatalog::quote_fields());
        assert_eq!(display.headers, vec!["State", "Quote Count", "Sale Count", "Close Rate"]);
        assert_eq!(display.rows[0], vec!["OH", "1,200", "600", "50.0%"]);
        assert_eq!(display.rows[1], vec!["", "3", "0", "0.0%"]);
    }
}
