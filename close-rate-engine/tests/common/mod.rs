//! FILENAME: tests/common/mod.rs
//! Fixtures shared by the close-rate-engine integration tests.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Arc;

use close_rate_engine::CloseRateEngine;
use table::{Column, Dataset, Value};

/// A small quote book with duplicate submissions and missing values.
pub struct QuoteFixture;

type QuoteRow = (
    Option<i64>,
    Option<&'static str>,
    Option<&'static str>,
    &'static str,
    Option<f64>,
    Option<f64>,
);

impl QuoteFixture {
    pub fn headers() -> Vec<&'static str> {
        vec!["quote_id", "agency", "st", "issued", "driver1_age", "ins_score"]
    }

    /// (quote_id, agency, st, issued, driver1_age, ins_score)
    pub fn data() -> Vec<QuoteRow> {
        vec![
            (Some(1), Some("A1"), Some("OH"), "Y", Some(30.0), Some(710.5)),
            (Some(2), Some("A1"), Some("OH"), "N", Some(45.0), Some(650.0)),
            (Some(3), Some("A2"), Some("IN"), "Y", None, Some(700.25)),
            // duplicate submission of quote 3
            (Some(3), Some("A2"), Some("IN"), "Y", None, Some(700.25)),
            (Some(4), Some("A2"), Some("IN"), "N", Some(25.0), None),
            (Some(5), Some("A3"), Some("KY"), "N", Some(35.0), Some(690.0)),
            (Some(6), None, Some("OH"), "Y", Some(52.0), Some(720.0)),
            (Some(7), Some("A1"), None, "N", Some(28.0), Some(680.5)),
            (Some(8), Some("A3"), Some("KY"), "Y", Some(40.0), Some(705.0)),
            (Some(9), Some("A1"), Some("OH"), "Y", Some(33.0), None),
        ]
    }

    pub fn dataset() -> Dataset {
        let data = Self::data();
        Dataset::new(vec![
            Column::integers("quote_id", data.iter().map(|r| r.0)),
            Column::texts("agency", data.iter().map(|r| r.1)),
            Column::texts("st", data.iter().map(|r| r.2)),
            Column::texts("issued", data.iter().map(|r| Some(r.3))),
            Column::floats("driver1_age", data.iter().map(|r| r.4)),
            Column::floats("ins_score", data.iter().map(|r| r.5)),
        ])
        .expect("fixture columns are consistent")
    }

    pub fn engine() -> CloseRateEngine {
        CloseRateEngine::new(Arc::new(Self::dataset()))
    }
}

/// Quote ids of the rows in `dataset`, in row order.
pub fn quote_ids(dataset: &Dataset) -> Vec<i64> {
    dataset
        .column("quote_id")
        .expect("quote_id column")
        .values
        .iter()
        .filter_map(|v| match v {
            Value::Integer(i) => Some(*i),
            _ => None,
        })
        .collect()
}

/// Distinct quote ids in `dataset`.
pub fn distinct_quote_ids(dataset: &Dataset) -> BTreeSet<i64> {
    quote_ids(dataset).into_iter().collect()
}

/// All orderings of `items`.
pub fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut result = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head.clone());
            result.push(tail);
        }
    }
    result
}
