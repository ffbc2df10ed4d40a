//! FILENAME: tests/test_filters.rs
//! Integration tests for the filter stage.

mod common;

use close_rate_engine::{apply_filters, classify, FilterSpec, QueryError};
use common::{permutations, quote_ids, QuoteFixture};
use table::{Column, Dataset};

// ============================================================================
// WORKED EXAMPLES
// ============================================================================

fn age_dataset() -> Dataset {
    Dataset::new(vec![
        Column::integers("quote_id", [Some(1), Some(2), Some(3)]),
        Column::floats("driver1_age", [Some(30.0), Some(40.0), None]),
    ])
    .unwrap()
}

#[test]
fn test_range_include_drops_out_of_range_and_missing() {
    let ds = age_dataset();
    let kinds = classify(&ds);
    let out = apply_filters(&ds, &kinds, &[FilterSpec::range("driver1_age", 25.0, 35.0)]).unwrap();
    assert_eq!(quote_ids(&out), vec![1]);
}

#[test]
fn test_range_exclude_does_not_pull_in_missing() {
    let ds = age_dataset();
    let kinds = classify(&ds);
    let out = apply_filters(
        &ds,
        &kinds,
        &[FilterSpec::range("driver1_age", 25.0, 35.0).excluding()],
    )
    .unwrap();
    assert_eq!(quote_ids(&out), vec![2]);
}

// ============================================================================
// PROPERTIES
// ============================================================================

#[test]
fn test_filter_slots_commute() {
    let ds = QuoteFixture::dataset();
    let kinds = classify(&ds);
    let slots = vec![
        FilterSpec::values("st", ["OH", "KY"]),
        FilterSpec::range("driver1_age", 28.0, 45.0),
        FilterSpec::values("agency", ["A2"]).excluding(),
        FilterSpec::none(),
    ];

    let expected = apply_filters(&ds, &kinds, &slots).unwrap();
    assert_eq!(quote_ids(&expected), vec![1, 2, 5, 8, 9]);

    for order in permutations(&slots) {
        let out = apply_filters(&ds, &kinds, &order).unwrap();
        assert_eq!(out, expected, "slot order {:?} changed the result", order);
    }
}

#[test]
fn test_filters_are_idempotent() {
    let ds = QuoteFixture::dataset();
    let kinds = classify(&ds);
    let slots = [
        FilterSpec::range("ins_score", 680.0, 710.0),
        FilterSpec::values("issued", ["Y"]),
    ];

    let once = apply_filters(&ds, &kinds, &slots).unwrap();
    let twice = apply_filters(&once, &kinds, &slots).unwrap();
    assert_eq!(once, twice);
    assert_eq!(quote_ids(&once), vec![3, 3, 8]);
}

#[test]
fn test_no_op_slots_leave_rows_unchanged() {
    let ds = QuoteFixture::dataset();
    let kinds = classify(&ds);

    for slot in [
        FilterSpec::none(),
        FilterSpec::values("st", Vec::<String>::new()),
        FilterSpec::values("st", Vec::<String>::new()).excluding(),
        FilterSpec::unset("driver1_age"),
    ] {
        let out = apply_filters(&ds, &kinds, &[slot]).unwrap();
        assert_eq!(out, ds);
    }
}

#[test]
fn test_categorical_include_and_exclude_partition_present_rows() {
    let ds = QuoteFixture::dataset();
    let kinds = classify(&ds);

    let included = quote_ids(&apply_filters(&ds, &kinds, &[FilterSpec::values("st", ["OH"])]).unwrap());
    let excluded = quote_ids(
        &apply_filters(&ds, &kinds, &[FilterSpec::values("st", ["OH"]).excluding()]).unwrap(),
    );

    assert_eq!(included, vec![1, 2, 6, 9]);
    assert_eq!(excluded, vec![3, 3, 4, 5, 8]);

    // Quote 7 has no state and lands in neither side.
    let mut union: Vec<i64> = included.iter().chain(&excluded).copied().collect();
    union.sort_unstable();
    assert_eq!(union, vec![1, 2, 3, 3, 4, 5, 6, 8, 9]);
    assert!(included.iter().all(|id| !excluded.contains(id)));
}

#[test]
fn test_categorical_values_match_string_form() {
    let ds = Dataset::new(vec![
        Column::integers("quote_id", [Some(1), Some(2)]),
        Column::texts("bi_limit", [Some("100"), Some("250")]),
    ])
    .unwrap();
    let kinds = classify(&ds);
    let out = apply_filters(&ds, &kinds, &[FilterSpec::values("bi_limit", ["250"])]).unwrap();
    assert_eq!(quote_ids(&out), vec![2]);
}

// ============================================================================
// CONFIGURATION ERRORS
// ============================================================================

#[test]
fn test_unknown_field_is_reported_not_ignored() {
    let ds = QuoteFixture::dataset();
    let kinds = classify(&ds);
    let err = apply_filters(&ds, &kinds, &[FilterSpec::values("zipcode", ["43004"])]).unwrap_err();
    assert_eq!(err, QueryError::UnknownField("zipcode".to_string()));
}

#[test]
fn test_inverted_range_is_reported() {
    let ds = QuoteFixture::dataset();
    let kinds = classify(&ds);
    let err = apply_filters(
        &ds,
        &kinds,
        &[FilterSpec::none(), FilterSpec::range("ins_score", 720.0, 650.0)],
    )
    .unwrap_err();
    assert!(matches!(err, QueryError::InvalidRange { ref field, .. } if field == "ins_score"));
}

#[test]
fn test_equal_bounds_are_a_valid_range() {
    let ds = QuoteFixture::dataset();
    let kinds = classify(&ds);
    let out = apply_filters(&ds, &kinds, &[FilterSpec::range("driver1_age", 30.0, 30.0)]).unwrap();
    assert_eq!(quote_ids(&out), vec![1]);
}
