//! Tests for TimeSeriesPanel construction invariants.

use causeway_core::errors::DataQualityError;
use causeway_core::TimeSeriesPanel;
use chrono::NaiveDate;

fn day(d: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

#[test]
fn test_valid_panel() {
    let panel = TimeSeriesPanel::new(
        vec![day(1), day(2), day(3)],
        vec![("a", vec![1.0, 2.0, 3.0]), ("b", vec![0.5, 0.25, 0.125])],
    )
    .unwrap();
    assert_eq!(panel.len(), 3);
    assert_eq!(panel.n_variables(), 2);
    assert_eq!(panel.position("b"), Some(1));
    assert_eq!(panel.value(2, 1), 0.125);
    assert!(panel.is_regular());
}

#[test]
fn test_rejects_empty_panel() {
    let err = TimeSeriesPanel::new::<String>(vec![day(1)], vec![]).unwrap_err();
    assert_eq!(err, DataQualityError::EmptyPanel);
}

#[test]
fn test_rejects_length_mismatch() {
    let err = TimeSeriesPanel::new(vec![day(1), day(2)], vec![("a", vec![1.0])]).unwrap_err();
    assert!(matches!(err, DataQualityError::LengthMismatch { expected: 2, actual: 1, .. }));
}

#[test]
fn test_rejects_non_finite() {
    let err = TimeSeriesPanel::new(vec![day(1), day(2)], vec![("a", vec![1.0, f64::NAN])])
        .unwrap_err();
    assert_eq!(
        err,
        DataQualityError::NonFiniteValue {
            variable: "a".into(),
            row: 1
        }
    );
}

#[test]
fn test_rejects_duplicate_names() {
    let err = TimeSeriesPanel::new(
        vec![day(1)],
        vec![("a", vec![1.0]), ("a", vec![2.0])],
    )
    .unwrap_err();
    assert_eq!(err, DataQualityError::DuplicateVariable("a".into()));
}

#[test]
fn test_rejects_unordered_index() {
    let err = TimeSeriesPanel::new(vec![day(2), day(1)], vec![("a", vec![1.0, 2.0])])
        .unwrap_err();
    assert_eq!(err, DataQualityError::UnorderedIndex { row: 1 });
}

#[test]
fn test_irregular_index_detected() {
    let panel = TimeSeriesPanel::new(
        vec![day(1), day(2), day(5)],
        vec![("a", vec![1.0, 2.0, 3.0])],
    )
    .unwrap();
    assert!(!panel.is_regular());
}

#[test]
fn test_select_unknown_variable() {
    let panel = TimeSeriesPanel::from_columns(vec![("a", vec![1.0])]).unwrap();
    let err = panel.select(&["missing".to_string()]).unwrap_err();
    assert_eq!(err, DataQualityError::UnknownVariable("missing".into()));
}
