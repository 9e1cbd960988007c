//! Start/end range consistency across column pairs.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dates;
use crate::error::{ProfileError, Result};
use crate::input::{Dataset, Value};
use crate::profile::ratio;

/// Name fragments marking the opening side of a range.
const START_MARKERS: &[&str] = &["start", "from", "begin"];

/// Name fragments marking the closing side of a range.
const END_MARKERS: &[&str] = &["end", "to", "finish"];

/// A start column paired with an end column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangePair {
    pub start: String,
    pub end: String,
}

/// Inconsistent rows found for one pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairResult {
    pub pair: RangePair,
    pub inconsistent_rows: usize,
}

/// Outcome of checking every pair in a dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConsistencyReport {
    pub pairs: Vec<PairResult>,
    /// Sum over all pairs; a row can be counted once per pair.
    pub inconsistent_count: usize,
    pub inconsistency_pct: f64,
}

/// Pair start-like and end-like columns by name.
///
/// Every start-like column is paired with every end-like column, in column
/// order. A column whose name matches both sides pairs with itself.
pub fn detect_pairs<'a>(columns: impl IntoIterator<Item = &'a str> + Clone) -> Vec<RangePair> {
    let mut pairs = Vec::new();

    for start in columns.clone() {
        if !contains_any(start, START_MARKERS) {
            continue;
        }
        for end in columns.clone() {
            if contains_any(end, END_MARKERS) {
                pairs.push(RangePair {
                    start: start.to_string(),
                    end: end.to_string(),
                });
            }
        }
    }

    pairs
}

fn contains_any(name: &str, markers: &[&str]) -> bool {
    let lower = name.to_lowercase();
    markers.iter().any(|m| lower.contains(m))
}

/// Counts rows whose start value comes after the paired end value.
#[derive(Debug, Clone, Default)]
pub struct RangeChecker;

impl RangeChecker {
    pub fn new() -> Self {
        Self
    }

    /// Check every detected pair. Pairs that cannot be evaluated are skipped.
    pub fn check(&self, dataset: &Dataset) -> ConsistencyReport {
        let mut report = ConsistencyReport::default();

        for pair in detect_pairs(dataset.column_names()) {
            match self.count_pair(dataset, &pair) {
                Ok(count) => {
                    report.inconsistent_count += count;
                    report.pairs.push(PairResult {
                        pair,
                        inconsistent_rows: count,
                    });
                }
                Err(e) => {
                    debug!(start = %pair.start, end = %pair.end, error = %e, "skipping range pair");
                }
            }
        }

        report.inconsistency_pct = ratio(report.inconsistent_count, dataset.row_count(), 0.0);
        report
    }

    /// Count rows whose start value comes after the end value.
    pub fn count_pair(&self, dataset: &Dataset, pair: &RangePair) -> Result<usize> {
        let start = dataset
            .column(&pair.start)
            .ok_or_else(|| ProfileError::ColumnNotFound(pair.start.clone()))?;
        let end = dataset
            .column(&pair.end)
            .ok_or_else(|| ProfileError::ColumnNotFound(pair.end.clone()))?;

        if start.len() != end.len() {
            return Err(ProfileError::ColumnLength {
                column: pair.end.clone(),
                expected: start.len(),
                actual: end.len(),
            });
        }

        let count = start
            .values()
            .iter()
            .zip(end.values())
            .filter(|(s, e)| is_inverted(s, e))
            .count();

        Ok(count)
    }
}

/// Whether a row's start value comes after its end value.
///
/// Two numbers compare by value, so integer timestamps and compact
/// `YYYYMMDD` columns keep their order. Everything else is compared as a
/// parsed date and rows where either side fails to parse never count.
fn is_inverted(start: &Value, end: &Value) -> bool {
    if let (Some(s), Some(e)) = (as_ordinal(start), as_ordinal(end)) {
        return s > e;
    }
    match (parse_value(start), parse_value(end)) {
        (Some(s), Some(e)) => s > e,
        _ => false,
    }
}

fn as_ordinal(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) if f.is_finite() => Some(*f),
        _ => None,
    }
}

/// Text is date-parsed; integers are read as compact dates. Booleans and
/// floats are never dates.
fn parse_value(value: &Value) -> Option<chrono::NaiveDateTime> {
    match value {
        Value::Text(s) => dates::parse_datetime(s),
        Value::Int(i) => dates::parse_datetime(&i.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Column;

    #[test]
    fn test_detect_pairs_cross_product() {
        let pairs = detect_pairs(["start_a", "begin_b", "end_a", "finish_b", "other"]);

        assert_eq!(pairs.len(), 4);
        assert_eq!(
            pairs[0],
            RangePair {
                start: "start_a".to_string(),
                end: "end_a".to_string()
            }
        );
        assert_eq!(pairs[3].start, "begin_b");
        assert_eq!(pairs[3].end, "finish_b");
    }

    #[test]
    fn test_detect_pairs_is_case_insensitive_substring() {
        let pairs = detect_pairs(["DateFrom", "DateTo"]);
        // "DateTo" matches "to"; "DateFrom" matches "from" only
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].start, "DateFrom");
        assert_eq!(pairs[0].end, "DateTo");
    }

    #[test]
    fn test_column_can_pair_with_itself() {
        let pairs = detect_pairs(["from_to"]);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].start, pairs[0].end);
    }

    #[test]
    fn test_counts_inverted_ranges() {
        let dataset = Dataset::new(vec![
            Column::new(
                "start_date",
                vec![
                    Value::from("2024-01-10"),
                    Value::from("2024-01-01"),
                    Value::from("garbage"),
                    Value::Null,
                ],
            ),
            Column::new(
                "end_date",
                vec![
                    Value::from("2024-01-05"),
                    Value::from("2024-01-02"),
                    Value::from("2024-01-01"),
                    Value::from("2024-01-01"),
                ],
            ),
        ])
        .unwrap();

        let report = RangeChecker::new().check(&dataset);

        assert_eq!(report.inconsistent_count, 1);
        assert_eq!(report.pairs.len(), 1);
        assert_eq!(report.inconsistency_pct, 0.25);
    }

    #[test]
    fn test_integer_compact_dates_are_checked() {
        let dataset = Dataset::new(vec![
            Column::new(
                "start_date",
                vec![Value::Int(20240111), Value::Int(20240101), Value::Int(20240301)],
            ),
            Column::new(
                "end_date",
                vec![Value::Int(20240102), Value::Int(20240105), Value::Int(20240302)],
            ),
        ])
        .unwrap();

        let report = RangeChecker::new().check(&dataset);

        assert_eq!(report.inconsistent_count, 1);
        assert!((report.inconsistency_pct - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_integer_compact_date_against_text_date() {
        let dataset = Dataset::new(vec![
            Column::new("start", vec![Value::Int(20240311), Value::Int(20240101)]),
            Column::new("end", vec![Value::from("2024-03-01"), Value::from("2024-02-01")]),
        ])
        .unwrap();

        let report = RangeChecker::new().check(&dataset);
        assert_eq!(report.inconsistent_count, 1);
    }

    #[test]
    fn test_booleans_are_not_ranges() {
        let dataset = Dataset::new(vec![
            Column::new("start", vec![Value::Bool(true)]),
            Column::new("end", vec![Value::Bool(false)]),
        ])
        .unwrap();

        assert_eq!(RangeChecker::new().check(&dataset).inconsistent_count, 0);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let dataset = Dataset::new(vec![Column::new("start", vec![Value::Null])]).unwrap();
        let pair = RangePair {
            start: "start".to_string(),
            end: "end".to_string(),
        };

        let err = RangeChecker::new().count_pair(&dataset, &pair).unwrap_err();
        assert!(matches!(err, ProfileError::ColumnNotFound(name) if name == "end"));
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = Dataset::new(vec![
            Column::new("start", Vec::new()),
            Column::new("end", Vec::new()),
        ])
        .unwrap();

        let report = RangeChecker::new().check(&dataset);
        assert_eq!(report.inconsistency_pct, 0.0);
    }
}
