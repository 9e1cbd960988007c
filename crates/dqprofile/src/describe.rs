//! Per-column statistics computed from a report's row sample.
//!
//! These only read [`DatasetProfile::sample`], so they work on reports
//! loaded back from disk without the original data.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::dates;
use crate::inference::InferredType;
use crate::profile::numeric_summary;
use crate::profiler::DatasetProfile;

/// Number of most frequent values kept for string columns.
pub const TOP_VALUES: usize = 15;

/// Statistics of one column's sampled values, by inferred type.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureStats {
    Numeric {
        min: f64,
        max: f64,
        mean: f64,
        std: Option<f64>,
        p25: f64,
        p50: f64,
        p75: f64,
    },
    Text {
        unique: usize,
        mode: Option<String>,
        /// Most frequent values with their counts, most frequent first.
        top: Vec<(String, usize)>,
    },
    Datetime {
        earliest: NaiveDateTime,
        latest: NaiveDateTime,
    },
    /// The sample holds no usable value for the inferred type.
    NoValues,
    /// The report has no sample for this column.
    Missing,
}

/// Sample statistics for one column.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSummary {
    pub column: String,
    pub inferred_type: InferredType,
    pub stats: FeatureStats,
}

/// Describe every profiled column from the report's sample, in column order.
pub fn describe_sample(profile: &DatasetProfile) -> Vec<FeatureSummary> {
    profile
        .columns
        .iter()
        .map(|column| {
            let stats = match profile.sample.get(&column.name) {
                Some(values) => describe_values(values, column.inferred_type),
                None => FeatureStats::Missing,
            };
            FeatureSummary {
                column: column.name.clone(),
                inferred_type: column.inferred_type,
                stats,
            }
        })
        .collect()
}

/// Describe sampled JSON values as the given type. Nulls are ignored.
pub fn describe_values(values: &[serde_json::Value], inferred_type: InferredType) -> FeatureStats {
    match inferred_type {
        InferredType::Numeric => numeric_stats(values),
        InferredType::String => text_stats(values),
        InferredType::Datetime => datetime_stats(values),
    }
}

fn numeric_stats(values: &[serde_json::Value]) -> FeatureStats {
    let mut numbers: Vec<f64> = values.iter().filter_map(json_number).collect();
    let Some(summary) = numeric_summary(numbers.iter().copied()) else {
        return FeatureStats::NoValues;
    };

    numbers.sort_by(f64::total_cmp);
    FeatureStats::Numeric {
        min: summary.min,
        max: summary.max,
        mean: summary.mean,
        std: summary.std,
        p25: percentile(&numbers, 25.0),
        p50: percentile(&numbers, 50.0),
        p75: percentile(&numbers, 75.0),
    }
}

fn text_stats(values: &[serde_json::Value]) -> FeatureStats {
    let texts: Vec<String> = values.iter().filter_map(json_text).collect();
    if texts.is_empty() {
        return FeatureStats::NoValues;
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for text in &texts {
        *counts.entry(text.as_str()).or_default() += 1;
    }

    // Ties go to the smaller value so the ranking is stable
    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let unique = ranked.len();
    let mode = ranked.first().map(|(value, _)| value.clone());
    ranked.truncate(TOP_VALUES);

    FeatureStats::Text {
        unique,
        mode,
        top: ranked,
    }
}

fn datetime_stats(values: &[serde_json::Value]) -> FeatureStats {
    let parsed = values
        .iter()
        .filter_map(json_text)
        .filter_map(|text| dates::parse_datetime(&text));

    let mut range: Option<(NaiveDateTime, NaiveDateTime)> = None;
    for value in parsed {
        range = Some(match range {
            None => (value, value),
            Some((lo, hi)) => (lo.min(value), hi.max(value)),
        });
    }

    match range {
        Some((earliest, latest)) => FeatureStats::Datetime { earliest, latest },
        None => FeatureStats::NoValues,
    }
}

/// Percentile of sorted values with linear interpolation between ranks.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }

    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

fn json_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| !f.is_nan()),
        _ => None,
    }
}

fn json_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Bool(true) => Some("True".to_string()),
        serde_json::Value::Bool(false) => Some("False".to_string()),
        other => Some(other.to_string()),
    }
}
