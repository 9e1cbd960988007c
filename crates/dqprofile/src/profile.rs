//! Per-column metrics.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::dates;
use crate::inference::{text_sample, InferenceConfig, InferredType};
use crate::input::Column;

/// One `@`, something before it, and a dot somewhere in the domain.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@]+@[^@]+\.[^@]+$").expect("email pattern is valid")
});

/// Metrics computed for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    #[serde(rename = "column_name")]
    pub name: String,
    pub inferred_type: InferredType,
    /// Fraction of absent values.
    pub null_pct: f64,
    /// Number of distinct non-null values.
    pub unique_count: usize,
    /// Present values that fail validation for the inferred type.
    pub invalid_count: usize,
    pub valid_pct: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    /// Sample standard deviation; needs at least two values.
    pub std: Option<f64>,
}

/// Descriptive statistics over the values of a numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: Option<f64>,
}

/// Welford's online algorithm: mean and variance in a single pass.
#[derive(Debug, Clone)]
struct StreamingStats {
    count: usize,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl StreamingStats {
    fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    fn add(&mut self, value: f64) {
        self.count += 1;

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;

        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Sample variance (n - 1 denominator).
    fn variance(&self) -> Option<f64> {
        if self.count < 2 {
            None
        } else {
            Some(self.m2 / (self.count - 1) as f64)
        }
    }

    fn finish(&self) -> Option<NumericSummary> {
        if self.count == 0 {
            return None;
        }

        Some(NumericSummary {
            count: self.count,
            min: self.min,
            max: self.max,
            mean: self.mean,
            std: self.variance().map(f64::sqrt),
        })
    }
}

/// Compute statistics over the values that coerce to numbers.
pub fn numeric_summary(values: impl IntoIterator<Item = f64>) -> Option<NumericSummary> {
    let mut stats = StreamingStats::new();
    for value in values {
        stats.add(value);
    }
    stats.finish()
}

/// Whether a value looks like an email address.
pub fn is_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Invalid values of a numeric column: nulls introduced by coercion.
///
/// Coercion can only add nulls, so `after < before` means the two counts
/// were taken over different data. That is clamped to zero and logged.
pub fn coercion_invalid_count(column: &str, nulls_before: usize, nulls_after: usize) -> usize {
    if nulls_after < nulls_before {
        warn!(
            column,
            nulls_before, nulls_after, "coercion removed nulls, clamping invalid count to 0"
        );
    }
    nulls_after.saturating_sub(nulls_before)
}

/// Computes [`ColumnProfile`]s.
#[derive(Debug, Clone, Default)]
pub struct ColumnProfiler {
    config: InferenceConfig,
}

impl ColumnProfiler {
    /// Create a column profiler with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a column profiler with custom settings.
    pub fn with_config(config: InferenceConfig) -> Self {
        Self { config }
    }

    /// Profile one column given its inferred type.
    pub fn profile(&self, column: &Column, inferred_type: InferredType) -> ColumnProfile {
        let row_count = column.len();
        let null_count = column.null_count();

        let null_pct = ratio(null_count, row_count, 0.0);

        let unique_count = column
            .non_null()
            .map(|v| v.key())
            .collect::<HashSet<_>>()
            .len();

        let mut summary = None;
        let invalid_count = match inferred_type {
            InferredType::Numeric => {
                let coerced: Vec<Option<f64>> =
                    column.values().iter().map(|v| v.as_number()).collect();
                let nulls_after = coerced.iter().filter(|v| v.is_none()).count();
                summary = numeric_summary(coerced.into_iter().flatten());
                coercion_invalid_count(column.name(), null_count, nulls_after)
            }
            InferredType::Datetime => column
                .non_null()
                .filter_map(|v| v.to_text())
                .filter(|v| !dates::is_date(v))
                .count(),
            InferredType::String => self.email_invalid_count(column),
        };

        let valid_pct = if row_count == 0 {
            1.0
        } else {
            1.0 - invalid_count as f64 / row_count as f64
        };

        ColumnProfile {
            name: column.name().to_string(),
            inferred_type,
            null_pct,
            unique_count,
            invalid_count,
            valid_pct,
            min: summary.map(|s| s.min),
            max: summary.map(|s| s.max),
            mean: summary.map(|s| s.mean),
            std: summary.and_then(|s| s.std),
        }
    }

    /// String columns are only validated when they look like email columns.
    fn email_invalid_count(&self, column: &Column) -> usize {
        let sample = text_sample(column, self.config.sample_limit);
        if sample.is_empty() {
            return 0;
        }

        let matches = sample.iter().filter(|v| is_email(v)).count();
        if matches as f64 / sample.len() as f64 <= self.config.email_ratio {
            return 0;
        }

        column
            .non_null()
            .filter_map(|v| v.to_text())
            .filter(|v| !is_email(v))
            .count()
    }
}

/// `part / whole`, or `empty` when there is nothing to divide by.
pub(crate) fn ratio(part: usize, whole: usize, empty: f64) -> f64 {
    if whole == 0 {
        empty
    } else {
        part as f64 / whole as f64
    }
}
