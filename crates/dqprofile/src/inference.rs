//! Column type inference.

use serde::{Deserialize, Serialize};

use crate::dates;
use crate::input::Column;

/// Semantic type inferred for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferredType {
    Numeric,
    Datetime,
    String,
}

impl InferredType {
    /// Get the lowercase name used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            InferredType::Numeric => "numeric",
            InferredType::Datetime => "datetime",
            InferredType::String => "string",
        }
    }
}

impl std::fmt::Display for InferredType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sampling ratios used by the type and email heuristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// How many leading non-null values are sampled.
    pub sample_limit: usize,
    /// Fraction of sampled values that must parse as dates (strictly greater).
    pub date_ratio: f64,
    /// Minimum sample size before a column may be called datetime.
    pub min_date_samples: usize,
    /// Fraction of sampled values that must look like emails (strictly greater).
    pub email_ratio: f64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            sample_limit: 100,
            date_ratio: 0.8,
            min_date_samples: 3,
            email_ratio: 0.6,
        }
    }
}

/// Classifies columns as numeric, datetime or string.
#[derive(Debug, Clone, Default)]
pub struct TypeInferrer {
    config: InferenceConfig,
}

impl TypeInferrer {
    /// Create a type inferrer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a type inferrer with custom settings.
    pub fn with_config(config: InferenceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Infer the type of a column.
    ///
    /// Numeric storage wins outright. Otherwise the leading non-null values
    /// are date-parsed as text; a large enough sample that mostly parses makes
    /// the column datetime. Everything else, all-null columns included, is a
    /// string.
    pub fn infer(&self, column: &Column) -> InferredType {
        if column.storage().is_numeric() {
            return InferredType::Numeric;
        }

        let sample = text_sample(column, self.config.sample_limit);
        if sample.len() >= self.config.min_date_samples && !sample.is_empty() {
            let parsed = sample.iter().filter(|v| dates::is_date(v)).count();
            if parsed as f64 / sample.len() as f64 > self.config.date_ratio {
                return InferredType::Datetime;
            }
        }

        InferredType::String
    }
}

/// The first `limit` non-null values of a column, as text.
pub(crate) fn text_sample(column: &Column, limit: usize) -> Vec<String> {
    column
        .non_null()
        .filter_map(|v| v.to_text())
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{StorageKind, Value};

    fn text_column(values: &[Option<&str>]) -> Column {
        Column::new("col", values.iter().map(|v| Value::from(*v)).collect())
    }

    #[test]
    fn test_numeric_storage_is_numeric() {
        let column = Column::new("n", vec![Value::Int(1), Value::Null, Value::Int(3)]);
        assert_eq!(TypeInferrer::new().infer(&column), InferredType::Numeric);

        let flags = Column::new("b", vec![Value::Bool(true), Value::Bool(false)]);
        assert_eq!(TypeInferrer::new().infer(&flags), InferredType::Numeric);
    }

    #[test]
    fn test_declared_numeric_storage_with_text() {
        let column = Column::with_storage(
            "n",
            StorageKind::Float,
            vec![Value::Int(1), Value::from("x")],
        );
        assert_eq!(TypeInferrer::new().infer(&column), InferredType::Numeric);
    }

    #[test]
    fn test_dates_detected() {
        let column = text_column(&[
            Some("2024-01-01"),
            Some("2024-02-01"),
            Some("2024-03-01"),
            None,
        ]);
        assert_eq!(TypeInferrer::new().infer(&column), InferredType::Datetime);
    }

    #[test]
    fn test_too_few_dates_is_string() {
        let column = text_column(&[Some("2024-01-01"), Some("2024-02-01"), None, None]);
        assert_eq!(TypeInferrer::new().infer(&column), InferredType::String);
    }

    #[test]
    fn test_date_ratio_is_strict() {
        // 4 of 5 parse: exactly 0.8 is not enough
        let column = text_column(&[
            Some("2024-01-01"),
            Some("2024-02-01"),
            Some("2024-03-01"),
            Some("2024-04-01"),
            Some("soon"),
        ]);
        assert_eq!(TypeInferrer::new().infer(&column), InferredType::String);
    }

    #[test]
    fn test_all_null_is_string() {
        let column = text_column(&[None, None, None]);
        assert_eq!(TypeInferrer::new().infer(&column), InferredType::String);
    }

    #[test]
    fn test_only_leading_sample_is_inspected() {
        let config = InferenceConfig {
            sample_limit: 3,
            ..InferenceConfig::default()
        };
        let column = text_column(&[
            Some("2024-01-01"),
            Some("2024-02-01"),
            Some("2024-03-01"),
            Some("later"),
            Some("never"),
        ]);
        assert_eq!(
            TypeInferrer::with_config(config).infer(&column),
            InferredType::Datetime
        );
    }
}
