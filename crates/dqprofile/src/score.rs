//! Sub-scores, the composite quality score, and threshold warnings.

use serde::{Deserialize, Serialize};

use crate::profile::ColumnProfile;

/// Weights of the composite score. They should sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub completeness: f64,
    pub uniqueness: f64,
    pub validity: f64,
    pub consistency: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            completeness: 0.35,
            uniqueness: 0.25,
            validity: 0.25,
            consistency: 0.15,
        }
    }
}

impl ScoreWeights {
    pub fn total(&self) -> f64 {
        self.completeness + self.uniqueness + self.validity + self.consistency
    }
}

/// Limits past which a warning is raised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Warn when the completeness score is below this.
    pub min_completeness: f64,
    /// Warn when the duplicated-row fraction is above this.
    pub max_duplicated_rows: f64,
    /// Warn when the validity score is below this.
    pub min_validity: f64,
    /// Warn when the inconsistency fraction is above this.
    pub max_inconsistency: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_completeness: 0.95,
            max_duplicated_rows: 0.01,
            min_validity: 0.95,
            max_inconsistency: 0.01,
        }
    }
}

/// Score aggregation settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    pub weights: ScoreWeights,
    pub thresholds: Thresholds,
}

/// Which sub-score a warning is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    Completeness,
    Uniqueness,
    Validity,
    Consistency,
}

impl WarningKind {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            WarningKind::Completeness => "Completeness",
            WarningKind::Uniqueness => "Uniqueness",
            WarningKind::Validity => "Validity",
            WarningKind::Consistency => "Consistency",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            WarningKind::Completeness => "high null percentage in some columns",
            WarningKind::Uniqueness => "duplicated rows exceed threshold",
            WarningKind::Validity => "low valid-records percentage",
            WarningKind::Consistency => "high start/end inconsistency",
        }
    }
}

/// A violated threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    #[serde(rename = "type")]
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    pub fn new(kind: WarningKind) -> Self {
        Self {
            kind,
            message: kind.message().to_string(),
        }
    }
}

/// Dataset-level measurements that feed the scores.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DatasetMetrics {
    pub duplicated_rows_pct: f64,
    pub complete_rows_pct: f64,
    pub inconsistency_pct: f64,
}

/// Summary block of a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub duplicated_rows_pct: f64,
    pub complete_rows_pct: f64,
    pub inconsistency_pct: f64,
    pub completeness_score: f64,
    pub uniqueness_score: f64,
    pub validity_score: f64,
    pub consistency_score: f64,
    pub dq_score: f64,
    pub n_columns: usize,
}

/// The four sub-scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    pub completeness: f64,
    pub uniqueness: f64,
    pub validity: f64,
    pub consistency: f64,
}

impl SubScores {
    /// Weighted sum of the sub-scores.
    pub fn composite(&self, weights: &ScoreWeights) -> f64 {
        weights.completeness * self.completeness
            + weights.uniqueness * self.uniqueness
            + weights.validity * self.validity
            + weights.consistency * self.consistency
    }
}

/// Combines column and dataset metrics into scores and warnings.
#[derive(Debug, Clone, Default)]
pub struct ScoreAggregator {
    config: ScoreConfig,
}

impl ScoreAggregator {
    /// Create an aggregator with the default weights and thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an aggregator with custom weights and thresholds.
    pub fn with_config(config: ScoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoreConfig {
        &self.config
    }

    /// Compute the four sub-scores.
    ///
    /// With no columns there are no nulls and nothing invalid, so
    /// completeness and validity are 1.0.
    pub fn sub_scores(&self, columns: &[ColumnProfile], metrics: &DatasetMetrics) -> SubScores {
        let mean_null = mean(columns.iter().map(|c| c.null_pct)).unwrap_or(0.0);
        let validity = mean(columns.iter().map(|c| c.valid_pct)).unwrap_or(1.0);

        SubScores {
            completeness: 1.0 - mean_null,
            uniqueness: 1.0 - metrics.duplicated_rows_pct,
            validity,
            consistency: 1.0 - metrics.inconsistency_pct,
        }
    }

    /// Build the summary and the list of warnings.
    pub fn aggregate(
        &self,
        columns: &[ColumnProfile],
        metrics: &DatasetMetrics,
    ) -> (Summary, Vec<Warning>) {
        let scores = self.sub_scores(columns, metrics);

        let summary = Summary {
            duplicated_rows_pct: metrics.duplicated_rows_pct,
            complete_rows_pct: metrics.complete_rows_pct,
            inconsistency_pct: metrics.inconsistency_pct,
            completeness_score: scores.completeness,
            uniqueness_score: scores.uniqueness,
            validity_score: scores.validity,
            consistency_score: scores.consistency,
            dq_score: scores.composite(&self.config.weights),
            n_columns: columns.len(),
        };

        let warnings = self.warnings(&summary);
        (summary, warnings)
    }

    /// Raise one warning per violated threshold.
    pub fn warnings(&self, summary: &Summary) -> Vec<Warning> {
        let t = &self.config.thresholds;

        [
            (
                WarningKind::Completeness,
                summary.completeness_score < t.min_completeness,
            ),
            (
                WarningKind::Uniqueness,
                summary.duplicated_rows_pct > t.max_duplicated_rows,
            ),
            (WarningKind::Validity, summary.validity_score < t.min_validity),
            (
                WarningKind::Consistency,
                summary.inconsistency_pct > t.max_inconsistency,
            ),
        ]
        .into_iter()
        .filter(|(_, violated)| *violated)
        .map(|(kind, _)| Warning::new(kind))
        .collect()
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::InferredType;

    fn column(null_pct: f64, valid_pct: f64) -> ColumnProfile {
        ColumnProfile {
            name: "c".to_string(),
            inferred_type: InferredType::String,
            null_pct,
            unique_count: 0,
            invalid_count: 0,
            valid_pct,
            min: None,
            max: None,
            mean: None,
            std: None,
        }
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!((ScoreWeights::default().total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_perfect_data() {
        let columns = vec![column(0.0, 1.0), column(0.0, 1.0)];
        let metrics = DatasetMetrics {
            complete_rows_pct: 1.0,
            ..DatasetMetrics::default()
        };

        let (summary, warnings) = ScoreAggregator::new().aggregate(&columns, &metrics);

        assert!((summary.dq_score - 1.0).abs() < 1e-12);
        assert_eq!(summary.n_columns, 2);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_composite_weights() {
        let columns = vec![column(0.5, 0.5)];
        let metrics = DatasetMetrics {
            duplicated_rows_pct: 0.5,
            complete_rows_pct: 0.5,
            inconsistency_pct: 0.5,
        };

        let (summary, _) = ScoreAggregator::new().aggregate(&columns, &metrics);

        assert!((summary.completeness_score - 0.5).abs() < 1e-12);
        assert!((summary.dq_score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_all_warnings_in_order() {
        let columns = vec![column(0.2, 0.5)];
        let metrics = DatasetMetrics {
            duplicated_rows_pct: 0.1,
            complete_rows_pct: 0.8,
            inconsistency_pct: 0.1,
        };

        let (_, warnings) = ScoreAggregator::new().aggregate(&columns, &metrics);
        let kinds: Vec<WarningKind> = warnings.iter().map(|w| w.kind).collect();

        assert_eq!(
            kinds,
            vec![
                WarningKind::Completeness,
                WarningKind::Uniqueness,
                WarningKind::Validity,
                WarningKind::Consistency,
            ]
        );
        assert_eq!(warnings[1].message, "duplicated rows exceed threshold");
    }

    #[test]
    fn test_thresholds_are_strict() {
        // Exactly at the limit does not warn
        let columns = vec![column(0.05, 0.95)];
        let metrics = DatasetMetrics {
            duplicated_rows_pct: 0.01,
            complete_rows_pct: 1.0,
            inconsistency_pct: 0.01,
        };

        let summary = Summary {
            duplicated_rows_pct: 0.01,
            complete_rows_pct: 1.0,
            inconsistency_pct: 0.01,
            completeness_score: 0.95,
            uniqueness_score: 0.99,
            validity_score: 0.95,
            consistency_score: 0.99,
            dq_score: 0.0,
            n_columns: columns.len(),
        };

        let aggregator = ScoreAggregator::new();
        assert!(aggregator.warnings(&summary).is_empty());
        assert_eq!(aggregator.sub_scores(&columns, &metrics).validity, 0.95);
    }

    #[test]
    fn test_custom_thresholds() {
        let config = ScoreConfig {
            thresholds: Thresholds {
                min_completeness: 0.5,
                ..Thresholds::default()
            },
            ..ScoreConfig::default()
        };
        let columns = vec![column(0.2, 1.0)];
        let metrics = DatasetMetrics::default();

        let (_, warnings) = ScoreAggregator::with_config(config).aggregate(&columns, &metrics);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_no_columns() {
        let (summary, warnings) = ScoreAggregator::new().aggregate(&[], &DatasetMetrics::default());

        assert_eq!(summary.completeness_score, 1.0);
        assert_eq!(summary.validity_score, 1.0);
        assert_eq!(summary.n_columns, 0);
        assert!(warnings.is_empty());
    }
}
