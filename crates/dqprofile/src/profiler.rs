//! Main profiler and its public entry points.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::consistency::RangeChecker;
use crate::error::{ProfileError, Result};
use crate::inference::{InferenceConfig, TypeInferrer};
use crate::input::{Dataset, Parser, ParserConfig, SourceMetadata, ValueKey};
use crate::profile::{ratio, ColumnProfile, ColumnProfiler};
use crate::report::ReportWriter;
use crate::sample::{sample_rows, RowSample, SampleConfig};
use crate::score::{DatasetMetrics, ScoreAggregator, ScoreConfig, Summary, Warning};

/// Configuration for a profiling run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilerConfig {
    /// Type and email inference heuristics.
    pub inference: InferenceConfig,
    /// Score weights and warning thresholds.
    pub score: ScoreConfig,
    /// Size of the retained row sample.
    pub sample: SampleConfig,
}

impl ProfilerConfig {
    /// Load a configuration from a JSON file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ProfileError::io(path, e))?;
        let config: ProfilerConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the heuristics cannot work with.
    pub fn validate(&self) -> Result<()> {
        let ratios = [
            ("inference.date_ratio", self.inference.date_ratio),
            ("inference.email_ratio", self.inference.email_ratio),
        ];
        for (name, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(ProfileError::Config(format!(
                    "{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }

        let total = self.score.weights.total();
        if (total - 1.0).abs() > 1e-6 {
            return Err(ProfileError::Config(format!(
                "score weights must sum to 1.0, got {}",
                total
            )));
        }

        Ok(())
    }
}

/// Full result of one profiling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProfile {
    #[serde(rename = "dataset")]
    pub dataset_name: String,
    #[serde(rename = "execution_date")]
    pub execution_timestamp: DateTime<Utc>,
    pub row_count: usize,
    pub columns: Vec<ColumnProfile>,
    pub summary: Summary,
    pub warnings: Vec<Warning>,
    #[serde(rename = "df_sample")]
    pub sample: RowSample,
    /// Where the data came from, when it was loaded from a file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceMetadata>,
}

/// The profiling engine.
pub struct Profiler {
    config: ProfilerConfig,
    parser: Parser,
    inferrer: TypeInferrer,
    columns: ColumnProfiler,
    ranges: RangeChecker,
    scores: ScoreAggregator,
}

impl Profiler {
    /// Create a profiler with default configuration.
    pub fn new() -> Self {
        Self::with_config(ProfilerConfig::default())
    }

    /// Create a profiler with custom configuration.
    pub fn with_config(config: ProfilerConfig) -> Self {
        Self {
            parser: Parser::new(),
            inferrer: TypeInferrer::with_config(config.inference.clone()),
            columns: ColumnProfiler::with_config(config.inference.clone()),
            ranges: RangeChecker::new(),
            scores: ScoreAggregator::with_config(config.score.clone()),
            config,
        }
    }

    /// Use a custom parser configuration for file input.
    pub fn with_parser(mut self, config: ParserConfig) -> Self {
        self.parser = Parser::with_config(config);
        self
    }

    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    /// Profile an in-memory dataset. Performs no I/O.
    pub fn profile(&self, dataset: &Dataset, dataset_name: &str) -> DatasetProfile {
        self.profile_at(dataset, dataset_name, Utc::now())
    }

    /// Profile an in-memory dataset with a fixed execution timestamp.
    pub fn profile_at(
        &self,
        dataset: &Dataset,
        dataset_name: &str,
        execution_timestamp: DateTime<Utc>,
    ) -> DatasetProfile {
        let row_count = dataset.row_count();
        info!(
            dataset = dataset_name,
            rows = row_count,
            columns = dataset.column_count(),
            "profiling dataset"
        );

        let columns: Vec<ColumnProfile> = dataset
            .columns()
            .iter()
            .map(|column| {
                let inferred_type = self.inferrer.infer(column);
                debug!(column = column.name(), inferred_type = %inferred_type, "inferred column type");
                self.columns.profile(column, inferred_type)
            })
            .collect();

        let consistency = self.ranges.check(dataset);
        debug!(
            pairs = consistency.pairs.len(),
            inconsistent = consistency.inconsistent_count,
            "checked start/end pairs"
        );

        let metrics = DatasetMetrics {
            duplicated_rows_pct: ratio(duplicated_rows(dataset), row_count, 0.0),
            complete_rows_pct: ratio(complete_rows(dataset), row_count, 1.0),
            inconsistency_pct: consistency.inconsistency_pct,
        };

        let (summary, warnings) = self.scores.aggregate(&columns, &metrics);
        info!(
            dataset = dataset_name,
            dq_score = summary.dq_score,
            warnings = warnings.len(),
            "profile complete"
        );

        DatasetProfile {
            dataset_name: dataset_name.to_string(),
            execution_timestamp,
            row_count,
            columns,
            summary,
            warnings,
            sample: sample_rows(dataset, &self.config.sample),
            source: None,
        }
    }

    /// Load a delimited file and profile it.
    ///
    /// The dataset name defaults to the file name without its extension.
    pub fn profile_file(
        &self,
        path: impl AsRef<Path>,
        dataset_name: Option<&str>,
    ) -> Result<DatasetProfile> {
        let path = path.as_ref();
        let (dataset, source) = self.parser.parse_file(path)?;

        let name = match dataset_name {
            Some(name) => name.to_string(),
            None => default_dataset_name(path),
        };

        let mut profile = self.profile(&dataset, &name);
        profile.source = Some(source);
        Ok(profile)
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Load, profile and persist a delimited file in one call.
pub fn run_profile(
    path: impl AsRef<Path>,
    dataset_name: Option<&str>,
    profiler: &Profiler,
    writer: &ReportWriter,
) -> Result<DatasetProfile> {
    let profile = profiler.profile_file(path, dataset_name)?;
    writer.write(&profile)?;
    Ok(profile)
}

/// The file name without its extension.
pub fn default_dataset_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string())
}

/// Rows identical to an earlier row. Nulls compare equal to each other.
fn duplicated_rows(dataset: &Dataset) -> usize {
    let mut seen: HashSet<Vec<ValueKey<'_>>> = HashSet::with_capacity(dataset.row_count());
    (0..dataset.row_count())
        .filter(|&row| !seen.insert(dataset.row(row).map(|v| v.key()).collect()))
        .count()
}

/// Rows without any null.
fn complete_rows(dataset: &Dataset) -> usize {
    (0..dataset.row_count())
        .filter(|&row| dataset.row(row).all(|v| !v.is_null()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Column, Value};

    fn dataset(columns: Vec<Column>) -> Dataset {
        Dataset::new(columns).unwrap()
    }

    #[test]
    fn test_duplicated_rows_treat_nulls_as_equal() {
        let data = dataset(vec![
            Column::new("a", vec![Value::Int(1), Value::Int(1), Value::Null, Value::Null]),
            Column::new("b", vec![Value::from("x"), Value::from("x"), Value::Null, Value::Null]),
        ]);

        assert_eq!(duplicated_rows(&data), 2);
        assert_eq!(complete_rows(&data), 2);
    }

    #[test]
    fn test_profile_preserves_column_order() {
        let data = dataset(vec![
            Column::new("z", vec![Value::Int(1)]),
            Column::new("a", vec![Value::from("x")]),
        ]);

        let profile = Profiler::new().profile(&data, "ordered");
        let names: Vec<&str> = profile.columns.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(names, vec!["z", "a"]);
        assert_eq!(profile.summary.n_columns, 2);
        assert_eq!(profile.dataset_name, "ordered");
    }

    #[test]
    fn test_default_dataset_name() {
        assert_eq!(default_dataset_name(Path::new("/tmp/sales_2024.csv")), "sales_2024");
    }

    #[test]
    fn test_config_validation() {
        assert!(ProfilerConfig::default().validate().is_ok());

        let mut config = ProfilerConfig::default();
        config.score.weights.completeness = 0.9;
        assert!(matches!(config.validate(), Err(ProfileError::Config(_))));

        let mut config = ProfilerConfig::default();
        config.inference.date_ratio = 1.5;
        assert!(matches!(config.validate(), Err(ProfileError::Config(_))));
    }

    #[test]
    fn test_config_partial_json_keeps_defaults() {
        let config: ProfilerConfig =
            serde_json::from_str(r#"{"sample": {"max_rows": 10}}"#).unwrap();

        assert_eq!(config.sample.max_rows, 10);
        assert_eq!(config.sample.seed, 42);
        assert_eq!(config.inference, InferenceConfig::default());
    }
}
