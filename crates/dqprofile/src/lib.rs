//! dqprofile: data-quality profiling for tabular datasets.
//!
//! A profile infers a type for every column, measures null and invalid
//! rates, checks start/end date columns for inverted ranges, and rolls it
//! all into four sub-scores and one composite quality score with warnings.
//!
//! # Pipeline
//!
//! - **Type inference**: numeric storage, date-parse success rate, or string
//! - **Column metrics**: nulls, distinct values, invalid values, numeric stats
//! - **Range consistency**: `start`/`from`/`begin` vs `end`/`to`/`finish` columns
//! - **Scoring**: completeness, uniqueness, validity, consistency
//! - **Reports**: `latest_profile.json` plus one timestamped snapshot per run
//!
//! # Example
//!
//! ```no_run
//! use dqprofile::{run_profile, Profiler, ReportWriter};
//!
//! let profiler = Profiler::new();
//! let writer = ReportWriter::new("results");
//! let profile = run_profile("input/sales.csv", None, &profiler, &writer).unwrap();
//!
//! println!("DQ score: {:.2}", profile.summary.dq_score);
//! for warning in &profile.warnings {
//!     println!("{}: {}", warning.kind.label(), warning.message);
//! }
//! ```

pub mod consistency;
pub mod dates;
pub mod describe;
pub mod error;
pub mod inference;
pub mod input;
pub mod intake;
pub mod profile;
pub mod report;
pub mod sample;
pub mod score;

mod profiler;

pub use crate::profiler::{default_dataset_name, run_profile, DatasetProfile, Profiler, ProfilerConfig};
pub use describe::{describe_sample, FeatureStats, FeatureSummary};
pub use consistency::{ConsistencyReport, RangeChecker, RangePair};
pub use error::{ProfileError, Result};
pub use inference::{InferenceConfig, InferredType, TypeInferrer};
pub use input::{Column, Dataset, Parser, ParserConfig, SourceMetadata, StorageKind, Value};
pub use intake::Intake;
pub use profile::{ColumnProfile, ColumnProfiler};
pub use report::{load_report, ReportPaths, ReportWriter, LATEST_REPORT};
pub use sample::SampleConfig;
pub use score::{ScoreAggregator, ScoreConfig, ScoreWeights, Summary, Thresholds, Warning, WarningKind};
