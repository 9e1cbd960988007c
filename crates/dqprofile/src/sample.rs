//! Bounded row sample kept alongside a profile for visualization.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::input::Dataset;

/// Column name to sampled values, in column order.
pub type RowSample = IndexMap<String, Vec<serde_json::Value>>;

/// Sampling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    /// Maximum rows kept.
    pub max_rows: usize,
    /// Seed for picking rows from larger datasets.
    pub seed: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            max_rows: 1000,
            seed: 42,
        }
    }
}

/// Pick the row indices to keep, ascending.
///
/// Datasets no larger than `max_rows` are kept whole. Larger ones get a
/// seeded partial Fisher-Yates shuffle, so the same dataset always yields
/// the same sample.
pub fn sample_indices(row_count: usize, config: &SampleConfig) -> Vec<usize> {
    if row_count <= config.max_rows {
        return (0..row_count).collect();
    }

    let mut rng = fastrand::Rng::with_seed(config.seed);
    let mut indices: Vec<usize> = (0..row_count).collect();
    for i in 0..config.max_rows {
        let j = rng.usize(i..row_count);
        indices.swap(i, j);
    }

    let mut picked = indices[..config.max_rows].to_vec();
    picked.sort_unstable();
    picked
}

/// Build the column-oriented sample. Absent values become JSON `null`.
pub fn sample_rows(dataset: &Dataset, config: &SampleConfig) -> RowSample {
    let indices = sample_indices(dataset.row_count(), config);

    dataset
        .columns()
        .iter()
        .map(|column| {
            let values = indices
                .iter()
                .map(|&i| column.values()[i].to_json())
                .collect();
            (column.name().to_string(), values)
        })
        .collect()
}
