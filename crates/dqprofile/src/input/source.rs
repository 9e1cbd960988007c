//! Data source abstraction and metadata.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ProfileError, Result};

use super::value::{StorageKind, Value};

/// Metadata about the source data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
}

impl SourceMetadata {
    /// Create metadata for a file that has been loaded.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
        }
    }
}

/// A named column of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    storage: StorageKind,
    values: Vec<Value>,
}

impl Column {
    /// Create a column, detecting its storage kind from the values.
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        let storage = StorageKind::detect(&values);
        Self {
            name: name.into(),
            storage,
            values,
        }
    }

    /// Create a column with an explicitly declared storage kind.
    ///
    /// A numeric declaration does not require every value to be a number;
    /// stray text in a numeric column is what the profiler reports as invalid.
    pub fn with_storage(name: impl Into<String>, storage: StorageKind, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            storage,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn storage(&self) -> StorageKind {
        self.storage
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of absent values.
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// Iterate over the present values, in order.
    pub fn non_null(&self) -> impl Iterator<Item = &Value> {
        self.values.iter().filter(|v| !v.is_null())
    }
}

/// An in-memory table: ordered, uniquely named columns of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    /// Build a dataset from columns.
    ///
    /// Fails when two columns share a name or when the columns differ in length.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(ProfileError::DuplicateColumn(column.name().to_string()));
            }
        }

        let row_count = columns.first().map(Column::len).unwrap_or(0);
        if let Some(column) = columns.iter().find(|c| c.len() != row_count) {
            return Err(ProfileError::ColumnLength {
                column: column.name().to_string(),
                expected: row_count,
                actual: column.len(),
            });
        }

        Ok(Self { columns, row_count })
    }

    /// Build a dataset from headers and row-major values.
    ///
    /// Short rows are padded with nulls and long rows truncated.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut columns: Vec<Vec<Value>> = vec![Vec::with_capacity(rows.len()); headers.len()];

        for row in rows {
            let mut cells = row.into_iter();
            for column in columns.iter_mut() {
                column.push(cells.next().unwrap_or(Value::Null));
            }
        }

        let columns = headers
            .into_iter()
            .zip(columns)
            .map(|(name, values)| Column::new(name, values))
            .collect();

        Self::new(columns)
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Get all column names, in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.columns.get(col).and_then(|c| c.values().get(row))
    }

    /// Iterate over the cells of one row.
    pub fn row(&self, row: usize) -> impl Iterator<Item = &Value> {
        self.columns.iter().filter_map(move |c| c.values().get(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_duplicate_names() {
        let err = Dataset::new(vec![
            Column::new("a", vec![Value::Int(1)]),
            Column::new("a", vec![Value::Int(2)]),
        ])
        .unwrap_err();

        assert!(matches!(err, ProfileError::DuplicateColumn(name) if name == "a"));
    }

    #[test]
    fn test_rejects_ragged_columns() {
        let err = Dataset::new(vec![
            Column::new("a", vec![Value::Int(1), Value::Int(2)]),
            Column::new("b", vec![Value::Int(1)]),
        ])
        .unwrap_err();

        assert!(matches!(err, ProfileError::ColumnLength { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn test_from_rows_pads_short_rows() {
        let dataset = Dataset::from_rows(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![Value::Int(1), Value::Int(2)], vec![Value::Int(3)]],
        )
        .unwrap();

        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.get(1, 1), Some(&Value::Null));
        assert_eq!(dataset.row(0).count(), 2);
    }

    #[test]
    fn test_no_columns_is_empty() {
        let dataset = Dataset::new(Vec::new()).unwrap();
        assert_eq!(dataset.row_count(), 0);
        assert_eq!(dataset.column_count(), 0);
        assert!(dataset.is_empty());
    }
}
