//! CSV/TSV loader with delimiter detection and per-column storage typing.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{ProfileError, Result};
use super::source::{Column, Dataset, SourceMetadata};
use super::value::{StorageKind, Value};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Cell contents read as missing values.
const NULL_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Loads delimited text files into a [`Dataset`].
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the dataset and its source metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| ProfileError::io(path, e))?;
        let size_bytes = file
            .metadata()
            .map_err(|e| ProfileError::io(path, e))?
            .len();

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| ProfileError::io(path, e))?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents)?,
        };

        let dataset = self.parse_bytes(&contents, delimiter)?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        debug!(
            path = %path.display(),
            format = %format,
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "loaded dataset"
        );

        let source = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            dataset.row_count(),
            dataset.column_count(),
        );

        Ok((dataset, source))
    }

    /// Parse bytes with a known delimiter.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut headers: Vec<String> = if self.config.has_header {
            reader.headers()?.iter().map(|s| s.to_string()).collect()
        } else {
            Vec::new()
        };

        let mut rows: Vec<Vec<String>> = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }

            let record = result?;
            if !self.config.has_header && headers.is_empty() {
                headers = (0..record.len())
                    .map(|i| format!("column_{}", i + 1))
                    .collect();
            }
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) && rows.is_empty() {
            return Err(ProfileError::EmptyData("No columns found".to_string()));
        }

        let expected_cols = headers.len();
        let mut cells: Vec<Vec<String>> = vec![Vec::with_capacity(rows.len()); expected_cols];
        for mut row in rows {
            // Pad short rows, drop extra fields
            row.resize(expected_cols, String::new());
            for (column, cell) in cells.iter_mut().zip(row) {
                column.push(cell);
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, raw)| type_column(name, raw))
            .collect();

        Dataset::new(columns)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if a raw cell represents a missing value.
pub fn is_null_value(value: &str) -> bool {
    NULL_MARKERS.contains(&value)
}

/// Decide the storage kind of a column of raw cells and convert them.
///
/// A column is integer, float or boolean only if every present cell parses
/// as such; anything else keeps the raw text.
fn type_column(name: String, raw: Vec<String>) -> Column {
    let present = || raw.iter().map(String::as_str).filter(|v| !is_null_value(v));

    let storage = if present().next().is_none() {
        StorageKind::Text
    } else if present().all(|v| v.trim().parse::<i64>().is_ok()) {
        StorageKind::Integer
    } else if present().all(|v| v.trim().parse::<f64>().is_ok()) {
        StorageKind::Float
    } else if present().all(|v| parse_bool(v).is_some()) {
        StorageKind::Boolean
    } else {
        StorageKind::Text
    };

    let values = raw
        .into_iter()
        .map(|cell| {
            if is_null_value(&cell) {
                return Value::Null;
            }
            match storage {
                StorageKind::Integer => cell.trim().parse().map(Value::Int).unwrap_or(Value::Null),
                StorageKind::Float => cell.trim().parse().map(Value::Float).unwrap_or(Value::Null),
                StorageKind::Boolean => parse_bool(&cell).map(Value::Bool).unwrap_or(Value::Null),
                StorageKind::Text => Value::Text(cell),
            }
        })
        .collect();

    Column::with_storage(name, storage, values)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "True" | "TRUE" | "true" => Some(true),
        "False" | "FALSE" | "false" => Some(false),
        _ => None,
    }
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(ProfileError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64
        } else {
            0.0
        };

        // Higher count with lower variance wins; tabs get a small bonus
        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data).unwrap(), b'\t');
    }

    #[test]
    fn test_parse_csv_types_columns() {
        let parser = Parser::new();
        let data = b"name,age,score,active\nAlice,30,1.5,true\nBob,,2,False";
        let dataset = parser.parse_bytes(data, b',').unwrap();

        assert_eq!(dataset.column_names(), vec!["name", "age", "score", "active"]);
        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.columns()[0].storage(), StorageKind::Text);
        assert_eq!(dataset.columns()[1].storage(), StorageKind::Integer);
        assert_eq!(dataset.columns()[2].storage(), StorageKind::Float);
        assert_eq!(dataset.columns()[3].storage(), StorageKind::Boolean);
        assert_eq!(dataset.get(1, 1), Some(&Value::Null));
        assert_eq!(dataset.get(0, 0), Some(&Value::from("Alice")));
    }

    #[test]
    fn test_mixed_column_stays_text() {
        let parser = Parser::new();
        let dataset = parser.parse_bytes(b"v\n1\n2\nx\n4", b',').unwrap();

        assert_eq!(dataset.columns()[0].storage(), StorageKind::Text);
        assert_eq!(dataset.get(0, 0), Some(&Value::from("1")));
    }

    #[test]
    fn test_header_only_is_empty_dataset() {
        let parser = Parser::new();
        let dataset = parser.parse_bytes(b"a,b\n", b',').unwrap();

        assert_eq!(dataset.row_count(), 0);
        assert_eq!(dataset.column_count(), 2);
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let parser = Parser::new();
        let dataset = parser.parse_bytes(b"a,b,c\n1,2\n3,4,5,6", b',').unwrap();

        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.get(0, 2), Some(&Value::Null));
        assert_eq!(dataset.get(1, 2), Some(&Value::Int(5)));
    }

    #[test]
    fn test_duplicate_headers_rejected() {
        let parser = Parser::new();
        let err = parser.parse_bytes(b"a,a\n1,2", b',').unwrap_err();
        assert!(matches!(err, ProfileError::DuplicateColumn(_)));
    }

    #[test]
    fn test_is_null_value() {
        assert!(is_null_value(""));
        assert!(is_null_value("NA"));
        assert!(is_null_value("N/A"));
        assert!(is_null_value("null"));
        assert!(is_null_value("NULL"));
        assert!(is_null_value("NaN"));
        assert!(is_null_value("None"));
        assert!(!is_null_value("value"));
        assert!(!is_null_value("0"));
        assert!(!is_null_value("missing"));
    }
}
