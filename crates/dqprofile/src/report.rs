//! Persistence for profiles - the "latest" report and timestamped snapshots.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::{ProfileError, Result};
use crate::profiler::DatasetProfile;

/// File name of the report that is replaced on every run.
pub const LATEST_REPORT: &str = "latest_profile.json";

/// Compact UTC timestamp used in snapshot and archive file names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Format a timestamp the way file names embed it.
pub fn file_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Make a dataset name usable as one file name component.
///
/// Path separators and control characters become `_`, so a name can never
/// point outside the results directory. Empty or dot-only names fall back
/// to `dataset`.
pub fn file_safe_name(name: &str) -> String {
    let safe: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if safe.chars().all(|c| c == '.') {
        "dataset".to_string()
    } else {
        safe
    }
}

/// Paths written for one profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub latest: PathBuf,
    pub snapshot: PathBuf,
}

/// Writes profiles into a results directory.
///
/// ```text
/// results/
/// ├── latest_profile.json                      # replaced every run
/// └── sales_20240115T103000Z_profile.json      # one per run, never replaced
/// ```
#[derive(Debug, Clone)]
pub struct ReportWriter {
    results_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        Self {
            results_dir: results_dir.into(),
        }
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    /// Location of the report that is replaced on every run.
    pub fn latest_path(&self) -> PathBuf {
        self.results_dir.join(LATEST_REPORT)
    }

    /// Persist a profile: first a new snapshot, then the latest report.
    ///
    /// Any I/O failure is returned as is; nothing is retried.
    pub fn write(&self, profile: &DatasetProfile) -> Result<ReportPaths> {
        fs::create_dir_all(&self.results_dir)
            .map_err(|e| ProfileError::io(&self.results_dir, e))?;

        let json = serde_json::to_vec_pretty(profile)?;

        let snapshot = self.write_snapshot(profile, &json)?;
        let latest = self.latest_path();
        write_replacing(&latest, &json)?;

        info!(
            latest = %latest.display(),
            snapshot = %snapshot.display(),
            "wrote profile report"
        );

        Ok(ReportPaths { latest, snapshot })
    }

    /// Create a snapshot file, never touching an existing one.
    ///
    /// Two runs inside the same second get `-1`, `-2`, ... suffixes.
    fn write_snapshot(&self, profile: &DatasetProfile, json: &[u8]) -> Result<PathBuf> {
        let stem = format!(
            "{}_{}_profile",
            file_safe_name(&profile.dataset_name),
            file_timestamp(&profile.execution_timestamp)
        );

        let mut attempt = 0usize;
        loop {
            let name = if attempt == 0 {
                format!("{}.json", stem)
            } else {
                format!("{}-{}.json", stem, attempt)
            };
            let path = self.results_dir.join(name);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    write_all(file, &path, json)?;
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(ProfileError::io(&path, e)),
            }
        }
    }

    /// Read the latest report back.
    pub fn load_latest(&self) -> Result<DatasetProfile> {
        load_report(self.latest_path())
    }

    /// List snapshot files, oldest first.
    pub fn list_snapshots(&self) -> Result<Vec<PathBuf>> {
        if !self.results_dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries: Vec<PathBuf> = fs::read_dir(&self.results_dir)
            .map_err(|e| ProfileError::io(&self.results_dir, e))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n != LATEST_REPORT && n.ends_with(".json"))
            })
            .collect();

        entries.sort();
        Ok(entries)
    }
}

/// Read a profile report from a JSON file.
pub fn load_report(path: impl AsRef<Path>) -> Result<DatasetProfile> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ProfileError::io(path, e))?;
    let profile = serde_json::from_reader(BufReader::new(file))?;
    Ok(profile)
}

/// Replace a file through a temporary sibling and a rename.
fn write_replacing(path: &Path, json: &[u8]) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let file = File::create(&tmp).map_err(|e| ProfileError::io(&tmp, e))?;
    write_all(file, &tmp, json)?;
    fs::rename(&tmp, path).map_err(|e| ProfileError::io(path, e))
}

fn write_all(file: File, path: &Path, json: &[u8]) -> Result<()> {
    let mut writer = BufWriter::new(file);
    writer
        .write_all(json)
        .and_then(|_| writer.flush())
        .map_err(|e| ProfileError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_file_timestamp() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 5).unwrap();
        assert_eq!(file_timestamp(&ts), "20240115T103005Z");
    }

    #[test]
    fn test_file_safe_name() {
        assert_eq!(file_safe_name("sales"), "sales");
        assert_eq!(file_safe_name("../x"), ".._x");
        assert_eq!(file_safe_name("a/b\\c"), "a_b_c");
        assert_eq!(file_safe_name(".."), "dataset");
        assert_eq!(file_safe_name("  "), "dataset");
    }

    #[test]
    fn test_snapshot_stays_in_results_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let results = dir.path().join("results");
        let writer = ReportWriter::new(&results);

        let dataset = crate::Dataset::new(vec![crate::Column::new(
            "id",
            vec![crate::Value::Int(1)],
        )])
        .unwrap();
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let profile = crate::Profiler::new().profile_at(&dataset, "../escape/x", at);

        let paths = writer.write(&profile).unwrap();

        assert_eq!(paths.snapshot.parent(), Some(results.as_path()));
        assert!(paths.snapshot.ends_with(".._escape_x_20240115T103000Z_profile.json"));
        assert!(!dir.path().join("escape").exists());
    }

    #[test]
    fn test_latest_path() {
        let writer = ReportWriter::new("/tmp/results");
        assert_eq!(
            writer.latest_path(),
            PathBuf::from("/tmp/results/latest_profile.json")
        );
    }
}
