//! File intake: pick the newest input, profile it, archive it.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::{ProfileError, Result};
use crate::profiler::{run_profile, DatasetProfile, Profiler};
use crate::report::{file_timestamp, ReportWriter};

/// Extension of files picked up from the intake directory.
const INPUT_EXTENSION: &str = "csv";

/// Drives one profiling run from an intake directory.
pub struct Intake {
    input_dir: PathBuf,
    archive_dir: PathBuf,
    profiler: Profiler,
    writer: ReportWriter,
}

impl Intake {
    pub fn new(
        input_dir: impl Into<PathBuf>,
        archive_dir: impl Into<PathBuf>,
        profiler: Profiler,
        writer: ReportWriter,
    ) -> Self {
        Self {
            input_dir: input_dir.into(),
            archive_dir: archive_dir.into(),
            profiler,
            writer,
        }
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    /// The most recently modified `.csv` file in the intake directory.
    pub fn pick_latest(&self) -> Result<Option<PathBuf>> {
        if !self.input_dir.exists() {
            return Ok(None);
        }

        let entries =
            fs::read_dir(&self.input_dir).map_err(|e| ProfileError::io(&self.input_dir, e))?;

        let mut newest: Option<(SystemTime, PathBuf)> = None;
        for entry in entries {
            let entry = entry.map_err(|e| ProfileError::io(&self.input_dir, e))?;
            let path = entry.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != INPUT_EXTENSION) {
                continue;
            }

            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .map_err(|e| ProfileError::io(&path, e))?;

            // Ties go to the later name so the choice does not depend on directory order
            let newer = match &newest {
                None => true,
                Some((time, best)) => modified > *time || (modified == *time && path > *best),
            };
            if newer {
                newest = Some((modified, path));
            }
        }

        Ok(newest.map(|(_, path)| path))
    }

    /// Profile the newest input, persist the report, and archive the input.
    ///
    /// Returns `Ok(None)` when there is nothing to process.
    pub fn process_latest(&self) -> Result<Option<DatasetProfile>> {
        let Some(path) = self.pick_latest()? else {
            info!(input_dir = %self.input_dir.display(), "no CSV files to process");
            return Ok(None);
        };

        info!(file = %path.display(), "processing input");
        let profile = run_profile(&path, None, &self.profiler, &self.writer)?;

        let archived = self.archive(&path)?;
        info!(archived = %archived.display(), "moved input to archive");

        Ok(Some(profile))
    }

    /// Move a processed file into the archive directory as
    /// `<stem>_<timestamp>.csv`.
    pub fn archive(&self, path: &Path) -> Result<PathBuf> {
        self.archive_at(path, &Utc::now())
    }

    /// Archive with a given timestamp. An existing archive file is never
    /// replaced; later arrivals get `-1`, `-2`, ... suffixes.
    fn archive_at(&self, path: &Path, timestamp: &DateTime<Utc>) -> Result<PathBuf> {
        fs::create_dir_all(&self.archive_dir)
            .map_err(|e| ProfileError::io(&self.archive_dir, e))?;

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let base = format!("{}_{}", stem, file_timestamp(timestamp));

        let mut attempt = 0usize;
        let dest = loop {
            let name = if attempt == 0 {
                format!("{}.{}", base, INPUT_EXTENSION)
            } else {
                format!("{}-{}.{}", base, attempt, INPUT_EXTENSION)
            };
            let candidate = self.archive_dir.join(name);
            if !candidate.exists() {
                break candidate;
            }
            attempt += 1;
        };

        move_file(path, &dest)?;
        Ok(dest)
    }
}

/// Rename, falling back to copy + delete across filesystems.
fn move_file(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }

    fs::copy(from, to).map_err(|e| ProfileError::io(to, e))?;
    fs::remove_file(from).map_err(|e| ProfileError::io(from, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_archive_never_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("input");
        let archive = dir.path().join("archive");
        fs::create_dir_all(&input).unwrap();
        let intake = Intake::new(
            &input,
            &archive,
            Profiler::new(),
            ReportWriter::new(dir.path().join("results")),
        );
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();

        let file = input.join("sales.csv");
        fs::write(&file, "id\n1\n").unwrap();
        let first = intake.archive_at(&file, &at).unwrap();

        fs::write(&file, "id\n2\n").unwrap();
        let second = intake.archive_at(&file, &at).unwrap();

        assert!(first.ends_with("sales_20240115T103000Z.csv"));
        assert!(second.ends_with("sales_20240115T103000Z-1.csv"));
        assert_eq!(fs::read_to_string(&first).unwrap(), "id\n1\n");
        assert_eq!(fs::read_to_string(&second).unwrap(), "id\n2\n");
        assert!(!file.exists());
    }
}
