//! CSV log storage on the removable volume.
//!
//! One log file is active per run. Its name is derived once from the
//! monitor start time and reused for every append, so a run never
//! scatters rows across differently named files even when the numeric
//! stamp wraps.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::MonitorError;
use pressmon_traits::CHANNEL_COUNT;

/// Numeric range of generated log names: LOG00000.CSV .. LOG99999.CSV.
const NAME_SPAN: u64 = 100_000;

/// Header row written when a log is created.
pub fn header() -> Vec<String> {
    let mut cols = Vec::with_capacity(CHANNEL_COUNT + 1);
    cols.push("Timestamp".to_string());
    for i in 1..=CHANNEL_COUNT {
        cols.push(format!("S{i}"));
    }
    cols
}

/// Handle to the directory holding CSV logs.
#[derive(Debug, Clone)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether the storage directory is reachable right now.
    pub fn available(&self) -> bool {
        self.dir.is_dir()
    }

    /// Create a fresh log file named from `stamp_ms` and write the header.
    ///
    /// If the derived name is already taken the numeric part is bumped
    /// until a free slot is found.
    pub fn create_log(&self, stamp_ms: u64) -> Result<LogFile, MonitorError> {
        if !self.available() {
            return Err(MonitorError::StorageUnavailable(
                self.dir.display().to_string(),
            ));
        }

        let mut n = stamp_ms % NAME_SPAN;
        let mut path = self.dir.join(format!("LOG{n:05}.CSV"));
        let mut attempts = 0u64;
        while path.exists() {
            attempts += 1;
            if attempts >= NAME_SPAN {
                return Err(MonitorError::StorageOpenFailure(
                    "no free log file names".to_string(),
                ));
            }
            n = (n + 1) % NAME_SPAN;
            path = self.dir.join(format!("LOG{n:05}.CSV"));
        }

        let file = File::create(&path)
            .map_err(|e| MonitorError::StorageOpenFailure(format!("{}: {e}", path.display())))?;
        let mut wtr = csv::Writer::from_writer(file);
        wtr.write_record(header())
            .map_err(|e| MonitorError::StorageOpenFailure(e.to_string()))?;
        wtr.flush()
            .map_err(|e| MonitorError::StorageOpenFailure(e.to_string()))?;

        Ok(LogFile { path })
    }

    /// All CSV logs currently on the volume, sorted by name.
    pub fn stored_logs(&self) -> Result<Vec<PathBuf>, MonitorError> {
        let entries = fs::read_dir(&self.dir)
            .map_err(|e| MonitorError::StorageUnavailable(format!("{}: {e}", self.dir.display())))?;
        let mut logs: Vec<PathBuf> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| {
                p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
            })
            .collect();
        logs.sort();
        Ok(logs)
    }
}

/// The active log file for this run.
#[derive(Debug, Clone)]
pub struct LogFile {
    path: PathBuf,
}

impl LogFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("LOG.CSV")
    }

    /// Append one row: a timestamp column followed by all channel values.
    ///
    /// The file is opened and closed per append so a yanked volume
    /// loses at most the row in flight.
    pub fn append_row(
        &self,
        timestamp: &str,
        values: &[u16; CHANNEL_COUNT],
    ) -> Result<(), MonitorError> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                MonitorError::StorageOpenFailure(format!("{}: {e}", self.path.display()))
            })?;
        let mut wtr = csv::Writer::from_writer(file);
        let mut record = Vec::with_capacity(CHANNEL_COUNT + 1);
        record.push(timestamp.to_string());
        record.extend(values.iter().map(|v| v.to_string()));
        wtr.write_record(&record)
            .map_err(|e| MonitorError::StorageOpenFailure(e.to_string()))?;
        wtr.flush()
            .map_err(|e| MonitorError::StorageOpenFailure(e.to_string()))?;
        Ok(())
    }
}
