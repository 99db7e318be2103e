//! Append-only log of dispatched alerts.
//!
//! Each alert is appended as one JSON line with file locking, so the history
//! survives even when the push provider was unreachable.

use crate::{DispatchedAlert, Delivery, Result, Severity};
use chrono::NaiveDate;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// File name of the alert log inside the data directory
pub const ALERT_LOG_FILE: &str = "alerts.jsonl";

/// One line of the alert log
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlertLogEntry {
    pub date: NaiveDate,
    pub medication: String,
    pub severity: Severity,
    pub stock: u32,
    pub title: String,
    pub body: String,
    pub delivery: Delivery,
}

impl AlertLogEntry {
    pub fn new(date: NaiveDate, dispatched: &DispatchedAlert) -> Self {
        let alert = &dispatched.alert;
        Self {
            date,
            medication: alert.medication.clone(),
            severity: alert.severity,
            stock: alert.stock,
            title: alert.title.clone(),
            body: alert.body.clone(),
            delivery: dispatched.delivery.clone(),
        }
    }
}

/// Alert sink trait for recording dispatched alerts
pub trait AlertSink {
    fn append(&mut self, entry: &AlertLogEntry) -> Result<()>;
}

/// JSONL-based alert sink with file locking
pub struct JsonlAlertLog {
    path: PathBuf,
}

impl JsonlAlertLog {
    /// Create a new JSONL sink for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl AlertSink for JsonlAlertLog {
    fn append(&mut self, entry: &AlertLogEntry) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(entry)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!("Logged {} alert for {}", entry.severity, entry.medication);
        Ok(())
    }
}

/// Read all entries from an alert log, oldest first
///
/// Lines that fail to parse are skipped with a warning.
pub fn read_alert_log(path: &Path) -> Result<Vec<AlertLogEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut entries = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<AlertLogEntry>(&line) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!("Failed to parse alert at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} alerts from log", entries.len());
    Ok(entries)
}
