//! Medication store and last-run date persistence with file locking.
//!
//! The inventory is a versioned JSON document rewritten wholesale on every
//! save; the last-run date is a single `YYYY-MM-DD` line. A missing file is
//! a normal state (empty inventory, never run). A file that exists but
//! cannot be decoded is an error.

use crate::{Error, Medication, Result, ISO_DATE_FORMAT};
use chrono::NaiveDate;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Current on-disk schema version of the medication store
pub const STORE_VERSION: u32 = 1;

/// File name of the medication store inside the data directory
pub const MEDICATIONS_FILE: &str = "medications.json";

/// File name of the last-run date inside the data directory
pub const LAST_RUN_FILE: &str = "last_run_date.txt";

/// Where the inventory and the last-run date live
pub trait MedicationStore {
    fn load_medications(&self) -> Result<Vec<Medication>>;
    fn save_medications(&mut self, medications: &[Medication]) -> Result<()>;
    fn load_last_run(&self) -> Result<Option<NaiveDate>>;
    fn save_last_run(&mut self, date: NaiveDate) -> Result<()>;
}

#[derive(Serialize)]
struct StoreDocumentRef<'a> {
    version: u32,
    medications: &'a [Medication],
}

#[derive(Deserialize)]
struct StoreDocument {
    version: u32,
    #[serde(default)]
    medications: Vec<Medication>,
}

/// Decode a medication store document
pub fn decode_medications(contents: &str) -> Result<Vec<Medication>> {
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }

    let doc: StoreDocument = serde_json::from_str(contents)
        .map_err(|e| Error::Store(format!("unreadable medication store: {}", e)))?;

    if doc.version > STORE_VERSION {
        return Err(Error::Store(format!(
            "store version {} is newer than supported version {}",
            doc.version, STORE_VERSION
        )));
    }

    Ok(doc.medications)
}

/// Encode the inventory as a store document
pub fn encode_medications(medications: &[Medication]) -> Result<String> {
    let doc = StoreDocumentRef {
        version: STORE_VERSION,
        medications,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Parse the contents of a last-run file
pub fn decode_last_run(contents: &str) -> Result<Option<NaiveDate>> {
    let trimmed = contents.trim();
    if trimmed.is_empty() {
        tracing::warn!("Last-run file is empty, treating as first run");
        return Ok(None);
    }

    NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT)
        .map(Some)
        .map_err(|e| Error::LastRun(format!("{:?} is not a YYYY-MM-DD date: {}", trimmed, e)))
}

/// Files under a data directory
#[derive(Clone, Debug)]
pub struct FileStore {
    medications_path: PathBuf,
    last_run_path: PathBuf,
}

impl FileStore {
    pub fn new(medications_path: impl Into<PathBuf>, last_run_path: impl Into<PathBuf>) -> Self {
        Self {
            medications_path: medications_path.into(),
            last_run_path: last_run_path.into(),
        }
    }

    /// Standard file layout inside `data_dir`
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(MEDICATIONS_FILE), data_dir.join(LAST_RUN_FILE))
    }

    pub fn medications_path(&self) -> &Path {
        &self.medications_path
    }

    pub fn last_run_path(&self) -> &Path {
        &self.last_run_path
    }
}

impl MedicationStore for FileStore {
    fn load_medications(&self) -> Result<Vec<Medication>> {
        let Some(bytes) = read_locked(&self.medications_path)? else {
            tracing::info!("No medication store at {:?}, starting empty", self.medications_path);
            return Ok(Vec::new());
        };
        let contents = String::from_utf8(bytes).map_err(|e| {
            Error::Store(format!("{:?}: not a text document: {}", self.medications_path, e))
        })?;

        let medications = decode_medications(&contents).map_err(|e| match e {
            Error::Store(msg) => Error::Store(format!("{:?}: {}", self.medications_path, msg)),
            other => other,
        })?;
        tracing::debug!(
            "Loaded {} medications from {:?}",
            medications.len(),
            self.medications_path
        );
        Ok(medications)
    }

    fn save_medications(&mut self, medications: &[Medication]) -> Result<()> {
        let contents = encode_medications(medications)?;
        write_atomic(&self.medications_path, contents.as_bytes())?;
        tracing::debug!(
            "Saved {} medications to {:?}",
            medications.len(),
            self.medications_path
        );
        Ok(())
    }

    fn load_last_run(&self) -> Result<Option<NaiveDate>> {
        match read_locked(&self.last_run_path)? {
            Some(bytes) => {
                let contents = String::from_utf8(bytes).map_err(|e| {
                    Error::LastRun(format!("{:?}: not a text file: {}", self.last_run_path, e))
                })?;
                decode_last_run(&contents)
            }
            None => {
                tracing::debug!("No last-run file at {:?}", self.last_run_path);
                Ok(None)
            }
        }
    }

    fn save_last_run(&mut self, date: NaiveDate) -> Result<()> {
        let contents = date.format(ISO_DATE_FORMAT).to_string();
        write_atomic(&self.last_run_path, contents.as_bytes())?;
        tracing::debug!("Recorded last run {} in {:?}", contents, self.last_run_path);
        Ok(())
    }
}

/// Store kept entirely in memory
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    pub medications: Vec<Medication>,
    pub last_run: Option<NaiveDate>,
    /// Number of times the inventory was saved
    pub saves: usize,
}

impl MemoryStore {
    pub fn new(medications: Vec<Medication>, last_run: Option<NaiveDate>) -> Self {
        Self {
            medications,
            last_run,
            saves: 0,
        }
    }
}

impl MedicationStore for MemoryStore {
    fn load_medications(&self) -> Result<Vec<Medication>> {
        Ok(self.medications.clone())
    }

    fn save_medications(&mut self, medications: &[Medication]) -> Result<()> {
        self.medications = medications.to_vec();
        self.saves += 1;
        Ok(())
    }

    fn load_last_run(&self) -> Result<Option<NaiveDate>> {
        Ok(self.last_run)
    }

    fn save_last_run(&mut self, date: NaiveDate) -> Result<()> {
        self.last_run = Some(date);
        Ok(())
    }
}

/// Read a whole file under a shared lock; `None` if it does not exist
///
/// Returns raw bytes so callers can label undecodable content themselves.
fn read_locked(path: &Path) -> Result<Option<Vec<u8>>> {
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let mut contents = Vec::new();
    let mut reader = std::io::BufReader::new(&file);
    let read = reader.read_to_end(&mut contents);
    file.unlock()?;
    read?;

    Ok(Some(contents))
}

/// Atomically replace `path` with `contents`
///
/// Writes to a temp file in the same directory under an exclusive lock,
/// syncs it, then renames it over the original.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        writer.write_all(contents)?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
