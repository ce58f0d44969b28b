//! On-disk snapshot of scan results.
//!
//! One JSON file per repository set, named after the repositories so
//! different sets never collide. Writes go to a temp file in the same
//! directory and are renamed over the target, so a crash mid-write
//! leaves the previous good file in place.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{Result, TriageError};
use crate::forward::ForwardIndex;
use crate::model::PullRequest;

pub const SNAPSHOT_VERSION: u32 = 1;

/// PR API URL → pull request.
pub type PrTable = BTreeMap<String, PullRequest>;

/// The scan settings recorded alongside the data (never credentials).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSettings {
    pub repos: Vec<String>,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub settings: ScanSettings,
    pub index: ForwardIndex,
    pub pulls: PrTable,
    /// False for the periodic snapshots written while a scan is running.
    pub complete: bool,
    pub saved_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(settings: ScanSettings) -> Self {
        Snapshot {
            version: SNAPSHOT_VERSION,
            settings,
            index: ForwardIndex::new(),
            pulls: PrTable::new(),
            complete: false,
            saved_at: Utc::now(),
        }
    }
}

/// Write `path` through a temp file in the same directory, renamed into
/// place only once `write` succeeds. On error the previous file is
/// untouched and the temp file is removed.
fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<()>,
{
    let dir = match path.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// File name for a repository set: `owner_a+owner_b.json` for
/// `["owner/a", "owner/b"]`. Validated names never contain `+` and owners
/// never contain `_`, so distinct sets map to distinct names.
pub fn cache_file_name(repos: &[String]) -> String {
    format!("{}.json", repos.join("+").replace('/', "_"))
}

pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    /// Store for `repos` under `data_dir`, creating the directory if needed.
    pub fn for_repos(data_dir: &Path, repos: &[String]) -> Result<Self> {
        if !data_dir.exists() {
            log::warn!(
                "the data_path {:?} did not exist, creating it now",
                data_dir.display().to_string()
            );
            fs::create_dir_all(data_dir)?;
        }
        Ok(CacheStore {
            path: data_dir.join(cache_file_name(repos)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        write_atomic(&self.path, |writer| {
            serde_json::to_writer(writer, snapshot)?;
            Ok(())
        })?;
        log::debug!(
            "saved snapshot ({} PRs, complete: {}) to {}",
            snapshot.pulls.len(),
            snapshot.complete,
            self.path.display()
        );
        Ok(())
    }

    /// Load the snapshot. A missing file is `CacheMiss`, which callers
    /// treat as a cold start.
    pub fn load(&self) -> Result<Snapshot> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(TriageError::CacheMiss(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        let snapshot: Snapshot = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            TriageError::Cache(format!("{} is not a valid snapshot: {e}", self.path.display()))
        })?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(TriageError::Cache(format!(
                "{} has snapshot version {}, expected {SNAPSHOT_VERSION}",
                self.path.display(),
                snapshot.version
            )));
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
