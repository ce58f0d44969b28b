//! One triage run: load data, join with ownership, emit reports.

use std::error::Error;
use std::path::Path;

use crate::cache::{CacheStore, ScanSettings, Snapshot};
use crate::cli::CacheMode;
use crate::config::Config;
use crate::crossref::join_all;
use crate::error::{Result, TriageError};
use crate::github::{GitHubClient, PullSource};
use crate::ownership::{KeyKind, Manifest, OwnershipIndex};
use crate::publish::publisher_for;
use crate::render::{ReportData, write_reports};
use crate::report_helpers::print_json_stdout;
use crate::scan::Scanner;
use crate::summary::print_summary;

/// Load the cached snapshot; a missing file is an error.
pub fn load_cached(store: &CacheStore) -> Result<Snapshot> {
    let snapshot = store.load()?;
    if !snapshot.complete {
        log::warn!(
            "{} was written by an interrupted scan ({} PRs), reports will be partial",
            store.path().display(),
            snapshot.pulls.len()
        );
    }
    log::info!(
        "loaded {} PRs saved {} from {}",
        snapshot.pulls.len(),
        snapshot.saved_at.format("%Y-%m-%d %H:%M:%S"),
        store.path().display()
    );
    Ok(snapshot)
}

/// Like `load_cached`, but a missing, corrupt or outdated file is a cold
/// start. The scan that follows overwrites it.
pub fn load_previous(store: &CacheStore) -> Result<Option<Snapshot>> {
    match load_cached(store) {
        Ok(snapshot) => Ok(Some(snapshot)),
        Err(TriageError::CacheMiss(path)) => {
            log::warn!("no cached data at {}, starting cold", path.display());
            Ok(None)
        }
        Err(TriageError::Cache(reason)) => {
            log::warn!("ignoring unusable cache ({reason}), starting cold");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Produce the snapshot for `mode`. `connect` is only called when a
/// scan is needed.
pub fn collect<S, F>(
    mode: CacheMode,
    store: &CacheStore,
    settings: ScanSettings,
    snapshot_every: usize,
    connect: F,
) -> Result<Snapshot>
where
    S: PullSource,
    F: FnOnce() -> Result<S>,
{
    let previous = match mode {
        CacheMode::OnlyCached => return load_cached(store),
        CacheMode::Cached => load_previous(store)?,
        CacheMode::Fresh => None,
    };
    let source = connect()?;
    Scanner::new(&source, Some(store), snapshot_every).scan(settings, previous.as_ref())
}

/// Join the snapshot with the ownership manifest at `manifest_path`.
pub fn build_report(snapshot: Snapshot, manifest_path: &Path) -> Result<ReportData> {
    let manifest = Manifest::load(manifest_path)?;
    log::debug!(
        "loaded {} ownership entries from {}",
        manifest.entries.len(),
        manifest_path.display()
    );
    let ownership = join_all(&snapshot.index, &OwnershipIndex::build(&manifest));
    for kind in KeyKind::ALL {
        log::debug!("{} cross-reference: {} keys", kind.name(), ownership.get(kind).len());
    }
    Ok(ReportData::new(snapshot, ownership))
}

pub fn run(config: &Config, mode: CacheMode, json: bool) -> std::result::Result<(), Box<dyn Error>> {
    // an incomplete upload setup should fail before a long scan
    let publisher = if json {
        None
    } else {
        Some(publisher_for(&config.upload)?)
    };

    let settings = ScanSettings {
        repos: config.repos.clone(),
        title: config.title.clone(),
    };
    let store = CacheStore::for_repos(&config.data_path, &config.repos)?;
    let snapshot = collect(mode, &store, settings, config.snapshot_every, || {
        GitHubClient::from_config(config)
    })?;
    let data = build_report(snapshot, &config.botmeta_path)?;

    match publisher {
        None => print_json_stdout(&data),
        Some(publisher) => {
            log::info!("publishing to {}", publisher.describe());
            write_reports(&data, &config.output_path, publisher.as_ref())?;
            print_summary(&data, &config.output_path);
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
