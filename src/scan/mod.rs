//! PR scanner: walks the open pull requests of every configured
//! repository and builds the forward indices.
//!
//! Work is sequential: each PR's details, files and commits are fetched
//! before moving to the next. Every `snapshot_every` PRs the aggregate
//! so far is written to the cache as an incomplete snapshot, so a crash
//! or an exhausted rate limit loses at most one batch. A restart always
//! rescans from the beginning; a previous snapshot is diagnostic only.

pub mod classify;

use chrono::Utc;

use crate::cache::{CacheStore, ScanSettings, Snapshot};
use crate::error::Result;
use crate::github::{ApiPull, PullSource};
use crate::model::{MergeState, PullRequest};
use classify::{resolve_author, summarize_commits};

pub struct Scanner<'a, S: PullSource> {
    source: &'a S,
    store: Option<&'a CacheStore>,
    snapshot_every: usize,
}

impl<'a, S: PullSource> Scanner<'a, S> {
    /// `snapshot_every == 0` disables periodic snapshots.
    pub fn new(source: &'a S, store: Option<&'a CacheStore>, snapshot_every: usize) -> Self {
        Self {
            source,
            store,
            snapshot_every,
        }
    }

    pub fn scan(&self, settings: ScanSettings, previous: Option<&Snapshot>) -> Result<Snapshot> {
        let repos = settings.repos.clone();
        let mut snapshot = Snapshot::new(settings);
        let mut processed = 0usize;

        for repo in &repos {
            log::info!("scanning repo: {repo}");
            let listed = self.source.open_pulls(repo)?;
            let total = listed.len();

            for (i, summary) in listed.iter().enumerate() {
                log::info!("{} ({} of {total})", summary.url, i + 1);
                if previous.is_some_and(|p| p.pulls.contains_key(&summary.url)) {
                    log::debug!("{} was cached, updating anyway", summary.url);
                }

                let pull = self.fetch_pull(repo, summary)?;
                snapshot.index.insert(&pull);
                snapshot.pulls.insert(pull.url.clone(), pull);
                processed += 1;

                if self.snapshot_every > 0 && processed % self.snapshot_every == 0 {
                    self.checkpoint(&mut snapshot);
                }
            }
        }

        snapshot.complete = true;
        snapshot.saved_at = Utc::now();
        if let Some(store) = self.store {
            log::info!("saving data to {}", store.path().display());
            store.save(&snapshot)?;
        }
        log::info!(
            "scanned {} pull requests across {} repositories",
            snapshot.index.pull_count(),
            repos.len()
        );
        Ok(snapshot)
    }

    fn fetch_pull(&self, repo: &str, summary: &ApiPull) -> Result<PullRequest> {
        let detail = self.source.pull(repo, summary.number)?;
        let author = resolve_author(
            detail.author_login().or(summary.author_login()),
            detail.head_login().or(summary.head_login()),
        );

        let files: Vec<String> = self
            .source
            .pull_files(repo, summary.number)?
            .into_iter()
            .map(|f| f.filename)
            .collect();
        let commits = summarize_commits(&self.source.pull_commits(repo, summary.number)?);

        let labels = if detail.labels.is_empty() {
            &summary.labels
        } else {
            &detail.labels
        };

        let merge_state = MergeState::parse(detail.mergeable_state.as_deref());
        log::debug!(
            "{}: author {author}, {} files, mergeable {:?}, state {}",
            summary.url,
            files.len(),
            detail.mergeable,
            merge_state.label()
        );

        Ok(PullRequest {
            url: summary.url.clone(),
            id: summary.id,
            number: summary.number,
            repo: repo.to_string(),
            title: detail
                .title
                .clone()
                .or_else(|| summary.title.clone())
                .unwrap_or_default(),
            html_url: detail
                .html_url
                .clone()
                .or_else(|| summary.html_url.clone())
                .unwrap_or_default(),
            author,
            labels: labels.iter().map(|l| l.name.clone()).collect(),
            files,
            commit_authors: commits.authors,
            mergeable: detail.mergeable,
            merge_state,
            merge_commit: commits.merge_commit,
        })
    }

    fn checkpoint(&self, snapshot: &mut Snapshot) {
        let Some(store) = self.store else { return };
        let index = &snapshot.index;
        log::info!(
            "saving data snapshot - files: {}, merges: {}, conflicts: {}, multi_author: {}, \
             ci_failures: {}, prs: {}, dirs: {}, labels: {}",
            index.files.len(),
            index.merges.len(),
            index.conflicts.len(),
            index.multi_author.len(),
            index.ci_failures.len(),
            snapshot.pulls.len(),
            index.dirs.len(),
            index.labels.len()
        );
        snapshot.saved_at = Utc::now();
        if let Err(err) = store.save(snapshot) {
            log::warn!("could not save snapshot: {err}");
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
