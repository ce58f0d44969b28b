use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// GitHub's `mergeable_state` for a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeState {
    Clean,
    Dirty,
    Unstable,
    Blocked,
    Behind,
    Draft,
    HasHooks,
    #[default]
    Unknown,
}

impl MergeState {
    /// Map the API string to a state. Anything unrecognised is `Unknown`.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::to_ascii_lowercase).as_deref() {
            Some("clean") => MergeState::Clean,
            Some("dirty") => MergeState::Dirty,
            Some("unstable") => MergeState::Unstable,
            Some("blocked") => MergeState::Blocked,
            Some("behind") => MergeState::Behind,
            Some("draft") => MergeState::Draft,
            Some("has_hooks") => MergeState::HasHooks,
            _ => MergeState::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MergeState::Clean => "clean",
            MergeState::Dirty => "dirty",
            MergeState::Unstable => "unstable",
            MergeState::Blocked => "blocked",
            MergeState::Behind => "behind",
            MergeState::Draft => "draft",
            MergeState::HasHooks => "has_hooks",
            MergeState::Unknown => "unknown",
        }
    }
}

/// One open pull request as seen during a scan pass.
///
/// `url` (the API URL) is the identity used by every index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub url: String,
    pub id: u64,
    pub number: u64,
    pub repo: String,
    pub title: String,
    pub html_url: String,
    pub author: String,
    pub labels: Vec<String>,
    pub files: Vec<String>,
    pub commit_authors: BTreeSet<String>,
    pub mergeable: Option<bool>,
    pub merge_state: MergeState,
    pub merge_commit: bool,
}

impl PullRequest {
    /// Explicitly unmergeable, or GitHub reports the branch as dirty.
    pub fn is_conflict(&self) -> bool {
        self.mergeable == Some(false) || self.merge_state == MergeState::Dirty
    }

    pub fn is_ci_failure(&self) -> bool {
        self.merge_state == MergeState::Unstable
    }

    pub fn is_multi_author(&self) -> bool {
        self.commit_authors.len() > 1
    }
}

#[cfg(test)]
pub(crate) fn sample_pull(number: u64, author: &str, files: &[&str]) -> PullRequest {
    PullRequest {
        url: format!("https://api.github.com/repos/acme/widgets/pulls/{number}"),
        id: 1000 + number,
        number,
        repo: "acme/widgets".to_string(),
        title: format!("PR #{number}"),
        html_url: format!("https://github.com/acme/widgets/pull/{number}"),
        author: author.to_string(),
        labels: Vec::new(),
        files: files.iter().map(|f| f.to_string()).collect(),
        commit_authors: BTreeSet::from([format!("{author}@example.com")]),
        mergeable: Some(true),
        merge_state: MergeState::Clean,
        merge_commit: false,
    }
}
