//! Forward indices: open pull requests grouped by intrinsic attributes.
//!
//! Every bucket holds PR API URLs, which key into the PR table. A PR
//! sits in exactly the buckets whose predicate it satisfies; inserting
//! a URL that is already indexed replaces the earlier record.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::PullRequest;

pub type Buckets = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardIndex {
    /// File path → PRs that touched it, in encounter order.
    pub files: Buckets,
    /// Parent directory → PRs touching a file directly inside it.
    pub dirs: BTreeMap<String, BTreeSet<String>>,
    /// Author login → PRs authored.
    pub users: Buckets,
    /// Author logins in first-encounter order, used to break ranking ties.
    user_order: Vec<String>,
    pub merges: Buckets,
    pub conflicts: Buckets,
    pub ci_failures: Buckets,
    pub multi_author: Buckets,
    /// PR label → PRs carrying it.
    pub labels: Buckets,
}

/// One row of the user ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserPulls {
    pub login: String,
    pub pulls: Vec<String>,
}

/// Directory component of a slash-separated path; `""` for root files.
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(pos) => &path[..pos],
        None => "",
    }
}

fn push_unique(buckets: &mut Buckets, key: &str, url: &str) {
    let bucket = buckets.entry(key.to_string()).or_default();
    if !bucket.iter().any(|u| u == url) {
        bucket.push(url.to_string());
    }
}

fn drop_from(buckets: &mut Buckets, url: &str) {
    buckets.retain(|_, pulls| {
        pulls.retain(|u| u != url);
        !pulls.is_empty()
    });
}

impl ForwardIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pull: &PullRequest) {
        let url = pull.url.as_str();
        if self.contains(url) {
            self.remove(url);
        }

        for file in &pull.files {
            push_unique(&mut self.files, file, url);
            self.dirs
                .entry(parent_dir(file).to_string())
                .or_default()
                .insert(url.to_string());
        }

        let login = pull.author.as_str();
        if !self.users.contains_key(login) {
            self.user_order.push(login.to_string());
        }
        push_unique(&mut self.users, login, url);

        if pull.merge_commit {
            push_unique(&mut self.merges, login, url);
        }
        if pull.is_conflict() {
            push_unique(&mut self.conflicts, login, url);
        }
        if pull.is_ci_failure() {
            push_unique(&mut self.ci_failures, login, url);
        }
        if pull.is_multi_author() {
            push_unique(&mut self.multi_author, login, url);
        }
        for label in &pull.labels {
            push_unique(&mut self.labels, label, url);
        }
    }

    /// Whether `url` is present in any author bucket (every indexed PR has one).
    pub fn contains(&self, url: &str) -> bool {
        self.users.values().any(|pulls| pulls.iter().any(|u| u == url))
    }

    /// Remove `url` from every bucket, dropping buckets left empty.
    pub fn remove(&mut self, url: &str) {
        drop_from(&mut self.files, url);
        self.dirs.retain(|_, pulls| {
            pulls.remove(url);
            !pulls.is_empty()
        });
        drop_from(&mut self.users, url);
        let users = &self.users;
        self.user_order.retain(|login| users.contains_key(login));
        drop_from(&mut self.merges, url);
        drop_from(&mut self.conflicts, url);
        drop_from(&mut self.ci_failures, url);
        drop_from(&mut self.multi_author, url);
        drop_from(&mut self.labels, url);
    }

    /// Authors sorted by PR count, most first; ties keep encounter order.
    pub fn ranked_users(&self) -> Vec<UserPulls> {
        let mut ranked: Vec<UserPulls> = self
            .user_order
            .iter()
            .filter_map(|login| {
                self.users.get(login).map(|pulls| UserPulls {
                    login: login.clone(),
                    pulls: pulls.clone(),
                })
            })
            .collect();
        // sort_by is stable, so equal counts stay in encounter order
        ranked.sort_by(|a, b| b.pulls.len().cmp(&a.pulls.len()));
        ranked
    }

    pub fn pull_count(&self) -> usize {
        self.users.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
