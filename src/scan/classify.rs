use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::github::ApiCommit;

/// Author recorded when GitHub reports neither a PR user nor a head user
/// (deleted accounts).
pub const GHOST_LOGIN: &str = "ghost";

static MERGE_COMMIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Merge branch \S+ into ").expect("valid merge regex"));

/// Facts gathered from a PR's commit list.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CommitFacts {
    pub authors: BTreeSet<String>,
    pub merge_commit: bool,
}

/// Prefer the PR's author; fall back to the owner of the head branch.
pub fn resolve_author(user: Option<&str>, head_user: Option<&str>) -> String {
    user.or(head_user).unwrap_or(GHOST_LOGIN).to_string()
}

/// A missing or non-text message never matches.
pub fn is_merge_commit(message: Option<&str>) -> bool {
    message.is_some_and(|m| MERGE_COMMIT.is_match(m))
}

/// Walk commits in order, collecting author e-mails. The first
/// "Merge branch X into" commit flags the PR and ends the walk.
pub fn summarize_commits(commits: &[ApiCommit]) -> CommitFacts {
    let mut facts = CommitFacts::default();
    for commit in commits {
        if let Some(email) = commit.author_email() {
            facts.authors.insert(email.to_string());
        }
        if is_merge_commit(commit.message()) {
            facts.merge_commit = true;
            break;
        }
    }
    facts
}
