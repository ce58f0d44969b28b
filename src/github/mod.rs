//! GitHub as a source of open pull requests.

pub mod client;
pub mod model;

use crate::error::Result;

pub use client::GitHubClient;
pub use model::{ApiCommit, ApiFile, ApiPull};

/// Everything the scanner needs from the hosting platform. `repo` is
/// always `owner/name`.
pub trait PullSource {
    /// All open pull requests, in the platform's pagination order.
    fn open_pulls(&self, repo: &str) -> Result<Vec<ApiPull>>;

    /// One pull request with mergeability filled in.
    fn pull(&self, repo: &str, number: u64) -> Result<ApiPull>;

    fn pull_files(&self, repo: &str, number: u64) -> Result<Vec<ApiFile>>;

    fn pull_commits(&self, repo: &str, number: u64) -> Result<Vec<ApiCommit>>;
}
