//! Subset of the GitHub REST payloads the scanner reads.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    pub login: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiBranch {
    pub user: Option<ApiUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiLabel {
    pub name: String,
}

/// A pull request from the list or single-PR endpoint. Only the
/// single-PR endpoint fills `mergeable` and `mergeable_state`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiPull {
    pub url: String,
    pub id: u64,
    pub number: u64,
    pub title: Option<String>,
    pub html_url: Option<String>,
    pub user: Option<ApiUser>,
    #[serde(default)]
    pub head: Option<ApiBranch>,
    #[serde(default)]
    pub labels: Vec<ApiLabel>,
    pub mergeable: Option<bool>,
    pub mergeable_state: Option<String>,
}

impl ApiPull {
    pub fn author_login(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.login.as_str())
    }

    pub fn head_login(&self) -> Option<&str> {
        self.head
            .as_ref()
            .and_then(|h| h.user.as_ref())
            .map(|u| u.login.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiFile {
    pub filename: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiGitActor {
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiCommitDetail {
    pub author: Option<ApiGitActor>,
    /// Kept loose: anything but a string is treated as no message.
    pub message: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiCommit {
    #[serde(default)]
    pub commit: ApiCommitDetail,
}

impl ApiCommit {
    pub fn author_email(&self) -> Option<&str> {
        self.commit
            .author
            .as_ref()
            .and_then(|a| a.email.as_deref())
            .filter(|e| !e.is_empty())
    }

    pub fn message(&self) -> Option<&str> {
        self.commit.message.as_ref().and_then(Value::as_str)
    }
}
