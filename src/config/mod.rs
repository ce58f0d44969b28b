//! YAML configuration (`triage.yaml`).
//!
//! Searched in `./triage.yaml`, `~/.triage.yaml`, `/etc/triage.yaml`
//! unless an explicit path is given. Every failure here is a
//! `TriageError::Config` and happens before any network access.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::{Result, TriageError};

const DEFAULT_API_URL: &str = "https://api.github.com";
const DEFAULT_DATA_PATH: &str = "data/";
const DEFAULT_BOTMETA_PATH: &str = ".github/BOTMETA.yml";
const DEFAULT_OUTPUT_PATH: &str = "htmlout";
const DEFAULT_SNAPSHOT_EVERY: usize = 100;
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_TOKEN_ENV: &str = "TRIAGE_STORAGE_TOKEN";

/// GitHub owners never contain `_`, `.` or `+`; repository names never contain `+`.
static REPOSITORY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9-]+/[A-Za-z0-9._-]+$").expect("valid repository regex")
});

/// How requests to the GitHub API authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Token(String),
    /// OAuth application id/secret pair, sent as basic auth.
    ClientPair {
        id: String,
        secret: String,
    },
    Anonymous,
}

/// Remote object-storage upload settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    pub enabled: bool,
    pub container_url: Option<String>,
    pub token: Option<String>,
    pub token_env: Option<String>,
}

impl UploadSettings {
    pub fn token_env(&self) -> &str {
        self.token_env.as_deref().unwrap_or(DEFAULT_TOKEN_ENV)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub repos: Vec<String>,
    pub title: String,
    pub credentials: Credentials,
    pub api_url: String,
    pub data_path: PathBuf,
    pub botmeta_path: PathBuf,
    pub output_path: PathBuf,
    pub snapshot_every: usize,
    pub max_retries: u32,
    pub upload: UploadSettings,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize)]
struct RawConfig {
    github_repository: Option<OneOrMany>,
    title: Option<String>,
    github_token: Option<String>,
    github_client_id: Option<String>,
    github_client_secret: Option<String>,
    github_api_url: Option<String>,
    data_path: Option<PathBuf>,
    botmeta_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    snapshot_every: Option<usize>,
    max_retries: Option<u32>,
    #[serde(default)]
    upload: UploadSettings,
}

impl Config {
    /// Parse configuration text. Does not consult the environment.
    pub fn parse(text: &str) -> Result<Self> {
        let raw: RawConfig = serde_yaml::from_str(text)
            .map_err(|e| TriageError::Config(format!("invalid YAML: {e}")))?;

        let repos = match raw.github_repository {
            Some(OneOrMany::One(repo)) => vec![repo],
            Some(OneOrMany::Many(repos)) => repos,
            None => return Err(missing("github_repository")),
        };
        let repos: Vec<String> = repos
            .into_iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
        if repos.is_empty() {
            return Err(TriageError::Config(
                "github_repository must name at least one repository".to_string(),
            ));
        }
        if let Some(bad) = repos.iter().find(|r| !REPOSITORY.is_match(r)) {
            return Err(TriageError::Config(format!(
                "repository {bad:?} must have the form owner/name"
            )));
        }

        let title = raw.title.ok_or_else(|| missing("title"))?;

        let credentials = match (raw.github_token, raw.github_client_id, raw.github_client_secret)
        {
            (Some(token), _, _) => Credentials::Token(token),
            (None, Some(id), Some(secret)) => Credentials::ClientPair { id, secret },
            (None, Some(_), None) => return Err(missing("github_client_secret")),
            (None, None, Some(_)) => return Err(missing("github_client_id")),
            (None, None, None) => Credentials::Anonymous,
        };

        Ok(Config {
            repos,
            title,
            credentials,
            api_url: raw
                .github_api_url
                .unwrap_or_else(|| DEFAULT_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            data_path: raw
                .data_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            botmeta_path: raw
                .botmeta_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_BOTMETA_PATH)),
            output_path: raw
                .output_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH)),
            snapshot_every: raw.snapshot_every.unwrap_or(DEFAULT_SNAPSHOT_EVERY),
            max_retries: raw.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            upload: raw.upload,
        })
    }

    /// Locate, read and parse the configuration file, then fall back to
    /// `GITHUB_TOKEN` when the file carries no credentials.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) if p.is_file() => p.to_path_buf(),
            Some(p) => {
                return Err(TriageError::Config(format!(
                    "config file not found: {}",
                    p.display()
                )));
            }
            None => find_config(&search_paths())?,
        };

        let text = fs::read_to_string(&path)
            .map_err(|e| TriageError::Config(format!("cannot read {}: {e}", path.display())))?;
        let mut config = Self::parse(&text)?;
        log::debug!("loaded configuration from {}", path.display());

        if config.credentials == Credentials::Anonymous
            && let Ok(token) = std::env::var("GITHUB_TOKEN")
            && !token.is_empty()
        {
            config.credentials = Credentials::Token(token);
        }
        Ok(config)
    }
}

fn missing(key: &str) -> TriageError {
    TriageError::Config(format!("missing required key `{key}`"))
}

/// Default configuration locations, most specific first.
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("./triage.yaml")];
    if let Some(home) = std::env::var_os("HOME") {
        paths.push(PathBuf::from(home).join(".triage.yaml"));
    }
    paths.push(PathBuf::from("/etc/triage.yaml"));
    paths
}

/// Return the first candidate that exists as a file.
pub fn find_config(candidates: &[PathBuf]) -> Result<PathBuf> {
    candidates
        .iter()
        .find(|p| p.is_file())
        .cloned()
        .ok_or_else(|| {
            let tried: Vec<String> = candidates.iter().map(|p| p.display().to_string()).collect();
            TriageError::Config(format!("config file not found at: {}", tried.join(", ")))
        })
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
