use std::thread;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, HeaderMap, LINK, RETRY_AFTER};
use serde::de::DeserializeOwned;

use super::PullSource;
use super::model::{ApiCommit, ApiFile, ApiPull};
use crate::config::{Config, Credentials};
use crate::error::{ApiErrorKind, Result, TriageError};

const PER_PAGE: u32 = 100;
const USER_AGENT: &str = concat!("pr-triage/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const BACKOFF_BASE: Duration = Duration::from_secs(1);
const BACKOFF_CAP: Duration = Duration::from_secs(60);

/// Blocking GitHub REST client. Rate-limit and transient failures are
/// retried with exponential backoff; everything else fails at once.
pub struct GitHubClient {
    http: Client,
    api_url: String,
    credentials: Credentials,
    max_retries: u32,
    backoff_base: Duration,
}

impl GitHubClient {
    pub fn new(api_url: &str, credentials: Credentials, max_retries: u32) -> Result<Self> {
        let builder = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT);
        // tests talk to a loopback server and must bypass any proxy
        #[cfg(test)]
        let builder = builder.no_proxy();
        let http = builder
            .build()
            .map_err(|e| TriageError::api(ApiErrorKind::Other, format!("HTTP client: {e}")))?;
        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            credentials,
            max_retries,
            backoff_base: BACKOFF_BASE,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_url, config.credentials.clone(), config.max_retries)
    }

    #[cfg(test)]
    fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Credentials::Token(token) => request.bearer_auth(token),
            Credentials::ClientPair { id, secret } => request.basic_auth(id, Some(secret)),
            Credentials::Anonymous => request,
        }
    }

    fn send_once(&self, url: &str) -> Result<Response> {
        let request = self
            .http
            .get(url)
            .header(ACCEPT, "application/vnd.github+json");
        let resp = self.authorize(request).send().map_err(|e| {
            let kind = if e.is_timeout() || e.is_connect() {
                ApiErrorKind::Transient
            } else {
                ApiErrorKind::Other
            };
            TriageError::api(kind, format!("GET {url}: {e}"))
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let kind = classify_status(
            status.as_u16(),
            header_str(resp.headers(), "x-ratelimit-remaining"),
            header_str(resp.headers(), RETRY_AFTER.as_str()),
        );
        let body = resp.text().unwrap_or_default();
        Err(TriageError::api(
            kind,
            format!("GET {url} returned {status}: {}", body.trim()),
        ))
    }

    fn send(&self, url: &str) -> Result<Response> {
        let mut attempt = 0;
        loop {
            match self.send_once(url) {
                Ok(resp) => return Ok(resp),
                Err(err) if err.is_retryable() && attempt < self.max_retries => {
                    let wait = backoff_delay(self.backoff_base, attempt);
                    log::warn!("{err}; retrying in {}s", wait.as_secs_f64());
                    thread::sleep(wait);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn get_one<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}/{path}", self.api_url);
        let resp = self.send(&url)?;
        resp.json()
            .map_err(|e| TriageError::api(ApiErrorKind::Other, format!("decode {url}: {e}")))
    }

    /// Fetch every page of a list endpoint, following `Link: rel="next"`.
    fn get_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(format!("{}/{path}?per_page={PER_PAGE}", self.api_url));
        while let Some(url) = next {
            let resp = self.send(&url)?;
            next = header_str(resp.headers(), LINK.as_str()).and_then(next_link);
            let page: Vec<T> = resp.json().map_err(|e| {
                TriageError::api(ApiErrorKind::Other, format!("decode {url}: {e}"))
            })?;
            items.extend(page);
        }
        Ok(items)
    }
}

impl PullSource for GitHubClient {
    fn open_pulls(&self, repo: &str) -> Result<Vec<ApiPull>> {
        self.get_all(&format!("repos/{repo}/pulls"))
    }

    fn pull(&self, repo: &str, number: u64) -> Result<ApiPull> {
        self.get_one(&format!("repos/{repo}/pulls/{number}"))
    }

    fn pull_files(&self, repo: &str, number: u64) -> Result<Vec<ApiFile>> {
        self.get_all(&format!("repos/{repo}/pulls/{number}/files"))
    }

    fn pull_commits(&self, repo: &str, number: u64) -> Result<Vec<ApiCommit>> {
        self.get_all(&format!("repos/{repo}/pulls/{number}/commits"))
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Map a failed HTTP status to an error class. GitHub signals an
/// exhausted quota with 403 or 429 and `x-ratelimit-remaining: 0`, and a
/// secondary rate limit with 403 plus `retry-after`.
pub fn classify_status(
    status: u16,
    ratelimit_remaining: Option<&str>,
    retry_after: Option<&str>,
) -> ApiErrorKind {
    let exhausted = ratelimit_remaining.map(str::trim) == Some("0") || retry_after.is_some();
    match status {
        401 => ApiErrorKind::Auth,
        403 if exhausted => ApiErrorKind::RateLimited,
        403 => ApiErrorKind::Auth,
        429 => ApiErrorKind::RateLimited,
        404 => ApiErrorKind::NotFound,
        500..=599 => ApiErrorKind::Transient,
        _ => ApiErrorKind::Other,
    }
}

/// Extract the `rel="next"` target from a `Link` header.
pub fn next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|part| {
        let mut pieces = part.split(';');
        let target = pieces.next()?.trim();
        let is_next = pieces.any(|p| p.trim() == "rel=\"next\"");
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}

/// `base * 2^attempt`, capped at one minute.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt);
    base.saturating_mul(factor).min(BACKOFF_CAP)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
