//! Where rendered pages go after they are written locally.
//!
//! The publisher is chosen once from the configuration, before any page
//! is rendered, so a misconfigured upload fails the run up front.

use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;

use crate::config::UploadSettings;
use crate::error::{Result, TriageError};

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);

pub trait Publisher {
    fn publish(&self, object_name: &str, path: &Path, content_type: &str) -> Result<()>;

    fn describe(&self) -> String;
}

/// Keep pages on local disk only.
pub struct LocalOnly;

impl Publisher for LocalOnly {
    fn publish(&self, _object_name: &str, _path: &Path, _content_type: &str) -> Result<()> {
        Ok(())
    }

    fn describe(&self) -> String {
        "local output only".to_string()
    }
}

/// Swift-style object storage (Rackspace Cloud Files, OpenStack Swift):
/// `PUT <container_url>/<object>` with an `X-Auth-Token` header.
pub struct ObjectStore {
    http: Client,
    container_url: String,
    token: String,
}

impl ObjectStore {
    pub fn new(container_url: &str, token: String) -> Result<Self> {
        let builder = Client::builder().timeout(UPLOAD_TIMEOUT);
        #[cfg(test)]
        let builder = builder.no_proxy();
        let http = builder
            .build()
            .map_err(|e| TriageError::Upload(format!("HTTP client: {e}")))?;
        Ok(Self {
            http,
            container_url: container_url.trim_end_matches('/').to_string(),
            token,
        })
    }
}

impl Publisher for ObjectStore {
    fn publish(&self, object_name: &str, path: &Path, content_type: &str) -> Result<()> {
        let body = fs::read(path)?;
        let url = format!("{}/{object_name}", self.container_url);
        log::info!("uploading {} to {url}", path.display());
        let resp = self
            .http
            .put(&url)
            .header("X-Auth-Token", &self.token)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .map_err(|e| TriageError::Upload(format!("PUT {url}: {e}")))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(TriageError::Upload(format!(
                "PUT {url} returned {status}: {}",
                body.trim()
            )));
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("object storage at {}", self.container_url)
    }
}

/// Pick the publisher for `settings`, reading the storage token from
/// the environment when it is not configured inline.
pub fn publisher_for(settings: &UploadSettings) -> Result<Box<dyn Publisher>> {
    select_publisher(settings, |name| std::env::var(name).ok())
}

pub fn select_publisher(
    settings: &UploadSettings,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Box<dyn Publisher>> {
    if !settings.enabled {
        return Ok(Box::new(LocalOnly));
    }
    let container_url = settings
        .container_url
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| {
            TriageError::Upload("upload is enabled but `upload.container_url` is not set".into())
        })?;
    let token = settings
        .token
        .clone()
        .or_else(|| env(settings.token_env()))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            TriageError::Upload(format!(
                "upload is enabled but no token is configured (set `upload.token` or ${})",
                settings.token_env()
            ))
        })?;
    Ok(Box::new(ObjectStore::new(container_url, token)?))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
