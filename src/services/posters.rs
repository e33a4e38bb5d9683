use std::collections::HashMap;

use bytes::{Bytes, BytesMut};
use reqwest::{header::CONTENT_TYPE, redirect, Client as HttpClient, Response, Url};
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};

const MAX_REDIRECTS: usize = 5;

/// Downloaded poster image
#[derive(Debug, Clone, PartialEq)]
pub struct Poster {
    pub content_type: String,
    pub bytes: Bytes,
}

/// Which posters may be fetched and how many are kept
#[derive(Debug, Clone, PartialEq)]
pub struct PosterPolicy {
    /// Catalog image hosts; a host also admits its subdomains
    pub allowed_hosts: Vec<String>,
    pub max_bytes: usize,
    pub max_entries: usize,
}

impl Default for PosterPolicy {
    fn default() -> Self {
        Self {
            allowed_hosts: vec![
                "kinopoiskapiunofficial.tech".to_string(),
                "avatars.mds.yandex.net".to_string(),
            ],
            max_bytes: 5 * 1024 * 1024,
            max_entries: 512,
        }
    }
}

/// Allowlist of lowercase host names
#[derive(Debug, Clone)]
struct HostAllowlist(Vec<String>);

impl HostAllowlist {
    fn new(hosts: &[String]) -> Self {
        Self(
            hosts
                .iter()
                .map(|host| host.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|host| !host.is_empty())
                .collect(),
        )
    }

    fn permits(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();

        self.0.iter().any(|allowed| {
            host == *allowed
                || host
                    .strip_suffix(allowed.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}

/// In-memory poster cache keyed by URL
///
/// Only catalog image hosts are fetched, redirects included. Holds at most
/// `max_entries` posters; once full, further downloads are served but not
/// kept. Two concurrent misses for the same URL may both download.
pub struct PosterCache {
    http_client: HttpClient,
    hosts: HostAllowlist,
    max_bytes: usize,
    max_entries: usize,
    entries: RwLock<HashMap<String, Poster>>,
}

impl PosterCache {
    pub fn new(policy: PosterPolicy) -> AppResult<Self> {
        let hosts = HostAllowlist::new(&policy.allowed_hosts);

        let redirect_hosts = hosts.clone();
        let redirects = redirect::Policy::custom(move |attempt| {
            if attempt.previous().len() >= MAX_REDIRECTS {
                attempt.error("too many poster redirects")
            } else if redirect_hosts.permits(attempt.url()) {
                attempt.follow()
            } else {
                attempt.stop()
            }
        });

        let http_client = HttpClient::builder().redirect(redirects).build()?;

        Ok(Self {
            http_client,
            hosts,
            max_bytes: policy.max_bytes,
            max_entries: policy.max_entries,
            entries: RwLock::new(HashMap::new()),
        })
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn get(&self, url: &str) -> AppResult<Poster> {
        let url = self.parse_poster_url(url)?;

        if let Some(poster) = self.entries.read().await.get(url.as_str()) {
            tracing::debug!(url = %url, "Poster cache hit");
            return Ok(poster.clone());
        }

        let poster = self.download(&url).await?;

        let mut entries = self.entries.write().await;
        if entries.len() < self.max_entries {
            entries.insert(url.to_string(), poster.clone());
        } else {
            tracing::debug!(url = %url, entries = entries.len(), "Poster cache full");
        }

        Ok(poster)
    }

    fn parse_poster_url(&self, raw: &str) -> AppResult<Url> {
        let url = Url::parse(raw)
            .map_err(|e| AppError::InvalidInput(format!("Invalid poster URL '{}': {}", raw, e)))?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(AppError::InvalidInput(format!(
                    "Unsupported poster URL scheme '{}'",
                    other
                )))
            }
        }

        if !self.hosts.permits(&url) {
            tracing::warn!(url = %url, "Poster host not allowed");
            return Err(AppError::InvalidInput(format!(
                "Poster host '{}' is not allowed",
                url.host_str().unwrap_or_default()
            )));
        }

        Ok(url)
    }

    async fn download(&self, url: &Url) -> AppResult<Poster> {
        let response = self.http_client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Poster request returned status {}",
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let content_type = ensure_image(content_type)?;
        let bytes = self.read_limited(response).await?;

        tracing::debug!(url = %url, size = bytes.len(), "Poster downloaded");

        Ok(Poster {
            content_type,
            bytes,
        })
    }

    /// Reads the body, giving up as soon as it exceeds `max_bytes`
    async fn read_limited(&self, mut response: Response) -> AppResult<Bytes> {
        let too_large = || AppError::ExternalApi("Poster exceeds size limit".to_string());

        if response
            .content_length()
            .is_some_and(|length| length > self.max_bytes as u64)
        {
            return Err(too_large());
        }

        let mut body = BytesMut::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body.freeze())
    }
}

fn ensure_image(content_type: Option<String>) -> AppResult<String> {
    match content_type {
        Some(value) if value.starts_with("image/") => Ok(value),
        _ => Err(AppError::ExternalApi("Image loading error".to_string())),
    }
}
