use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use tracing::debug;

#[derive(Debug, Clone)]
struct CacheEntry {
    body: String,
    etag: Option<String>,
    last_modified: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub body: String,
    /// False when the server answered 304 and the cached body was reused.
    pub modified: bool,
}

/// Conditional-GET cache for polled snapshot URLs, owned by the poller.
#[derive(Debug, Default)]
pub struct HttpCache {
    entries: HashMap<String, CacheEntry>,
}

impl HttpCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fetch(&mut self, client: &Client, url: &str) -> Result<Fetched> {
        let cached_entry = self.entries.get(url);

        let mut req = client.get(url);
        if let Some(entry) = cached_entry {
            if let Some(etag) = entry.etag.as_ref() {
                req = req.header(IF_NONE_MATCH, etag);
            }
            if let Some(last_modified) = entry.last_modified.as_ref() {
                req = req.header(IF_MODIFIED_SINCE, last_modified);
            }
        }

        let resp = req.send().context("request failed")?;
        let status = resp.status();
        let headers = resp.headers().clone();
        if status == StatusCode::NOT_MODIFIED {
            let Some(entry) = self.entries.get(url) else {
                return Err(anyhow!("received 304 without cache body"));
            };
            debug!(url, "snapshot not modified");
            return Ok(Fetched {
                body: entry.body.clone(),
                modified: false,
            });
        }

        let body = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(anyhow!("http {}: {}", status, body));
        }

        let etag = headers
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let last_modified = headers
            .get(LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        self.entries.insert(
            url.to_string(),
            CacheEntry {
                body: body.clone(),
                etag,
                last_modified,
            },
        );
        Ok(Fetched {
            body,
            modified: true,
        })
    }
}
