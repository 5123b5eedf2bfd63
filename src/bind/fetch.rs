//! Retrieval of raw statistics documents from the BIND statistics channel

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;

use crate::bind::errors::{BindError, Result};

/// Source of raw statistics documents, addressed by path
pub trait Fetch: Send + Sync {
    /// Returns the body of a successful (2xx) response for `path`
    fn fetch(&self, path: &str) -> Result<Vec<u8>>;
}

/// Fetches documents over HTTP relative to a base URL
#[derive(Debug)]
pub struct HttpFetcher {
    base: Url,
    client: Client,
}

impl HttpFetcher {
    pub fn new(base_url: &str, timeout: Duration) -> Result<HttpFetcher> {
        let base = Url::parse(base_url).map_err(|e| BindError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        if base.cannot_be_a_base() {
            return Err(BindError::InvalidUrl {
                url: base_url.to_string(),
                reason: "URL cannot carry a path".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| BindError::Transport {
                url: base_url.to_string(),
                source,
            })?;

        Ok(HttpFetcher { base, client })
    }

    /// Full URL of a statistics document
    pub fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        url.set_path(&join_path(self.base.path(), path));
        url
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        let url = self.endpoint(path);
        log::debug!("Fetching {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|source| BindError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BindError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().map_err(|source| BindError::Transport {
            url: url.to_string(),
            source,
        })?;

        Ok(body.to_vec())
    }
}

/// Appends `path` to the base path, keeping exactly one separator
pub(crate) fn join_path(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    match (base.is_empty(), path.is_empty()) {
        (true, true) => "/".to_string(),
        (false, true) => base.to_string(),
        (true, false) => format!("/{}", path),
        (false, false) => format!("{}/{}", base, path),
    }
}
