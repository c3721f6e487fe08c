//! Raw document retrieval over HTTP

use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// A fetched document: status code plus the undecoded body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Document {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    /// Redirect statuses the store uses to signal an unknown app id
    pub fn is_redirect(&self) -> bool {
        matches!(self.status, 301 | 302 | 303 | 307 | 308)
    }

    /// Body decoded as UTF-8
    pub fn text(&self) -> Result<&str> {
        std::str::from_utf8(&self.body)
            .map_err(|e| Error::Parse(format!("document is not valid UTF-8: {}", e)))
    }
}

/// Capability for fetching a document by URL
///
/// Implementations fail with [`Error::Network`] on transport failure and
/// return every HTTP status, including non-success ones, as a [`Document`].
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn get(&self, url: &str) -> Result<Document>;
}

/// Whether the client follows redirects or hands them back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    Follow,
    Observe,
}

/// reqwest-backed fetcher with a per-request deadline
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a new fetcher
    ///
    /// # Arguments
    /// * `redirects` - `Observe` returns 3xx responses instead of following them
    /// * `timeout` - deadline applied to every request, body included
    pub fn new(redirects: RedirectMode, timeout: Duration) -> Result<Self> {
        let policy = match redirects {
            RedirectMode::Follow => reqwest::redirect::Policy::default(),
            RedirectMode::Observe => reqwest::redirect::Policy::none(),
        };

        let client = reqwest::Client::builder()
            .redirect(policy)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<Document> {
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        debug!("GET {} -> {} ({} bytes)", url, status, body.len());

        Ok(Document::new(status, body.to_vec()))
    }
}
