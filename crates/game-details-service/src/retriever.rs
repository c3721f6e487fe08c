//! Cache-aside batch retrieval of game metadata
//!
//! For every requested id the cache is consulted first; on a miss the store
//! page is fetched, parsed and written back. Ids the store redirects away
//! from are remembered as negative entries and never reported.

use std::str::FromStr;
use std::sync::Arc;

use steamfilter_common::{CacheEntry, DocumentFetcher, Error, GameRecord, Result};
use tracing::{debug, info, warn};

use crate::cache::MetadataCache;
use crate::parser::GameParser;

/// What to do when a single id in a batch fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Log the failure and continue with the remaining ids
    #[default]
    SkipAndContinue,

    /// Abort the whole batch with the first failure
    FailFast,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" | "skip-and-continue" => Ok(FailurePolicy::SkipAndContinue),
            "fail-fast" | "failfast" => Ok(FailurePolicy::FailFast),
            other => Err(format!("unknown batch failure policy: {}", other)),
        }
    }
}

/// Parse a requested id; zero and non-numeric ids are not looked up
///
/// Surrounding whitespace is ignored. Negative ids and ids beyond `u32`
/// are invalid too.
pub fn parse_app_id(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|id| *id != 0)
}

/// Orchestrates cache lookups, store fetches and parsing for a batch of ids
pub struct BatchRetriever {
    fetcher: Arc<dyn DocumentFetcher>,
    parser: GameParser,
    store_base_url: String,
    policy: FailurePolicy,
}

impl BatchRetriever {
    /// Create a new retriever
    ///
    /// `fetcher` must not follow redirects, since a redirect is how the
    /// store reports an unknown app id.
    pub fn new(
        fetcher: Arc<dyn DocumentFetcher>,
        parser: GameParser,
        store_base_url: impl Into<String>,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            fetcher,
            parser,
            store_base_url: store_base_url.into(),
            policy,
        }
    }

    /// Store page URL fetched for `app_id`
    pub fn store_page_url(&self, app_id: u32) -> String {
        format!(
            "{}/app/{}/",
            self.store_base_url.trim_end_matches('/'),
            app_id
        )
    }

    /// Retrieve records for `ids`, in input order
    ///
    /// Invalid ids are skipped and ids unknown to the store are omitted.
    /// A cache read failure aborts the batch; other per-id failures are
    /// handled according to the configured [`FailurePolicy`].
    pub async fn retrieve_batch(
        &self,
        ids: &[String],
        cache: Option<&dyn MetadataCache>,
    ) -> Result<Vec<GameRecord>> {
        if ids.is_empty() {
            return Err(Error::InvalidInput("No appIds specified".to_string()));
        }

        let mut records = Vec::with_capacity(ids.len());

        for raw in ids {
            let Some(app_id) = parse_app_id(raw) else {
                debug!("Skipping invalid app id {:?}", raw);
                continue;
            };

            match self.retrieve_one(app_id, cache).await {
                Ok(CacheEntry::Present(record)) => {
                    if record.is_resolved() {
                        records.push(record);
                    }
                }
                Ok(CacheEntry::KnownAbsent(_)) => {
                    debug!("App {} is known to be missing from the store", app_id);
                }
                Err(e @ Error::Cache(_)) => return Err(e),
                Err(e) => match self.policy {
                    FailurePolicy::SkipAndContinue => {
                        warn!("Error getting data for app {}: {}", app_id, e);
                    }
                    FailurePolicy::FailFast => return Err(e),
                },
            }
        }

        Ok(records)
    }

    /// Cache-aside lookup of a single id
    pub async fn retrieve_one(
        &self,
        app_id: u32,
        cache: Option<&dyn MetadataCache>,
    ) -> Result<CacheEntry> {
        if let Some(cache) = cache {
            if let Some(entry) = cache.get(app_id).await? {
                return Ok(entry);
            }
        }

        let entry = self.fetch(app_id).await?;

        if let Some(cache) = cache {
            if let Err(e) = cache.put(&entry).await {
                warn!("Failed to cache app {}: {}", app_id, e);
            }
        }

        Ok(entry)
    }

    async fn fetch(&self, app_id: u32) -> Result<CacheEntry> {
        let url = self.store_page_url(app_id);
        info!("Fetching store page {}", url);

        let document = self.fetcher.get(&url).await?;

        if document.is_redirect() {
            info!("Game is missing from the store: {} (url: {})", app_id, url);
            return Ok(CacheEntry::KnownAbsent(app_id));
        }

        if !document.is_success() {
            return Err(Error::Upstream {
                status: document.status,
                url,
            });
        }

        let record = self.parser.parse(app_id, &document.body)?;
        Ok(CacheEntry::from_record(record))
    }
}
