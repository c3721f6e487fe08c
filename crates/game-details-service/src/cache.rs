//! Game metadata cache
//!
//! Entries are written once per app id and never expire. Ids the store
//! does not know are kept as negative entries so they are not fetched again.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::collections::HashMap;
use steamfilter_common::{CacheEntry, Error, GameRecord, Result};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Canonical cache key for an app id
pub fn cache_key(app_id: u32) -> String {
    format!("game:{}", app_id)
}

/// Key-value store of looked-up games
#[async_trait]
pub trait MetadataCache: Send + Sync {
    /// Returns `Ok(None)` when nothing is known about `app_id`
    async fn get(&self, app_id: u32) -> Result<Option<CacheEntry>>;

    /// Store an entry; overwriting with the same value is harmless
    async fn put(&self, entry: &CacheEntry) -> Result<()>;
}

/// Redis-backed cache
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    /// Create a new cache connected to `redis_url`
    pub async fn new(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| Error::Cache(format!("Failed to create Redis client: {}", e)))?;

        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| Error::Cache(format!("Failed to connect to Redis: {}", e)))?;

        info!("Connected to Redis at {}", redis_url);

        Ok(Self { conn })
    }
}

#[async_trait]
impl MetadataCache for RedisCache {
    async fn get(&self, app_id: u32) -> Result<Option<CacheEntry>> {
        let mut conn = self.conn.clone();

        let json: Option<String> = conn
            .get(cache_key(app_id))
            .await
            .map_err(|e| Error::Cache(e.to_string()))?;

        match json {
            Some(data) => {
                let record: GameRecord = serde_json::from_str(&data)
                    .map_err(|e| Error::Cache(format!("Failed to deserialize entry {}: {}", app_id, e)))?;
                debug!("Cache hit for {}", app_id);
                Ok(Some(CacheEntry::from_record(record)))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, entry: &CacheEntry) -> Result<()> {
        let mut conn = self.conn.clone();
        let json = serde_json::to_string(&entry.to_record())?;

        let _: () = conn
            .set(cache_key(entry.app_id()), json)
            .await
            .map_err(|e| Error::Cache(e.to_string()))?;

        debug!("Cached entry for {}", entry.app_id());
        Ok(())
    }
}

/// In-process cache, used when no Redis URL is configured
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, GameRecord>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl MetadataCache for MemoryCache {
    async fn get(&self, app_id: u32) -> Result<Option<CacheEntry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(&cache_key(app_id))
            .cloned()
            .map(CacheEntry::from_record))
    }

    async fn put(&self, entry: &CacheEntry) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(cache_key(entry.app_id()), entry.to_record());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(app_id: u32, name: &str) -> GameRecord {
        GameRecord {
            app_id,
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_cache_key_is_decimal() {
        assert_eq!(cache_key(440), "game:440");
        assert_eq!(cache_key(0), "game:0");
    }

    #[tokio::test]
    async fn test_memory_cache_roundtrip() {
        let cache = MemoryCache::new();
        assert!(cache.get(440).await.unwrap().is_none());

        let entry = CacheEntry::Present(record(440, "Team Fortress 2"));
        cache.put(&entry).await.unwrap();

        assert_eq!(cache.get(440).await.unwrap(), Some(entry));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_memory_cache_negative_entry() {
        let cache = MemoryCache::new();
        cache.put(&CacheEntry::KnownAbsent(9)).await.unwrap();

        assert_eq!(
            cache.get(9).await.unwrap(),
            Some(CacheEntry::KnownAbsent(9))
        );
    }

    #[tokio::test]
    #[ignore] // Requires Redis to be running
    async fn test_redis_cache_roundtrip() {
        const REDIS_URL: &str = "redis://127.0.0.1:6379/15";

        let cache = RedisCache::new(REDIS_URL)
            .await
            .expect("Failed to connect to test Redis");

        let client = redis::Client::open(REDIS_URL).unwrap();
        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let _: () = conn.del(vec![cache_key(570), cache_key(571)]).await.unwrap();

        assert!(cache.get(570).await.unwrap().is_none());

        let entry = CacheEntry::Present(record(570, "Dota 2"));
        cache.put(&entry).await.unwrap();
        assert_eq!(cache.get(570).await.unwrap(), Some(entry));

        cache.put(&CacheEntry::KnownAbsent(571)).await.unwrap();
        assert_eq!(
            cache.get(571).await.unwrap(),
            Some(CacheEntry::KnownAbsent(571))
        );

        // Clean up
        let _: () = conn.del(vec![cache_key(570), cache_key(571)]).await.unwrap();
    }
}
