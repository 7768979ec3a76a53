use std::future::Future;
use std::time::Duration;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::ClientError;

pub const POSTS: &str = "posts";
pub const OWNER_POSTS: &str = "owner_posts";
pub const PROFILE: &str = "profile";
pub const ICON: &str = "icon";

pub const DEFAULT_CACHE_CAPACITY: u64 = 1_000;
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub entity: &'static str,
    pub id: String,
}

impl CacheKey {
    pub fn new(entity: &'static str, id: impl Into<String>) -> Self {
        Self { entity, id: id.into() }
    }
}

/// Read-through cache of query results keyed by `(entity, id)`.
///
/// Concurrent misses on one key share a single fetch. Nothing is refreshed
/// automatically; mutations call [`QueryCache::invalidate`] or
/// [`QueryCache::invalidate_entity`].
#[derive(Clone)]
pub struct QueryCache {
    cache: Cache<CacheKey, Value>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL)
    }
}

impl QueryCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// Cached value of `key` without fetching. An entry that does not decode
    /// as `T` is a [`ClientError::Decode`], not a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Result<Option<T>, ClientError> {
        match self.cache.get(key).await {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub async fn get_or_fetch<T, F>(&self, key: CacheKey, fetch: F) -> Result<T, ClientError>
    where
        T: Serialize + DeserializeOwned,
        F: Future<Output = Result<T, ClientError>>,
    {
        let value = self.cache
            .try_get_with(key, async move {
                let fresh = fetch.await?;
                Ok::<_, ClientError>(serde_json::to_value(&fresh)?)
            })
            .await
            .map_err(|shared| (*shared).clone())?;

        Ok(serde_json::from_value(value)?)
    }

    pub async fn insert<T: Serialize>(&self, key: CacheKey, value: &T) -> Result<(), ClientError> {
        self.cache.insert(key, serde_json::to_value(value)?).await;
        Ok(())
    }

    pub async fn invalidate(&self, key: &CacheKey) {
        self.cache.invalidate(key).await;
    }

    /// Drops every entry of `entity`, whatever its id.
    ///
    /// A [`QueryCache::get_or_fetch`] of that entity already in flight is not
    /// cancelled: it may store a result read before the mutation that caused
    /// this call, which then stays cached until the next invalidation or TTL.
    pub async fn invalidate_entity(&self, entity: &str) {
        let keys: Vec<CacheKey> = self.cache.iter()
            .filter(|(key, _)| key.entity == entity)
            .map(|(key, _)| (*key).clone())
            .collect();

        for key in keys {
            self.cache.invalidate(&key).await;
        }
    }
}
