//! Write-through cache with lazy expiry, layered on a [`KeyValueStore`].

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{marker::PhantomData, sync::Arc};

use crate::{clock::Clock, error::StorageError, storage::KeyValueStore};

/// Thirty minutes.
pub const CACHE_TTL_MS: i64 = 30 * 60 * 1000;

/// Persisted envelope around a cached payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub payload: T,
    pub captured_at_ms: i64,
}

impl<T> CacheEntry<T> {
    /// Valid while `now - captured_at <= ttl`.
    pub fn is_fresh(&self, now_ms: i64, ttl_ms: i64) -> bool {
        now_ms.saturating_sub(self.captured_at_ms) <= ttl_ms
    }
}

/// Cache of one payload type, namespaced by a key prefix.
///
/// Stale entries are removed when they are read, never by a background sweep.
#[derive(Debug)]
pub struct CacheStore<T> {
    prefix: &'static str,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ttl_ms: i64,
    _payload: PhantomData<fn() -> T>,
}

impl<T> Clone for CacheStore<T> {
    fn clone(&self) -> Self {
        Self {
            prefix: self.prefix,
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            ttl_ms: self.ttl_ms,
            _payload: PhantomData,
        }
    }
}

impl<T> CacheStore<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(prefix: &'static str, store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { prefix, store, clock, ttl_ms: CACHE_TTL_MS, _payload: PhantomData }
    }

    pub fn ttl_ms(&self) -> i64 {
        self.ttl_ms
    }

    /// Fresh payload for `key`, or `None`. An expired entry is deleted first.
    pub async fn read(&self, key: &str) -> Result<Option<T>, StorageError> {
        let storage_key = self.storage_key(key);
        let Some(raw) = self.store.get(&storage_key).await? else {
            tracing::debug!(key = %storage_key, "cache miss");
            return Ok(None);
        };

        let entry: CacheEntry<T> = serde_json::from_str(&raw)
            .map_err(|source| StorageError::Corrupt { key: storage_key.clone(), source })?;

        if !entry.is_fresh(self.clock.now_ms(), self.ttl_ms) {
            tracing::debug!(
                key = %storage_key,
                captured_at_ms = entry.captured_at_ms,
                "evicting stale cache entry"
            );
            self.store.remove(&storage_key).await?;
            return Ok(None);
        }

        tracing::debug!(key = %storage_key, "cache hit");
        Ok(Some(entry.payload))
    }

    /// Store `payload` stamped with the current time, replacing any prior entry.
    pub async fn write(&self, key: &str, payload: &T) -> Result<(), StorageError> {
        let storage_key = self.storage_key(key);
        let entry = CacheEntry { payload, captured_at_ms: self.clock.now_ms() };
        let json = serde_json::to_string(&entry)
            .map_err(|source| StorageError::Serialize { key: storage_key.clone(), source })?;

        self.store.set(&storage_key, json).await
    }

    pub async fn invalidate(&self, key: &str) -> Result<(), StorageError> {
        self.store.remove(&self.storage_key(key)).await
    }

    fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}
