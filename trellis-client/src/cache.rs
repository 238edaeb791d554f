//! Client-side query cache with prefix invalidation.
//!
//! Fetch results are memoized under composite keys of the shape
//! `[operation, entity_id, ...]`. Readers go read-through: a hit is served
//! without touching the network, a miss always fetches. Any actor may
//! invalidate a key prefix; every entry under it is discarded so the next
//! read re-fetches.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use trellis_core::EntityId;

use crate::routes::Operation;

/// Ordered sequence of cache-key fragments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(fragments.into_iter().map(Into::into).collect())
    }

    /// Canonical key for a tab fetch: `[operation, entity_id]`.
    pub fn for_operation(op: Operation, entity_id: EntityId) -> Self {
        Self(vec![op.as_str().to_string(), entity_id.to_string()])
    }

    pub fn fragments(&self) -> &[String] {
        &self.0
    }

    /// Prefix match: `self` starts with every fragment of `prefix`, in order.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        prefix.0.len() <= self.0.len() && self.0[..prefix.0.len()] == prefix.0[..]
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

/// In-memory key-value cache of fetch results, shared across the client.
///
/// Values are stored as JSON so one map serves every record type; typed
/// access deserializes at the edge. An entry whose stored shape no longer
/// matches the requested type is treated as a miss.
#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    entries: Arc<RwLock<HashMap<QueryKey, serde_json::Value>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let entries = self.entries.read().await;
        let value = entries.get(key)?;
        serde_json::from_value(value.clone()).ok()
    }

    pub async fn contains(&self, key: &QueryKey) -> bool {
        self.entries.read().await.contains_key(key)
    }

    pub async fn put<T: Serialize>(&self, key: QueryKey, value: &T) {
        match serde_json::to_value(value) {
            Ok(json) => {
                self.entries.write().await.insert(key, json);
            }
            Err(err) => {
                // Unserializable values are simply not cached; the next read
                // falls through to the fetcher.
                debug!(key = %key, error = %err, "skipping cache put");
            }
        }
    }

    /// Discard the exact entry for `key`. Returns whether one existed.
    pub async fn invalidate(&self, key: &QueryKey) -> bool {
        self.entries.write().await.remove(key).is_some()
    }

    /// Discard every entry whose key starts with `prefix`. Returns the
    /// number of entries removed.
    pub async fn invalidate_prefix(&self, prefix: &QueryKey) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - entries.len();
        if removed > 0 {
            debug!(prefix = %prefix, removed, "invalidated cache entries");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
