//! User-managed list of production source origins.
//!
//! An ordered sequence persisted under `sourceUrls`; order is
//! user-significant for display but has no priority effect on merges, since
//! each source syncs independently. Urls are unique after normalization to
//! `scheme://host`.
//!
//! Every operation is a load-mutate-save against the shared key-value store
//! with no transactional isolation. Two interleaved writers can lose an
//! update; that limitation is accepted and demonstrated in the tests rather
//! than papered over with locking.

use crate::base::error::{BridgeError, BridgeResult};
use crate::base::now_unix_ms;
use crate::origin;
use crate::storage::{KeyValueStore, KEY_SOURCE_URLS};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One configured production origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceEntry {
    /// Normalized origin, `scheme://host`.
    pub url: String,
    pub enabled: bool,
    /// Unix epoch milliseconds.
    pub added_at: i64,
}

pub struct SourceRegistry {
    storage: Arc<dyn KeyValueStore>,
}

impl SourceRegistry {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// All entries in user order.
    pub async fn entries(&self) -> BridgeResult<Vec<SourceEntry>> {
        match self.storage.get(KEY_SOURCE_URLS).await? {
            Some(value) => {
                serde_json::from_value(value).map_err(|e| BridgeError::storage(e.to_string()))
            }
            None => Ok(Vec::new()),
        }
    }

    /// Entries with `enabled` set, in user order.
    pub async fn enabled_entries(&self) -> BridgeResult<Vec<SourceEntry>> {
        Ok(self.entries().await?.into_iter().filter(|e| e.enabled).collect())
    }

    /// Append a new source. The url is normalized to `scheme://host` first;
    /// adding an origin that is already present fails with `DuplicateSource`.
    pub async fn add(&self, url: &str) -> BridgeResult<SourceEntry> {
        let normalized = origin::normalize_origin(url)?;

        let mut entries = self.entries().await?;
        if entries.iter().any(|e| e.url == normalized) {
            return Err(BridgeError::DuplicateSource { url: normalized });
        }

        let entry = SourceEntry {
            url: normalized,
            enabled: true,
            added_at: now_unix_ms(),
        };
        entries.push(entry.clone());
        self.save(&entries).await?;

        tracing::debug!(url = %entry.url, "source added");
        Ok(entry)
    }

    /// Remove the entry at `index`, returning it.
    pub async fn remove(&self, index: usize) -> BridgeResult<SourceEntry> {
        let mut entries = self.entries().await?;
        if index >= entries.len() {
            return Err(BridgeError::IndexOutOfBounds { index, len: entries.len() });
        }

        let removed = entries.remove(index);
        self.save(&entries).await?;
        Ok(removed)
    }

    /// Move the entry at `from` to position `to`, preserving the relative
    /// order of everything else (remove, then reinsert).
    pub async fn reorder(&self, from: usize, to: usize) -> BridgeResult<()> {
        let mut entries = self.entries().await?;
        let len = entries.len();
        if from >= len {
            return Err(BridgeError::IndexOutOfBounds { index: from, len });
        }
        if to >= len {
            return Err(BridgeError::IndexOutOfBounds { index: to, len });
        }

        let moved = entries.remove(from);
        entries.insert(to, moved);
        self.save(&entries).await
    }

    pub async fn set_enabled(&self, index: usize, enabled: bool) -> BridgeResult<()> {
        let mut entries = self.entries().await?;
        match entries.get_mut(index) {
            Some(entry) => entry.enabled = enabled,
            None => return Err(BridgeError::IndexOutOfBounds { index, len: entries.len() }),
        }
        self.save(&entries).await
    }

    async fn save(&self, entries: &[SourceEntry]) -> BridgeResult<()> {
        let value =
            serde_json::to_value(entries).map_err(|e| BridgeError::storage(e.to_string()))?;
        self.storage.set(KEY_SOURCE_URLS, value).await
    }
}
