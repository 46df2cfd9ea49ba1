//! Persisted key-value state.
//!
//! Holds the source registry, the bounded transfer history, and the
//! auto-transfer pause flag under well-known keys. Reads and writes are
//! read-modify-write with no transactional isolation; two concurrent writers
//! can lose an update (see the registry tests).

pub mod json;

use crate::base::error::BridgeResult;
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

/// Key holding the ordered `SourceEntry` list.
pub const KEY_SOURCE_URLS: &str = "sourceUrls";
/// Key holding the bounded most-recent-first transfer history.
pub const KEY_RECENT_TRANSFERS: &str = "recentTransfers";
/// Key holding the auto-transfer pause flag.
pub const KEY_TRANSFER_PAUSED: &str = "isTransferPaused";

/// Shared persisted state consumed by the registry and the orchestrator.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> BridgeResult<Option<Value>>;
    async fn set(&self, key: &str, value: Value) -> BridgeResult<()>;
}

/// Process-local backend for tests and embedders.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: DashMap<String, Value>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> BridgeResult<Option<Value>> {
        Ok(self.entries.get(key).map(|e| e.value().clone()))
    }

    async fn set(&self, key: &str, value: Value) -> BridgeResult<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(store.get(KEY_TRANSFER_PAUSED).await.unwrap(), None);

        store.set(KEY_TRANSFER_PAUSED, Value::Bool(true)).await.unwrap();
        assert_eq!(
            store.get(KEY_TRANSFER_PAUSED).await.unwrap(),
            Some(Value::Bool(true))
        );
    }
}
