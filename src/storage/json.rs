//! JSON file backend - the whole state as one pretty-printed document.

use crate::base::error::{BridgeError, BridgeResult};
use crate::storage::KeyValueStore;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Whole-document JSON file store.
///
/// The file is re-read on every operation so external edits are picked up;
/// a missing file reads as empty state.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    async fn read_document(&self) -> BridgeResult<Map<String, Value>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(BridgeError::storage(e.to_string())),
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(BridgeError::storage(format!(
                "{}: expected a JSON object at top level",
                self.path.display()
            ))),
            Err(e) => Err(BridgeError::storage(format!("{}: {e}", self.path.display()))),
        }
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> BridgeResult<Option<Value>> {
        Ok(self.read_document().await?.remove(key))
    }

    async fn set(&self, key: &str, value: Value) -> BridgeResult<()> {
        let mut document = self.read_document().await?;
        document.insert(key.to_string(), value);

        let json = serde_json::to_string_pretty(&Value::Object(document))
            .map_err(|e| BridgeError::storage(e.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| BridgeError::storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::KEY_SOURCE_URLS;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("state.json"));
        assert_eq!(store.get(KEY_SOURCE_URLS).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");

        let store = JsonFileStore::new(&path);
        let sources = json!([{ "url": "https://example.com", "enabled": true, "addedAt": 1 }]);
        store.set(KEY_SOURCE_URLS, sources.clone()).await.unwrap();

        // A fresh handle sees the persisted value.
        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.get(KEY_SOURCE_URLS).await.unwrap(), Some(sources));
    }

    #[tokio::test]
    async fn test_set_preserves_other_keys() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("state.json"));

        store.set("a", json!(1)).await.unwrap();
        store.set("b", json!(2)).await.unwrap();

        assert_eq!(store.get("a").await.unwrap(), Some(json!(1)));
        assert_eq!(store.get("b").await.unwrap(), Some(json!(2)));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(
            store.get(KEY_SOURCE_URLS).await,
            Err(BridgeError::Storage { .. })
        ));
    }
}
