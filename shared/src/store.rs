//! Durable key-value storage for client-side state
//!
//! Values are JSON blobs. The file-backed store keeps one `<key>.json` file
//! per key under a base directory and replaces files atomically on write.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;

use crate::errors::{SharedError, SharedResult};

/// Durable key-value store abstraction
#[mockall::automock]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the blob stored under `key`, if any
    async fn get(&self, key: &str) -> SharedResult<Option<serde_json::Value>>;

    /// Store `value` under `key`, replacing any previous blob
    async fn set(&self, key: &str, value: serde_json::Value) -> SharedResult<()>;

    /// Remove the blob stored under `key`; missing keys are not an error
    async fn clear(&self, key: &str) -> SharedResult<()>;
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    async fn get(&self, key: &str) -> SharedResult<Option<serde_json::Value>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: serde_json::Value) -> SharedResult<()> {
        (**self).set(key, value).await
    }

    async fn clear(&self, key: &str) -> SharedResult<()> {
        (**self).clear(key).await
    }
}

/// File-backed store
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Path of the blob file for a key
    fn key_path(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_dir.join(format!("{file_name}.json"))
    }

    fn store_error(operation: &str, key: &str, error: impl std::fmt::Display) -> SharedError {
        SharedError::StoreError {
            operation: operation.to_string(),
            key: key.to_string(),
            message: error.to_string(),
        }
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> SharedResult<Option<serde_json::Value>> {
        let path = self.key_path(key);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Self::store_error("read", key, e)),
        };

        let value = serde_json::from_str(&content).map_err(|e| Self::store_error("decode", key, e))?;
        Ok(Some(value))
    }

    async fn set(&self, key: &str, value: serde_json::Value) -> SharedResult<()> {
        fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| Self::store_error("create_dir", key, e))?;

        let path = self.key_path(key);
        let tmp_path = path.with_extension("json.tmp");
        let content = serde_json::to_string(&value)?;

        fs::write(&tmp_path, content)
            .await
            .map_err(|e| Self::store_error("write", key, e))?;
        fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| Self::store_error("rename", key, e))?;

        tracing::debug!(key = key, path = %path.display(), "stored blob");
        Ok(())
    }

    async fn clear(&self, key: &str) -> SharedResult<()> {
        match fs::remove_file(self.key_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::store_error("remove", key, e)),
        }
    }
}

/// In-memory store for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, serde_json::Value>>,
}

impl MemoryStore {
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
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> SharedResult<Option<serde_json::Value>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: serde_json::Value) -> SharedResult<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn clear(&self, key: &str) -> SharedResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
