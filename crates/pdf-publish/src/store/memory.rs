//! In-process stores, used for dry runs and tests

use super::{BlobEntry, BlobStore, VersionStore, check_key};
use crate::types::*;
use crate::version::VersionMeta;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryVersionStore {
    entries: RwLock<HashMap<String, VersionMeta>>,
}

impl MemoryVersionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one version
    pub fn with_version(key: &str, meta: VersionMeta) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.to_string(), meta);
        Self {
            entries: RwLock::new(entries),
        }
    }
}

impl VersionStore for MemoryVersionStore {
    async fn get(&self, key: &str) -> Result<Option<VersionMeta>> {
        Ok(self.entries.read().await.get(key).copied())
    }

    async fn put(&self, key: &str, meta: &VersionMeta) -> Result<()> {
        check_key(key)?;
        self.entries.write().await.insert(key.to_string(), *meta);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<BTreeMap<String, (BlobEntry, Vec<u8>)>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<BlobEntry> {
        check_key(key)?;
        let entry = BlobEntry {
            key: key.to_string(),
            size: bytes.len(),
            content_type: content_type.to_string(),
            uploaded_at: Utc::now(),
        };
        self.blobs
            .write()
            .await
            .insert(key.to_string(), (entry.clone(), bytes));
        Ok(entry)
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self
            .blobs
            .read()
            .await
            .get(key)
            .map(|(_, bytes)| bytes.clone()))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<BlobEntry>> {
        Ok(self
            .blobs
            .read()
            .await
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(_, (entry, _))| entry.clone())
            .collect())
    }
}
