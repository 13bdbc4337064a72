//! Stores backed by a directory on the local filesystem
//!
//! Layout under the root directory:
//! - `{key}.json`: version metadata
//! - `blobs/{key}`: blob contents
//! - `blobs/.meta/{key}.json`: blob entry (content type, size, upload time)
//!
//! Files are written to a temporary name and renamed into place, so readers
//! never observe a partially written file.

use super::{BlobEntry, BlobStore, VersionStore, check_key};
use crate::types::*;
use crate::version::VersionMeta;
use chrono::Utc;
use log::debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FsVersionStore {
    root: PathBuf,
}

impl FsVersionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, key: &str) -> Result<PathBuf> {
        check_key(key)?;
        Ok(self.root.join(format!("{}.json", key)))
    }
}

impl VersionStore for FsVersionStore {
    async fn get(&self, key: &str) -> Result<Option<VersionMeta>> {
        let Some(bytes) = read_optional(&self.path(key)?).await? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn put(&self, key: &str, meta: &VersionMeta) -> Result<()> {
        let path = self.path(key)?;
        let json = serde_json::to_vec_pretty(meta)?;
        write_atomic(&path, &json).await?;
        debug!("Stored {} as {}", meta, path.display());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn blob_dir(&self) -> PathBuf {
        self.root.join("blobs")
    }

    fn meta_dir(&self) -> PathBuf {
        self.blob_dir().join(".meta")
    }

    fn blob_path(&self, key: &str) -> Result<PathBuf> {
        check_key(key)?;
        Ok(self.blob_dir().join(key))
    }

    fn meta_path(&self, key: &str) -> Result<PathBuf> {
        check_key(key)?;
        Ok(self.meta_dir().join(format!("{}.json", key)))
    }
}

impl BlobStore for FsBlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<BlobEntry> {
        let blob_path = self.blob_path(key)?;
        let meta_path = self.meta_path(key)?;

        let entry = BlobEntry {
            key: key.to_string(),
            size: bytes.len(),
            content_type: content_type.to_string(),
            uploaded_at: Utc::now(),
        };

        write_atomic(&blob_path, &bytes).await?;
        write_atomic(&meta_path, &serde_json::to_vec_pretty(&entry)?).await?;
        debug!("Stored {} bytes at {}", entry.size, blob_path.display());
        Ok(entry)
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        read_optional(&self.blob_path(key)?).await
    }

    async fn list(&self, prefix: &str) -> Result<Vec<BlobEntry>> {
        let mut dir = match tokio::fs::read_dir(self.meta_dir()).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        while let Some(item) = dir.next_entry().await? {
            let name = item.file_name();
            let Some(key) = name.to_str().and_then(|n| n.strip_suffix(".json")) else {
                continue;
            };
            if !key.starts_with(prefix) {
                continue;
            }
            let bytes = tokio::fs::read(item.path()).await?;
            entries.push(serde_json::from_slice::<BlobEntry>(&bytes)?);
        }

        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }
}

async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| PublishError::Storage(format!("No parent for {}", path.display())))?;
    tokio::fs::create_dir_all(parent).await?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn missing_version_reads_as_none() {
        let dir = tempdir().unwrap();
        let store = FsVersionStore::new(dir.path());
        assert_eq!(store.get("manual-version").await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_on_fresh_root_is_empty() {
        let dir = tempdir().unwrap();
        let store = FsBlobStore::new(dir.path().join("never-created"));
        assert!(store.list("manual-v").await.unwrap().is_empty());
        assert_eq!(store.get("manual-v1.0.0.pdf").await.unwrap(), None);
    }

    #[tokio::test]
    async fn keys_with_separators_are_rejected() {
        let dir = tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());
        let err = store
            .put("../escape.pdf", vec![1], "application/pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::Storage(_)));
    }
}
