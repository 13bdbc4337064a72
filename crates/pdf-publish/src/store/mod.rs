//! Persistence for the current version and the published PDFs
//!
//! Both stores are simple key/value interfaces. Keys are flat names such as
//! `manual-version` or `manual-v1.3.0.pdf`; path separators are rejected.

mod fs;
mod memory;

pub use fs::{FsBlobStore, FsVersionStore};
pub use memory::{MemoryBlobStore, MemoryVersionStore};

use crate::types::*;
use crate::version::VersionMeta;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Content type of every published manual
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Key/value store holding version metadata
pub trait VersionStore: Send + Sync {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<VersionMeta>>> + Send;
    fn put(&self, key: &str, meta: &VersionMeta) -> impl Future<Output = Result<()>> + Send;
}

/// Object store holding published documents
pub trait BlobStore: Send + Sync {
    fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = Result<BlobEntry>> + Send;
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send;
    /// Entries whose key starts with `prefix`, sorted by key
    fn list(&self, prefix: &str) -> impl Future<Output = Result<Vec<BlobEntry>>> + Send;
}

/// A stored blob
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobEntry {
    pub key: String,
    pub size: usize,
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Keys must be plain file names
pub(crate) fn check_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key != "."
        && key != ".."
        && !key.contains(['/', '\\'])
        && !key.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(PublishError::Storage(format!("Invalid key {:?}", key)))
    }
}
