//! Publishing a new manual version
//!
//! Order of operations:
//! 1. Parse the bump kind; a bad value stops here, before any rendering
//! 2. Read the current version (none stored means 0.0.0) and bump it; a
//!    component already at its maximum stops here too
//! 3. Paginate the source and draw running heads with the new version
//! 4. Write the PDF blob, then the new version
//!
//! A failure in any step leaves the stored version untouched. Publishes
//! within one process are serialized; separate processes writing to the same
//! stores must be kept from running at the same time by the caller.

use crate::store::{BlobEntry, BlobStore, PDF_CONTENT_TYPE, VersionStore};
use crate::types::*;
use crate::version::{BLOB_PREFIX, BumpKind, VERSION_KEY, VersionMeta};
use log::{info, warn};
use pdf_paginate::{Paginator, Renderer, SourceDocument, apply_running_heads_async, pdf_to_bytes};
use tokio::sync::Mutex;

pub struct Publisher<R, V, B> {
    paginator: Paginator<R>,
    versions: V,
    blobs: B,
    lock: Mutex<()>,
}

impl<R: Renderer, V: VersionStore, B: BlobStore> Publisher<R, V, B> {
    pub fn new(paginator: Paginator<R>, versions: V, blobs: B) -> Self {
        Self {
            paginator,
            versions,
            blobs,
            lock: Mutex::new(()),
        }
    }

    pub fn versions(&self) -> &V {
        &self.versions
    }

    pub fn blobs(&self) -> &B {
        &self.blobs
    }

    /// Currently published version, if any
    pub async fn current_version(&self) -> Result<Option<VersionMeta>> {
        self.versions.get(VERSION_KEY).await
    }

    /// Render, decorate and store a new version of the manual
    pub async fn publish(&self, bump: &str, source: SourceDocument) -> Result<PublishReceipt> {
        let kind: BumpKind = bump.parse()?;
        let _guard = self.lock.lock().await;

        let current = self.current_version().await?.unwrap_or_default();
        let next = current.bump(kind)?;
        let version = next.to_string();
        info!("Publishing {} (was {}, {:?} bump)", version, current, kind);

        let bytes = self.render(source, &version).await?;

        let key = next.blob_key();
        let size = bytes.len();
        self.blobs.put(&key, bytes, PDF_CONTENT_TYPE).await?;
        info!("Stored {} ({} bytes)", key, size);

        self.versions.put(VERSION_KEY, &next).await?;
        info!("Current version is now {}", version);

        Ok(PublishReceipt { version, key, size })
    }

    /// Paginate and overlay; returns the finished PDF bytes
    pub async fn render(&self, mut source: SourceDocument, version: &str) -> Result<Vec<u8>> {
        let pagination = self.paginator.paginate(&mut source).await?;
        if let Some(drift) = pagination.drift {
            warn!(
                "{} renders with {} pages after page-number injection, {} before",
                version, drift.second_pass, drift.first_pass
            );
        }

        let (document, stats) = apply_running_heads_async(
            pagination.document,
            pagination.sections,
            self.paginator.layout().clone(),
            version.to_string(),
        )
        .await?;
        info!(
            "{} pages, {} with running heads",
            pagination.second_pass_pages, stats.decorated
        );

        Ok(pdf_to_bytes(document).await?)
    }

    /// PDF of the current version
    pub async fn latest(&self) -> Result<(VersionMeta, Vec<u8>)> {
        let current = self
            .current_version()
            .await?
            .ok_or_else(|| PublishError::NotFound("no version has been published".to_string()))?;
        let bytes = self.fetch(current).await?;
        Ok((current, bytes))
    }

    /// PDF of a given version
    pub async fn fetch(&self, version: VersionMeta) -> Result<Vec<u8>> {
        let key = version.blob_key();
        let bytes = self.blobs.get(&key).await?;
        bytes.ok_or(PublishError::NotFound(key))
    }

    /// Published versions, newest first
    pub async fn history(&self) -> Result<Vec<(VersionMeta, BlobEntry)>> {
        let mut entries: Vec<(VersionMeta, BlobEntry)> = self
            .blobs
            .list(BLOB_PREFIX)
            .await?
            .into_iter()
            .filter_map(|entry| Some((VersionMeta::from_blob_key(&entry.key)?, entry)))
            .collect();
        entries.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(entries)
    }
}
