#![allow(dead_code)]

use pdf_paginate::{
    LayoutConfig, PageGeometry, Paginator, RenderedDocument, Renderer, SourceDocument,
    TextRenderer,
};
use pdf_publish::{BlobEntry, BlobStore, PublishError};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const MANUAL_HTML: &str = r#"<html><body>
  <section>
    <h1>FWMARK-TOC</h1>
    <p>Init <span id="toc-pn-01">--</span></p>
    <p>Kernel <span id="toc-pn-02">--</span></p>
  </section>
  <section class="page-break">
    <h1>FWMARK-01-INIT.SYS Initialization</h1>
    <p>The init process starts every service.</p>
  </section>
  <section class="page-break">
    <h1>FWMARK-02-KERNEL Kernel</h1>
    <p>The kernel schedules tasks.</p>
  </section>
</body></html>"#;

pub fn manual() -> SourceDocument {
    SourceDocument::from_html(MANUAL_HTML)
}

/// Text renderer that counts how often it was asked to render
#[derive(Clone, Default)]
pub struct CountingRenderer {
    inner: TextRenderer,
    pub calls: Arc<AtomicUsize>,
}

impl CountingRenderer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Renderer for CountingRenderer {
    async fn render(
        &self,
        source: &SourceDocument,
        geometry: &PageGeometry,
    ) -> pdf_paginate::Result<RenderedDocument> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.render(source, geometry).await
    }
}

pub fn paginator(renderer: CountingRenderer) -> Paginator<CountingRenderer> {
    let layout = LayoutConfig::default().resolve().unwrap();
    Paginator::new(renderer, Arc::new(layout))
}

/// Blob store whose writes always fail
#[derive(Default)]
pub struct FailingBlobStore;

impl BlobStore for FailingBlobStore {
    async fn put(
        &self,
        key: &str,
        _bytes: Vec<u8>,
        _content_type: &str,
    ) -> pdf_publish::Result<BlobEntry> {
        Err(PublishError::Storage(format!("upload of {} refused", key)))
    }

    async fn get(&self, _key: &str) -> pdf_publish::Result<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn list(&self, _prefix: &str) -> pdf_publish::Result<Vec<BlobEntry>> {
        Ok(Vec::new())
    }
}
