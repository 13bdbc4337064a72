//! Two-pass pagination
//!
//! 1. Render the source without decoration
//! 2. Find where every section starts in the rendered pages
//! 3. Write those page numbers into the table-of-contents placeholders
//! 4. Render again
//! 5. Compare page counts of both passes
//!
//! Injected numbers can change line lengths and therefore the layout. A
//! page-count change is reported as [`PageDrift`] and logged, not corrected:
//! the second-pass pages are used with the section map of the first pass.

use crate::constants::{TOC_MARKER_ID, TOC_PLACEHOLDER_PREFIX};
use crate::markers::extract_sections;
use crate::options::PageLayout;
use crate::render::{RenderedDocument, Renderer};
use crate::section_map::SectionMap;
use crate::source::SourceDocument;
use crate::types::*;
use log::{debug, info, warn};
use lopdf::Document;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Default upper bound for a single render pass
pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(120);

/// Page counts of the two passes differed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageDrift {
    pub first_pass: usize,
    pub second_pass: usize,
}

/// Result of a two-pass pagination
#[derive(Debug, Clone)]
pub struct Pagination {
    /// Second-pass pages, not yet decorated
    pub document: Document,
    /// Section map built from the first pass
    pub sections: SectionMap,
    pub first_pass_pages: usize,
    pub second_pass_pages: usize,
    /// Number of placeholders that received a page number
    pub injected: usize,
    pub drift: Option<PageDrift>,
}

pub struct Paginator<R> {
    renderer: R,
    layout: Arc<PageLayout>,
    render_timeout: Duration,
}

impl<R: Renderer> Paginator<R> {
    pub fn new(renderer: R, layout: Arc<PageLayout>) -> Self {
        Self {
            renderer,
            layout,
            render_timeout: DEFAULT_RENDER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, render_timeout: Duration) -> Self {
        self.render_timeout = render_timeout;
        self
    }

    pub fn layout(&self) -> &Arc<PageLayout> {
        &self.layout
    }

    /// Run both passes. `source` keeps the injected page numbers afterwards.
    pub async fn paginate(&self, source: &mut SourceDocument) -> Result<Pagination> {
        info!("[PASS 1] Rendering source for section discovery.");
        let first = self.render_pass(source).await?;
        let first_pass_pages = first.page_count();
        let sections = extract_sections(&first.page_text);
        info!(
            "[PASS 1] {} pages, {} sections found.",
            first_pass_pages,
            sections.len()
        );
        drop(first);

        let injected = inject_page_numbers(source, &sections);
        info!("[INJECT] {} table-of-contents entries updated.", injected);

        info!("[PASS 2] Rendering source with page numbers.");
        let second = self.render_pass(source).await?;
        let second_pass_pages = second.page_count();

        let drift = (first_pass_pages != second_pass_pages).then(|| {
            warn!(
                "[VERIFY] Page count changed from {} to {} after injecting page numbers; \
                 running heads near the shift may name the wrong section.",
                first_pass_pages, second_pass_pages
            );
            PageDrift {
                first_pass: first_pass_pages,
                second_pass: second_pass_pages,
            }
        });
        if drift.is_none() {
            debug!("[VERIFY] Page count stable at {}.", second_pass_pages);
        }

        Ok(Pagination {
            document: second.document,
            sections,
            first_pass_pages,
            second_pass_pages,
            injected,
            drift,
        })
    }

    async fn render_pass(&self, source: &SourceDocument) -> Result<RenderedDocument> {
        let geometry = self.layout.geometry();
        let rendered = tokio::time::timeout(
            self.render_timeout,
            self.renderer.render(source, &geometry),
        )
        .await
        .map_err(|_| PaginateError::RenderTimeout(self.render_timeout))??;

        if rendered.page_count() == 0 {
            return Err(PaginateError::NoPages);
        }
        Ok(rendered)
    }
}

/// Write each section's start page into its `toc-pn-{id}` placeholder.
///
/// The table of contents does not list itself, so the TOC marker is skipped.
/// An id seen more than once keeps its first start page. Returns how many
/// placeholders were found and updated.
pub fn inject_page_numbers(source: &mut SourceDocument, sections: &SectionMap) -> usize {
    let mut seen = HashSet::new();
    let updates: Vec<(String, String)> = sections
        .iter()
        .filter(|m| m.id != TOC_MARKER_ID && seen.insert(m.id.as_str()))
        .map(|m| {
            (
                format!("{}{}", TOC_PLACEHOLDER_PREFIX, m.id),
                m.start_page.to_string(),
            )
        })
        .collect();

    let missing = source.set_texts_by_id(&updates);
    for id in &missing {
        debug!("No table-of-contents placeholder #{}", id);
    }
    updates.len() - missing.len()
}
