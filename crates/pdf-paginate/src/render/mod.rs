//! Render collaborators
//!
//! A renderer turns the source document into paginated PDF pages together
//! with the plain text of every page. Rendering never draws running heads;
//! those are added afterwards by the overlay.
//!
//! - `ChromeRenderer` prints through a headless Chromium process
//! - `TextRenderer` lays the body text out in a monospace font (no browser)

mod chrome;
mod text;

pub use chrome::ChromeRenderer;
pub use text::TextRenderer;

use crate::source::SourceDocument;
use crate::types::{PageGeometry, Result};
use lopdf::Document;
use std::future::Future;

/// Paginated output of one render pass
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub document: Document,
    /// Plain text of each page, index 0 is page 1
    pub page_text: Vec<String>,
}

impl RenderedDocument {
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }
}

/// Renders a source document to paginated pages
pub trait Renderer: Send + Sync {
    fn render(
        &self,
        source: &SourceDocument,
        geometry: &PageGeometry,
    ) -> impl Future<Output = Result<RenderedDocument>> + Send;
}

/// Either of the bundled renderers, picked at runtime
#[derive(Debug, Clone)]
pub enum AnyRenderer {
    Chrome(ChromeRenderer),
    Text(TextRenderer),
}

impl Renderer for AnyRenderer {
    async fn render(
        &self,
        source: &SourceDocument,
        geometry: &PageGeometry,
    ) -> Result<RenderedDocument> {
        match self {
            AnyRenderer::Chrome(r) => r.render(source, geometry).await,
            AnyRenderer::Text(r) => r.render(source, geometry).await,
        }
    }
}
