//! Two-pass pagination and running-head overlay for rendered manuals
//!
//! Pipeline: render → discover sections → inject table-of-contents page
//! numbers → render again → draw running heads on the finished pages.

pub mod constants;
mod io;
mod markers;
mod options;
pub mod overlay;
mod paginate;
pub mod render;
mod section_map;
mod source;
mod types;
pub mod units;

pub use io::{
    encode_win_ansi, extract_page_texts, load_pdf, load_pdf_bytes, pdf_to_bytes, save_pdf,
};
pub use markers::{extract_sections, markers_in_text};
pub use options::*;
pub use overlay::{OverlayStats, apply_running_heads, apply_running_heads_async, decorate_page};
pub use paginate::{DEFAULT_RENDER_TIMEOUT, PageDrift, Pagination, Paginator, inject_page_numbers};
pub use render::{AnyRenderer, ChromeRenderer, RenderedDocument, Renderer, TextRenderer};
pub use section_map::{SectionMap, SectionMarker};
pub use source::{SourceDocument, TextBlock};
pub use types::*;
