//! Running heads, folios and rules drawn over finished pages
//!
//! Every page that belongs to a section gets:
//! - the section label at the outer margin and the version at the inner
//!   margin of the header band (right/left on recto, mirrored on verso)
//! - the page number at the outer margin near the bottom edge
//! - a rule at the top-margin boundary and one at the bottom-margin boundary
//!
//! Pages before the first section (the cover) are left alone.
//!
//! Planning is independent per page and runs in parallel; the planned
//! operations are then appended to the PDF one page at a time.

mod commit;
mod surface;

pub use surface::{DrawOp, PageSurface, PagePlan};

use crate::constants::RULE_WIDTH;
use crate::options::PageLayout;
use crate::section_map::SectionMap;
use crate::types::*;
use commit::{add_overlay_font, commit_page, is_tagged, page_size};
use log::{debug, info};
use lopdf::{Document, ObjectId};
use rayon::prelude::*;

/// What the overlay did to a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayStats {
    /// Pages that received running heads
    pub decorated: usize,
    /// Pages before the first section
    pub unlabeled: usize,
    /// Pages skipped because an earlier run already decorated them
    pub already_decorated: usize,
}

/// Plan the running heads of page `page` (1-based) onto `surface`.
///
/// Returns `false`, drawing nothing, when no section is active on the page.
pub fn decorate_page<S: PageSurface>(
    surface: &mut S,
    page: usize,
    sections: &SectionMap,
    layout: &PageLayout,
    version: &str,
) -> bool {
    let Some(label) = sections.label_for_page(page) else {
        return false;
    };

    let (width, height) = surface.size();
    let m = layout.margins;
    let header = &layout.header;
    let folio = &layout.page_number;
    let recto = page % 2 == 1;
    let right_edge = width - m.right;

    // Header band: label on the outer edge, version on the inner edge
    let head_text = format!("{}{}", header.label_prefix, label);
    let head_width = surface.text_width(&head_text, header.font_size);
    let version_width = surface.text_width(version, header.font_size);
    let head_y = height - m.top / 2.0;

    let (label_x, version_x) = if recto {
        (right_edge - head_width, m.left)
    } else {
        (m.left, right_edge - version_width)
    };

    surface.draw(DrawOp::Text {
        text: head_text,
        x: label_x,
        y: head_y,
        font_size: header.font_size,
        color: header.color,
    });
    surface.draw(DrawOp::Text {
        text: version.to_string(),
        x: version_x,
        y: head_y,
        font_size: header.font_size,
        color: header.color,
    });

    // Folio on the outer edge
    let number = page.to_string();
    let number_width = surface.text_width(&number, folio.font_size);
    surface.draw(DrawOp::Text {
        text: number,
        x: if recto { right_edge - number_width } else { m.left },
        y: folio.offset,
        font_size: folio.font_size,
        color: folio.color,
    });

    for y in [height - m.top, m.bottom] {
        surface.draw(DrawOp::Rule {
            x1: m.left,
            x2: right_edge,
            y,
            width: RULE_WIDTH,
            color: header.border_color,
        });
    }

    true
}

/// Decorate every page of `doc` that belongs to a section.
///
/// Pages decorated by an earlier call are recognized and skipped, so each
/// page carries at most one set of running heads.
pub fn apply_running_heads(
    doc: &mut Document,
    sections: &SectionMap,
    layout: &PageLayout,
    version: &str,
) -> Result<OverlayStats> {
    let fallback_size = layout.paper.dimensions_pt();
    let mut stats = OverlayStats::default();
    let mut targets: Vec<(usize, ObjectId, (f32, f32))> = Vec::new();

    for (number, page_id) in doc.get_pages() {
        if is_tagged(doc, page_id)? {
            stats.already_decorated += 1;
            continue;
        }
        let size = page_size(doc, page_id).unwrap_or(fallback_size);
        targets.push((number as usize, page_id, size));
    }

    let plans: Vec<(ObjectId, PagePlan)> = targets
        .par_iter()
        .map(|&(number, page_id, (width, height))| {
            let mut plan = PagePlan::new(width, height, layout.font);
            decorate_page(&mut plan, number, sections, layout, version);
            (page_id, plan)
        })
        .collect();

    let font_id = plans
        .iter()
        .any(|(_, plan)| !plan.is_empty())
        .then(|| add_overlay_font(doc, layout.font));

    for (page_id, plan) in plans {
        match font_id {
            Some(font_id) if !plan.is_empty() => {
                commit_page(doc, page_id, font_id, plan.ops())?;
                stats.decorated += 1;
            }
            _ => stats.unlabeled += 1,
        }
    }

    debug!("{:?}", stats);
    info!(
        "Running heads on {} pages ({} unlabeled, {} already decorated)",
        stats.decorated, stats.unlabeled, stats.already_decorated
    );
    Ok(stats)
}

/// Overlay a finished document in a blocking task
pub async fn apply_running_heads_async(
    mut doc: Document,
    sections: SectionMap,
    layout: std::sync::Arc<PageLayout>,
    version: String,
) -> Result<(Document, OverlayStats)> {
    tokio::task::spawn_blocking(move || {
        let stats = apply_running_heads(&mut doc, &sections, &layout, &version)?;
        Ok::<_, PaginateError>((doc, stats))
    })
    .await?
}
