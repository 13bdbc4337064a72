//! Discovery of `FWMARK-` section markers in rendered page text
//!
//! Body anchors in the source document emit a text token of the form
//! `FWMARK-{id}` or `FWMARK-{id}-{LABEL}`. The id is alphanumeric, the label
//! is uppercase letters, digits, dots and underscores, and the token ends at
//! whitespace or at the end of the page text.

use crate::constants::{MARKER_PREFIX, TOC_MARKER_ID, TOC_TITLE};
use crate::section_map::{SectionMap, SectionMarker};
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"{}([A-Za-z0-9]+)(?:-([A-Z0-9._]+))?(?:\s|$)",
        regex::escape(MARKER_PREFIX)
    ))
    .expect("marker pattern is valid")
});

/// Scan page texts (index 0 is page 1) and build the section map.
pub fn extract_sections<S: AsRef<str>>(pages: &[S]) -> SectionMap {
    let mut markers = Vec::new();

    for (index, text) in pages.iter().enumerate() {
        let page = index + 1;
        for marker in markers_in_text(text.as_ref(), page) {
            debug!(
                "Section {:?} ({}) starts on page {}",
                marker.id, marker.label, page
            );
            markers.push(marker);
        }
    }

    SectionMap::new(markers)
}

/// All markers on a single page, in text order
pub fn markers_in_text(text: &str, page: usize) -> Vec<SectionMarker> {
    MARKER_RE
        .captures_iter(text)
        .map(|caps| {
            let id = caps[1].to_string();
            let label = resolve_label(&id, caps.get(2).map(|m| m.as_str()));
            SectionMarker {
                id,
                label,
                start_page: page,
            }
        })
        .collect()
}

fn resolve_label(id: &str, explicit: Option<&str>) -> String {
    match explicit {
        Some(label) => label.to_string(),
        None if id == TOC_MARKER_ID => TOC_TITLE.to_string(),
        None => id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_and_label_are_split() {
        let found = markers_in_text("intro FWMARK-01-INIT.SYS more", 3);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "01");
        assert_eq!(found[0].label, "INIT.SYS");
        assert_eq!(found[0].start_page, 3);
    }

    #[test]
    fn label_falls_back_to_toc_title_then_id() {
        let found = markers_in_text("FWMARK-TOC FWMARK-appendix", 1);
        let labels: Vec<_> = found.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, [TOC_TITLE, "appendix"]);
    }

    #[test]
    fn adjacent_tokens_separated_by_one_space() {
        let found = markers_in_text("FWMARK-A-ONE FWMARK-B-TWO\nFWMARK-C", 2);
        let ids: Vec<_> = found.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["A", "B", "C"]);
    }

    #[test]
    fn malformed_tokens_are_ignored() {
        assert!(markers_in_text("FWMARK-", 1).is_empty());
        assert!(markers_in_text("FWMARK- 01", 1).is_empty());
        assert!(markers_in_text("FWMARK-01-init", 1).is_empty());
        assert!(markers_in_text("FWMARK-01-INIT.sys", 1).is_empty());
        assert!(markers_in_text("FWMARK-01,", 1).is_empty());
    }

    #[test]
    fn token_at_end_of_text_matches() {
        let found = markers_in_text("last line FWMARK-99-END_OF.BOOK", 5);
        assert_eq!(found[0].label, "END_OF.BOOK");
    }
}
