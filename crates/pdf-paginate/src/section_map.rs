//! Page-ordered index of the sections discovered in a rendered document

use std::fmt;

/// First appearance of a section marker in the rendered page sequence
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SectionMarker {
    /// Anchor id, used to target the table-of-contents placeholder
    pub id: String,
    /// Running-head text
    pub label: String,
    /// 1-based page number where the marker first appears
    pub start_page: usize,
}

/// Sections sorted ascending by start page.
///
/// The active section of page `p` is the marker with the greatest
/// `start_page <= p`. Pages before the first marker have no section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMap {
    markers: Vec<SectionMarker>,
}

impl SectionMap {
    /// Build a map from markers in any order. Sorting is stable, so markers
    /// sharing a page keep their discovery order.
    pub fn new(mut markers: Vec<SectionMarker>) -> Self {
        markers.sort_by_key(|m| m.start_page);
        Self { markers }
    }

    /// Label of the section active on `page`, or `None` before the first section
    pub fn label_for_page(&self, page: usize) -> Option<&str> {
        self.markers
            .iter()
            .rev()
            .find(|m| m.start_page <= page)
            .map(|m| m.label.as_str())
    }

    /// Start page of the section with the given id
    pub fn start_page_for_id(&self, id: &str) -> Option<usize> {
        self.markers
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.start_page)
    }

    pub fn first_start_page(&self) -> Option<usize> {
        self.markers.first().map(|m| m.start_page)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SectionMarker> {
        self.markers.iter()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

impl<'a> IntoIterator for &'a SectionMap {
    type Item = &'a SectionMarker;
    type IntoIter = std::slice::Iter<'a, SectionMarker>;

    fn into_iter(self) -> Self::IntoIter {
        self.markers.iter()
    }
}

impl fmt::Display for SectionMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for marker in &self.markers {
            writeln!(
                f,
                "{:>5}  {:<12} {}",
                marker.start_page, marker.id, marker.label
            )?;
        }
        Ok(())
    }
}
