//! Shared constants for pagination and running heads
//!
//! This module centralizes magic numbers and wire-level strings used
//! throughout the pagination and overlay passes.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per centimeter used for layout configuration lengths
pub const POINTS_PER_CM: f32 = 28.35;

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

// =============================================================================
// Section Markers
// =============================================================================

/// Prefix of the section marker token emitted by body anchors
pub const MARKER_PREFIX: &str = "FWMARK-";

/// Marker id reserved for the table of contents itself
pub const TOC_MARKER_ID: &str = "TOC";

/// Running-head label used for the table of contents when no label is given
pub const TOC_TITLE: &str = "ÍNDICE DE CONTENIDOS";

/// Element id prefix of the table-of-contents page number placeholders
pub const TOC_PLACEHOLDER_PREFIX: &str = "toc-pn-";

// =============================================================================
// Running Heads
// =============================================================================

/// Line width for the header and footer rules (points)
pub const RULE_WIDTH: f32 = 0.5;

/// Character width ratio for the Courier family (600 / 1000 em)
pub const COURIER_CHAR_WIDTH_RATIO: f32 = 0.6;

/// Resource name the overlay registers its font under
pub const OVERLAY_FONT_NAME: &str = "FRunHead";

/// Page dictionary key marking a page that already carries running heads
pub const OVERLAY_TAG_KEY: &str = "RunningHeads";

// =============================================================================
// Plain-Text Rendering
// =============================================================================

/// Body font size of the plain-text renderer (points)
pub const TEXT_BODY_FONT_SIZE: f32 = 10.0;

/// Line height as a multiple of the body font size
pub const TEXT_LEADING_FACTOR: f32 = 1.4;

// =============================================================================
// Browser Rendering
// =============================================================================

/// Virtual time Chromium grants the page (scripts, fonts, images) before
/// printing, in milliseconds
pub const CHROME_VIRTUAL_TIME_BUDGET_MS: u64 = 5000;
