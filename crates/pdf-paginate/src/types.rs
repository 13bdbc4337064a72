use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaginateError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Render failed: {0}")]
    Render(String),
    #[error("Render timed out after {0:?}")]
    RenderTimeout(Duration),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Rendered document has no pages")]
    NoPages,
}

pub type Result<T> = std::result::Result<T, PaginateError>;

/// Standard paper sizes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaperSize {
    A3,
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

impl PaperSize {
    /// Portrait dimensions in millimeters
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
            PaperSize::Tabloid => (279.4, 431.8),
        }
    }

    /// Portrait dimensions in points
    pub fn dimensions_pt(self) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        (
            crate::constants::mm_to_pt(w),
            crate::constants::mm_to_pt(h),
        )
    }

    /// Name understood by the CSS `@page { size: ... }` descriptor
    pub fn css_name(self) -> &'static str {
        match self {
            PaperSize::A3 => "A3",
            PaperSize::A4 => "A4",
            PaperSize::A5 => "A5",
            PaperSize::Letter => "letter",
            PaperSize::Legal => "legal",
            PaperSize::Tabloid => "ledger",
        }
    }
}

/// Normalized RGB color, each channel in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
}

/// Page margins in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    /// Create uniform margins on all sides
    pub fn uniform(margin_pt: f32) -> Self {
        Self {
            top: margin_pt,
            right: margin_pt,
            bottom: margin_pt,
            left: margin_pt,
        }
    }
}

/// Geometry handed to the render collaborator. Decoration is never part of
/// it: headers and footers are drawn afterwards by the overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct PageGeometry {
    pub paper: PaperSize,
    pub margins: Margins,
    /// Margins exactly as configured (e.g. `"2.5cm"`), top/right/bottom/left.
    /// Renderers that take CSS use these verbatim.
    pub css_margins: [String; 4],
}

impl PageGeometry {
    pub fn page_size_pt(&self) -> (f32, f32) {
        self.paper.dimensions_pt()
    }

    /// `@page` rule carrying paper size and margins
    pub fn page_rule(&self) -> String {
        let [top, right, bottom, left] = &self.css_margins;
        format!(
            "@page {{ size: {}; margin: {} {} {} {}; }}",
            self.paper.css_name(),
            top,
            right,
            bottom,
            left
        )
    }
}

/// Monospace fonts available for the running heads
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MonoFont {
    #[default]
    Courier,
    CourierBold,
    CourierOblique,
}

impl MonoFont {
    /// Standard 14 base font name
    pub fn base_font(self) -> &'static str {
        match self {
            MonoFont::Courier => "Courier",
            MonoFont::CourierBold => "Courier-Bold",
            MonoFont::CourierOblique => "Courier-Oblique",
        }
    }

    /// Advance width of `text` at `font_size`, in points
    pub fn text_width(self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * crate::constants::COURIER_CHAR_WIDTH_RATIO
    }
}
