use crate::types::*;
use crate::units::{color_from_hex, is_hex_color, length_to_points};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Page layout and running-head configuration, as written in config files
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutConfig {
    pub format: PaperSize,
    pub margin: MarginConfig,
    pub header: HeaderConfig,
    pub page_number: PageNumberConfig,
    /// Monospace font used to draw and measure running heads
    pub font: MonoFont,
}

/// Margins as physical lengths, e.g. `"2.5cm"`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MarginConfig {
    pub top: String,
    pub right: String,
    pub bottom: String,
    pub left: String,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HeaderConfig {
    /// Text color, `#rrggbb`
    pub color: String,
    /// Rule color, `#rrggbb`
    pub border_color: String,
    pub font_size: f32,
    /// Prepended to every section label
    pub label_prefix: String,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PageNumberConfig {
    pub color: String,
    pub font_size: f32,
    /// Baseline distance from the bottom edge, e.g. `"1cm"`
    pub offset: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            format: PaperSize::A4,
            margin: MarginConfig::default(),
            header: HeaderConfig::default(),
            page_number: PageNumberConfig::default(),
            font: MonoFont::Courier,
        }
    }
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            top: "2.5cm".to_string(),
            right: "2cm".to_string(),
            bottom: "2.5cm".to_string(),
            left: "2cm".to_string(),
        }
    }
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            color: "#444444".to_string(),
            border_color: "#bbbbbb".to_string(),
            font_size: 8.0,
            label_prefix: String::new(),
        }
    }
}

impl Default for PageNumberConfig {
    fn default() -> Self {
        Self {
            color: "#444444".to_string(),
            font_size: 9.0,
            offset: "1cm".to_string(),
        }
    }
}

impl LayoutConfig {
    /// Load configuration from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let config = serde_json::from_slice(&bytes)
            .map_err(|e| PaginateError::Config(format!("Failed to parse layout: {}", e)))?;
        Ok(config)
    }

    /// Save configuration to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PaginateError::Config(format!("Failed to serialize layout: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.resolve().map(|_| ())
    }

    /// Convert to page coordinates, rejecting anything malformed
    pub fn resolve(&self) -> Result<PageLayout> {
        let margins = Margins {
            top: length_to_points(&self.margin.top)?,
            right: length_to_points(&self.margin.right)?,
            bottom: length_to_points(&self.margin.bottom)?,
            left: length_to_points(&self.margin.left)?,
        };

        let (width, height) = self.format.dimensions_pt();
        if [margins.top, margins.right, margins.bottom, margins.left]
            .iter()
            .any(|m| *m < 0.0)
        {
            return Err(PaginateError::Config(
                "Margins must not be negative".to_string(),
            ));
        }
        if margins.left + margins.right >= width || margins.top + margins.bottom >= height {
            return Err(PaginateError::Config(format!(
                "Margins leave no room on a {:?} page",
                self.format
            )));
        }

        for (name, value) in [
            ("header.color", &self.header.color),
            ("header.border_color", &self.header.border_color),
            ("page_number.color", &self.page_number.color),
        ] {
            if !is_hex_color(value) {
                return Err(PaginateError::Config(format!(
                    "{} must be #rrggbb, got {:?}",
                    name, value
                )));
            }
        }

        if self.header.font_size <= 0.0 || self.page_number.font_size <= 0.0 {
            return Err(PaginateError::Config(
                "Font sizes must be positive".to_string(),
            ));
        }

        Ok(PageLayout {
            paper: self.format,
            margins,
            css_margins: [
                self.margin.top.trim().to_string(),
                self.margin.right.trim().to_string(),
                self.margin.bottom.trim().to_string(),
                self.margin.left.trim().to_string(),
            ],
            header: HeaderStyle {
                color: color_from_hex(&self.header.color),
                border_color: color_from_hex(&self.header.border_color),
                font_size: self.header.font_size,
                label_prefix: self.header.label_prefix.clone(),
            },
            page_number: PageNumberStyle {
                color: color_from_hex(&self.page_number.color),
                font_size: self.page_number.font_size,
                offset: length_to_points(&self.page_number.offset)?,
            },
            font: self.font,
        })
    }
}

/// Resolved, immutable layout shared by the pagination driver and the overlay
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub paper: PaperSize,
    /// Margins in points
    pub margins: Margins,
    css_margins: [String; 4],
    pub header: HeaderStyle,
    pub page_number: PageNumberStyle,
    pub font: MonoFont,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderStyle {
    pub color: Rgb,
    pub border_color: Rgb,
    pub font_size: f32,
    pub label_prefix: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageNumberStyle {
    pub color: Rgb,
    pub font_size: f32,
    /// Baseline distance from the bottom edge, in points
    pub offset: f32,
}

impl PageLayout {
    /// Geometry for the render collaborator (no decoration)
    pub fn geometry(&self) -> PageGeometry {
        PageGeometry {
            paper: self.paper,
            margins: self.margins,
            css_margins: self.css_margins.clone(),
        }
    }
}
