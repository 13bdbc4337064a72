//! Drawing surface the running heads are planned against

use crate::types::{MonoFont, Rgb};

/// A drawing operation added on top of existing page content
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Single line of text with its baseline origin at (`x`, `y`)
    Text {
        text: String,
        x: f32,
        y: f32,
        font_size: f32,
        color: Rgb,
    },
    /// Horizontal rule from `x1` to `x2` at height `y`
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        width: f32,
        color: Rgb,
    },
}

/// A finished page that can only be drawn on, never edited
pub trait PageSurface {
    /// Page width and height in points
    fn size(&self) -> (f32, f32);
    fn text_width(&self, text: &str, font_size: f32) -> f32;
    fn draw(&mut self, op: DrawOp);
}

/// Records drawing operations for one page; committed to the PDF afterwards
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan {
    width: f32,
    height: f32,
    font: MonoFont,
    ops: Vec<DrawOp>,
}

impl PagePlan {
    pub fn new(width: f32, height: f32, font: MonoFont) -> Self {
        Self {
            width,
            height,
            font,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Drawn text at its x position, in drawing order
    pub fn texts(&self) -> impl Iterator<Item = (&str, f32)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, x, .. } => Some((text.as_str(), *x)),
            DrawOp::Rule { .. } => None,
        })
    }

    pub fn rule_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Rule { .. }))
            .count()
    }
}

impl PageSurface for PagePlan {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        self.font.text_width(text, font_size)
    }

    fn draw(&mut self, op: DrawOp) {
        self.ops.push(op);
    }
}
