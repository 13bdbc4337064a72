//! Monospace pager: lays the body text out line by line, no browser needed

use super::{RenderedDocument, Renderer};
use crate::constants::{TEXT_BODY_FONT_SIZE, TEXT_LEADING_FACTOR};
use crate::io::encode_win_ansi;
use crate::source::{SourceDocument, TextBlock};
use crate::types::*;
use log::debug;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, StringFormat};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextRenderer {
    pub font: MonoFont,
    pub font_size: f32,
    /// Distance between baselines, in points
    pub leading: f32,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            font: MonoFont::Courier,
            font_size: TEXT_BODY_FONT_SIZE,
            leading: TEXT_BODY_FONT_SIZE * TEXT_LEADING_FACTOR,
        }
    }
}

impl Renderer for TextRenderer {
    async fn render(
        &self,
        source: &SourceDocument,
        geometry: &PageGeometry,
    ) -> Result<RenderedDocument> {
        let blocks = source.text_blocks();
        let renderer = *self;
        let geometry = geometry.clone();
        tokio::task::spawn_blocking(move || renderer.render_blocks(&blocks, &geometry)).await?
    }
}

impl TextRenderer {
    /// Lay out blocks and write them to a fresh PDF document
    pub fn render_blocks(
        &self,
        blocks: &[TextBlock],
        geometry: &PageGeometry,
    ) -> Result<RenderedDocument> {
        let pages = self.paginate(blocks, geometry);
        debug!("Laid out {} blocks on {} pages", blocks.len(), pages.len());

        let document = self.build_document(&pages, geometry)?;
        let page_text = pages.iter().map(|lines| lines.join("\n")).collect();

        Ok(RenderedDocument {
            document,
            page_text,
        })
    }

    /// Characters per line and lines per page for the content area
    pub fn capacity(&self, geometry: &PageGeometry) -> (usize, usize) {
        let (width, height) = geometry.page_size_pt();
        let m = &geometry.margins;
        let char_width = self.font.text_width("M", self.font_size);
        let columns = ((width - m.left - m.right) / char_width).floor().max(1.0) as usize;
        let rows = ((height - m.top - m.bottom) / self.leading)
            .floor()
            .max(1.0) as usize;
        (columns, rows)
    }

    /// Break blocks into pages of lines. Paragraphs are separated by a blank
    /// line unless they start a page. Always yields at least one page.
    pub fn paginate(&self, blocks: &[TextBlock], geometry: &PageGeometry) -> Vec<Vec<String>> {
        let (columns, rows) = self.capacity(geometry);
        let mut pages: Vec<Vec<String>> = Vec::new();
        let mut current: Vec<String> = Vec::new();

        for block in blocks {
            match block {
                TextBlock::PageBreak => {
                    if !current.is_empty() {
                        pages.push(std::mem::take(&mut current));
                    }
                }
                TextBlock::Paragraph(text) => {
                    if !current.is_empty() && current.len() < rows {
                        current.push(String::new());
                    }
                    for line in wrap(text, columns) {
                        if current.len() == rows {
                            pages.push(std::mem::take(&mut current));
                        }
                        current.push(line);
                    }
                }
            }
        }

        if !current.is_empty() || pages.is_empty() {
            pages.push(current);
        }
        pages
    }

    fn build_document(&self, pages: &[Vec<String>], geometry: &PageGeometry) -> Result<Document> {
        let (width, height) = geometry.page_size_pt();
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Font".to_vec())),
            ("Subtype", Object::Name(b"Type1".to_vec())),
            ("BaseFont", Object::Name(self.font.base_font().as_bytes().to_vec())),
            ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
        ]));

        let mut kids = Vec::with_capacity(pages.len());
        for lines in pages {
            let content = self.page_content(lines, geometry)?;
            let content_id = doc.add_object(Stream::new(Dictionary::new(), content));

            let mut fonts = Dictionary::new();
            fonts.set("F1", Object::Reference(font_id));
            let mut resources = Dictionary::new();
            resources.set("Font", Object::Dictionary(fonts));

            let page_id = doc.add_object(Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(pages_id)),
                (
                    "MediaBox",
                    Object::Array(vec![
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Real(width),
                        Object::Real(height),
                    ]),
                ),
                ("Resources", Object::Dictionary(resources)),
                ("Contents", Object::Reference(content_id)),
            ]));
            kids.push(Object::Reference(page_id));
        }

        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(kids.len() as i64)),
            ("Kids", Object::Array(kids)),
        ]);
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        doc.trailer.set("Root", catalog_id);

        Ok(doc)
    }

    fn page_content(&self, lines: &[String], geometry: &PageGeometry) -> Result<Vec<u8>> {
        let (_, height) = geometry.page_size_pt();
        let m = &geometry.margins;
        let first_baseline = height - m.top - self.font_size;

        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(b"F1".to_vec()), self.font_size.into()],
            ),
            Operation::new("TL", vec![self.leading.into()]),
            Operation::new("Td", vec![m.left.into(), first_baseline.into()]),
        ];
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                operations.push(Operation::new("T*", vec![]));
            }
            if !line.is_empty() {
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::String(encode_win_ansi(line), StringFormat::Literal)],
                ));
            }
        }
        operations.push(Operation::new("ET", vec![]));

        Ok(Content { operations }.encode()?)
    }
}

/// Greedy word wrap; words longer than a line are split
fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > columns {
            if line_len > 0 {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            let rest = word.split_off(columns);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if line_len == 0 { word.len() } else { line_len + 1 + word.len() };
        if needed > columns {
            lines.push(std::mem::take(&mut line));
            line_len = 0;
        }
        if line_len > 0 {
            line.push(' ');
            line_len += 1;
        }
        line.extend(word.iter());
        line_len += word.len();
    }

    if line_len > 0 {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> PageGeometry {
        PageGeometry {
            paper: PaperSize::A4,
            margins: Margins::uniform(56.7),
            css_margins: ["2cm", "2cm", "2cm", "2cm"].map(String::from),
        }
    }

    #[test]
    fn wrap_respects_column_limit() {
        let lines = wrap("alpha beta gamma delta", 11);
        assert_eq!(lines, ["alpha beta", "gamma delta"]);
        let lines = wrap("abcdefghij xy", 4);
        assert_eq!(lines, ["abcd", "efgh", "ij", "xy"]);
    }

    #[test]
    fn forced_breaks_start_new_pages() {
        let renderer = TextRenderer::default();
        let blocks = vec![
            TextBlock::Paragraph("one".into()),
            TextBlock::PageBreak,
            TextBlock::Paragraph("two".into()),
            TextBlock::Paragraph("three".into()),
        ];
        let pages = renderer.paginate(&blocks, &geometry());
        assert_eq!(pages, vec![vec!["one"], vec!["two", "", "three"]]);
    }

    #[test]
    fn overflow_spills_to_next_page() {
        let renderer = TextRenderer::default();
        let (_, rows) = renderer.capacity(&geometry());
        let blocks: Vec<_> = (0..rows)
            .map(|i| TextBlock::Paragraph(format!("line{}", i)))
            .collect();
        // every paragraph but the first costs two rows
        let pages = renderer.paginate(&blocks, &geometry());
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].len(), rows);
    }

    #[test]
    fn empty_source_still_yields_a_page() {
        let renderer = TextRenderer::default();
        let rendered = renderer.render_blocks(&[], &geometry()).unwrap();
        assert_eq!(rendered.page_count(), 1);
        assert_eq!(rendered.page_text, vec![String::new()]);
    }
}
