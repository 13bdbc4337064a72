//! HTML source document of the manual
//!
//! The document is kept as serialized HTML and parsed on demand, so it can be
//! shared with render tasks across threads. Table-of-contents page numbers
//! live in elements addressed by id (`toc-pn-{section id}`); injection only
//! ever replaces the text of those elements.

use crate::types::Result;
use kuchiki::iter::NodeIterator;
use kuchiki::traits::TendrilSink;
use kuchiki::{ElementData, NodeData, NodeDataRef, NodeRef};
use std::path::{Path, PathBuf};

/// Elements that never contribute body text
const SKIPPED_TAGS: &[&str] = &["head", "script", "style", "template", "noscript"];

/// Elements that start and end a line of text
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "tr", "ul",
];

#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    html: String,
    /// Directory relative asset URLs resolve against
    base_dir: Option<PathBuf>,
}

/// Flattened body text, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextBlock {
    /// Whitespace-collapsed text of one block element
    Paragraph(String),
    /// Forced page break
    PageBreak,
}

impl SourceDocument {
    pub fn from_html(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            base_dir: None,
        }
    }

    /// Load an HTML file; relative URLs keep resolving against its directory
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let html = tokio::fs::read_to_string(path).await?;
        let base_dir = tokio::fs::canonicalize(path)
            .await
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf));
        Ok(Self { html, base_dir })
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// Replace the text of each element whose id matches. Returns the ids
    /// that were not found; the document is left untouched for those.
    pub fn set_texts_by_id(&mut self, updates: &[(String, String)]) -> Vec<String> {
        if updates.is_empty() {
            return Vec::new();
        }

        let document = kuchiki::parse_html().one(self.html.as_str());
        let mut missing = Vec::new();

        for (id, text) in updates {
            match find_by_id(&document, id) {
                Some(element) => replace_text(element.as_node(), text),
                None => missing.push(id.clone()),
            }
        }

        if missing.len() < updates.len() {
            self.html = document.to_string();
        }
        missing
    }

    /// Current text of the element with the given id
    pub fn text_by_id(&self, id: &str) -> Option<String> {
        let document = kuchiki::parse_html().one(self.html.as_str());
        find_by_id(&document, id).map(|element| element.as_node().text_contents())
    }

    /// Serialized HTML with an extra `<style>` rule (and a `<base>` pointing at
    /// the source directory when known) appended to the head
    pub fn with_page_rule(&self, rule: &str) -> String {
        let document = kuchiki::parse_html().one(self.html.as_str());

        if let Ok(head) = document.select_first("head") {
            let head = head.as_node();

            if let Some(dir) = &self.base_dir {
                if document.select_first("base").is_err() {
                    let href = format!("file://{}/", dir.display());
                    let base = kuchiki::parse_html()
                        .one(format!("<base href=\"{}\">", href).as_str());
                    if let Ok(tag) = base.select_first("base") {
                        let tag = tag.as_node().clone();
                        tag.detach();
                        head.prepend(tag);
                    }
                }
            }

            let style = kuchiki::parse_html().one(format!("<style>{}</style>", rule).as_str());
            if let Ok(tag) = style.select_first("style") {
                let tag = tag.as_node().clone();
                tag.detach();
                head.append(tag);
            }
        }

        document.to_string()
    }

    /// Body text split into blocks and forced page breaks
    pub fn text_blocks(&self) -> Vec<TextBlock> {
        let document = kuchiki::parse_html().one(self.html.as_str());
        let mut collector = BlockCollector::default();
        collector.walk(&document);
        collector.flush();
        collector.blocks
    }
}

fn find_by_id(document: &NodeRef, id: &str) -> Option<NodeDataRef<ElementData>> {
    document
        .descendants()
        .elements()
        .find(|element| element.attributes.borrow().get("id") == Some(id))
}

fn replace_text(node: &NodeRef, text: &str) {
    let children: Vec<NodeRef> = node.children().collect();
    for child in children {
        child.detach();
    }
    node.append(NodeRef::new_text(text));
}

#[derive(Default)]
struct BlockCollector {
    blocks: Vec<TextBlock>,
    current: String,
}

impl BlockCollector {
    fn walk(&mut self, node: &NodeRef) {
        match node.data() {
            NodeData::Text(text) => self.current.push_str(&text.borrow()),
            NodeData::Element(element) => {
                let tag = element.name.local.as_ref().to_ascii_lowercase();
                if SKIPPED_TAGS.contains(&tag.as_str()) {
                    return;
                }

                let (break_before, break_after) = page_breaks(element);
                let block = BLOCK_TAGS.contains(&tag.as_str());

                if break_before {
                    self.page_break();
                } else if block {
                    self.flush();
                }

                for child in node.children() {
                    self.walk(&child);
                }

                if break_after {
                    self.page_break();
                } else if block {
                    self.flush();
                }
            }
            _ => {
                for child in node.children() {
                    self.walk(&child);
                }
            }
        }
    }

    fn flush(&mut self) {
        let text = self.current.split_whitespace().collect::<Vec<_>>().join(" ");
        if !text.is_empty() {
            self.blocks.push(TextBlock::Paragraph(text));
        }
        self.current.clear();
    }

    fn page_break(&mut self) {
        self.flush();
        // a break at the very top, or right after another break, adds nothing
        if matches!(self.blocks.last(), Some(TextBlock::Paragraph(_))) {
            self.blocks.push(TextBlock::PageBreak);
        }
    }
}

/// Whether the element forces a page break before and/or after itself
fn page_breaks(element: &ElementData) -> (bool, bool) {
    let attrs = element.attributes.borrow();

    let class_break = attrs
        .get("class")
        .map(|classes| classes.split_whitespace().any(|c| c == "page-break"))
        .unwrap_or(false);

    let style = attrs
        .get("style")
        .map(|s| s.to_ascii_lowercase().replace(' ', ""))
        .unwrap_or_default();
    let style_before =
        style.contains("page-break-before:always") || style.contains("break-before:page");
    let style_after =
        style.contains("page-break-after:always") || style.contains("break-after:page");

    (class_break || style_before, style_after)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOC: &str = r#"<html><head><title>t</title></head><body>
        <ol>
          <li>Init <span id="toc-pn-01">--</span></li>
          <li>Kernel <span id="toc-pn-02">--</span></li>
        </ol>
        </body></html>"#;

    #[test]
    fn set_texts_replaces_only_addressed_nodes() {
        let mut doc = SourceDocument::from_html(TOC);
        let missing = doc.set_texts_by_id(&[("toc-pn-01".to_string(), "3".to_string())]);
        assert!(missing.is_empty());
        assert_eq!(doc.text_by_id("toc-pn-01").as_deref(), Some("3"));
        assert_eq!(doc.text_by_id("toc-pn-02").as_deref(), Some("--"));
    }

    #[test]
    fn missing_ids_are_reported() {
        let mut doc = SourceDocument::from_html(TOC);
        let missing = doc.set_texts_by_id(&[("toc-pn-zz".to_string(), "9".to_string())]);
        assert_eq!(missing, ["toc-pn-zz"]);
        assert_eq!(doc.html(), TOC);
    }

    #[test]
    fn page_rule_lands_in_head() {
        let doc = SourceDocument::from_html(TOC);
        let html = doc.with_page_rule("@page { size: A4; }");
        let head_end = html.find("</head>").unwrap();
        let rule = html.find("@page { size: A4; }").unwrap();
        assert!(rule < head_end);
    }

    #[test]
    fn blocks_follow_document_order_and_breaks() {
        let doc = SourceDocument::from_html(
            r#"<html><head><style>p { color: red }</style></head><body>
            <div class="page-break"></div>
            <h1>Title</h1>
            <p>First   <b>bold</b> para</p>
            <section class="chapter page-break"><p>Chapter FWMARK-01-INIT.SYS</p></section>
            <p style="page-break-after: always">End</p>
            </body></html>"#,
        );
        assert_eq!(
            doc.text_blocks(),
            vec![
                TextBlock::Paragraph("Title".into()),
                TextBlock::Paragraph("First bold para".into()),
                TextBlock::PageBreak,
                TextBlock::Paragraph("Chapter FWMARK-01-INIT.SYS".into()),
                TextBlock::Paragraph("End".into()),
                TextBlock::PageBreak,
            ]
        );
    }
}
