#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream};
use pdf_paginate::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn create_test_pdf(num_pages: usize) -> Document {
    let mut doc = Document::with_version("1.7");

    // Create page tree root ID
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for _ in 0..num_pages {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), b"q Q".to_vec()));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(num_pages as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));

    doc.trailer.set("Root", catalog_id);

    doc
}

/// One-page document drawing `operations` with Courier (WinAnsi) as `/F1`
pub fn pdf_with_content(operations: Vec<Operation>) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Courier".to_vec())),
        ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
    ]));
    let mut fonts = Dictionary::new();
    fonts.set("F1", Object::Reference(font_id));
    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(fonts));

    let content = Content { operations }.encode().unwrap();
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content));
    let page_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ]),
        ),
        ("Resources", Object::Dictionary(resources)),
        ("Contents", Object::Reference(content_id)),
    ]));

    doc.objects.insert(
        pages_id,
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(vec![Object::Reference(page_id)])),
            ("Count", Object::Integer(1)),
        ])),
    );
    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);
    doc
}

/// Operator counts over every content stream of a page
pub fn count_operators(doc: &Document, page_number: u32, operator: &str) -> usize {
    let pages = doc.get_pages();
    let page_id = pages[&page_number];
    let page = doc.get_dictionary(page_id).unwrap();
    let refs = match page.get(b"Contents").unwrap() {
        Object::Array(items) => items.clone(),
        other => vec![other.clone()],
    };
    refs.iter()
        .map(|obj| {
            let id = obj.as_reference().unwrap();
            let stream = doc.get_object(id).unwrap().as_stream().unwrap();
            let content = Content::decode(&stream.content).unwrap();
            content
                .operations
                .iter()
                .filter(|op| op.operator == operator)
                .count()
        })
        .sum()
}

pub fn layout() -> Arc<PageLayout> {
    Arc::new(LayoutConfig::default().resolve().unwrap())
}

/// The ten-page manual: TOC on page 1, INIT.SYS from page 3, KERNEL from page 7
pub fn manual_page_texts() -> Vec<String> {
    (1..=10)
        .map(|page| match page {
            1 => "FWMARK-TOC Contents".to_string(),
            3 => "FWMARK-01-INIT.SYS Booting".to_string(),
            7 => "Chapter two FWMARK-02-KERNEL".to_string(),
            n => format!("body text of page {}", n),
        })
        .collect()
}

/// Renderer returning fixed page texts; adds pages once a placeholder has
/// been filled in, to simulate layout drift
pub struct ScriptedRenderer {
    pub pages: Vec<String>,
    pub extra_pages_after_injection: usize,
    pub delay: Option<Duration>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl ScriptedRenderer {
    pub fn new(pages: Vec<String>) -> Self {
        Self {
            pages,
            extra_pages_after_injection: 0,
            delay: None,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Renderer for &ScriptedRenderer {
    async fn render(
        &self,
        source: &SourceDocument,
        _geometry: &PageGeometry,
    ) -> pdf_paginate::Result<RenderedDocument> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(PaginateError::Render("navigation failed".to_string()));
        }

        let mut page_text = self.pages.clone();
        let injected = source
            .text_by_id("toc-pn-01")
            .is_some_and(|text| text != "--");
        if injected {
            page_text.extend(
                (0..self.extra_pages_after_injection).map(|i| format!("overflow {}", i)),
            );
        }

        Ok(RenderedDocument {
            document: create_test_pdf(page_text.len()),
            page_text,
        })
    }
}

pub const TOC_HTML: &str = r#"<html><head><title>Manual</title></head><body>
<ol>
  <li>Init <span id="toc-pn-01">--</span></li>
  <li>Kernel <span id="toc-pn-02">--</span></li>
</ol>
</body></html>"#;
