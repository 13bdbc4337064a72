//! Document I/O and page text extraction

use crate::types::*;
use log::{debug, warn};
use lopdf::{Document, Encoding, Object, ObjectId};
use std::collections::BTreeMap;
use std::path::Path;

/// Load a PDF document from disk
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<Document> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    load_pdf_bytes(bytes).await
}

/// Parse a PDF document held in memory
pub async fn load_pdf_bytes(bytes: Vec<u8>) -> Result<Document> {
    let doc = tokio::task::spawn_blocking(move || Document::load_mem(&bytes)).await??;
    Ok(doc)
}

/// Serialize a document to bytes
pub async fn pdf_to_bytes(mut doc: Document) -> Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || {
        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        Ok::<_, PaginateError>(writer)
    })
    .await?
}

/// Save a document to disk
pub async fn save_pdf(doc: Document, path: impl AsRef<Path>) -> Result<()> {
    let bytes = pdf_to_bytes(doc).await?;
    tokio::fs::write(path.as_ref(), bytes).await?;
    Ok(())
}

/// Plain text of every page, in page order.
///
/// Every line move inside a text object (`T*`, `Td`, `TD`, `Tm`, `'`, `"`)
/// and every `ET` becomes a line break, so a token that ends one line is
/// never glued to the first word of the next.
///
/// A page whose text cannot be decoded contributes an empty string, so it
/// can still be counted but never opens a section.
pub fn extract_page_texts(doc: &Document) -> Vec<String> {
    doc.get_pages()
        .into_iter()
        .map(|(number, page_id)| match page_text(doc, page_id) {
            Ok(text) => text,
            Err(e) => {
                warn!("Could not extract text from page {}: {}", number, e);
                String::new()
            }
        })
        .collect()
}

fn page_text(doc: &Document, page_id: ObjectId) -> lopdf::Result<String> {
    let encodings: BTreeMap<Vec<u8>, Encoding> = doc
        .get_page_fonts(page_id)?
        .into_iter()
        .filter_map(|(name, font)| match font.get_font_encoding(doc) {
            Ok(encoding) => Some((name, encoding)),
            Err(e) => {
                debug!("Skipping font {}: {}", String::from_utf8_lossy(&name), e);
                None
            }
        })
        .collect();
    let content = doc.get_and_decode_page_content(page_id)?;

    let mut text = String::new();
    let mut encoding: Option<&Encoding> = None;
    for op in &content.operations {
        match op.operator.as_str() {
            "Tf" => {
                encoding = op
                    .operands
                    .first()
                    .and_then(|name| name.as_name().ok())
                    .and_then(|name| encodings.get(name));
            }
            "T*" | "Td" | "TD" | "Tm" | "ET" => line_break(&mut text),
            "Tj" | "TJ" => push_strings(&mut text, encoding, &op.operands)?,
            "'" | "\"" => {
                line_break(&mut text);
                push_strings(&mut text, encoding, &op.operands)?;
            }
            _ => {}
        }
    }
    Ok(text)
}

fn line_break(text: &mut String) {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
}

/// Decode the string operands of a text-showing operator. Large negative
/// `TJ` adjustments are word gaps.
fn push_strings(
    text: &mut String,
    encoding: Option<&Encoding>,
    operands: &[Object],
) -> lopdf::Result<()> {
    for operand in operands {
        match operand {
            Object::String(bytes, _) => match encoding {
                Some(encoding) => text.push_str(&Document::decode_text(encoding, bytes)?),
                None => debug!("Text shown without a decodable font"),
            },
            Object::Array(items) => push_strings(text, encoding, items)?,
            Object::Integer(i) if *i < -100 => text.push(' '),
            Object::Real(r) if *r < -100.0 => text.push(' '),
            _ => {}
        }
    }
    Ok(())
}

/// Encode text for a simple font using WinAnsiEncoding.
///
/// Characters outside the encoding are replaced by `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            _ => b'?',
        })
        .collect()
}
