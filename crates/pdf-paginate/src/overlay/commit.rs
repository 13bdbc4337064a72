//! Writing planned drawing operations into page content streams

use super::surface::DrawOp;
use crate::constants::{OVERLAY_FONT_NAME, OVERLAY_TAG_KEY};
use crate::io::encode_win_ansi;
use crate::types::*;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};

/// Parent chains deeper than this are treated as broken
const MAX_TREE_DEPTH: usize = 32;

/// Add the overlay font once per document
pub(crate) fn add_overlay_font(doc: &mut Document, font: MonoFont) -> ObjectId {
    doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(font.base_font().as_bytes().to_vec())),
        ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
    ]))
}

/// Whether the overlay already decorated this page
pub(crate) fn is_tagged(doc: &Document, page_id: ObjectId) -> Result<bool> {
    Ok(doc.get_dictionary(page_id)?.has(OVERLAY_TAG_KEY.as_bytes()))
}

/// Page size from the (possibly inherited) MediaBox
pub(crate) fn page_size(doc: &Document, page_id: ObjectId) -> Option<(f32, f32)> {
    let media_box = inherited(doc, page_id, b"MediaBox")?;
    let values: Vec<f32> = media_box
        .as_array()
        .ok()?
        .iter()
        .filter_map(|obj| match obj {
            Object::Integer(i) => Some(*i as f32),
            Object::Real(r) => Some(*r),
            _ => None,
        })
        .collect();
    match values.as_slice() {
        [llx, lly, urx, ury] => Some(((urx - llx).abs(), (ury - lly).abs())),
        _ => None,
    }
}

/// Append the operations to the page.
///
/// Existing content is bracketed by `q`/`Q` so whatever graphics state it
/// leaves behind cannot leak into the overlay; existing streams are kept
/// untouched and in order.
pub(crate) fn commit_page(
    doc: &mut Document,
    page_id: ObjectId,
    font_id: ObjectId,
    ops: &[DrawOp],
) -> Result<()> {
    let existing = content_refs(doc, page_id)?;
    let mut resources = resolved_resources(doc, page_id)?;

    let mut fonts = match resources.get(b"Font") {
        Ok(obj) => resolve_dictionary(doc, obj)?,
        Err(_) => Dictionary::new(),
    };
    fonts.set(OVERLAY_FONT_NAME, Object::Reference(font_id));
    resources.set("Font", Object::Dictionary(fonts));

    let save_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let overlay_id = doc.add_object(Stream::new(Dictionary::new(), encode_ops(ops)?));

    let mut contents = Vec::with_capacity(existing.len() + 2);
    contents.push(Object::Reference(save_id));
    contents.extend(existing);
    contents.push(Object::Reference(overlay_id));

    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    page.set("Contents", Object::Array(contents));
    page.set("Resources", Object::Dictionary(resources));
    page.set(OVERLAY_TAG_KEY, Object::Boolean(true));
    Ok(())
}

/// Encode operations as a content stream that first closes the `q` opened
/// before the original content
pub(crate) fn encode_ops(ops: &[DrawOp]) -> Result<Vec<u8>> {
    let mut operations = vec![Operation::new("Q", vec![]), Operation::new("q", vec![])];

    for op in ops {
        match op {
            DrawOp::Text {
                text,
                x,
                y,
                font_size,
                color,
            } => {
                operations.extend([
                    Operation::new("BT", vec![]),
                    Operation::new("rg", vec![color.r.into(), color.g.into(), color.b.into()]),
                    Operation::new(
                        "Tf",
                        vec![
                            Object::Name(OVERLAY_FONT_NAME.as_bytes().to_vec()),
                            (*font_size).into(),
                        ],
                    ),
                    Operation::new("Td", vec![(*x).into(), (*y).into()]),
                    Operation::new(
                        "Tj",
                        vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
                    ),
                    Operation::new("ET", vec![]),
                ]);
            }
            DrawOp::Rule {
                x1,
                x2,
                y,
                width,
                color,
            } => {
                operations.extend([
                    Operation::new("RG", vec![color.r.into(), color.g.into(), color.b.into()]),
                    Operation::new("w", vec![(*width).into()]),
                    Operation::new("m", vec![(*x1).into(), (*y).into()]),
                    Operation::new("l", vec![(*x2).into(), (*y).into()]),
                    Operation::new("S", vec![]),
                ]);
            }
        }
    }

    operations.push(Operation::new("Q", vec![]));
    Ok(Content { operations }.encode()?)
}

/// Existing content stream references of a page, in order
fn content_refs(doc: &Document, page_id: ObjectId) -> Result<Vec<Object>> {
    let page = doc.get_dictionary(page_id)?;
    let refs = match page.get(b"Contents") {
        Ok(Object::Reference(id)) => match doc.get_object(*id)? {
            Object::Array(items) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(Object::Array(items)) => items.clone(),
        _ => Vec::new(),
    };
    Ok(refs)
}

/// Owned copy of the page resources, inherited ones included
fn resolved_resources(doc: &Document, page_id: ObjectId) -> Result<Dictionary> {
    match inherited(doc, page_id, b"Resources") {
        Some(obj) => resolve_dictionary(doc, obj),
        None => Ok(Dictionary::new()),
    }
}

fn resolve_dictionary(doc: &Document, obj: &Object) -> Result<Dictionary> {
    match obj {
        Object::Dictionary(dict) => Ok(dict.clone()),
        Object::Reference(id) => Ok(doc.get_dictionary(*id)?.clone()),
        _ => Ok(Dictionary::new()),
    }
}

/// Look up an inheritable page attribute on the page or its ancestors
fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut current = page_id;
    for _ in 0..MAX_TREE_DEPTH {
        let dict = doc.get_dictionary(current).ok()?;
        if let Ok(value) = dict.get(key) {
            return match value {
                Object::Reference(id) => doc.get_object(*id).ok(),
                other => Some(other),
            };
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
    }
    None
}
