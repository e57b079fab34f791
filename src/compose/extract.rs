//! Single-page isolation.
//!
//! A page is lifted out of its source document into a standalone one-page
//! document: the page dictionary and every object it reaches are copied
//! under their original ids, attributes inherited through the page tree are
//! written onto the page itself, and references that would leave the page
//! (other pages, the source page tree) are cut.

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};

use super::canvas::{DEFAULT_MEDIA_BOX, Rotation};
use crate::error::{BatesError, Result};
use crate::utils::{copy_references, null_dangling_references};

/// Page attributes that may be inherited from an ancestor `Pages` node.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Guard against cyclic `Parent` chains in malformed files.
const MAX_TREE_DEPTH: usize = 64;

/// A page lifted out of its source document.
#[derive(Debug)]
pub struct IsolatedPage {
    /// One-page document holding the page and everything it references.
    pub document: Document,
    /// Id of the page inside `document`.
    pub page_id: ObjectId,
    /// Effective media box, `[llx lly urx ury]`.
    pub media_box: [f32; 4],
    /// Effective `/Rotate`.
    pub rotation: Rotation,
}

/// Copy page `index` (zero-based) of `source` into its own document.
///
/// # Errors
///
/// Fails if the index is out of range or the page object is not a
/// dictionary.
pub fn isolate_page(source: &Document, index: usize) -> Result<IsolatedPage> {
    let page_id = source
        .get_pages()
        .into_values()
        .nth(index)
        .ok_or_else(|| BatesError::composite_failed(format!("page {} does not exist", index + 1)))?;

    let mut page = source.get_dictionary(page_id)?.clone();
    for key in INHERITABLE_KEYS {
        if !page.has(key)
            && let Some(value) = find_inherited(source, &page, key)
        {
            page.set(key, value);
        }
    }
    page.remove(b"Parent");

    let media_box = page
        .get(b"MediaBox")
        .ok()
        .and_then(|value| rectangle(source, value))
        .unwrap_or(DEFAULT_MEDIA_BOX);
    page.set(
        "MediaBox",
        media_box.iter().map(|&v| Object::Real(v)).collect::<Vec<_>>(),
    );

    let rotation = page
        .get(b"Rotate")
        .ok()
        .and_then(|value| {
            value
                .as_i64()
                .ok()
                .or_else(|| value.as_float().ok().map(|v| v as i64))
        })
        .map(Rotation::from_degrees)
        .unwrap_or_default();

    let mut document = Document::with_version(source.version.clone());
    document.max_id = source.max_id;

    let page_object = Object::Dictionary(page);
    document.objects.insert(page_id, page_object.clone());
    copy_references(&mut document, source, &page_object);

    let pages_id = document.new_object_id();
    document.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }
        .into(),
    );
    let catalog_id = document.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    document.trailer.set("Root", catalog_id);

    if let Ok(Object::Dictionary(page)) = document.get_object_mut(page_id) {
        page.set("Parent", pages_id);
    }
    null_dangling_references(&mut document);

    Ok(IsolatedPage {
        document,
        page_id,
        media_box,
        rotation,
    })
}

/// Walk up the `Parent` chain looking for `key`.
fn find_inherited(doc: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut node = parent_of(doc, page)?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        node = parent_of(doc, node)?;
    }
    None
}

fn parent_of<'a>(doc: &'a Document, node: &Dictionary) -> Option<&'a Dictionary> {
    let parent_id = node.get(b"Parent").ok()?.as_reference().ok()?;
    doc.get_dictionary(parent_id).ok()
}

/// Read a four-number rectangle, following one level of indirection.
pub(crate) fn rectangle(doc: &Document, value: &Object) -> Option<[f32; 4]> {
    let array = match value {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_array().ok()?,
        other => other.as_array().ok()?,
    };
    let numbers: Vec<f32> = array
        .iter()
        .map(|item| match item {
            Object::Reference(id) => doc.get_object(*id).ok()?.as_float().ok(),
            other => other.as_float().ok(),
        })
        .collect::<Option<_>>()?;

    match numbers.as_slice() {
        &[a, b, c, d] => Some([a, b, c, d]),
        _ => None,
    }
}
