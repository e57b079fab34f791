//! The accumulating output document.

use lopdf::{Document, Object, ObjectId, dictionary};

use crate::compose::Page;
use crate::error::{BatesError, Result};

/// Value written to `/Producer` in the output's info dictionary.
pub const PRODUCER: &str = concat!("batesmerge ", env!("CARGO_PKG_VERSION"));

/// Target document that composited pages are appended to, in order.
///
/// Pages are never reordered or deduplicated. No creation or modification
/// date is recorded, so identical inputs give identical documents.
#[derive(Debug)]
pub struct OutputDocument {
    document: Document,
    pages_id: ObjectId,
    page_count: usize,
}

impl OutputDocument {
    /// An empty document with a catalog, an empty page tree and an info
    /// dictionary.
    pub fn new() -> Self {
        let mut document = Document::with_version("1.5");

        let pages_id = document.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => 0,
        });
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = document.add_object(dictionary! {
            "Producer" => Object::string_literal(PRODUCER),
        });
        document.trailer.set("Root", catalog_id);
        document.trailer.set("Info", info_id);

        Self {
            document,
            pages_id,
            page_count: 0,
        }
    }

    /// Append `page` after the pages already present.
    ///
    /// The page's objects are renumbered above the current maximum id; its
    /// own catalog and page tree are discarded and the page is hung under
    /// this document's page tree.
    pub fn append(&mut self, page: Page) -> Result<()> {
        let mut doc = page.into_document();
        doc.renumber_objects_with(self.document.max_id + 1);

        let page_id = doc
            .get_pages()
            .into_values()
            .next()
            .ok_or_else(|| BatesError::composite_failed("page document has no page"))?;
        let catalog_id = doc.trailer.get(b"Root").and_then(Object::as_reference).ok();
        let tree_id = doc
            .get_dictionary(page_id)
            .and_then(|page| page.get(b"Parent"))
            .and_then(Object::as_reference)
            .ok();

        let max_id = doc.max_id;
        for (id, object) in doc.objects {
            if Some(id) == catalog_id || Some(id) == tree_id {
                continue;
            }
            self.document.objects.insert(id, object);
        }
        self.document.max_id = self.document.max_id.max(max_id);

        let pages_id = self.pages_id;
        self.document
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)?
            .set("Parent", pages_id);

        let pages = self
            .document
            .get_object_mut(pages_id)
            .and_then(Object::as_dict_mut)?;
        match pages.get_mut(b"Kids") {
            Ok(Object::Array(kids)) => kids.push(Object::Reference(page_id)),
            _ => return Err(BatesError::other("output page tree has no Kids array")),
        }
        self.page_count += 1;
        pages.set("Count", self.page_count as i64);

        Ok(())
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Whether no page has been appended.
    pub fn is_empty(&self) -> bool {
        self.page_count == 0
    }

    /// The document built so far.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Give up the underlying document for writing.
    pub fn into_document(self) -> Document {
        self.document
    }
}

impl Default for OutputDocument {
    fn default() -> Self {
        Self::new()
    }
}
