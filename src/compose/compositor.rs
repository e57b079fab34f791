//! Per-page compositing.
//!
//! [`PageCompositor::composite`] turns one [`PageSource`] into a standalone
//! [`Page`]: it sizes the canvas, redraws the source into a fresh content
//! stream, overlays the stamp when one is given, and round-trips the result
//! through serialization so the returned page is self-contained.
//!
//! Stamped document pages keep their original content by wrapping it into a
//! Form XObject. The form is painted over the full media box, turned upright
//! when the page carries a `/Rotate`, and the crop, bleed, trim and art boxes
//! are dropped so the whole media box, stamp included, is visible. Unstamped
//! pages pass through untouched. Images are embedded as image XObjects
//! stretched over the whole canvas.

use image::{DynamicImage, GenericImageView};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use tracing::debug;

use super::canvas::{Canvas, Rotation, transform_point};
use super::extract::{IsolatedPage, isolate_page, rectangle};
use super::stamp::{FONT_RESOURCE, StampLayout, font_dictionary};
use crate::error::{BatesError, Result};
use crate::io::LoadedImage;

/// Resource name of the wrapped original content.
const SOURCE_FORM_RESOURCE: &str = "BatesSrc";

/// Resource name of an embedded raster.
const IMAGE_RESOURCE: &str = "BatesImg";

/// Page boxes narrower than the media box; dropped from stamped pages.
const VIEW_BOXES: [&[u8]; 4] = [b"CropBox", b"BleedBox", b"TrimBox", b"ArtBox"];

/// One logical page waiting to be composited.
#[derive(Debug, Clone, Copy)]
pub enum PageSource<'a> {
    /// Page `index` (zero-based) of a loaded PDF.
    Document {
        /// The source document.
        document: &'a Document,
        /// Zero-based page index.
        index: usize,
    },
    /// A decoded raster image.
    Image {
        /// The decoded frame.
        image: &'a DynamicImage,
        /// Pixel dimensions from the file header, when known.
        pixel_dimensions: Option<(u32, u32)>,
    },
}

impl<'a> PageSource<'a> {
    /// Page source for a loaded image.
    pub fn from_image(loaded: &'a LoadedImage) -> Self {
        Self::Image {
            image: &loaded.image,
            pixel_dimensions: loaded.pixel_dimensions,
        }
    }
}

/// A composited page, held as a self-contained one-page document.
#[derive(Debug)]
pub struct Page {
    document: Document,
}

impl Page {
    /// Serialize `document` and parse it back.
    ///
    /// Anything that cannot survive a save/load cycle fails here rather than
    /// when the combined output is written.
    fn from_document(mut document: Document) -> Result<Self> {
        let mut bytes = Vec::new();
        document
            .save_to(&mut bytes)
            .map_err(|e| BatesError::composite_failed(format!("failed to serialize page: {e}")))?;
        let document = Document::load_mem(&bytes)
            .map_err(|e| BatesError::composite_failed(format!("failed to reload page: {e}")))?;

        if document.get_pages().len() != 1 {
            return Err(BatesError::composite_failed(
                "composited document does not hold exactly one page",
            ));
        }
        Ok(Self { document })
    }

    /// The backing one-page document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Give up the backing document.
    pub fn into_document(self) -> Document {
        self.document
    }

    /// Id of the page object inside [`document`](Self::document).
    pub fn page_id(&self) -> Option<ObjectId> {
        self.document.get_pages().into_values().next()
    }

    /// Media box of the page.
    pub fn media_box(&self) -> Option<[f32; 4]> {
        let page = self.document.get_dictionary(self.page_id()?).ok()?;
        rectangle(&self.document, page.get(b"MediaBox").ok()?)
    }
}

/// Builds standalone pages from page sources.
#[derive(Debug, Clone, Default)]
pub struct PageCompositor;

impl PageCompositor {
    /// Create a compositor.
    pub fn new() -> Self {
        Self
    }

    /// Composite one page, overlaying `stamp` when given.
    ///
    /// # Errors
    ///
    /// Returns a page-level error (see [`BatesError::is_page_level`]) when
    /// the canvas is empty or the page cannot be rebuilt. The caller is
    /// expected to skip the page.
    pub fn composite(&self, source: PageSource<'_>, stamp: Option<&str>) -> Result<Page> {
        match source {
            PageSource::Document { document, index } => {
                self.composite_document_page(document, index, stamp)
            }
            PageSource::Image {
                image,
                pixel_dimensions,
            } => self.composite_image(image, pixel_dimensions, stamp),
        }
    }

    fn composite_document_page(
        &self,
        document: &Document,
        index: usize,
        stamp: Option<&str>,
    ) -> Result<Page> {
        let IsolatedPage {
            document: mut page_doc,
            page_id,
            media_box,
            rotation,
        } = isolate_page(document, index)?;
        let canvas = Canvas::from_media_box(media_box)?;

        // Without a stamp the isolated page already is the result.
        let Some(text) = stamp else {
            debug!(page = index + 1, "passing page through");
            return Page::from_document(page_doc);
        };

        // The stamped page shows the whole media box, turned the way a viewer
        // would turn it, so the stamp lands in the visible bottom-right corner.
        let upright = canvas.rotated(rotation);
        let matrix = canvas.rotation_matrix(rotation);

        let original = page_doc.get_page_content(page_id)?;
        let original_resources = page_doc.get_dictionary(page_id)?.get(b"Resources").ok().cloned();

        let mut form_dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "FormType" => 1,
            "BBox" => canvas.to_media_box(),
        };
        if let Some(resources) = original_resources {
            form_dict.set("Resources", resources);
        }
        let form_id = page_doc.add_object(Stream::new(form_dict, original));
        let font_id = page_doc.add_object(font_dictionary());

        let mut operations = vec![Operation::new("q", vec![])];
        if rotation != Rotation::None {
            operations.push(Operation::new(
                "cm",
                matrix.iter().map(|&v| Object::Real(v)).collect(),
            ));
            move_annotations(&mut page_doc, page_id, matrix)?;
        }
        operations.extend([
            Operation::new("Do", vec![SOURCE_FORM_RESOURCE.into()]),
            Operation::new("Q", vec![]),
        ]);
        operations.extend(StampLayout::new(text, &upright).operations());
        let content_id = add_content(&mut page_doc, operations)?;

        let page = page_doc
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)?;
        for key in VIEW_BOXES {
            page.remove(key);
        }
        page.remove(b"Rotate");
        page.set("MediaBox", upright.to_media_box());
        page.set("Contents", content_id);
        page.set(
            "Resources",
            dictionary! {
                "XObject" => dictionary! { SOURCE_FORM_RESOURCE => form_id },
                "Font" => dictionary! { FONT_RESOURCE => font_id },
            },
        );

        // The replaced content streams are no longer reachable.
        page_doc.prune_objects();

        debug!(page = index + 1, stamp = text, ?rotation, "stamped document page");
        Page::from_document(page_doc)
    }

    fn composite_image(
        &self,
        image: &DynamicImage,
        pixel_dimensions: Option<(u32, u32)>,
        stamp: Option<&str>,
    ) -> Result<Page> {
        let (px_wide, px_high) = image.dimensions();
        let canvas = Canvas::for_image(pixel_dimensions, (px_wide as f32, px_high as f32))?;

        let mut doc = Document::with_version("1.5");
        let xobject = image_xobject(&mut doc, image);
        let image_id = doc.add_object(xobject);

        let mut operations = vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    canvas.width.into(),
                    0.into(),
                    0.into(),
                    canvas.height.into(),
                    canvas.x.into(),
                    canvas.y.into(),
                ],
            ),
            Operation::new("Do", vec![IMAGE_RESOURCE.into()]),
            Operation::new("Q", vec![]),
        ];

        let mut resources = dictionary! {
            "XObject" => dictionary! { IMAGE_RESOURCE => image_id },
        };
        if let Some(text) = stamp {
            let font_id = doc.add_object(font_dictionary());
            resources.set("Font", dictionary! { FONT_RESOURCE => font_id });
            operations.extend(StampLayout::new(text, &canvas).operations());
        }
        let content_id = add_content(&mut doc, operations)?;

        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => canvas.to_media_box(),
            "Resources" => resources,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }
            .into(),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        debug!(
            width = canvas.width,
            height = canvas.height,
            stamped = stamp.is_some(),
            "composited image page"
        );
        Page::from_document(doc)
    }
}

/// Carry the page's annotation rectangles through `matrix`.
fn move_annotations(doc: &mut Document, page_id: ObjectId, matrix: [f32; 6]) -> Result<()> {
    let annots = match doc.get_dictionary(page_id)?.get(b"Annots") {
        Ok(Object::Array(items)) => items.clone(),
        Ok(Object::Reference(id)) => doc
            .get_object(*id)
            .and_then(Object::as_array)
            .cloned()
            .unwrap_or_default(),
        _ => return Ok(()),
    };

    for annot_id in annots.iter().filter_map(|item| item.as_reference().ok()) {
        let Some([x0, y0, x1, y1]) = doc
            .get_dictionary(annot_id)
            .ok()
            .and_then(|annot| annot.get(b"Rect").ok())
            .and_then(|rect| rectangle(doc, rect))
        else {
            continue;
        };

        let (ax, ay) = transform_point(matrix, x0, y0);
        let (bx, by) = transform_point(matrix, x1, y1);
        let moved: Vec<Object> = [ax.min(bx), ay.min(by), ax.max(bx), ay.max(by)]
            .into_iter()
            .map(Object::Real)
            .collect();
        if let Ok(annot) = doc.get_object_mut(annot_id).and_then(Object::as_dict_mut) {
            annot.set("Rect", moved);
        }
    }
    Ok(())
}

/// Encode `operations` into a new content stream object.
fn add_content(doc: &mut Document, operations: Vec<Operation>) -> Result<ObjectId> {
    let bytes = Content { operations }
        .encode()
        .map_err(|e| BatesError::composite_failed(format!("failed to encode content: {e}")))?;
    Ok(doc.add_object(Stream::new(Dictionary::new(), bytes)))
}

/// Build an 8-bit image XObject for `image`.
///
/// Grey images stay single-channel; an alpha channel becomes a soft mask
/// added to `doc`.
fn image_xobject(doc: &mut Document, image: &DynamicImage) -> Stream {
    let (width, height) = image.dimensions();
    let color = image.color();

    let (color_space, samples, alpha) = if color.has_alpha() {
        let rgba = image.to_rgba8();
        let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
        let mut alpha = Vec::with_capacity(rgba.len() / 4);
        for pixel in rgba.pixels() {
            rgb.extend_from_slice(&pixel.0[..3]);
            alpha.push(pixel.0[3]);
        }
        ("DeviceRGB", rgb, Some(alpha))
    } else if color.has_color() {
        ("DeviceRGB", image.to_rgb8().into_raw(), None)
    } else {
        ("DeviceGray", image.to_luma8().into_raw(), None)
    };

    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => i64::from(width),
        "Height" => i64::from(height),
        "ColorSpace" => color_space,
        "BitsPerComponent" => 8,
    };

    if let Some(alpha) = alpha {
        let mask_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(width),
                "Height" => i64::from(height),
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            alpha,
        ));
        dict.set("SMask", mask_id);
    }

    Stream::new(dict, samples)
}
