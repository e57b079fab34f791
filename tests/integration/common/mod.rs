//! Shared fixtures for the integration tests.
//!
//! Fixtures are generated into a temporary directory so the tests carry no
//! binary files.

#![allow(dead_code)]

use image::{ImageFormat, Rgb, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write a PDF with one Letter page per label, each showing its label.
pub fn write_pdf(dir: &TempDir, name: &str, labels: &[&str]) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for label in labels {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*label)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => labels.len() as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }
        .into(),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);

    let path = dir.path().join(name);
    doc.save(&path).expect("save fixture PDF");
    path
}

/// Write a white PNG of the given pixel size.
pub fn write_png(dir: &TempDir, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.path().join(name);
    RgbImage::from_pixel(width, height, Rgb([255, 255, 255]))
        .save_with_format(&path, ImageFormat::Png)
        .expect("save fixture PNG");
    path
}

/// Write a file that is neither a PDF nor an image.
pub fn write_garbage(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, b"this is neither a pdf nor an image").expect("write garbage");
    path
}

/// Decoded content operations of every page, in page order.
pub fn page_operations(path: &Path) -> Vec<Vec<Operation>> {
    let doc = Document::load(path).expect("load output");
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let bytes = doc.get_page_content(page_id).expect("page content");
            Content::decode(&bytes).expect("decode content").operations
        })
        .collect()
}

/// Strings shown with `Tj` on each page, in page order.
pub fn shown_text(path: &Path) -> Vec<Vec<String>> {
    page_operations(path)
        .into_iter()
        .map(|operations| {
            operations
                .iter()
                .filter(|op| op.operator == "Tj")
                .filter_map(|op| match op.operands.first() {
                    Some(Object::String(bytes, _)) => Some(String::from_utf8_lossy(bytes).into_owned()),
                    _ => None,
                })
                .collect()
        })
        .collect()
}

/// Media boxes of every page, in page order.
pub fn media_boxes(path: &Path) -> Vec<[f32; 4]> {
    let doc = Document::load(path).expect("load output");
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let page = doc.get_dictionary(page_id).expect("page dictionary");
            let values = page
                .get(b"MediaBox")
                .and_then(Object::as_array)
                .expect("media box");
            let mut rect = [0.0; 4];
            for (slot, value) in rect.iter_mut().zip(values) {
                *slot = value.as_float().expect("numeric media box");
            }
            rect
        })
        .collect()
}

/// Set `key` on page `page_number` (1-based) of the PDF at `path`.
pub fn set_page_entry(path: &Path, page_number: u32, key: &str, value: Object) {
    let mut doc = Document::load(path).expect("load fixture");
    let page_id = doc.get_pages()[&page_number];
    doc.get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .expect("page dictionary")
        .set(key, value);
    doc.save(path).expect("save fixture");
}

/// A PDF rectangle array.
pub fn rect(values: [f32; 4]) -> Object {
    Object::Array(values.into_iter().map(Object::Real).collect())
}

/// Page dictionary entry `key` of page `page_number` (1-based), if present.
pub fn page_entry(path: &Path, page_number: u32, key: &[u8]) -> Option<Object> {
    let doc = Document::load(path).expect("load output");
    let page_id = doc.get_pages()[&page_number];
    doc.get_dictionary(page_id).ok()?.get(key).ok().cloned()
}

/// Text-position operands of the stamp on each page.
pub fn stamp_origins(path: &Path) -> Vec<(f32, f32)> {
    page_operations(path)
        .into_iter()
        .filter_map(|operations| {
            let td = operations.iter().find(|op| op.operator == "Td")?;
            Some((
                td.operands.first()?.as_float().ok()?,
                td.operands.get(1)?.as_float().ok()?,
            ))
        })
        .collect()
}
