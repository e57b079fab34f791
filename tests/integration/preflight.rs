//! Integration tests for input classification and the pre-flight check.

use batesmerge::validation::Preflight;
use batesmerge::{SourceClassifier, SourceKind, is_supported};
use std::path::PathBuf;
use tempfile::TempDir;

use crate::common::{write_garbage, write_pdf, write_png};

#[test]
fn test_classification() {
    let temp_dir = TempDir::new().unwrap();
    let pdf = write_pdf(&temp_dir, "a.pdf", &["x"]);
    let image = write_png(&temp_dir, "b.png", 10, 10);
    let garbage = write_garbage(&temp_dir, "c.pdf");

    assert_eq!(SourceClassifier::classify(&pdf), SourceKind::Document);
    assert_eq!(SourceClassifier::classify(&image), SourceKind::Image);
    assert_eq!(SourceClassifier::classify(&garbage), SourceKind::Unsupported);
    assert!(!is_supported(&temp_dir.path().join("missing.pdf")));
}

#[test]
fn test_image_named_pdf_is_still_an_image() {
    let temp_dir = TempDir::new().unwrap();
    let image = write_png(&temp_dir, "scan.pdf", 10, 10);
    assert_eq!(SourceClassifier::classify(&image), SourceKind::Image);
}

#[test]
fn test_preflight_partition_and_total() {
    let temp_dir = TempDir::new().unwrap();
    let pdf = write_pdf(&temp_dir, "a.pdf", &["x"]);
    let garbage = write_garbage(&temp_dir, "notes.txt");
    let image = write_png(&temp_dir, "b.png", 10, 10);
    let missing = PathBuf::from("/nonexistent/missing.pdf");

    let preflight = Preflight::run(&[pdf.clone(), garbage.clone(), image.clone(), missing.clone()]);

    assert_eq!(preflight.supported_paths(), vec![pdf.clone(), image.clone()]);
    assert_eq!(preflight.unsupported, vec![garbage, missing]);
    assert_eq!(preflight.first_supported(), Some(pdf.as_path()));

    let expected = std::fs::metadata(&pdf).unwrap().len() + std::fs::metadata(&image).unwrap().len();
    assert_eq!(preflight.total_bytes, expected);
    assert!(preflight.exceeds(expected - 1));
    assert!(!preflight.exceeds(expected));
}
