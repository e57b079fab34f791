//! Integration tests for Bates numbering.

use batesmerge::assemble;
use lopdf::Object;
use tempfile::TempDir;

use crate::common::{
    media_boxes, page_entry, rect, set_page_entry, shown_text, stamp_origins, write_garbage,
    write_pdf, write_png,
};

#[tokio::test]
async fn test_counter_runs_across_inputs() {
    let temp_dir = TempDir::new().unwrap();
    let pdf = write_pdf(&temp_dir, "a.pdf", &["one", "two"]);
    let garbage = write_garbage(&temp_dir, "b.pdf");
    let image = write_png(&temp_dir, "c.png", 900, 1200);
    let output = temp_dir.path().join("out.pdf");

    let report = assemble(&[pdf, garbage, image], "EX-", 5, true, &output).unwrap();

    assert_eq!(report.pages_written, 3);
    assert_eq!(report.skipped_inputs.len(), 1);
    assert_eq!(report.first_stamp.as_deref(), Some("EX-000005"));
    assert_eq!(report.last_stamp.as_deref(), Some("EX-000007"));
    assert_eq!(report.next_number, 8);

    let text = shown_text(&output);
    assert_eq!(
        text,
        vec![
            vec!["EX-000005".to_string()],
            vec!["EX-000006".to_string()],
            vec!["EX-000007".to_string()],
        ]
    );
}

#[tokio::test]
async fn test_default_prefix_and_start() {
    let temp_dir = TempDir::new().unwrap();
    let pdf = write_pdf(&temp_dir, "a.pdf", &["only"]);
    let output = temp_dir.path().join("out.pdf");

    assemble(&[pdf], "BATES-", 1, true, &output).unwrap();
    assert_eq!(shown_text(&output), vec![vec!["BATES-000001".to_string()]]);
}

#[tokio::test]
async fn test_wide_counter_is_not_truncated() {
    let temp_dir = TempDir::new().unwrap();
    let pdf = write_pdf(&temp_dir, "a.pdf", &["only"]);
    let output = temp_dir.path().join("out.pdf");

    assemble(&[pdf], "", 1_234_567, true, &output).unwrap();
    assert_eq!(shown_text(&output), vec![vec!["1234567".to_string()]]);
}

#[tokio::test]
async fn test_no_stamp_leaves_counter_alone() {
    let temp_dir = TempDir::new().unwrap();
    let pdf = write_pdf(&temp_dir, "a.pdf", &["one", "two"]);
    let output = temp_dir.path().join("out.pdf");

    let report = assemble(&[pdf], "EX-", 5, false, &output).unwrap();
    assert_eq!(report.first_stamp, None);
    assert_eq!(report.last_stamp, None);
    assert_eq!(report.next_number, 5);
}

#[tokio::test]
async fn test_broken_page_keeps_numbers_contiguous() {
    let temp_dir = TempDir::new().unwrap();
    let pdf = write_pdf(&temp_dir, "a.pdf", &["one", "two", "three"]);
    set_page_entry(&pdf, 2, "MediaBox", rect([0.0, 0.0, 0.0, 0.0]));
    let output = temp_dir.path().join("out.pdf");

    let report = assemble(&[pdf.clone()], "EX-", 5, true, &output).unwrap();

    assert_eq!(report.pages_written, 2);
    assert!(report.skipped_inputs.is_empty());
    assert_eq!(report.skipped_pages.len(), 1);
    assert_eq!(report.skipped_pages[0].path, pdf);
    assert_eq!(report.skipped_pages[0].page, 2);
    assert_eq!(
        shown_text(&output),
        vec![vec!["EX-000005".to_string()], vec!["EX-000006".to_string()]]
    );
    assert_eq!(report.next_number, 7);
}

#[tokio::test]
async fn test_cropped_page_shows_the_stamp() {
    let temp_dir = TempDir::new().unwrap();
    let pdf = write_pdf(&temp_dir, "a.pdf", &["cropped"]);
    set_page_entry(&pdf, 1, "CropBox", rect([72.0, 72.0, 540.0, 720.0]));
    let output = temp_dir.path().join("out.pdf");

    assemble(&[pdf], "EX-", 5, true, &output).unwrap();

    // The visible area is the whole media box, which holds the stamp.
    assert!(page_entry(&output, 1, b"CropBox").is_none());
    assert_eq!(media_boxes(&output), vec![[0.0, 0.0, 612.0, 792.0]]);
    let (x, y) = stamp_origins(&output)[0];
    assert!(x > 500.0 && x < 612.0);
    assert_eq!(y, 20.0);
}

#[tokio::test]
async fn test_rotated_page_stamped_at_visual_bottom_right() {
    let temp_dir = TempDir::new().unwrap();
    let pdf = write_pdf(&temp_dir, "a.pdf", &["landscape"]);
    set_page_entry(&pdf, 1, "Rotate", Object::Integer(90));
    let output = temp_dir.path().join("out.pdf");

    assemble(&[pdf], "EX-", 5, true, &output).unwrap();

    assert!(page_entry(&output, 1, b"Rotate").is_none());
    assert_eq!(media_boxes(&output), vec![[0.0, 0.0, 792.0, 612.0]]);
    let (x, y) = stamp_origins(&output)[0];
    assert!(x > 680.0 && x < 792.0);
    assert_eq!(y, 20.0);
    assert_eq!(shown_text(&output), vec![vec!["EX-000005".to_string()]]);
}
