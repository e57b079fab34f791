//! Integration tests for combining documents and images.

use batesmerge::assemble;
use batesmerge::io::WriteOptions;
use batesmerge::{DocumentAssembler, StampOptions};
use lopdf::Document;
use tempfile::TempDir;

use crate::common::{media_boxes, page_operations, shown_text, write_pdf, write_png};

#[tokio::test]
async fn test_pages_keep_input_order() {
    let temp_dir = TempDir::new().unwrap();
    let first = write_pdf(&temp_dir, "first.pdf", &["one", "two"]);
    let second = write_pdf(&temp_dir, "second.pdf", &["three"]);
    let output = temp_dir.path().join("out.pdf");

    let report = assemble(&[first, second], "BATES-", 1, false, &output).unwrap();
    assert_eq!(report.pages_written, 3);
    assert_eq!(report.inputs_processed, 2);

    let text = shown_text(&output);
    assert_eq!(
        text,
        vec![
            vec!["one".to_string()],
            vec!["two".to_string()],
            vec!["three".to_string()],
        ]
    );
}

#[tokio::test]
async fn test_unstamped_pages_keep_their_content() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_pdf(&temp_dir, "input.pdf", &["alpha", "beta"]);
    let output = temp_dir.path().join("out.pdf");

    assemble(&[input.clone()], "BATES-", 1, false, &output).unwrap();

    assert_eq!(page_operations(&output).len(), 2);
    let original: Vec<Vec<String>> = page_operations(&input)
        .iter()
        .map(|ops| ops.iter().map(|op| op.operator.clone()).collect())
        .collect();
    let combined: Vec<Vec<String>> = page_operations(&output)
        .iter()
        .map(|ops| ops.iter().map(|op| op.operator.clone()).collect())
        .collect();
    assert_eq!(original, combined);
    assert_eq!(media_boxes(&output), vec![[0.0, 0.0, 612.0, 792.0]; 2]);
}

#[tokio::test]
async fn test_image_page_sized_at_300_dpi() {
    let temp_dir = TempDir::new().unwrap();
    let image = write_png(&temp_dir, "scan.png", 900, 1200);
    let output = temp_dir.path().join("out.pdf");

    let report = assemble(&[image], "BATES-", 1, true, &output).unwrap();
    assert_eq!(report.pages_written, 1);
    assert_eq!(media_boxes(&output), vec![[0.0, 0.0, 216.0, 288.0]]);
}

#[tokio::test]
async fn test_mixed_inputs() {
    let temp_dir = TempDir::new().unwrap();
    let pdf = write_pdf(&temp_dir, "a.pdf", &["page"]);
    let image = write_png(&temp_dir, "b.png", 300, 300);
    let output = temp_dir.path().join("out.pdf");

    let report = assemble(&[image, pdf], "BATES-", 1, true, &output).unwrap();
    assert_eq!(report.pages_written, 2);
    assert_eq!(
        media_boxes(&output),
        vec![[0.0, 0.0, 72.0, 72.0], [0.0, 0.0, 612.0, 792.0]]
    );
}

#[tokio::test]
async fn test_output_is_deterministic() {
    let temp_dir = TempDir::new().unwrap();
    let pdf = write_pdf(&temp_dir, "a.pdf", &["x", "y"]);
    let image = write_png(&temp_dir, "b.png", 60, 40);
    let inputs = vec![pdf, image];

    let first = temp_dir.path().join("first.pdf");
    let second = temp_dir.path().join("second.pdf");
    assemble(&inputs, "EX-", 10, true, &first).unwrap();
    assemble(&inputs, "EX-", 10, true, &second).unwrap();

    assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
}

#[tokio::test]
async fn test_assembler_in_blocking_task() {
    let temp_dir = TempDir::new().unwrap();
    let inputs = vec![write_pdf(&temp_dir, "a.pdf", &["x"])];
    let output = temp_dir.path().join("out.pdf");

    let assembler = DocumentAssembler::new(StampOptions::default())
        .with_write_options(WriteOptions::default());
    let target = output.clone();
    let report = tokio::task::spawn_blocking(move || assembler.run(&inputs, &target))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(report.pages_written, 1);
    assert_eq!(Document::load(&output).unwrap().get_pages().len(), 1);
}
