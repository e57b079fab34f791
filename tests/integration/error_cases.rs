//! Integration tests for failure handling.

use batesmerge::{BatesError, assemble};
use tempfile::TempDir;

use crate::common::{write_garbage, write_pdf};

#[tokio::test]
async fn test_all_inputs_unsupported() {
    let temp_dir = TempDir::new().unwrap();
    let a = write_garbage(&temp_dir, "a.pdf");
    let b = write_garbage(&temp_dir, "b.jpg");
    let output = temp_dir.path().join("out.pdf");

    let result = assemble(&[a, b], "BATES-", 1, true, &output);
    assert!(matches!(result, Err(BatesError::NoPagesProduced)));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_missing_input_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.pdf");
    let pdf = write_pdf(&temp_dir, "a.pdf", &["x"]);
    let output = temp_dir.path().join("out.pdf");

    let report = assemble(&[missing.clone(), pdf], "BATES-", 1, true, &output).unwrap();
    assert_eq!(report.pages_written, 1);
    assert_eq!(report.skipped_inputs.len(), 1);
    assert_eq!(report.skipped_inputs[0].path, missing);
    assert_eq!(report.first_stamp.as_deref(), Some("BATES-000001"));
}

#[tokio::test]
async fn test_unwritable_output() {
    let temp_dir = TempDir::new().unwrap();
    let pdf = write_pdf(&temp_dir, "a.pdf", &["x"]);
    let output = temp_dir.path().join("no-such-dir").join("out.pdf");

    let result = assemble(&[pdf], "BATES-", 1, true, &output);
    assert!(result.is_err());
    assert!(!matches!(result, Err(BatesError::NoPagesProduced)));
    assert!(!output.exists());
}
