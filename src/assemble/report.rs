//! Run statistics.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::utils::format_file_size;

/// An input that contributed no pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedInput {
    /// Path of the input.
    pub path: PathBuf,
    /// Why it was skipped.
    pub reason: String,
}

/// A page that failed to composite and was left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedPage {
    /// Path of the input the page belongs to.
    pub path: PathBuf,
    /// One-based page number within that input.
    pub page: usize,
    /// Why it was skipped.
    pub reason: String,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct AssemblyReport {
    /// Where the combined PDF was written.
    pub output_path: PathBuf,

    /// Pages in the combined PDF.
    pub pages_written: usize,

    /// Inputs that were opened as a PDF or image.
    pub inputs_processed: usize,

    /// Inputs that were neither.
    pub skipped_inputs: Vec<SkippedInput>,

    /// Pages dropped after a compositing failure.
    pub skipped_pages: Vec<SkippedPage>,

    /// Stamp on the first page, if stamping was on.
    pub first_stamp: Option<String>,

    /// Stamp on the last page, if stamping was on.
    pub last_stamp: Option<String>,

    /// Number the next page would have been stamped with.
    pub next_number: u64,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Whether streams were compressed on write.
    pub compressed: bool,

    /// Wall time of the whole run.
    pub elapsed: Duration,
}

impl AssemblyReport {
    /// Format output size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }

    /// Whether anything was left out along the way.
    pub fn has_skips(&self) -> bool {
        !self.skipped_inputs.is_empty() || !self.skipped_pages.is_empty()
    }
}
