//! Pre-flight inspection of the input list.
//!
//! Before anything is written the inputs are partitioned into the ones that
//! will be processed and the ones that will be skipped, using the same
//! classification the assembler uses. The summed size of the supported
//! inputs feeds the advisory large-job warning; enforcing it is up to the
//! caller.
//!
//! # Examples
//!
//! ```no_run
//! use batesmerge::validation::Preflight;
//! use std::path::PathBuf;
//!
//! let preflight = Preflight::run(&[PathBuf::from("a.pdf"), PathBuf::from("notes.txt")]);
//! println!(
//!     "{} supported, {} skipped, {} bytes",
//!     preflight.supported.len(),
//!     preflight.unsupported.len(),
//!     preflight.total_bytes
//! );
//! ```

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::io::file_size;
use crate::source::InputReference;
use crate::utils::format_file_size;

/// Partition of the inputs into processed and skipped.
#[derive(Debug, Clone, Serialize)]
pub struct Preflight {
    /// Inputs that will be processed, in order.
    pub supported: Vec<InputReference>,

    /// Inputs that will be skipped, in order.
    pub unsupported: Vec<PathBuf>,

    /// Summed size in bytes of the supported inputs.
    pub total_bytes: u64,
}

impl Preflight {
    /// Classify every path. Missing files count as unsupported.
    pub fn run(paths: &[PathBuf]) -> Self {
        let mut supported = Vec::new();
        let mut unsupported = Vec::new();

        for path in paths {
            let reference = InputReference::classify(path.clone());
            if reference.kind.is_supported() {
                supported.push(reference);
            } else {
                unsupported.push(reference.path);
            }
        }

        let total_bytes = total_size(supported.iter().map(|r| r.path.as_path()));

        Self {
            supported,
            unsupported,
            total_bytes,
        }
    }

    /// First input that will be processed.
    pub fn first_supported(&self) -> Option<&Path> {
        self.supported.first().map(|r| r.path.as_path())
    }

    /// Supported input paths, in order.
    pub fn supported_paths(&self) -> Vec<PathBuf> {
        self.supported.iter().map(|r| r.path.clone()).collect()
    }

    /// Whether the supported inputs together exceed `threshold` bytes.
    pub fn exceeds(&self, threshold: u64) -> bool {
        self.total_bytes > threshold
    }

    /// Format total size as human-readable string.
    pub fn format_total_size(&self) -> String {
        format_file_size(self.total_bytes)
    }
}

/// Sum of the on-disk sizes of `paths`; unreadable files count as zero.
pub fn total_size<'a>(paths: impl IntoIterator<Item = &'a Path>) -> u64 {
    paths.into_iter().map(file_size).sum()
}
