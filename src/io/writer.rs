//! PDF writing and saving operations.
//!
//! This module provides safe PDF writing with:
//! - Atomic writes (write to temp file, then rename)
//! - Stream compression and object pruning
//! - Write statistics
//!
//! A failed write never leaves a file at the destination: the temporary file
//! is removed and the destination is untouched.
//!
//! # Examples
//!
//! ```no_run
//! use batesmerge::io::writer::PdfWriter;
//! use lopdf::Document;
//! use std::path::Path;
//!
//! # fn example(mut doc: Document) -> Result<(), Box<dyn std::error::Error>> {
//! let writer = PdfWriter::new();
//! writer.save(&mut doc, Path::new("output.pdf"))?;
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::CompressionLevel;
use crate::error::{BatesError, Result};
use crate::utils::format_file_size;

/// Options for writing PDF files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Use atomic writes (write to temp file, then rename).
    pub atomic: bool,

    /// Compress streams before writing.
    pub compress: bool,

    /// Drop unreferenced objects and renumber the rest.
    pub optimize: bool,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            compress: true,
            optimize: false,
            buffer_size: 8192,
        }
    }
}

impl From<CompressionLevel> for WriteOptions {
    fn from(level: CompressionLevel) -> Self {
        Self {
            compress: level != CompressionLevel::None,
            optimize: level == CompressionLevel::Maximum,
            ..Default::default()
        }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone, Serialize)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,

    /// Whether compression was applied.
    pub compressed: bool,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// PDF writer with configurable behavior.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Create a new PDF writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Save a PDF document to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Output directory doesn't exist
    /// - Insufficient permissions
    /// - Disk full
    pub fn save(&self, doc: &mut Document, path: &Path) -> Result<()> {
        self.save_with_stats(doc, path).map(|_| ())
    }

    /// Save a PDF and return statistics about the operation.
    ///
    /// The document is compressed and renumbered in place according to the
    /// writer options.
    pub fn save_with_stats(&self, doc: &mut Document, path: &Path) -> Result<WriteStatistics> {
        let start = Instant::now();
        let options = &self.options;

        if options.compress {
            doc.compress();
        }

        if options.optimize {
            doc.prune_objects();
        }

        doc.renumber_objects();

        let write_path = if options.atomic {
            temp_path_for(path)
        } else {
            path.to_path_buf()
        };

        if let Err(err) = write_document(doc, &write_path, options.buffer_size) {
            let _ = std::fs::remove_file(&write_path);
            return Err(err);
        }

        if options.atomic
            && let Err(source) = std::fs::rename(&write_path, path)
        {
            let _ = std::fs::remove_file(&write_path);
            return Err(BatesError::FailedToWrite {
                path: path.to_path_buf(),
                source,
            });
        }

        let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        Ok(WriteStatistics {
            write_time: start.elapsed(),
            file_size,
            output_path: path.to_path_buf(),
            compressed: options.compress,
        })
    }

    /// Check if a file can be written to the given path.
    ///
    /// Performs pre-flight checks without actually writing.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory doesn't exist or is read-only.
    pub fn can_write(&self, path: &Path) -> Result<()> {
        let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(());
        };

        let metadata = std::fs::metadata(parent).map_err(|_| {
            BatesError::invalid_config(format!(
                "Output directory does not exist: {}",
                parent.display()
            ))
        })?;

        if metadata.permissions().readonly() {
            return Err(BatesError::invalid_config(format!(
                "Output directory is not writable: {}",
                parent.display()
            )));
        }

        Ok(())
    }
}

/// Serialize `doc` to `path` through a buffered writer.
fn write_document(doc: &mut Document, path: &Path, buffer_size: usize) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|e| BatesError::FailedToCreateOutput {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut writer = std::io::BufWriter::with_capacity(buffer_size, file);

    doc.save_to(&mut writer)
        .map_err(|e| BatesError::FailedToWrite {
            path: path.to_path_buf(),
            source: std::io::Error::other(e),
        })?;

    writer.flush().map_err(|e| BatesError::FailedToWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Sibling temporary path used for atomic writes.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
