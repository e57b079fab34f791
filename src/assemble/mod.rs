//! Document assembly.
//!
//! The assembler walks the inputs in the order given, expands each into
//! pages, composites every page and appends the ones that succeed. Failures
//! are absorbed per page and per input; the run as a whole fails only when
//! no page was produced or the output cannot be written.
//!
//! # Examples
//!
//! ```no_run
//! use batesmerge::assemble::assemble;
//! use std::path::{Path, PathBuf};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let inputs = vec![PathBuf::from("a.pdf"), PathBuf::from("scan.png")];
//! let report = assemble(&inputs, "EX-", 5, true, Path::new("combined.pdf"))?;
//! println!("{} pages, last stamp {:?}", report.pages_written, report.last_stamp);
//! # Ok(())
//! # }
//! ```

pub mod output;
pub mod report;

pub use output::OutputDocument;
pub use report::{AssemblyReport, SkippedInput, SkippedPage};

use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::compose::{Page, PageCompositor, PageSource, format_stamp};
use crate::config::StampOptions;
use crate::error::{BatesError, Result};
use crate::io::{PdfWriter, WriteOptions};
use crate::source::{OpenedSource, SourceClassifier};

/// Pages collected from the inputs, not yet written.
#[derive(Debug)]
pub struct AssembledPages {
    /// The accumulated document.
    pub document: OutputDocument,
    /// Inputs opened as a PDF or image.
    pub inputs_processed: usize,
    /// Inputs that were neither.
    pub skipped_inputs: Vec<SkippedInput>,
    /// Pages that failed to composite.
    pub skipped_pages: Vec<SkippedPage>,
    /// First stamp applied.
    pub first_stamp: Option<String>,
    /// Last stamp applied.
    pub last_stamp: Option<String>,
    /// Counter value after the last appended page.
    pub next_number: u64,
}

/// Sequential compositing pipeline over an ordered input list.
#[derive(Debug, Clone, Default)]
pub struct DocumentAssembler {
    compositor: PageCompositor,
    writer: PdfWriter,
    stamp: StampOptions,
}

impl DocumentAssembler {
    /// Create an assembler with the given stamp settings and default write
    /// options.
    pub fn new(stamp: StampOptions) -> Self {
        Self {
            compositor: PageCompositor::new(),
            writer: PdfWriter::new(),
            stamp,
        }
    }

    /// Use `options` when writing the output.
    pub fn with_write_options(mut self, options: WriteOptions) -> Self {
        self.writer = PdfWriter::with_options(options);
        self
    }

    /// Collect the pages of every input, without writing anything.
    ///
    /// Each source is opened, expanded and dropped before the next one is
    /// opened.
    pub fn collect(&self, inputs: &[PathBuf]) -> AssembledPages {
        let mut state = AssembledPages {
            document: OutputDocument::new(),
            inputs_processed: 0,
            skipped_inputs: Vec::new(),
            skipped_pages: Vec::new(),
            first_stamp: None,
            last_stamp: None,
            next_number: self.stamp.starting_number,
        };

        for path in inputs {
            match SourceClassifier::open(path) {
                OpenedSource::Document(loaded) => {
                    info!(
                        path = %path.display(),
                        pages = loaded.page_count,
                        load_time = ?loaded.load_time,
                        "adding PDF"
                    );
                    state.inputs_processed += 1;
                    for index in 0..loaded.page_count {
                        let source = PageSource::Document {
                            document: &loaded.document,
                            index,
                        };
                        self.add_page(&mut state, path, index + 1, source);
                    }
                }
                OpenedSource::Image(loaded) => {
                    info!(path = %path.display(), "adding image");
                    state.inputs_processed += 1;
                    self.add_page(&mut state, path, 1, PageSource::from_image(&loaded));
                }
                OpenedSource::Unsupported { reason } => {
                    warn!(path = %path.display(), "skipping unsupported input");
                    debug!(%reason, "classification failed");
                    state.skipped_inputs.push(SkippedInput {
                        path: path.clone(),
                        reason,
                    });
                }
            }
        }

        state
    }

    /// Composite one page and append it; the counter only moves on success.
    fn add_page(
        &self,
        state: &mut AssembledPages,
        path: &Path,
        page_number: usize,
        source: PageSource<'_>,
    ) {
        let stamp = self
            .stamp
            .enabled
            .then(|| format_stamp(&self.stamp.prefix, state.next_number));

        let appended = self
            .compositor
            .composite(source, stamp.as_deref())
            .and_then(|page: Page| state.document.append(page));

        match appended {
            Ok(()) => {
                debug!(path = %path.display(), page = page_number, stamp = ?stamp, "appended page");
                if let Some(stamp) = stamp {
                    state.first_stamp.get_or_insert_with(|| stamp.clone());
                    state.last_stamp = Some(stamp);
                    state.next_number = state.next_number.saturating_add(1);
                }
            }
            Err(err) => {
                warn!(path = %path.display(), page = page_number, error = %err, "skipping page");
                state.skipped_pages.push(SkippedPage {
                    path: path.to_path_buf(),
                    page: page_number,
                    reason: err.to_string(),
                });
            }
        }
    }

    /// Assemble `inputs` and write the combined PDF to `output_path`.
    ///
    /// # Errors
    ///
    /// - [`BatesError::NoPagesProduced`] when no page could be appended; no
    ///   file is created in that case
    /// - a write error when the output cannot be saved; nothing is left at
    ///   `output_path`
    pub fn run(&self, inputs: &[PathBuf], output_path: &Path) -> Result<AssemblyReport> {
        let start = Instant::now();
        let collected = self.collect(inputs);

        if collected.document.is_empty() {
            return Err(BatesError::NoPagesProduced);
        }

        let pages_written = collected.document.page_count();
        let mut document = collected.document.into_document();
        let stats = self.writer.save_with_stats(&mut document, output_path)?;

        info!(
            output = %output_path.display(),
            pages = pages_written,
            bytes = stats.file_size,
            "wrote combined PDF"
        );

        Ok(AssemblyReport {
            output_path: stats.output_path,
            pages_written,
            inputs_processed: collected.inputs_processed,
            skipped_inputs: collected.skipped_inputs,
            skipped_pages: collected.skipped_pages,
            first_stamp: collected.first_stamp,
            last_stamp: collected.last_stamp,
            next_number: collected.next_number,
            file_size: stats.file_size,
            compressed: stats.compressed,
            elapsed: start.elapsed(),
        })
    }
}

/// Combine `inputs` into one PDF at `output_path`.
///
/// Pages are stamped `prefix` + six-digit counter starting at
/// `starting_number` when `stamp_enabled` is set. This is a blocking call.
pub fn assemble(
    inputs: &[PathBuf],
    prefix: &str,
    starting_number: u64,
    stamp_enabled: bool,
    output_path: &Path,
) -> Result<AssemblyReport> {
    let stamp = StampOptions {
        enabled: stamp_enabled,
        prefix: prefix.to_string(),
        starting_number,
    };
    DocumentAssembler::new(stamp).run(inputs, output_path)
}
