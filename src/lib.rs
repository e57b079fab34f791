//! batesmerge - Combine PDF and image files into one Bates-stamped PDF.
//!
//! This library merges an ordered list of PDF documents and raster images
//! into a single PDF, optionally overlaying a sequential Bates identifier on
//! every page. It provides:
//!
//! - Input classification shared by pre-flight checks and assembly
//! - Per-page compositing with a fixed bottom-right stamp
//! - Sequential assembly that skips what it cannot read
//! - Atomic output writing
//!
//! # Examples
//!
//! ## Basic Run
//!
//! ```no_run
//! use batesmerge::assemble;
//! use std::path::{Path, PathBuf};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let inputs = vec![PathBuf::from("complaint.pdf"), PathBuf::from("exhibit-a.png")];
//! let report = assemble(&inputs, "BATES-", 1, true, Path::new("combined.pdf"))?;
//! println!("Wrote {} pages", report.pages_written);
//! # Ok(())
//! # }
//! ```
//!
//! ## Using Individual Components
//!
//! ```no_run
//! use batesmerge::compose::{PageCompositor, PageSource};
//! use batesmerge::io::PdfReader;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let loaded = PdfReader::new().load(Path::new("input.pdf"))?;
//! let page = PageCompositor::new().composite(
//!     PageSource::Document { document: &loaded.document, index: 0 },
//!     Some("BATES-000001"),
//! )?;
//! println!("{:?}", page.media_box());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assemble;
pub mod cli;
pub mod compose;
pub mod config;
pub mod error;
pub mod io;
pub mod output;
pub mod source;
pub mod utils;
pub mod validation;

// Re-export commonly used types
pub use assemble::{AssemblyReport, DocumentAssembler, OutputDocument, assemble};
pub use config::{Config, StampOptions};
pub use error::{BatesError, Result};
pub use source::{SourceClassifier, SourceKind, is_supported};
pub use validation::Preflight;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
