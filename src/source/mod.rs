//! Input classification.
//!
//! Every input path is one of three kinds: a PDF document, a raster image, or
//! unsupported. The decision is made here and nowhere else, so the pre-flight
//! summary shown to the user and the assembler always agree on what will be
//! processed.
//!
//! # Examples
//!
//! ```no_run
//! use batesmerge::source::{SourceClassifier, SourceKind};
//! use std::path::Path;
//!
//! match SourceClassifier::classify(Path::new("exhibit-a.pdf")) {
//!     SourceKind::Document => println!("pdf"),
//!     SourceKind::Image => println!("image"),
//!     SourceKind::Unsupported => println!("skipped"),
//! }
//! ```

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::BatesError;
use crate::io::{LoadedImage, LoadedPdf, PdfReader, load_image};

/// What an input path turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A readable multi-page PDF.
    Document,
    /// A decodable single-frame raster image.
    Image,
    /// Neither; the input is skipped.
    Unsupported,
}

impl SourceKind {
    /// Whether inputs of this kind produce pages.
    pub fn is_supported(self) -> bool {
        self != Self::Unsupported
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Document => "PDF",
            Self::Image => "image",
            Self::Unsupported => "unsupported",
        };
        f.write_str(label)
    }
}

/// An input path with the kind it was classified as.
///
/// The kind is fixed at classification time and not re-checked later in the
/// run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputReference {
    /// Path as given by the caller.
    pub path: PathBuf,
    /// Resolved kind.
    pub kind: SourceKind,
}

impl InputReference {
    /// Classify `path` and remember the answer.
    pub fn classify(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let kind = SourceClassifier::classify(&path);
        Self { path, kind }
    }
}

/// An opened input, ready to be expanded into pages.
#[derive(Debug)]
pub enum OpenedSource {
    /// A loaded PDF document.
    Document(LoadedPdf),
    /// A decoded raster image.
    Image(LoadedImage),
    /// Neither a PDF nor an image.
    Unsupported {
        /// Why the PDF and image probes both failed.
        reason: String,
    },
}

impl OpenedSource {
    /// The kind this source was classified as.
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Document(_) => SourceKind::Document,
            Self::Image(_) => SourceKind::Image,
            Self::Unsupported { .. } => SourceKind::Unsupported,
        }
    }
}

/// Decides whether a path is a PDF, an image, or unsupported.
pub struct SourceClassifier;

impl SourceClassifier {
    /// Open `path`, trying PDF first and raster image second.
    ///
    /// This is the only place the classification decision is made;
    /// [`classify`](Self::classify) and [`is_supported`] are derived from it.
    pub fn open(path: &Path) -> OpenedSource {
        if !path.is_file() {
            return OpenedSource::Unsupported {
                reason: BatesError::file_not_found(path.to_path_buf()).to_string(),
            };
        }

        let pdf_error = match PdfReader::new().load(path) {
            Ok(loaded) => return OpenedSource::Document(loaded),
            Err(err) => err,
        };

        match load_image(path) {
            Ok(image) => OpenedSource::Image(image),
            Err(image_error) => OpenedSource::Unsupported {
                reason: format!("{pdf_error}; {image_error}"),
            },
        }
    }

    /// Classify `path` without keeping the opened source.
    pub fn classify(path: &Path) -> SourceKind {
        Self::open(path).kind()
    }
}

/// Shared predicate: will this input be processed?
pub fn is_supported(path: &Path) -> bool {
    SourceClassifier::classify(path).is_supported()
}
