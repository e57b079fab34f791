//! Loading of input sources.
//!
//! Two kinds of source are understood:
//! - PDF documents, loaded with `lopdf`
//! - Single-frame raster images, decoded with `image`
//!
//! Both loaders are read-only probes: they never lock or modify the file.
//!
//! # Examples
//!
//! ```no_run
//! use batesmerge::io::reader::{PdfReader, load_image};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let loaded = PdfReader::new().load(Path::new("exhibit.pdf"))?;
//! println!("{} pages", loaded.page_count);
//!
//! let image = load_image(Path::new("scan.png"))?;
//! println!("{:?}", image.pixel_dimensions);
//! # Ok(())
//! # }
//! ```

use image::{DynamicImage, ImageReader};
use lopdf::Document;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{BatesError, Result};

/// A loaded PDF document with metadata.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Path to the source file.
    pub path: PathBuf,

    /// Number of pages in the document.
    pub page_count: usize,

    /// Time taken to load the document.
    pub load_time: Duration,

    /// File size in bytes.
    pub file_size: u64,
}

impl LoadedPdf {
    fn new(document: Document, path: PathBuf, load_time: Duration) -> Self {
        let page_count = document.get_pages().len();
        let file_size = file_size(&path);

        Self {
            document,
            path,
            page_count,
            load_time,
            file_size,
        }
    }
}

/// PDF reader with configurable loading behavior.
#[derive(Debug, Clone)]
pub struct PdfReader {
    /// Whether to reject documents that still carry encryption after loading.
    reject_encrypted: bool,
}

impl PdfReader {
    /// Create a new PDF reader with default settings.
    pub fn new() -> Self {
        Self {
            reject_encrypted: true,
        }
    }

    /// Load a single PDF document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File cannot be read
    /// - File is not a valid PDF
    /// - PDF is password protected
    pub fn load(&self, path: &Path) -> Result<LoadedPdf> {
        let path_buf = path.to_path_buf();
        let start = Instant::now();

        let document = Document::load(path).map_err(|e| {
            BatesError::failed_to_load_pdf(path_buf.clone(), e.to_string())
        })?;

        if self.reject_encrypted && document.is_encrypted() {
            return Err(BatesError::failed_to_load_pdf(
                path_buf,
                "PDF is password protected",
            ));
        }

        Ok(LoadedPdf::new(document, path_buf, start.elapsed()))
    }
}

impl Default for PdfReader {
    fn default() -> Self {
        Self::new()
    }
}

/// A decoded raster image with the size information needed for page sizing.
#[derive(Debug)]
pub struct LoadedImage {
    /// The decoded first frame.
    pub image: DynamicImage,

    /// Path to the source file.
    pub path: PathBuf,

    /// Pixel dimensions read from the file header, if the header exposes them.
    pub pixel_dimensions: Option<(u32, u32)>,

    /// File size in bytes.
    pub file_size: u64,
}

/// Decode the first frame of a raster image.
///
/// The format is sniffed from the file contents, falling back to the
/// extension.
///
/// # Errors
///
/// Returns [`BatesError::FailedToDecodeImage`] if the file cannot be opened or
/// is not an image format we can decode.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let decode_error = |reason: String| BatesError::failed_to_decode_image(path.to_path_buf(), reason);

    let image = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| decode_error(e.to_string()))?
        .decode()
        .map_err(|e| decode_error(e.to_string()))?;

    let pixel_dimensions = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .ok()
        .and_then(|reader| reader.into_dimensions().ok())
        .filter(|&(width, height)| width > 0 && height > 0);

    Ok(LoadedImage {
        image,
        path: path.to_path_buf(),
        pixel_dimensions,
        file_size: file_size(path),
    })
}

/// Size of a file in bytes, or 0 if it cannot be read.
pub fn file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
