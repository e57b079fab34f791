//! I/O operations for batesmerge.
//!
//! This module handles all file I/O:
//! - Loading PDF documents and raster images from disk
//! - Writing the combined PDF to disk atomically

pub mod reader;
pub mod writer;

pub use reader::{LoadedImage, LoadedPdf, PdfReader, file_size, load_image};
pub use writer::{PdfWriter, WriteOptions, WriteStatistics};
