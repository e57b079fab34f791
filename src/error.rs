//! Error types for batesmerge.
//!
//! Errors fall into two groups. Page-level errors (a page that cannot be
//! re-rendered, an image that cannot be decoded) are absorbed by the
//! assembler, which skips the page and keeps going. Run-level errors (nothing
//! to write, output cannot be written, invalid configuration) end the run.
//!
//! # Error Categories
//!
//! - **I/O Errors**: File not found, permission denied, etc.
//! - **Source Errors**: Unreadable PDFs, undecodable images
//! - **Composite Errors**: A single page could not be rebuilt
//! - **Output Errors**: Nothing to write, or writing failed

use std::io;
use std::path::PathBuf;

/// Result type alias for batesmerge operations.
pub type Result<T> = std::result::Result<T, BatesError>;

/// Main error type for batesmerge operations.
#[derive(Debug, thiserror::Error)]
pub enum BatesError {
    /// Input file was not found.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Failed to load a PDF file.
    #[error("Failed to load PDF: {}\n  Reason: {reason}", path.display())]
    FailedToLoadPdf {
        /// Path to the PDF file.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// Failed to decode a raster image.
    #[error("Failed to decode image: {}\n  Reason: {reason}", path.display())]
    FailedToDecodeImage {
        /// Path to the image file.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// A page would have a zero or negative area.
    #[error("Invalid page canvas: {width} x {height} points")]
    InvalidCanvas {
        /// Computed width in points.
        width: f32,
        /// Computed height in points.
        height: f32,
    },

    /// A single page could not be rebuilt.
    #[error("Failed to composite page: {reason}")]
    CompositeFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// None of the inputs is a readable PDF or image.
    #[error("No supported input files (PDF or image) were given")]
    NoSupportedInputs,

    /// Every page was skipped, so there is nothing to write.
    #[error("No pages could be produced from the given inputs")]
    NoPagesProduced,

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  Use --force to overwrite or choose a different output path",
        path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to create output file.
    #[error("Failed to create output file: {}\n  Reason: {source}", path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write to output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// User declined to continue.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Error raised by the PDF object layer.
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<image::ImageError> for BatesError {
    fn from(err: image::ImageError) -> Self {
        Self::CompositeFailed {
            reason: format!("image: {err}"),
        }
    }
}

impl From<anyhow::Error> for BatesError {
    fn from(err: anyhow::Error) -> Self {
        Self::invalid_config(err.to_string())
    }
}

impl BatesError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            path,
            reason: reason.into(),
        }
    }

    /// Create a FailedToDecodeImage error.
    pub fn failed_to_decode_image(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::FailedToDecodeImage {
            path,
            reason: reason.into(),
        }
    }

    /// Create a CompositeFailed error.
    pub fn composite_failed(reason: impl Into<String>) -> Self {
        Self::CompositeFailed {
            reason: reason.into(),
        }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if this error only concerns a single page or source.
    ///
    /// Page-level errors are skipped by the assembler; everything else ends
    /// the run.
    pub fn is_page_level(&self) -> bool {
        matches!(
            self,
            Self::FailedToLoadPdf { .. }
                | Self::FailedToDecodeImage { .. }
                | Self::InvalidCanvas { .. }
                | Self::CompositeFailed { .. }
                | Self::Pdf(_)
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::FailedToLoadPdf { .. } => 3,
            Self::FailedToDecodeImage { .. } => 3,
            Self::InvalidCanvas { .. } => 6,
            Self::CompositeFailed { .. } => 6,
            Self::NoSupportedInputs => 1,
            Self::NoPagesProduced => 1,
            Self::OutputExists { .. } => 4,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::InvalidConfig { .. } => 1,
            Self::Cancelled => 130, // Standard exit code for SIGINT
            Self::Io { .. } => 5,
            Self::Pdf(_) => 6,
            Self::Other { .. } => 1,
        }
    }
}
