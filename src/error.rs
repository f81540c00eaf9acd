//! Error types for pdfdata.

use std::io;
use thiserror::Error;

/// Result type alias for pdfdata operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting or rendering a PDF.
///
/// Every variant here is fatal to a run. Degraded table detection and
/// failing form-field widgets are not errors; they are absorbed by the
/// normalizer.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file does not start with a PDF header.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF header carries a version we cannot read.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// The document could not be parsed or opened.
    #[error("Cannot open PDF: {0}")]
    Open(String),

    /// The document is encrypted; it is rejected, not decrypted.
    #[error("PDF is encrypted and cannot be processed: {0}")]
    Encrypted(String),

    /// The requested page lies outside `1..=page_count`.
    #[error("Page {page} out of range (1-{page_count})")]
    PageOutOfRange {
        /// Requested 1-indexed page, as given (may be negative)
        page: i64,
        /// Number of pages in the document
        page_count: u32,
    },

    /// The content stream of a page could not be read.
    #[error("Cannot read content of page {page}: {reason}")]
    PageContent {
        /// 1-indexed page
        page: u32,
        /// Underlying parser error
        reason: String,
    },

    /// A serialization capability was compiled out of this build.
    #[error("{0} support is not available in this build")]
    MissingDependency(&'static str),

    /// Error while rendering an output format.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted("<memory>".to_string()),
            _ => Error::Open(err.to_string()),
        }
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Render(format!("CSV serialization error: {}", err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(format!("JSON serialization error: {}", err))
    }
}

#[cfg(feature = "xlsx")]
impl From<rust_xlsxwriter::XlsxError> for Error {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Error::Render(format!("Workbook error: {}", err))
    }
}
