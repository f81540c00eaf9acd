//! # pdfdata
//!
//! Extract PDF content as data: page text, detected tables, form fields
//! and document metadata.
//!
//! A document is first turned into an [`Extraction`], a format-agnostic
//! snapshot that can then be rendered as JSON, as CSV (tables only) or as
//! an Excel workbook.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfdata::{extract_file, render, ExtractOptions};
//!
//! fn main() -> pdfdata::Result<()> {
//!     let extraction = extract_file("invoice.pdf", &ExtractOptions::default())?;
//!
//!     println!("{} tables", extraction.table_count());
//!     println!("{}", render::to_csv(&extraction)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Layout-preserving text**: columns stay lined up in page text
//! - **Table detection**: alignment-based, no ruling lines required
//! - **Form fields**: names, types, values and positions of widgets
//! - **Three outputs**: JSON, CSV and Excel (`xlsx` feature, on by default)

pub mod backend;
pub mod convert;
pub mod error;
pub mod extract;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use backend::{DocumentHandle, LopdfDocument, PdfDocument};
pub use convert::{convert_file, ConvertOptions, ConvertResult};
pub use error::{Error, Result};
pub use extract::{select_pages, ExtractOptions, Normalizer, PageSelection};
pub use model::{Cell, Extraction, FormField, Metadata, PageRecord, Table};
pub use render::{JsonFormat, OutputFormat, RenderOutput, TableSequence};

use std::path::{Path, PathBuf};

/// Extract a PDF file.
///
/// # Example
///
/// ```no_run
/// use pdfdata::{extract_file, ExtractOptions};
///
/// let options = ExtractOptions::new().with_page(2).tables_only();
/// let extraction = extract_file("report.pdf", &options).unwrap();
/// assert_eq!(extraction.pages.len(), 1);
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P, options: &ExtractOptions) -> Result<Extraction> {
    let path = path.as_ref();
    let source = path.display().to_string();
    let doc = LopdfDocument::open(path).map_err(|e| match e {
        Error::Encrypted(_) => Error::Encrypted(source.clone()),
        other => other,
    })?;
    Normalizer::new(options.clone()).run(&source, doc)
}

/// Extract a PDF held in memory.
///
/// `source` is recorded in the extraction and used to name derived files.
pub fn extract_bytes(data: &[u8], source: &str, options: &ExtractOptions) -> Result<Extraction> {
    let doc = LopdfDocument::from_bytes(data).map_err(|e| match e {
        Error::Encrypted(_) => Error::Encrypted(source.to_string()),
        other => other,
    })?;
    Normalizer::new(options.clone()).run(source, doc)
}

/// Builder for extracting and rendering PDF documents.
///
/// # Example
///
/// ```no_run
/// use pdfdata::Pdfdata;
///
/// let csv = Pdfdata::new()
///     .tables_only()
///     .with_page(2)
///     .extract("report.pdf")?
///     .to_csv()?;
/// # Ok::<(), pdfdata::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pdfdata {
    options: ExtractOptions,
    json_format: JsonFormat,
}

impl Pdfdata {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a single 1-indexed page.
    pub fn with_page(mut self, page: u32) -> Self {
        self.options = self.options.with_page(page);
        self
    }

    /// Skip page text.
    pub fn tables_only(mut self) -> Self {
        self.options = self.options.tables_only();
        self
    }

    /// Emit compact JSON.
    pub fn compact_json(mut self) -> Self {
        self.json_format = JsonFormat::Compact;
        self
    }

    /// Extract a PDF file.
    pub fn extract<P: AsRef<Path>>(self, path: P) -> Result<PdfdataResult> {
        Ok(PdfdataResult {
            extraction: extract_file(path, &self.options)?,
            json_format: self.json_format,
        })
    }

    /// Extract a PDF held in memory.
    pub fn extract_bytes(self, data: &[u8], source: &str) -> Result<PdfdataResult> {
        Ok(PdfdataResult {
            extraction: extract_bytes(data, source, &self.options)?,
            json_format: self.json_format,
        })
    }
}

/// Result of extracting a PDF document.
#[derive(Debug, Clone)]
pub struct PdfdataResult {
    /// The extracted document
    pub extraction: Extraction,
    json_format: JsonFormat,
}

impl PdfdataResult {
    /// Convert to JSON.
    pub fn to_json(&self) -> Result<String> {
        render::to_json(&self.extraction, self.json_format)
    }

    /// Convert the tables to CSV.
    pub fn to_csv(&self) -> Result<String> {
        render::to_csv(&self.extraction)
    }

    /// Write an Excel workbook, returning the path written.
    pub fn to_xlsx(&self, output: Option<&Path>) -> Result<PathBuf> {
        render::write_xlsx(&self.extraction, output)
    }

    /// Get the extraction.
    pub fn extraction(&self) -> &Extraction {
        &self.extraction
    }
}
