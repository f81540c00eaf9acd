//! One-shot conversion: extract a PDF and render it in a chosen format.
//!
//! # Example
//!
//! ```no_run
//! use pdfdata::convert::{convert_file, ConvertOptions};
//! use pdfdata::OutputFormat;
//!
//! fn main() -> pdfdata::Result<()> {
//!     let options = ConvertOptions::new()
//!         .with_format(OutputFormat::Csv)
//!         .tables_only();
//!
//!     let result = convert_file("report.pdf", &options)?;
//!     if let Some(csv) = result.output.text() {
//!         print!("{}", csv);
//!     }
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::extract::ExtractOptions;
use crate::model::Extraction;
use crate::render::{render_to, JsonFormat, OutputFormat, RenderOutput};

/// Options for document conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// What to extract
    pub extract: ExtractOptions,

    /// Output format
    pub format: OutputFormat,

    /// JSON layout, used for [`OutputFormat::Json`]
    pub json_format: JsonFormat,

    /// Destination file; `None` returns text (workbooks use a derived path)
    pub output: Option<PathBuf>,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set extraction options.
    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract = options;
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set JSON layout.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }

    /// Set the output file.
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Process a single 1-indexed page.
    pub fn with_page(mut self, page: u32) -> Self {
        self.extract.page = Some(page);
        self
    }

    /// Skip page text.
    pub fn tables_only(mut self) -> Self {
        self.extract.tables_only = true;
        self
    }
}

/// Result of document conversion.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Format the document was rendered in
    pub format: OutputFormat,

    /// Rendered text or the written file
    pub output: RenderOutput,

    /// Number of processed pages
    pub page_count: usize,

    /// Number of tables across processed pages
    pub table_count: usize,

    /// Number of form fields in the document
    pub form_field_count: usize,

    /// Non-fatal problems met during extraction
    pub warnings: Vec<String>,
}

/// Extract a PDF file and render it.
///
/// Extraction completes before anything is written, so a failing document
/// never leaves a partial output file behind.
pub fn convert_file<P: AsRef<Path>>(path: P, options: &ConvertOptions) -> Result<ConvertResult> {
    let extraction = crate::extract_file(path, &options.extract)?;
    convert_extraction(&extraction, options)
}

/// Render an existing extraction with the given options.
///
/// `options.extract` is ignored here.
pub fn convert_extraction(extraction: &Extraction, options: &ConvertOptions) -> Result<ConvertResult> {
    let output = render_to(
        extraction,
        options.format,
        options.json_format,
        options.output.as_deref(),
    )?;

    Ok(ConvertResult {
        format: options.format,
        output,
        page_count: extraction.pages.len(),
        table_count: extraction.table_count(),
        form_field_count: extraction.form_fields.len(),
        warnings: extraction.warnings.clone(),
    })
}
