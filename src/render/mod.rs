//! Rendering module for converting an extraction to output formats.
//!
//! Every renderer reads the same [`Extraction`] and none of them modifies
//! it:
//! - JSON: the whole extraction, losslessly
//! - CSV: tables only
//! - Excel: a workbook with text, table, form-field and metadata sheets

mod delimited;
mod json;
mod xlsx;

pub use delimited::{to_csv, write_csv, write_tables, TableSequence};
pub use json::{from_json, to_json, write_json, JsonFormat};
pub use xlsx::{clip_cell_text, default_xlsx_path, write_xlsx, TEXT_CELL_LIMIT};

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::model::Extraction;

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// JSON document
    #[default]
    Json,
    /// Tables as comma-separated values
    Csv,
    /// Excel workbook
    Xlsx,
}

impl OutputFormat {
    /// All formats, in the order they are listed to users.
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Json, OutputFormat::Csv, OutputFormat::Xlsx];

    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Xlsx => "xlsx",
        }
    }

    /// Human-readable name used in status messages.
    pub fn label(self) -> &'static str {
        match self {
            OutputFormat::Json => "JSON",
            OutputFormat::Csv => "CSV",
            OutputFormat::Xlsx => "Excel",
        }
    }

    /// Whether this format must be written to a file.
    pub fn requires_file(self) -> bool {
        self == OutputFormat::Xlsx
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        OutputFormat::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::Other(format!(
                    "Unknown output format '{}' (expected json, csv or xlsx)",
                    s
                ))
            })
    }
}

/// Where rendered output ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutput {
    /// Rendered document, for the caller to print or store
    Text(String),
    /// Path of the written file
    File(PathBuf),
}

impl RenderOutput {
    /// The rendered text, if it was not written to a file.
    pub fn text(&self) -> Option<&str> {
        match self {
            RenderOutput::Text(text) => Some(text),
            RenderOutput::File(_) => None,
        }
    }

    /// The written file, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            RenderOutput::Text(_) => None,
            RenderOutput::File(path) => Some(path),
        }
    }
}

/// Render an extraction in the given format.
///
/// JSON and CSV are returned as text unless `output` is set. Workbooks are
/// always written to a file, at `output` or at the path derived from the
/// source name.
pub fn render_to(
    extraction: &Extraction,
    format: OutputFormat,
    json_format: JsonFormat,
    output: Option<&Path>,
) -> Result<RenderOutput> {
    match (format, output) {
        (OutputFormat::Json, Some(path)) => {
            write_json(extraction, json_format, path)?;
            Ok(RenderOutput::File(path.to_path_buf()))
        }
        (OutputFormat::Json, None) => Ok(RenderOutput::Text(to_json(extraction, json_format)?)),
        (OutputFormat::Csv, Some(path)) => {
            write_csv(extraction, path)?;
            Ok(RenderOutput::File(path.to_path_buf()))
        }
        (OutputFormat::Csv, None) => Ok(RenderOutput::Text(to_csv(extraction)?)),
        (OutputFormat::Xlsx, output) => Ok(RenderOutput::File(write_xlsx(extraction, output)?)),
    }
}
