//! JSON rendering for extracted documents.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::model::Extraction;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an extraction to JSON.
///
/// Non-ASCII text is written verbatim. Empty table cells become `""`.
pub fn to_json(extraction: &Extraction, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(extraction)?,
        JsonFormat::Compact => serde_json::to_string(extraction)?,
    };
    Ok(json)
}

/// Render to JSON and write the result to `path`.
///
/// Nothing is written if rendering fails.
pub fn write_json(extraction: &Extraction, format: JsonFormat, path: &Path) -> Result<()> {
    let json = to_json(extraction, format)?;
    fs::write(path, json)?;
    Ok(())
}

/// Parse an extraction back from its JSON form.
pub fn from_json(json: &str) -> Result<Extraction> {
    Ok(serde_json::from_str(json)?)
}
