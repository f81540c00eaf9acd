//! Page-level types.

use super::Table;
use serde::{Deserialize, Serialize};

/// A single processed page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Page number (1-indexed, physical position in the document)
    pub number: u32,

    /// Tables detected on the page, in detection order
    #[serde(default)]
    pub tables: Vec<Table>,

    /// Page text, laid out as on the page.
    ///
    /// `None` when text was not requested (tables-only mode), which is
    /// distinct from `Some("")` for a page that has no text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl PageRecord {
    /// Create a new page record without tables or text.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            tables: Vec::new(),
            text: None,
        }
    }

    /// Set the detected tables and return self.
    pub fn with_tables(mut self, tables: Vec<Table>) -> Self {
        self.tables = tables;
        self
    }

    /// Set the page text and return self.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Text for display, empty when text was not requested.
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}
