//! Document-level types.

use super::{FormField, PageRecord, Table};
use serde::{Deserialize, Serialize};

/// The extracted snapshot of one PDF document.
///
/// Built once per run by the normalizer and consumed read-only by every
/// renderer. Page numbers in `pages` are strictly increasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    /// Path of the source document as given by the caller
    pub source: String,

    /// Document metadata
    pub metadata: Metadata,

    /// Processed pages, in page order
    pub pages: Vec<PageRecord>,

    /// Interactive form fields across the whole document
    pub form_fields: Vec<FormField>,

    /// Non-fatal problems met while collecting form fields
    #[serde(skip)]
    pub warnings: Vec<String>,
}

impl Extraction {
    /// Create an empty extraction for the given source.
    pub fn new(source: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            source: source.into(),
            metadata,
            pages: Vec::new(),
            form_fields: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add a processed page.
    pub fn add_page(&mut self, page: PageRecord) {
        self.pages.push(page);
    }

    /// Get a processed page by its page number.
    pub fn page(&self, number: u32) -> Option<&PageRecord> {
        self.pages.iter().find(|p| p.number == number)
    }

    /// All tables in emission order, paired with their owning page number.
    pub fn tables(&self) -> impl Iterator<Item = (u32, &Table)> + '_ {
        self.pages
            .iter()
            .flat_map(|page| page.tables.iter().map(move |t| (page.number, t)))
    }

    /// Total number of tables across processed pages.
    pub fn table_count(&self) -> usize {
        self.pages.iter().map(|p| p.tables.len()).sum()
    }

    /// Check if any form field was collected.
    pub fn has_form_fields(&self) -> bool {
        !self.form_fields.is_empty()
    }
}

/// Document metadata.
///
/// Text fields default to an empty string when the document does not carry
/// them. Dates are kept verbatim as written in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: String,

    /// Document author
    pub author: String,

    /// Document subject
    pub subject: String,

    /// Creator application
    pub creator: String,

    /// PDF producer
    pub producer: String,

    /// Creation timestamp (e.g. `D:20240115103045Z`)
    pub creation_date: String,

    /// Last modification timestamp
    pub modification_date: String,

    /// Total number of pages in the document
    pub page_count: u32,

    /// Whether the document is encrypted
    pub is_encrypted: bool,
}

impl Metadata {
    /// Metadata fields as `(key, text value)` pairs, in declaration order.
    pub fn properties(&self) -> Vec<(&'static str, String)> {
        vec![
            ("title", self.title.clone()),
            ("author", self.author.clone()),
            ("subject", self.subject.clone()),
            ("creator", self.creator.clone()),
            ("producer", self.producer.clone()),
            ("creation_date", self.creation_date.clone()),
            ("modification_date", self.modification_date.clone()),
            ("page_count", self.page_count.to_string()),
            ("is_encrypted", self.is_encrypted.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Extraction {
        let mut extraction = Extraction::new("report.pdf", Metadata::default());
        extraction.add_page(PageRecord::new(1).with_tables(vec![
            Table::from_strings([["a", "b"]]),
            Table::from_strings([["c"]]),
        ]));
        extraction.add_page(PageRecord::new(2));
        extraction.add_page(PageRecord::new(3).with_tables(vec![Table::from_strings([["d"]])]));
        extraction
    }

    #[test]
    fn test_tables_in_emission_order() {
        let extraction = sample();
        let owners: Vec<u32> = extraction.tables().map(|(page, _)| page).collect();
        assert_eq!(owners, vec![1, 1, 3]);
        assert_eq!(extraction.table_count(), 3);
    }

    #[test]
    fn test_page_lookup() {
        let extraction = sample();
        assert_eq!(extraction.page(3).map(|p| p.tables.len()), Some(1));
        assert!(extraction.page(4).is_none());
    }

    #[test]
    fn test_metadata_properties() {
        let metadata = Metadata {
            title: "Q3".to_string(),
            page_count: 7,
            ..Default::default()
        };
        let props = metadata.properties();
        assert_eq!(props.len(), 9);
        assert_eq!(props[0], ("title", "Q3".to_string()));
        assert_eq!(props[7], ("page_count", "7".to_string()));
        assert_eq!(props[8], ("is_encrypted", "false".to_string()));
    }
}
