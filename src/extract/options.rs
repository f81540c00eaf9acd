//! Extraction options.

use super::selector::PageSelection;

/// Options controlling what is extracted from a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Single 1-indexed page to process (`None` = all pages)
    pub page: Option<u32>,

    /// Skip page text, keeping only tables and form fields
    pub tables_only: bool,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a single 1-indexed page.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the page to process, or all pages for `None`.
    pub fn with_page_opt(mut self, page: Option<u32>) -> Self {
        self.page = page;
        self
    }

    /// Skip page text.
    pub fn tables_only(mut self) -> Self {
        self.tables_only = true;
        self
    }

    /// Enable or disable tables-only mode.
    pub fn with_tables_only(mut self, tables_only: bool) -> Self {
        self.tables_only = tables_only;
        self
    }

    /// The page selection policy these options describe.
    pub fn selection(&self) -> PageSelection {
        match self.page {
            Some(page) => PageSelection::Single(page),
            None => PageSelection::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let opts = ExtractOptions::new().with_page(3).tables_only();
        assert_eq!(opts.page, Some(3));
        assert!(opts.tables_only);
        assert_eq!(opts.selection(), PageSelection::Single(3));
        assert_eq!(ExtractOptions::default().selection(), PageSelection::All);
    }
}
