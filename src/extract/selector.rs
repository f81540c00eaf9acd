//! Page selection.

use crate::error::{Error, Result};

/// Which pages of a document to process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// Every page, in order
    #[default]
    All,
    /// One 1-indexed page
    Single(u32),
}

impl PageSelection {
    /// Resolve against a document's page count.
    ///
    /// Fails with [`Error::PageOutOfRange`] when a single page lies outside
    /// `1..=page_count`.
    pub fn resolve(self, page_count: u32) -> Result<Vec<u32>> {
        match self {
            PageSelection::All => Ok((1..=page_count).collect()),
            PageSelection::Single(page) if (1..=page_count).contains(&page) => Ok(vec![page]),
            PageSelection::Single(page) => Err(Error::PageOutOfRange {
                page: page.into(),
                page_count,
            }),
        }
    }
}

/// Ordered list of 1-indexed pages to process.
pub fn select_pages(page_count: u32, page: Option<u32>) -> Result<Vec<u32>> {
    page.map_or(PageSelection::All, PageSelection::Single)
        .resolve(page_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_pages() {
        assert_eq!(select_pages(3, None).unwrap(), vec![1, 2, 3]);
        assert!(select_pages(0, None).unwrap().is_empty());
    }

    #[test]
    fn test_single_page_in_range() {
        for p in 1..=4 {
            assert_eq!(select_pages(4, Some(p)).unwrap(), vec![p]);
        }
    }

    #[test]
    fn test_single_page_out_of_range() {
        for p in [0, 5, 99] {
            let err = select_pages(4, Some(p)).unwrap_err();
            assert!(matches!(
                err,
                Error::PageOutOfRange { page, page_count: 4 } if page == i64::from(p)
            ));
        }
    }
}
