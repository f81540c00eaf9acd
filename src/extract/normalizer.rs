//! Document normalization.
//!
//! Turns an open [`PdfDocument`] into an [`Extraction`]: metadata, one
//! record per selected page, and every form field of the document.

use crate::backend::{info_key, DocumentHandle, DocumentInfo, PdfDocument, RawWidget};
use crate::error::{Error, Result};
use crate::model::{Extraction, FormField, Metadata, PageRecord};

use super::ExtractOptions;

/// Builds an [`Extraction`] from an open document.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    options: ExtractOptions,
}

impl Normalizer {
    /// Create a normalizer with the given options.
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// The options this normalizer runs with.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Normalize a document, taking ownership of it.
    ///
    /// The document is closed before this returns, on success and on error.
    pub fn run<D: PdfDocument>(&self, source: &str, doc: D) -> Result<Extraction> {
        let handle = DocumentHandle::new(doc);
        self.normalize(source, &*handle)
    }

    /// Normalize a borrowed document.
    ///
    /// Fails fast on encrypted documents and on an out-of-range page before
    /// any page is read.
    pub fn normalize<D: PdfDocument + ?Sized>(&self, source: &str, doc: &D) -> Result<Extraction> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted(source.to_string()));
        }

        let page_count = doc.page_count();
        let pages = self.options.selection().resolve(page_count)?;

        let metadata = read_metadata(&doc.info(), page_count, doc.is_encrypted());
        let mut extraction = Extraction::new(source, metadata);

        collect_form_fields(doc, &mut extraction);

        let tables_supported = doc.supports_table_detection();
        if !tables_supported {
            log::warn!("Table detection is not available; pages will have no tables");
        }

        for number in pages {
            log::debug!("Processing page {}/{}", number, page_count);

            let mut record = PageRecord::new(number);
            if !self.options.tables_only {
                record.text = Some(doc.page_text(number)?);
            }

            if tables_supported {
                match doc.find_tables(number) {
                    Ok(tables) => record.tables = tables,
                    Err(e) => log::warn!("Table detection failed on page {}: {}", number, e),
                }
            }

            extraction.add_page(record);
        }

        log::info!(
            "Extracted {} page(s), {} table(s), {} form field(s) from {}",
            extraction.pages.len(),
            extraction.table_count(),
            extraction.form_fields.len(),
            source
        );

        Ok(extraction)
    }
}

fn read_metadata(info: &DocumentInfo, page_count: u32, is_encrypted: bool) -> Metadata {
    let get = |key: &str| info.get(key).cloned().unwrap_or_default();
    Metadata {
        title: get(info_key::TITLE),
        author: get(info_key::AUTHOR),
        subject: get(info_key::SUBJECT),
        creator: get(info_key::CREATOR),
        producer: get(info_key::PRODUCER),
        creation_date: get(info_key::CREATION_DATE),
        modification_date: get(info_key::MOD_DATE),
        page_count,
        is_encrypted,
    }
}

/// Walk every page for form widgets.
///
/// Failures are recorded as warnings and never abort extraction.
fn collect_form_fields<D: PdfDocument + ?Sized>(doc: &D, extraction: &mut Extraction) {
    for page in 1..=doc.page_count() {
        let widgets = match doc.widgets(page) {
            Ok(widgets) => widgets,
            Err(e) => {
                warn(extraction, format!("Skipping form fields on page {}: {}", page, e));
                continue;
            }
        };

        for widget in widgets {
            match widget {
                Ok(widget) => extraction.form_fields.push(to_form_field(page, widget)),
                Err(e) => warn(extraction, format!("Skipping form field on page {}: {}", page, e)),
            }
        }
    }
}

fn warn(extraction: &mut Extraction, message: String) {
    log::warn!("{}", message);
    extraction.warnings.push(message);
}

fn to_form_field(page: u32, widget: RawWidget) -> FormField {
    FormField::new(
        page,
        widget.name.unwrap_or_default(),
        widget.field_type,
        widget.value.unwrap_or_default(),
        widget.rect,
    )
}
