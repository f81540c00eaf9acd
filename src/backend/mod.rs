//! PDF document access.
//!
//! The extraction pipeline never touches a concrete PDF library. It works
//! against the [`PdfDocument`] trait, which exposes exactly what the
//! normalizer needs: page count, encryption flag, the info dictionary,
//! layout text, table detection, and form widgets. [`LopdfDocument`] is the
//! implementation backed by `lopdf`.

mod layout;
mod lopdf_backend;
mod table_detector;

pub use layout::{layout_text, SpanExtractor, TextSpan};
pub use lopdf_backend::LopdfDocument;
pub use table_detector::{TableDetector, TableDetectorConfig};

use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

use crate::error::Result;
use crate::model::Table;

/// Document info dictionary: known keys (see [`info_key`]) to text values.
///
/// Keys the document does not carry are simply absent.
pub type DocumentInfo = BTreeMap<String, String>;

/// Keys of the document info dictionary read by the normalizer.
pub mod info_key {
    pub const TITLE: &str = "Title";
    pub const AUTHOR: &str = "Author";
    pub const SUBJECT: &str = "Subject";
    pub const CREATOR: &str = "Creator";
    pub const PRODUCER: &str = "Producer";
    pub const CREATION_DATE: &str = "CreationDate";
    pub const MOD_DATE: &str = "ModDate";

    /// Every key, in the order they are read.
    pub const ALL: [&str; 7] = [
        TITLE,
        AUTHOR,
        SUBJECT,
        CREATOR,
        PRODUCER,
        CREATION_DATE,
        MOD_DATE,
    ];
}

/// An interactive form widget as reported by a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct RawWidget {
    /// Fully qualified field name
    pub name: Option<String>,
    /// Type label (`Text`, `CheckBox`, ...)
    pub field_type: String,
    /// Current value
    pub value: Option<String>,
    /// `[left, top, right, bottom]` with a top-left origin
    pub rect: [f32; 4],
}

/// Abstract interface for an open PDF document.
///
/// Pages are addressed by their 1-indexed number.
pub trait PdfDocument {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Whether the document is encrypted.
    fn is_encrypted(&self) -> bool;

    /// The document info dictionary.
    fn info(&self) -> DocumentInfo;

    /// Text of a page in reading order, preserving the visual layout.
    fn page_text(&self, page: u32) -> Result<String>;

    /// Whether this backend can detect tables at all.
    ///
    /// Probed once per run. When `false`, [`find_tables`](Self::find_tables)
    /// is never called and every page yields zero tables.
    fn supports_table_detection(&self) -> bool;

    /// Tables detected on a page, in detection order.
    fn find_tables(&self, page: u32) -> Result<Vec<Table>>;

    /// Form widgets on a page.
    ///
    /// The outer error covers the whole page; inner errors cover a single
    /// widget that could not be read.
    fn widgets(&self, page: u32) -> Result<Vec<Result<RawWidget>>>;

    /// Release resources held by the document. Must tolerate repeat calls.
    fn close(&mut self) {}
}

/// Scoped ownership of an open document.
///
/// Closes the document exactly once when dropped, whether extraction
/// succeeded or bailed out with an error.
pub struct DocumentHandle<D: PdfDocument> {
    doc: D,
}

impl<D: PdfDocument> DocumentHandle<D> {
    /// Take ownership of an open document.
    pub fn new(doc: D) -> Self {
        Self { doc }
    }
}

impl<D: PdfDocument> Deref for DocumentHandle<D> {
    type Target = D;

    fn deref(&self) -> &D {
        &self.doc
    }
}

impl<D: PdfDocument> DerefMut for DocumentHandle<D> {
    fn deref_mut(&mut self) -> &mut D {
        &mut self.doc
    }
}

impl<D: PdfDocument> Drop for DocumentHandle<D> {
    fn drop(&mut self) {
        self.doc.close();
    }
}
