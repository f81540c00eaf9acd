//! [`PdfDocument`] implementation backed by `lopdf`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::Table;

use super::layout::{decode_pdf_string, layout_text, number, SpanExtractor, TextSpan};
use super::table_detector::TableDetector;
use super::{info_key, DocumentInfo, PdfDocument, RawWidget};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3;

/// Deepest /Parent chain followed when resolving inherited attributes.
const MAX_INHERIT_DEPTH: usize = 32;

/// Letter height, used when a page has no usable MediaBox.
const DEFAULT_PAGE_HEIGHT: f32 = 792.0;

mod field_flags {
    pub const RADIO: i64 = 1 << 15;
    pub const PUSHBUTTON: i64 = 1 << 16;
    pub const COMBO: i64 = 1 << 17;
}

/// A PDF document loaded with `lopdf`.
pub struct LopdfDocument {
    doc: Option<Document>,
    pages: BTreeMap<u32, ObjectId>,
    encrypted: bool,
    detector: TableDetector,
}

impl LopdfDocument {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut header = Vec::with_capacity(16);
        File::open(path)?.take(16).read_to_end(&mut header)?;
        check_header(&header)?;

        let doc = Document::load(path).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted(path.display().to_string()),
            other => Error::from(other),
        })?;
        log::debug!("Loaded {} (PDF {})", path.display(), doc.version);

        Ok(Self::from_document(doc))
    }

    /// Parse a PDF held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        check_header(data)?;
        Ok(Self::from_document(Document::load_mem(data)?))
    }

    /// Wrap an already loaded document.
    pub fn from_document(doc: Document) -> Self {
        Self {
            pages: doc.get_pages(),
            encrypted: doc.is_encrypted(),
            doc: Some(doc),
            detector: TableDetector::new(),
        }
    }

    /// Replace the table detector.
    pub fn with_detector(mut self, detector: TableDetector) -> Self {
        self.detector = detector;
        self
    }

    fn doc(&self) -> Result<&Document> {
        self.doc
            .as_ref()
            .ok_or_else(|| Error::Other("document is closed".to_string()))
    }

    fn page_id(&self, page: u32) -> Result<ObjectId> {
        self.pages
            .get(&page)
            .copied()
            .ok_or(Error::PageOutOfRange {
                page: page.into(),
                page_count: self.page_count(),
            })
    }

    fn spans(&self, page: u32) -> Result<Vec<TextSpan>> {
        let doc = self.doc()?;
        SpanExtractor::new(doc)
            .page_spans(self.page_id(page)?)
            .map_err(|e| Error::PageContent {
                page,
                reason: e.to_string(),
            })
    }

    /// Resolve a possibly indirect object to a dictionary.
    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        let doc = self.doc().ok()?;
        doc.dereference(obj).ok()?.1.as_dict().ok()
    }

    /// A dictionary followed by its /Parent ancestors.
    fn ancestry<'a>(&'a self, dict: &'a Dictionary) -> Vec<&'a Dictionary> {
        let mut chain = vec![dict];
        let mut current = dict;
        while chain.len() < MAX_INHERIT_DEPTH {
            match current.get(b"Parent").ok().and_then(|p| self.resolve_dict(p)) {
                Some(parent) => {
                    chain.push(parent);
                    current = parent;
                }
                None => break,
            }
        }
        chain
    }

    /// First value of `key` along an ancestry chain, dereferenced.
    fn inherited<'a>(&'a self, chain: &[&'a Dictionary], key: &[u8]) -> Option<&'a Object> {
        let doc = self.doc().ok()?;
        chain
            .iter()
            .find_map(|dict| dict.get(key).ok())
            .and_then(|obj| doc.dereference(obj).ok())
            .map(|(_, obj)| obj)
    }

    /// Top edge of the page's MediaBox.
    fn page_top(&self, page: &Dictionary) -> f32 {
        self.inherited(&self.ancestry(page), b"MediaBox")
            .and_then(|obj| obj.as_array().ok())
            .and_then(|arr| arr.get(3))
            .and_then(number)
            .unwrap_or(DEFAULT_PAGE_HEIGHT)
    }

    fn read_widget(&self, widget: &Dictionary, page_top: f32) -> Result<RawWidget> {
        let chain = self.ancestry(widget);

        let mut parts: Vec<String> = chain
            .iter()
            .filter_map(|dict| match dict.get(b"T") {
                Ok(Object::String(bytes, _)) => Some(decode_pdf_string(bytes)),
                _ => None,
            })
            .collect();
        parts.reverse();
        let name = (!parts.is_empty()).then(|| parts.join("."));

        let kind = self
            .inherited(&chain, b"FT")
            .and_then(|obj| obj.as_name().ok())
            .unwrap_or_default();
        let flags = self
            .inherited(&chain, b"Ff")
            .and_then(|obj| obj.as_i64().ok())
            .unwrap_or(0);

        let value = self
            .inherited(&chain, b"V")
            .map(|obj| self.value_text(obj))
            .filter(|v| !v.is_empty());

        let rect = widget
            .get(b"Rect")
            .and_then(Object::as_array)
            .map_err(|_| Error::Other(format!("widget {:?} has no Rect", name)))?;
        let coords: Vec<f32> = rect.iter().filter_map(number).collect();
        let [x0, y0, x1, y1] = coords[..] else {
            return Err(Error::Other(format!("widget {:?} has a malformed Rect", name)));
        };

        Ok(RawWidget {
            name,
            field_type: field_type_label(kind, flags).to_string(),
            value,
            rect: [
                x0.min(x1),
                page_top - y0.max(y1),
                x0.max(x1),
                page_top - y0.min(y1),
            ],
        })
    }

    /// Text of a field value: strings, names, numbers, or arrays of them.
    fn value_text(&self, obj: &Object) -> String {
        match obj {
            Object::String(bytes, _) => decode_pdf_string(bytes),
            Object::Name(name) => String::from_utf8_lossy(name).into_owned(),
            Object::Integer(i) => i.to_string(),
            Object::Real(r) => r.to_string(),
            Object::Boolean(b) => b.to_string(),
            Object::Array(items) => items
                .iter()
                .filter_map(|item| self.doc().ok()?.dereference(item).ok())
                .map(|(_, resolved)| self.value_text(resolved))
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            _ => String::new(),
        }
    }
}

impl PdfDocument for LopdfDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    fn info(&self) -> DocumentInfo {
        let mut info = DocumentInfo::new();
        let Ok(doc) = self.doc() else {
            return info;
        };
        let Some(dict) = doc
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|obj| self.resolve_dict(obj))
        else {
            return info;
        };

        for key in info_key::ALL {
            let value = match dict.get(key.as_bytes()).map(|obj| doc.dereference(obj)) {
                Ok(Ok((_, Object::String(bytes, _)))) => Some(decode_pdf_string(bytes)),
                Ok(Ok((_, Object::Name(name)))) => Some(String::from_utf8_lossy(name).into_owned()),
                _ => None,
            };
            if let Some(value) = value {
                info.insert(key.to_string(), value);
            }
        }
        info
    }

    fn page_text(&self, page: u32) -> Result<String> {
        Ok(layout_text(&self.spans(page)?))
    }

    fn supports_table_detection(&self) -> bool {
        true
    }

    fn find_tables(&self, page: u32) -> Result<Vec<Table>> {
        Ok(self.detector.detect(&self.spans(page)?))
    }

    fn widgets(&self, page: u32) -> Result<Vec<Result<RawWidget>>> {
        let doc = self.doc()?;
        let page_dict = doc.get_dictionary(self.page_id(page)?)?;
        let page_top = self.page_top(page_dict);

        let annots = match page_dict.get(b"Annots") {
            Ok(obj) => doc.dereference(obj)?.1.as_array()?,
            Err(_) => return Ok(Vec::new()),
        };

        let mut widgets = Vec::new();
        for annot in annots {
            let Some(dict) = self.resolve_dict(annot) else {
                widgets.push(Err(Error::Other(format!(
                    "unreadable annotation on page {}",
                    page
                ))));
                continue;
            };
            if dict.get(b"Subtype").and_then(Object::as_name).ok() != Some(b"Widget".as_slice()) {
                continue;
            }
            widgets.push(self.read_widget(dict, page_top));
        }
        Ok(widgets)
    }

    fn close(&mut self) {
        if self.doc.take().is_some() {
            log::trace!("Closed document ({} pages)", self.pages.len());
        }
    }
}

/// Validate the `%PDF-x.y` header.
fn check_header(data: &[u8]) -> Result<()> {
    if data.len() < PDF_MAGIC.len() + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version = &data[PDF_MAGIC.len()..PDF_MAGIC.len() + VERSION_LEN];
    match version {
        [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit() => Ok(()),
        _ => Err(Error::UnsupportedVersion(
            String::from_utf8_lossy(version).into_owned(),
        )),
    }
}

/// Widget type label from the field type and its flags.
fn field_type_label(kind: &[u8], flags: i64) -> &'static str {
    match kind {
        b"Tx" => "Text",
        b"Btn" if flags & field_flags::PUSHBUTTON != 0 => "Button",
        b"Btn" if flags & field_flags::RADIO != 0 => "RadioButton",
        b"Btn" => "CheckBox",
        b"Ch" if flags & field_flags::COMBO != 0 => "ComboBox",
        b"Ch" => "ListBox",
        b"Sig" => "Signature",
        _ => "unknown",
    }
}
