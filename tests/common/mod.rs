//! Test PDFs generated with lopdf.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{
    dictionary, Dictionary, Document, EncryptionState, EncryptionVersion, Object, ObjectId,
    Permissions, Stream, StringFormat,
};

/// A form widget to place on a page.
pub struct Field {
    pub page: usize,
    pub name: &'static str,
    pub kind: &'static str,
    pub flags: i64,
    pub value: Option<Object>,
    pub rect: [i64; 4],
}

/// Builder for small single-font PDFs.
#[derive(Default)]
pub struct TestPdf {
    pages: Vec<Vec<(f32, f32, String)>>,
    fields: Vec<Field>,
    info: Vec<(&'static str, String)>,
}

impl TestPdf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page showing each `(x, y, text)` in 12pt Helvetica.
    pub fn page(mut self, texts: &[(f32, f32, &str)]) -> Self {
        self.pages.push(
            texts
                .iter()
                .map(|(x, y, t)| (*x, *y, t.to_string()))
                .collect(),
        );
        self
    }

    pub fn info(mut self, key: &'static str, value: &str) -> Self {
        self.info.push((key, value.to_string()));
        self
    }

    pub fn text_field(mut self, page: usize, name: &'static str, value: &str, rect: [i64; 4]) -> Self {
        self.fields.push(Field {
            page,
            name,
            kind: "Tx",
            flags: 0,
            value: Some(Object::string_literal(value)),
            rect,
        });
        self
    }

    pub fn checkbox(mut self, page: usize, name: &'static str, on: bool, rect: [i64; 4]) -> Self {
        self.fields.push(Field {
            page,
            name,
            kind: "Btn",
            flags: 0,
            value: Some(Object::Name(if on { b"Yes".to_vec() } else { b"Off".to_vec() })),
            rect,
        });
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        save(self.document())
    }

    /// Save encrypted with RC4 (V2, 128-bit) and the given user password.
    pub fn to_encrypted_bytes(&self, user_password: &str) -> Vec<u8> {
        let mut doc = self.document();
        doc.trailer.set(
            "ID",
            vec![
                Object::String(b"pdfdata-test-id0".to_vec(), StringFormat::Literal),
                Object::String(b"pdfdata-test-id1".to_vec(), StringFormat::Literal),
            ],
        );
        let state = EncryptionState::try_from(EncryptionVersion::V2 {
            document: &doc,
            owner_password: "owner",
            user_password,
            key_length: 128,
            permissions: Permissions::all(),
        })
        .expect("failed to set up encryption");
        doc.encrypt(&state).expect("failed to encrypt test PDF");
        save(doc)
    }

    fn document(&self) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id: ObjectId = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut page_ids: Vec<Object> = Vec::new();
        for (index, texts) in self.pages.iter().enumerate() {
            let content_id = doc.add_object(Stream::new(dictionary! {}, content(texts)));

            let annots: Vec<Object> = self
                .fields
                .iter()
                .filter(|f| f.page == index + 1)
                .map(|f| doc.add_object(widget(f)).into())
                .collect();

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Resources" => resources_id,
                "Contents" => content_id,
                "Annots" => annots,
            });
            page_ids.push(page_id.into());
        }

        let count = page_ids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        if !self.info.is_empty() {
            let mut info = Dictionary::new();
            for (key, value) in &self.info {
                info.set(*key, Object::string_literal(value.as_str()));
            }
            let info_id = doc.add_object(info);
            doc.trailer.set("Info", info_id);
        }

        doc
    }

    /// Save into `dir` and return the file path.
    pub fn write(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.to_bytes()).expect("failed to write test PDF");
        path
    }
}

fn save(mut doc: Document) -> Vec<u8> {
    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save test PDF");
    buf
}

fn content(texts: &[(f32, f32, String)]) -> Vec<u8> {
    let mut operations = Vec::new();
    for (x, y, text) in texts {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
        operations.push(Operation::new(
            "Tm",
            vec![
                1.into(),
                0.into(),
                0.into(),
                1.into(),
                Object::Real(*x),
                Object::Real(*y),
            ],
        ));
        operations.push(Operation::new("Tj", vec![Object::string_literal(text.as_str())]));
        operations.push(Operation::new("ET", vec![]));
    }
    Content { operations }
        .encode()
        .expect("failed to encode content stream")
}

fn widget(field: &Field) -> Dictionary {
    let mut dict = dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "FT" => field.kind,
        "Ff" => field.flags,
        "T" => Object::string_literal(field.name),
        "Rect" => field.rect.iter().map(|v| Object::Integer(*v)).collect::<Vec<_>>(),
    };
    if let Some(value) = &field.value {
        dict.set("V", value.clone());
    }
    dict
}

/// Three pages; page 2 carries a titled table whose last row lacks a cell.
pub fn staff_report() -> TestPdf {
    TestPdf::new()
        .page(&[(72.0, 720.0, "Introduction")])
        .page(&[
            (72.0, 750.0, "Staff"),
            (72.0, 700.0, "Name"),
            (200.0, 700.0, "Age"),
            (72.0, 680.0, "Alice"),
            (200.0, 680.0, "30"),
            (72.0, 660.0, "Bob"),
        ])
        .page(&[(72.0, 720.0, "Appendix")])
        .info("Title", "Staff Report")
        .info("Author", "Records Office")
        .info("CreationDate", "D:20240115103045Z")
        .text_field(1, "reviewer", "Dana", [100, 600, 300, 620])
        .checkbox(3, "approved", true, [100, 500, 112, 512])
}
