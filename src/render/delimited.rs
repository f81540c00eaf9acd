//! CSV rendering of the tables of an extraction.
//!
//! Only tables are written. Each table is preceded by a label record
//! `# Table <n> (Page <p>)`, where `n` counts tables across the whole run,
//! and tables are separated by a blank line. Page text and form fields
//! have no CSV representation.

use std::fs;
use std::io::Write;
use std::path::Path;

use csv::{Terminator, WriterBuilder};

use crate::error::{Error, Result};
use crate::model::Extraction;

/// Running table number shared across everything written in one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSequence {
    emitted: usize,
}

impl TableSequence {
    /// Start a new sequence; the first table gets number 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the next table number.
    pub fn next_number(&mut self) -> usize {
        self.emitted += 1;
        self.emitted
    }

    /// Number of tables emitted so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }
}

/// Render the tables of an extraction as CSV.
pub fn to_csv(extraction: &Extraction) -> Result<String> {
    let mut buf = Vec::new();
    write_tables(extraction, &mut buf, &mut TableSequence::new())?;
    String::from_utf8(buf).map_err(|e| Error::Render(format!("CSV is not UTF-8: {}", e)))
}

/// Render tables as CSV and write the result to `path`.
///
/// Nothing is written if rendering fails.
pub fn write_csv(extraction: &Extraction, path: &Path) -> Result<()> {
    let csv = to_csv(extraction)?;
    fs::write(path, csv)?;
    Ok(())
}

/// Write the tables of an extraction to `out`, numbering them from `sequence`.
///
/// A blank line separates every table after the first one written by this
/// call. A row without cells is written as an empty line.
pub fn write_tables<W: Write>(
    extraction: &Extraction,
    mut out: W,
    sequence: &mut TableSequence,
) -> Result<()> {
    let mut builder = WriterBuilder::new();
    builder.flexible(true).terminator(Terminator::Any(b'\n'));

    for (i, (page, table)) in extraction.tables().enumerate() {
        let number = sequence.next_number();
        if i > 0 {
            out.write_all(b"\n")?;
        }

        let mut writer = builder.from_writer(&mut out);
        writer.write_record([format!("# Table {} (Page {})", number, page)])?;
        for row in table.text_rows() {
            if row.is_empty() {
                // csv writes an empty record as `""`
                let inner = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
                inner.write_all(b"\n")?;
                writer = builder.from_writer(inner);
            } else {
                writer.write_record(&row)?;
            }
        }
        writer.flush()?;
    }

    out.flush()?;
    Ok(())
}
