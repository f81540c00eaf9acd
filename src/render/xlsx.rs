//! Excel workbook rendering.
//!
//! Sheets are created in a fixed order: `Text`, one `Table_<n>` per table,
//! `Form_Fields` when the document has any, then `Metadata`.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::Extraction;

/// Longest text written to a single cell, in characters.
pub const TEXT_CELL_LIMIT: usize = 32_000;

/// Workbook path derived from the source document's base name.
///
/// `reports/q3.pdf` becomes `q3.xlsx` in the working directory.
pub fn default_xlsx_path(source: &str) -> PathBuf {
    let stem = Path::new(source)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    PathBuf::from(format!("{}.xlsx", stem))
}

/// Clip text to [`TEXT_CELL_LIMIT`] characters.
pub fn clip_cell_text(text: &str) -> &str {
    match text.char_indices().nth(TEXT_CELL_LIMIT) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Write the extraction as a workbook.
///
/// Writes to `output`, or to [`default_xlsx_path`] when none is given, and
/// returns the path used.
#[cfg(feature = "xlsx")]
pub fn write_xlsx(extraction: &Extraction, output: Option<&Path>) -> Result<PathBuf> {
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_xlsx_path(&extraction.source));

    let mut workbook = sheets::build(extraction)?;
    workbook.save(&path)?;
    log::debug!("Workbook saved to {}", path.display());

    Ok(path)
}

/// Write the extraction as a workbook.
///
/// This build has no workbook support.
#[cfg(not(feature = "xlsx"))]
pub fn write_xlsx(_extraction: &Extraction, _output: Option<&Path>) -> Result<PathBuf> {
    Err(crate::error::Error::MissingDependency("xlsx"))
}

#[cfg(feature = "xlsx")]
mod sheets {
    use rust_xlsxwriter::{Color, Format, FormatPattern, Workbook, Worksheet};

    use super::clip_cell_text;
    use crate::error::Result;
    use crate::model::{cell_text, Extraction, Table};

    pub(super) fn build(extraction: &Extraction) -> Result<Workbook> {
        let bold = Format::new().set_bold();
        let shaded = Format::new()
            .set_bold()
            .set_background_color(Color::RGB(0xCCCCCC))
            .set_pattern(FormatPattern::Solid);

        let mut workbook = Workbook::new();

        let sheet = workbook.add_worksheet().set_name("Text")?;
        write_header(sheet, &["Page", "Content"], &bold)?;
        for (i, page) in extraction.pages.iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_number(row, 0, page.number)?;
            sheet.write_string(row, 1, clip_cell_text(page.text_or_empty()))?;
        }

        for (i, (_, table)) in extraction.tables().enumerate() {
            let sheet = workbook
                .add_worksheet()
                .set_name(format!("Table_{}", i + 1))?;
            write_table(sheet, table, &shaded)?;
        }

        if extraction.has_form_fields() {
            let sheet = workbook.add_worksheet().set_name("Form_Fields")?;
            write_header(sheet, &["Page", "Field Name", "Type", "Value"], &bold)?;
            for (i, field) in extraction.form_fields.iter().enumerate() {
                let row = i as u32 + 1;
                sheet.write_number(row, 0, field.page)?;
                sheet.write_string(row, 1, clip_cell_text(&field.field_name))?;
                sheet.write_string(row, 2, &field.field_type)?;
                sheet.write_string(row, 3, clip_cell_text(&field.field_value))?;
            }
        }

        let sheet = workbook.add_worksheet().set_name("Metadata")?;
        write_header(sheet, &["Property", "Value"], &bold)?;
        for (i, (key, value)) in extraction.metadata.properties().into_iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_string(row, 0, key)?;
            sheet.write_string(row, 1, clip_cell_text(&value))?;
        }

        Ok(workbook)
    }

    fn write_header(sheet: &mut Worksheet, labels: &[&str], format: &Format) -> Result<()> {
        for (col, label) in labels.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *label, format)?;
        }
        Ok(())
    }

    /// First row styled as a header, remaining rows plain.
    fn write_table(sheet: &mut Worksheet, table: &Table, header: &Format) -> Result<()> {
        for (r, row) in table.rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let (r, c) = (r as u32, c as u16);
                let text = clip_cell_text(cell_text(cell));
                match (r == 0, text.is_empty()) {
                    (true, true) => {
                        sheet.write_blank(r, c, header)?;
                    }
                    (true, false) => {
                        sheet.write_string_with_format(r, c, text, header)?;
                    }
                    (false, true) => {}
                    (false, false) => {
                        sheet.write_string(r, c, text)?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_xlsx_path() {
        assert_eq!(default_xlsx_path("reports/q3.pdf"), PathBuf::from("q3.xlsx"));
        assert_eq!(default_xlsx_path("scan"), PathBuf::from("scan.xlsx"));
        assert_eq!(default_xlsx_path(""), PathBuf::from("output.xlsx"));
    }

    #[test]
    fn test_clip_cell_text() {
        assert_eq!(clip_cell_text("short"), "short");

        let long = "é".repeat(TEXT_CELL_LIMIT + 10);
        let clipped = clip_cell_text(&long);
        assert_eq!(clipped.chars().count(), TEXT_CELL_LIMIT);
    }

    #[cfg(not(feature = "xlsx"))]
    #[test]
    fn test_missing_dependency() {
        use crate::error::Error;
        use crate::model::Metadata;

        let extraction = Extraction::new("a.pdf", Metadata::default());
        assert!(matches!(
            write_xlsx(&extraction, None),
            Err(Error::MissingDependency("xlsx"))
        ));
    }
}
