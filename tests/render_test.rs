//! Integration tests for the output formats.

mod common;

use calamine::{open_workbook, Data, Reader, Xlsx};
use pdfdata::convert::{convert_file, ConvertOptions};
use pdfdata::render::{self, JsonFormat, TEXT_CELL_LIMIT};
use pdfdata::{
    extract_bytes, Extraction, ExtractOptions, FormField, Metadata, OutputFormat, PageRecord,
    RenderOutput, Table,
};

fn three_pages_one_table() -> Extraction {
    let mut extraction = Extraction::new("sample.pdf", Metadata {
        page_count: 3,
        ..Default::default()
    });
    extraction.add_page(PageRecord::new(1).with_text("one\n"));
    extraction.add_page(PageRecord::new(2).with_text("two\n").with_tables(vec![
        Table::from_rows(vec![
            vec![Some("Item".into()), Some("Qty".into())],
            vec![Some("Bolt".into()), None],
        ]),
    ]));
    extraction.add_page(PageRecord::new(3).with_text("three\n"));
    extraction
}

fn string(value: &str) -> Data {
    Data::String(value.to_string())
}

#[test]
fn test_csv_missing_cell_on_page_two() {
    let csv = render::to_csv(&three_pages_one_table()).unwrap();
    assert_eq!(csv, "# Table 1 (Page 2)\nItem,Qty\nBolt,\n");
}

#[test]
fn test_csv_sequence_spans_pages() {
    let t = || Table::from_strings([["a", "b"], ["c", "d"]]);
    let mut extraction = Extraction::new("x.pdf", Metadata::default());
    extraction.add_page(PageRecord::new(1).with_tables(vec![t(), t()]));
    extraction.add_page(PageRecord::new(2));
    extraction.add_page(PageRecord::new(3).with_tables(vec![t()]));

    let csv = render::to_csv(&extraction).unwrap();
    let expected = "\
# Table 1 (Page 1)
a,b
c,d

# Table 2 (Page 1)
a,b
c,d

# Table 3 (Page 3)
a,b
c,d
";
    assert_eq!(csv, expected);
}

#[test]
fn test_json_round_trip_from_pdf() {
    let extraction = extract_bytes(
        &common::staff_report().to_bytes(),
        "staff.pdf",
        &ExtractOptions::default(),
    )
    .unwrap();

    let json = render::to_json(&extraction, JsonFormat::Pretty).unwrap();
    let parsed = render::from_json(&json).unwrap();

    assert_eq!(parsed.metadata, extraction.metadata);
    assert_eq!(parsed.pages.len(), extraction.pages.len());
    assert_eq!(parsed.form_fields, extraction.form_fields);
    let cells: Vec<Vec<&str>> = parsed.pages[1].tables[0].text_rows().collect();
    assert_eq!(cells, vec![vec!["Name", "Age"], vec!["Alice", "30"], vec!["Bob", ""]]);
}

#[test]
fn test_json_keeps_non_ascii() {
    let mut extraction = Extraction::new("문서.pdf", Metadata::default());
    extraction.add_page(PageRecord::new(1).with_text("Grüße, 世界\n"));
    let json = render::to_json(&extraction, JsonFormat::Pretty).unwrap();
    assert!(json.contains("Grüße, 世界"));
    assert!(json.contains("문서.pdf"));
}

#[test]
fn test_xlsx_sheet_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("staff.xlsx");

    let mut extraction = three_pages_one_table();
    extraction
        .form_fields
        .push(FormField::new(1, "reviewer", "Text", "Dana", [0.0, 0.0, 10.0, 10.0]));
    extraction
        .form_fields
        .push(FormField::new(3, "approved", "CheckBox", "Yes", [0.0, 0.0, 10.0, 10.0]));

    let written = render::write_xlsx(&extraction, Some(&path)).unwrap();
    assert_eq!(written, path);

    let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
    assert_eq!(
        workbook.sheet_names(),
        vec!["Text", "Table_1", "Form_Fields", "Metadata"]
    );

    let text = workbook.worksheet_range("Text").unwrap();
    assert_eq!(text.height(), 4);
    assert_eq!(text.get_value((0, 1)), Some(&string("Content")));
    assert_eq!(text.get_value((2, 0)), Some(&Data::Float(2.0)));
    assert_eq!(text.get_value((2, 1)), Some(&string("two\n")));

    let table = workbook.worksheet_range("Table_1").unwrap();
    assert_eq!(table.get_value((0, 0)), Some(&string("Item")));
    assert_eq!(table.get_value((1, 0)), Some(&string("Bolt")));
    assert!(matches!(table.get_value((1, 1)), None | Some(Data::Empty)));

    let fields = workbook.worksheet_range("Form_Fields").unwrap();
    assert_eq!(fields.height(), 3);
    assert_eq!(fields.get_value((0, 1)), Some(&string("Field Name")));
    assert_eq!(fields.get_value((2, 3)), Some(&string("Yes")));

    let metadata = workbook.worksheet_range("Metadata").unwrap();
    assert_eq!(metadata.height(), 10);
    let rows: Vec<(String, String)> = metadata
        .rows()
        .skip(1)
        .map(|row| (row[0].to_string(), row[1].to_string()))
        .collect();
    assert!(rows.contains(&("page_count".to_string(), "3".to_string())));
    assert!(rows.contains(&("is_encrypted".to_string(), "false".to_string())));
}

#[test]
fn test_xlsx_without_form_fields_has_no_form_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.xlsx");

    render::write_xlsx(&three_pages_one_table(), Some(&path)).unwrap();

    let workbook: Xlsx<_> = open_workbook(&path).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["Text", "Table_1", "Metadata"]);
}

#[test]
fn test_xlsx_clips_long_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("long.xlsx");

    let mut extraction = Extraction::new("long.pdf", Metadata::default());
    extraction.add_page(PageRecord::new(1).with_text("x".repeat(TEXT_CELL_LIMIT + 5_000)));
    render::write_xlsx(&extraction, Some(&path)).unwrap();

    let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
    let text = workbook.worksheet_range("Text").unwrap();
    match text.get_value((1, 1)) {
        Some(Data::String(s)) => assert_eq!(s.len(), TEXT_CELL_LIMIT),
        other => panic!("unexpected cell {:?}", other),
    }
}

#[test]
fn test_xlsx_tables_only_text_sheet_is_empty_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tables.xlsx");

    let mut extraction = Extraction::new("t.pdf", Metadata::default());
    extraction.add_page(PageRecord::new(1));
    render::write_xlsx(&extraction, Some(&path)).unwrap();

    let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
    let text = workbook.worksheet_range("Text").unwrap();
    assert_eq!(text.get_value((1, 0)), Some(&Data::Float(1.0)));
}

#[test]
fn test_convert_file_xlsx_from_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = common::staff_report().write(dir.path(), "staff.pdf");
    let output = dir.path().join("report.xlsx");

    let result = convert_file(
        &pdf,
        &ConvertOptions::new()
            .with_format(OutputFormat::Xlsx)
            .with_output(&output),
    )
    .unwrap();

    assert_eq!(result.output, RenderOutput::File(output.clone()));
    assert_eq!(result.table_count, 1);
    assert_eq!(result.form_field_count, 2);

    let workbook: Xlsx<_> = open_workbook(&output).unwrap();
    assert_eq!(
        workbook.sheet_names(),
        vec!["Text", "Table_1", "Form_Fields", "Metadata"]
    );
}

#[test]
fn test_convert_file_json_to_stdout_text() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = common::staff_report().write(dir.path(), "staff.pdf");

    let result = convert_file(&pdf, &ConvertOptions::new().tables_only()).unwrap();
    let json = result.output.text().unwrap();
    let value: serde_json::Value = serde_json::from_str(json).unwrap();

    assert_eq!(value["pages"].as_array().unwrap().len(), 3);
    assert!(value["pages"][0].get("text").is_none());
    assert_eq!(value["pages"][1]["tables"][0][2][1], "");
    assert_eq!(value["metadata"]["title"], "Staff Report");
}
