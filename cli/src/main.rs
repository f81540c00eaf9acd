//! pdfdata CLI - extract text, tables and form fields from PDFs

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use colored::Colorize;

use pdfdata::convert::{convert_file, ConvertOptions};
use pdfdata::{Error, ExtractOptions, LopdfDocument, OutputFormat, PdfDocument, RenderOutput};

#[derive(Parser)]
#[command(name = "pdfdata")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract structured data from PDFs", long_about = None)]
#[command(after_help = "Examples:
  pdfdata document.pdf
  pdfdata report.pdf --format xlsx --output data.xlsx
  pdfdata forms.pdf --format csv --tables-only
  pdfdata large.pdf --page 5 --format json")]
struct Cli {
    /// Path to PDF file
    #[arg(value_name = "PDF_FILE")]
    pdf_file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json", env = "PDFDATA_FORMAT")]
    format: Format,

    /// Output file path (xlsx defaults to <name>.xlsx)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Extract only tables, skip text content
    #[arg(short, long)]
    tables_only: bool,

    /// Extract specific page only (1-indexed)
    #[arg(short, long, value_name = "N", allow_negative_numbers = true)]
    page: Option<i64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Full extraction as JSON
    Json,
    /// Tables only, as CSV
    Csv,
    /// Excel workbook
    Xlsx,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => OutputFormat::Json,
            Format::Csv => OutputFormat::Csv,
            Format::Xlsx => OutputFormat::Xlsx,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> pdfdata::Result<()> {
    if !cli.pdf_file.exists() {
        return Err(Error::Other(format!(
            "File not found: {}",
            cli.pdf_file.display()
        )));
    }
    if !has_pdf_extension(&cli.pdf_file) {
        eprintln!(
            "{}: File may not be a PDF: {}",
            "Warning".yellow().bold(),
            cli.pdf_file.display()
        );
    }

    let page = match cli.page {
        Some(page) => Some(page_number(&cli.pdf_file, page)?),
        None => None,
    };

    let format = OutputFormat::from(cli.format);
    let mut options = ConvertOptions::new().with_format(format).with_extract_options(
        ExtractOptions::new()
            .with_page_opt(page)
            .with_tables_only(cli.tables_only),
    );
    if let Some(output) = &cli.output {
        options = options.with_output(output);
    }

    let result = convert_file(&cli.pdf_file, &options)?;
    log::debug!(
        "{} page(s), {} table(s), {} form field(s), {} warning(s)",
        result.page_count,
        result.table_count,
        result.form_field_count,
        result.warnings.len()
    );

    match result.output {
        RenderOutput::Text(text) if text.ends_with('\n') => print!("{}", text),
        RenderOutput::Text(text) => println!("{}", text),
        RenderOutput::File(path) => {
            eprintln!("{} written to: {}", format.label(), path.display().to_string().cyan());
        }
    }

    Ok(())
}

/// Narrow a requested page to `u32`.
///
/// Pages that cannot exist (negative or huge) are reported against the
/// document's page count, like any other out-of-range page.
fn page_number(path: &Path, page: i64) -> pdfdata::Result<u32> {
    if let Ok(page) = u32::try_from(page) {
        return Ok(page);
    }
    let doc = LopdfDocument::open(path)?;
    if doc.is_encrypted() {
        return Err(Error::Encrypted(path.display().to_string()));
    }
    Err(Error::PageOutOfRange {
        page,
        page_count: doc.page_count(),
    })
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}
