//! Table detection using text position analysis.
//!
//! Tables are found from text alignment alone, without ruling lines: spans
//! are grouped into rows, left edges that repeat across rows become column
//! boundaries, and runs of well-aligned rows become tables.

use std::collections::{HashMap, HashSet};

use crate::model::{Cell, Table};

use super::layout::{group_rows, SpanRow, TextSpan};

/// Width of the buckets left edges are snapped to (points).
const EDGE_BUCKET: f32 = 5.0;

/// Distance within which a span counts as aligned to a column (points).
const ALIGN_TOLERANCE: f32 = 5.0;

/// Table detector configuration.
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
    /// Y tolerance for grouping spans into rows (fraction of font size)
    pub y_tolerance_factor: f32,
    /// Minimum column alignment ratio (0.0-1.0)
    pub min_alignment_ratio: f32,
    /// Minimum gap between columns (points)
    pub min_column_gap: f32,
    /// Vertical gap between rows that ends a table (fraction of font size)
    pub max_row_gap_factor: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 10,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.5,
            min_column_gap: 15.0,
            max_row_gap_factor: 2.5,
        }
    }
}

/// Detects tables in a list of text spans.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Create a new table detector with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new table detector with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Detect tables in the given spans, top of the page first.
    ///
    /// A column with no text in a row yields an empty marker (`None`) for
    /// that cell.
    pub fn detect(&self, spans: &[TextSpan]) -> Vec<Table> {
        log::debug!("TableDetector: starting with {} spans", spans.len());

        if spans.len() < self.config.min_rows * self.config.min_columns {
            return Vec::new();
        }

        let rows = group_rows(spans, self.config.y_tolerance_factor);
        if rows.len() < self.config.min_rows {
            return Vec::new();
        }

        let columns = self.detect_columns(&rows);
        log::debug!("TableDetector: page columns at {:?}", columns);
        if columns.len() < self.config.min_columns {
            return Vec::new();
        }

        let mut tables = Vec::new();
        for (start, end) in self.find_table_regions(&rows, &columns) {
            let region = &rows[start..=end];

            // Re-detect columns for this specific region
            let region_columns = self.detect_columns(region);
            if region_columns.len() < self.config.min_columns {
                continue;
            }
            if region_columns.len() > self.config.max_columns {
                log::debug!(
                    "TableDetector: skipping region, too many columns ({} > {})",
                    region_columns.len(),
                    self.config.max_columns
                );
                continue;
            }
            if self.is_list_pattern(region, &region_columns) {
                log::debug!("TableDetector: skipping region, detected as list pattern");
                continue;
            }

            tables.push(build_table(region, &region_columns));
        }

        log::debug!("TableDetector: found {} tables", tables.len());
        tables
    }

    /// Detect column boundaries from the left edges of spans.
    ///
    /// Only rows with two or more spans vote, unless there are too few of
    /// them, in which case every row does. An edge becomes a column when it
    /// shows up in enough voting rows.
    fn detect_columns(&self, rows: &[SpanRow]) -> Vec<f32> {
        let multi_span: Vec<&SpanRow> = rows.iter().filter(|r| r.spans.len() >= 2).collect();
        let voters: Vec<&SpanRow> = if multi_span.len() >= self.config.min_rows {
            multi_span
        } else {
            rows.iter().collect()
        };
        if voters.is_empty() {
            return Vec::new();
        }

        let mut edge_counts: HashMap<i32, usize> = HashMap::new();
        for row in &voters {
            let buckets: HashSet<i32> = row
                .spans
                .iter()
                .map(|span| (span.x / EDGE_BUCKET).round() as i32)
                .collect();
            for bucket in buckets {
                *edge_counts.entry(bucket).or_insert(0) += 1;
            }
        }

        let min_occurrences =
            ((voters.len() as f32 * self.config.min_alignment_ratio) as usize).max(2);

        let mut edges: Vec<f32> = edge_counts
            .into_iter()
            .filter(|(_, count)| *count >= min_occurrences)
            .map(|(bucket, _)| bucket as f32 * EDGE_BUCKET)
            .collect();
        edges.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mut merged: Vec<f32> = Vec::new();
        for edge in edges {
            match merged.last() {
                Some(&last) if edge - last < self.config.min_column_gap => {}
                _ => merged.push(edge),
            }
        }
        merged
    }

    /// Find contiguous, well-aligned row runs that form tables.
    ///
    /// A run ends at a poorly aligned row or at a vertical gap larger than
    /// the configured fraction of the font size.
    fn find_table_regions(&self, rows: &[SpanRow], columns: &[f32]) -> Vec<(usize, usize)> {
        let mut regions = Vec::new();
        let mut start: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            let aligned = alignment_score(row, columns) >= self.config.min_alignment_ratio;
            let gap_break = i > 0 && {
                let prev = &rows[i - 1];
                let size = row
                    .spans
                    .iter()
                    .chain(prev.spans.iter())
                    .map(|s| s.font_size)
                    .fold(0.0_f32, f32::max);
                prev.y - row.y > size * self.config.max_row_gap_factor
            };

            if let Some(s) = start {
                if !aligned || gap_break {
                    if i - s >= self.config.min_rows {
                        regions.push((s, i - 1));
                    }
                    start = None;
                }
            }
            if aligned && start.is_none() {
                start = Some(i);
            }
        }

        if let Some(s) = start {
            if rows.len() - s >= self.config.min_rows {
                regions.push((s, rows.len() - 1));
            }
        }

        regions
    }

    /// Check if rows actually represent a numbered or bulleted list.
    ///
    /// A list like "1. Item" often splits into a marker span and a text
    /// span, which looks like a two-column table.
    fn is_list_pattern(&self, rows: &[SpanRow], columns: &[f32]) -> bool {
        if columns.len() < 2 || rows.is_empty() {
            return false;
        }

        let mut bullets = 0;
        let mut numbers = 0;
        for row in rows {
            if let Some(first) = row.spans.first() {
                let text = first.text.trim();
                if is_bullet_marker(text) {
                    bullets += 1;
                } else if is_number_marker(text) {
                    numbers += 1;
                }
            }
        }

        let bullet_ratio = bullets as f32 / rows.len() as f32;
        let marker_ratio = (bullets + numbers) as f32 / rows.len() as f32;

        bullet_ratio >= 0.5 || (columns.len() == 2 && marker_ratio >= 0.5)
    }
}

/// Fraction of a row's spans that start on a column edge.
fn alignment_score(row: &SpanRow, columns: &[f32]) -> f32 {
    if row.spans.is_empty() || columns.is_empty() {
        return 0.0;
    }
    let aligned = row
        .spans
        .iter()
        .filter(|span| columns.iter().any(|col| (span.x - col).abs() <= ALIGN_TOLERANCE))
        .count();
    aligned as f32 / row.spans.len() as f32
}

/// Lay a region's spans out on the column grid.
fn build_table(rows: &[SpanRow], columns: &[f32]) -> Table {
    let mut table = Table::new();
    for row in rows {
        let mut cells: Vec<Vec<&str>> = vec![Vec::new(); columns.len()];
        for span in &row.spans {
            let idx = column_for(span.x, columns);
            let text = span.text.trim();
            if !text.is_empty() {
                cells[idx].push(text);
            }
        }
        let cells: Vec<Cell> = cells
            .into_iter()
            .map(|parts| (!parts.is_empty()).then(|| parts.join(" ")))
            .collect();
        table.add_row(cells);
    }
    table
}

/// Column a span belongs to: the last column starting at or before it,
/// allowing spans to sit slightly left of the edge.
fn column_for(x: f32, columns: &[f32]) -> usize {
    columns
        .iter()
        .rposition(|&start| x >= start - 10.0)
        .unwrap_or(0)
}

/// Check if text is a bullet marker (•, -, etc.).
fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text.trim(),
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "▸" | "►" | "■" | "●" | "□" | "◆" | "▶" | "➤"
    )
}

/// Check if text is a number-style list marker (1., 2), a., etc.).
fn is_number_marker(text: &str) -> bool {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return false;
    }

    if let Some(pos) = cleaned.find(|c: char| !c.is_ascii_digit()) {
        let (digits, suffix) = cleaned.split_at(pos);
        if !digits.is_empty() && (suffix == "." || suffix == ")") {
            return true;
        }
    }

    let mut chars = cleaned.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(letter), Some('.' | ')'), None) => letter.is_alphabetic(),
        _ => false,
    }
}
