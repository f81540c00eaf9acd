//! Table types.

use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};

/// A table cell: text, or the detector's explicit "empty" marker.
pub type Cell = Option<String>;

/// Text of a cell, with the empty marker rendered as `""`.
pub fn cell_text(cell: &Cell) -> &str {
    cell.as_deref().unwrap_or("")
}

/// A detected table as a grid of cells.
///
/// Rows may be ragged. Empty markers survive in memory and are only
/// turned into empty strings when a renderer writes the table out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Table {
    /// Rows in detection order
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Create a table from rows of cells.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Create a table where every cell holds text.
    pub fn from_strings<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|s| Some(s.into())).collect())
                .collect(),
        }
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (widest row).
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows with every cell as text.
    pub fn text_rows(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        self.rows
            .iter()
            .map(|row| row.iter().map(cell_text).collect())
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in self.text_rows() {
            seq.serialize_element(&row)?;
        }
        seq.end()
    }
}
