//! Table types.

use super::{Alignment, Paragraph};
use serde::{Deserialize, Serialize};

/// A row-major string matrix, header-first.
///
/// Row 0 is conventionally the header. All rows produced by a single build
/// share row 0's column count; mismatches are not enforced and simply render
/// uneven rows.
pub type TableGrid = Vec<Vec<String>>;

/// A materialized table with styling metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Rows in the table
    pub rows: Vec<TableRow>,

    /// Number of header rows (0 = no header)
    pub header_rows: u8,

    /// Table-wide styling
    pub style: TableStyle,
}

impl Table {
    /// Create a new empty table with the given style.
    pub fn new(style: TableStyle) -> Self {
        Self {
            rows: Vec::new(),
            header_rows: 0,
            style,
        }
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (based on first row).
    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.cells.len()).unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get header rows.
    pub fn header(&self) -> &[TableRow] {
        &self.rows[..self.header_rows as usize]
    }

    /// Get body rows (non-header).
    pub fn body(&self) -> &[TableRow] {
        &self.rows[self.header_rows as usize..]
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new(TableStyle::default())
    }
}

/// A table row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in the row
    pub cells: Vec<TableCell>,

    /// Whether this row repeats as a header at page breaks
    pub is_header: bool,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            is_header: false,
        }
    }

    /// Create a header row.
    pub fn header(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            is_header: true,
        }
    }

    /// Create a row from text values.
    pub fn from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::new(values.into_iter().map(TableCell::text).collect())
    }

    /// Get plain text representation.
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.plain_text())
            .collect::<Vec<_>>()
            .join("\t")
    }
}

/// A table cell holding one paragraph of literal text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell content (paragraphs)
    pub content: Vec<Paragraph>,

    /// Cell alignment
    pub alignment: Alignment,

    /// Whether the cell background is shaded
    pub shaded: bool,
}

impl TableCell {
    /// Create a new cell with text content.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Paragraph::with_text(text)],
            alignment: Alignment::Left,
            shaded: false,
        }
    }

    /// Create a cell with a single prepared paragraph.
    pub fn with_paragraph(paragraph: Paragraph) -> Self {
        Self {
            content: vec![paragraph],
            alignment: Alignment::Left,
            shaded: false,
        }
    }

    /// Set alignment and return self.
    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Set shading and return self.
    pub fn shade(mut self, shaded: bool) -> Self {
        self.shaded = shaded;
        self
    }

    /// Get plain text content.
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Check if the cell is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() || self.plain_text().trim().is_empty()
    }
}

/// Table-wide styling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableStyle {
    /// Border treatment for all edges and interior lines
    pub borders: BorderStyle,

    /// Table width
    pub width: TableWidth,

    /// Alternating-row ("banded") rendering hint
    pub banded: bool,
}

/// Border treatment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    /// No borders
    None,
    /// Single line on all four edges and interior
    #[default]
    Single,
}

/// Table width specification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableWidth {
    /// Size to content
    #[default]
    Auto,
    /// Percentage of the enclosing width
    Percent(u8),
}
