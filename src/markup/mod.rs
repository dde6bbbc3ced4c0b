//! Table-markup dialect: serialization and materialization.
//!
//! The dialect is a minimal, namespace-qualified row/cell vocabulary:
//!
//! ```text
//! <tbl:table><tbl:tr><tbl:tc>Header</tbl:tc></tbl:tr>...</tbl:table>
//! ```
//!
//! The first row is always the header. A string beginning with
//! [`TABLE_MARKUP_PREFIX`] is table markup; the prefix check survives only
//! at genuinely string-typed collaborator boundaries (HTML conversion
//! output) — processors themselves return a typed
//! [`ProcessingResult`](crate::processor::ProcessingResult).

mod materializer;

pub use materializer::TableMaterializer;

use crate::model::TableGrid;
use quick_xml::escape::escape;

/// Fixed literal prefix signalling that a string is table markup.
pub const TABLE_MARKUP_PREFIX: &str = "<tbl:table>";

pub(crate) const TABLE_ELEMENT: &[u8] = b"tbl:table";
pub(crate) const ROW_ELEMENT: &[u8] = b"tbl:tr";
pub(crate) const CELL_ELEMENT: &[u8] = b"tbl:tc";

/// Serialize a grid to the table-markup dialect.
///
/// Cell text is XML-escaped. Row 0 becomes the markup's header row.
pub fn grid_to_markup(grid: &TableGrid) -> String {
    let mut out = String::from(TABLE_MARKUP_PREFIX);
    for row in grid {
        out.push_str("<tbl:tr>");
        for cell in row {
            out.push_str("<tbl:tc>");
            out.push_str(&escape(cell.as_str()));
            out.push_str("</tbl:tc>");
        }
        out.push_str("</tbl:tr>");
    }
    out.push_str("</tbl:table>");
    out
}
