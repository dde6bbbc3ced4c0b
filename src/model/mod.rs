//! Document model types for tag-processed content.
//!
//! This module defines the in-memory representation the dispatcher mutates:
//! a flat sequence of paragraph and table blocks. The model is host-agnostic;
//! document packages map their own tree onto these blocks at the boundary.

mod document;
mod paragraph;
mod table;

pub use document::{Block, Document, Metadata};
pub use paragraph::{Alignment, InlineContent, Paragraph, ParagraphStyle, TextRun, TextStyle};
pub use table::{BorderStyle, Table, TableCell, TableGrid, TableRow, TableStyle, TableWidth};
