//! # tagweave
//!
//! Inline tag substitution and table materialization for structured
//! documents.
//!
//! tagweave rewrites a document by locating `[[Name:content]]` placeholder
//! markers in paragraph text, replacing each with dynamically produced
//! content, and writing the result back into the document's block tree.
//! Tag content is resolved by pluggable processors; built-in processors
//! fetch work items and stored queries from a host-supplied data source and
//! render an accumulated acronym-definitions table.
//!
//! ## Quick Start
//!
//! ```
//! use tagweave::{Document, Paragraph, TagDispatcher};
//!
//! fn main() -> tagweave::Result<()> {
//!     // No data source: only the acronym-table processor is wired.
//!     let mut dispatcher = TagDispatcher::builder().build();
//!
//!     let mut doc = Document::new();
//!     doc.add_paragraph(Paragraph::with_text(
//!         "The Example Definition (ED) is tracked here. [[AcronymTable:all]]",
//!     ));
//!     dispatcher.process_document(&mut doc)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Tag dispatch**: per-paragraph loop with per-match error recovery —
//!   one bad tag never aborts the document
//! - **Table materialization**: from string grids or from a minimal
//!   row/cell markup dialect, via an explicit state machine
//! - **Acronym resolution**: heuristic backward extraction with a
//!   configured known-definitions table and ignore set
//! - **Text segmentation**: standalone Text/Table/List splitter for
//!   compatible clients

pub mod acronym;
pub mod dispatch;
pub mod error;
pub mod markup;
pub mod model;
pub mod processor;
pub mod segment;
pub mod source;

// Re-export commonly used types
pub use acronym::{AcronymConfig, AcronymEntry, AcronymOrigin, AcronymResolver};
pub use dispatch::{DispatcherBuilder, TagDispatcher, TagMatch};
pub use error::{Error, Result};
pub use markup::{grid_to_markup, TableMaterializer, TABLE_MARKUP_PREFIX};
pub use model::{
    Alignment, Block, BorderStyle, Document, InlineContent, Metadata, Paragraph, ParagraphStyle,
    Table, TableCell, TableGrid, TableRow, TableStyle, TableWidth, TextRun, TextStyle,
};
pub use processor::{
    AcronymTableProcessor, ProcessingResult, ProcessorContext, ProcessorRegistry, QueryProcessor,
    TagProcessor, WorkItemProcessor,
};
pub use segment::{BlockKind, TextBlock, TextSegmenter};
pub use source::{
    DataSource, ItemFields, MarkupConverter, QueryColumn, QueryDefinition, StripTagsConverter,
};

/// Process a single text blob through a dispatcher session.
///
/// Convenience wrapper over
/// [`TagDispatcher::process_paragraph`](dispatch::TagDispatcher::process_paragraph)
/// for hosts working with bare strings rather than a [`Document`].
pub fn process_text(dispatcher: &mut TagDispatcher, text: &str) -> Result<ProcessingResult> {
    dispatcher.process_paragraph(text)
}
