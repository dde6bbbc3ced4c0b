//! Built-in processor rendering the session's acronym definitions table.

use super::{ProcessingResult, ProcessorContext, TagProcessor};
use crate::error::Result;
use crate::markup::grid_to_markup;

/// Renders the resolver's accumulated, non-ignored acronym map as a
/// two-column definitions table.
///
/// Registered first so the acronym table is populated from everything the
/// resolver saw in earlier paragraphs of the pass.
#[derive(Debug, Default)]
pub struct AcronymTableProcessor;

impl AcronymTableProcessor {
    /// Create the processor.
    pub fn new() -> Self {
        Self
    }
}

impl TagProcessor for AcronymTableProcessor {
    fn name(&self) -> &str {
        "AcronymTable"
    }

    /// The tag's content is ignored; the result is built from the shared
    /// resolver state. Returns empty text when nothing has been resolved.
    fn process_tag(&self, _content: &str, ctx: &ProcessorContext<'_>) -> Result<ProcessingResult> {
        if ctx.acronyms.is_empty() {
            return Ok(ProcessingResult::Text(String::new()));
        }

        let markup = grid_to_markup(&ctx.acronyms.table_grid());
        let table = ctx.materializer.parse_markup(&markup)?;
        Ok(ProcessingResult::Table(table))
    }
}
