//! Built-in processor resolving `[[WorkItem:<id>]]` tags.

use std::sync::Arc;

use super::{ProcessingResult, ProcessorContext, TagProcessor};
use crate::error::{Error, Result};
use crate::markup::TABLE_MARKUP_PREFIX;
use crate::source::{DataSource, MarkupConverter};

/// Fetches a work item's document text and substitutes its converted form.
pub struct WorkItemProcessor {
    source: Arc<dyn DataSource>,
    converter: Arc<dyn MarkupConverter>,
}

impl WorkItemProcessor {
    /// Create the processor with its collaborators.
    pub fn new(source: Arc<dyn DataSource>, converter: Arc<dyn MarkupConverter>) -> Self {
        Self { source, converter }
    }
}

impl TagProcessor for WorkItemProcessor {
    fn name(&self) -> &str {
        "WorkItem"
    }

    /// Content must parse as an integer identifier. Converted output that
    /// begins with the table-markup prefix is materialized as a table; the
    /// conversion boundary is the one place the string sentinel survives.
    fn process_tag(&self, content: &str, ctx: &ProcessorContext<'_>) -> Result<ProcessingResult> {
        let id: u64 = content.trim().parse().map_err(|_| {
            Error::InvalidArgument(format!("work item id must be numeric, got '{}'", content))
        })?;

        let html = match self.source.get_item_document_text(id)? {
            Some(html) => html,
            None => return Ok(ProcessingResult::Text(String::new())),
        };

        let converted = self.converter.html_to_plain(&html)?;
        if converted.starts_with(TABLE_MARKUP_PREFIX) {
            let table = ctx.materializer.parse_markup(&converted)?;
            return Ok(ProcessingResult::Table(table));
        }

        Ok(ProcessingResult::Text(converted))
    }
}
