//! Tag processors: the pluggable capability that turns tag content into
//! output text or a materialized table.
//!
//! Built-in variants resolve work items, queries, and the acronym table;
//! hosts register extension variants through the same trait. Registration
//! order is dispatch order.

mod acronym_table;
mod query;
mod work_item;

pub use acronym_table::AcronymTableProcessor;
pub use query::QueryProcessor;
pub use work_item::WorkItemProcessor;

use std::path::Path;
use std::sync::Arc;

use crate::acronym::AcronymResolver;
use crate::error::Result;
use crate::markup::TableMaterializer;
use crate::model::Table;

/// The outcome of processing one paragraph (or one tag).
///
/// An explicit tagged union: text results are substituted in place, table
/// results replace the whole paragraph node.
#[derive(Debug, Clone)]
pub enum ProcessingResult {
    /// Plain text, substituted into the paragraph
    Text(String),

    /// A materialized table, inserted in place of the paragraph
    Table(Table),
}

impl ProcessingResult {
    /// Check whether this is a table result.
    pub fn is_table(&self) -> bool {
        matches!(self, ProcessingResult::Table(_))
    }
}

/// Session context passed to every processor invocation.
///
/// Simple processors ignore it; context-needing processors read the output
/// location or the shared resolver state.
pub struct ProcessorContext<'a> {
    /// Output location of the current session, when one was configured
    pub output_dir: Option<&'a Path>,

    /// The session's accumulated acronym state
    pub acronyms: &'a AcronymResolver,

    /// The session's shared table materializer
    pub materializer: &'a TableMaterializer,
}

/// A content-generating capability bound to one tag name.
pub trait TagProcessor: Send + Sync {
    /// The tag name this processor handles (the `Name` in `[[Name:content]]`).
    fn name(&self) -> &str;

    /// Turn the tag's captured content into a processing result.
    fn process_tag(&self, content: &str, ctx: &ProcessorContext<'_>) -> Result<ProcessingResult>;
}

/// Ordered registry of tag processors.
///
/// Iteration follows registration order; the dispatcher relies on that
/// order when walking a paragraph's tag names.
#[derive(Default)]
pub struct ProcessorRegistry {
    processors: Vec<Arc<dyn TagProcessor>>,
}

impl ProcessorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            processors: Vec::new(),
        }
    }

    /// Register a processor. A later registration with the same tag name
    /// shadows the earlier one for lookups but not for iteration order.
    pub fn register(&mut self, processor: Arc<dyn TagProcessor>) {
        self.processors.push(processor);
    }

    /// Get a processor by tag name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn TagProcessor>> {
        self.processors.iter().rev().find(|p| p.name() == name)
    }

    /// Iterate processors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn TagProcessor>> {
        self.processors.iter()
    }

    /// Registered tag names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.processors.iter().map(|p| p.name()).collect()
    }

    /// Number of registered processors.
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}
