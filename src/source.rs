//! Collaborator interfaces consumed by the tag pipeline.
//!
//! The remote work-item/query store and the HTML conversion service live
//! outside this crate; they are specified here only at their interface
//! boundary. Any failure they raise is caught per tag-match by the
//! dispatcher and rendered as an inline error marker.

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A column of a stored query definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryColumn {
    /// Field referenced by the column
    pub field_name: String,

    /// Column heading shown in the rendered table
    pub display_name: String,
}

impl QueryColumn {
    /// Create a column.
    pub fn new(field_name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            display_name: display_name.into(),
        }
    }
}

/// A stored query definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryDefinition {
    /// Columns the query defines; may be empty
    pub columns: Vec<QueryColumn>,
}

/// Field values fetched for one work item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemFields {
    /// Work item identifier
    pub id: u64,

    /// Field name -> value; fields absent on the item are simply missing
    pub fields: HashMap<String, String>,
}

/// The remote work-item and query data source.
///
/// Calls are issued strictly sequentially on the calling thread; each call
/// blocks the document pass until it completes. No cancellation or timeout
/// is propagated.
pub trait DataSource: Send + Sync {
    /// Fetch a stored query's definition.
    fn get_query_definition(&self, id: &str) -> Result<QueryDefinition>;

    /// Execute a stored query, returning matching work-item identifiers.
    fn execute_query(&self, id: &str) -> Result<Vec<u64>>;

    /// Fetch only the named fields for the given items.
    fn get_item_fields(&self, ids: &[u64], fields: &[String]) -> Result<Vec<ItemFields>>;

    /// Fetch the document text stored on a work item, if any.
    fn get_item_document_text(&self, id: u64) -> Result<Option<String>>;
}

/// Converts collaborator HTML into the pipeline's plain format.
///
/// The output is plain text, except that converted tables are emitted in
/// the table-markup dialect (the string then begins with
/// [`TABLE_MARKUP_PREFIX`](crate::markup::TABLE_MARKUP_PREFIX)).
pub trait MarkupConverter: Send + Sync {
    /// Convert an HTML fragment to the plain format.
    fn html_to_plain(&self, html: &str) -> Result<String>;
}

/// Default converter: strips tags and unescapes entities.
///
/// Hosts with a richer conversion service supply their own
/// [`MarkupConverter`]; this one keeps the crate usable standalone.
#[derive(Debug, Clone, Default)]
pub struct StripTagsConverter;

impl StripTagsConverter {
    /// Create a new converter.
    pub fn new() -> Self {
        Self
    }
}

impl MarkupConverter for StripTagsConverter {
    fn html_to_plain(&self, html: &str) -> Result<String> {
        let mut reader = Reader::from_str(html);
        reader.config_mut().check_end_names = false;

        let mut out = String::new();
        loop {
            match reader.read_event() {
                Ok(Event::Text(e)) => {
                    let text = e
                        .unescape()
                        .map_err(|err| Error::Collaborator(err.to_string()))?;
                    out.push_str(&text);
                }
                Ok(Event::End(e)) => {
                    // Block-level closers become line breaks so prose keeps
                    // its paragraph boundaries.
                    const BLOCK_CLOSERS: [&[u8]; 10] = [
                        b"p", b"div", b"li", b"tr", b"h1", b"h2", b"h3", b"h4", b"h5", b"h6",
                    ];
                    if BLOCK_CLOSERS.contains(&e.name().as_ref())
                        && !out.ends_with('\n')
                        && !out.is_empty()
                    {
                        out.push('\n');
                    }
                }
                Ok(Event::Empty(e)) => {
                    if e.name().as_ref() == b"br" && !out.is_empty() {
                        out.push('\n');
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(Error::Collaborator(e.to_string())),
            }
        }

        Ok(out.trim().to_string())
    }
}
