//! Built-in processor resolving `[[Query:<id>]]` tags.

use std::sync::Arc;

use super::{ProcessingResult, ProcessorContext, TagProcessor};
use crate::error::Result;
use crate::markup::grid_to_markup;
use crate::model::TableGrid;
use crate::source::DataSource;

/// Executes a stored query and renders its results as a table.
pub struct QueryProcessor {
    source: Arc<dyn DataSource>,
}

impl QueryProcessor {
    /// Create the processor with its data source.
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self { source }
    }
}

impl TagProcessor for QueryProcessor {
    fn name(&self) -> &str {
        "Query"
    }

    /// Content is an opaque query identifier. Queries with no columns are
    /// reported without executing; queries with no matching items report a
    /// literal message; otherwise only the fields the columns reference are
    /// fetched and rendered, header row first.
    fn process_tag(&self, content: &str, ctx: &ProcessorContext<'_>) -> Result<ProcessingResult> {
        let query_id = content.trim();
        let definition = self.source.get_query_definition(query_id)?;
        if definition.columns.is_empty() {
            return Ok(ProcessingResult::Text(
                "No columns defined in query.".to_string(),
            ));
        }

        let item_ids = self.source.execute_query(query_id)?;
        if item_ids.is_empty() {
            return Ok(ProcessingResult::Text(
                "No results found for query.".to_string(),
            ));
        }

        // Fetch only the fields the columns reference.
        let field_names: Vec<String> = definition
            .columns
            .iter()
            .map(|c| c.field_name.clone())
            .collect();
        let items = self.source.get_item_fields(&item_ids, &field_names)?;

        let mut grid: TableGrid = vec![definition
            .columns
            .iter()
            .map(|c| c.display_name.clone())
            .collect()];
        for item in &items {
            grid.push(
                field_names
                    .iter()
                    .map(|f| item.fields.get(f).cloned().unwrap_or_default())
                    .collect(),
            );
        }

        log::debug!(
            "query {} yielded {} rows x {} columns",
            query_id,
            grid.len() - 1,
            field_names.len()
        );
        let table = ctx.materializer.parse_markup(&grid_to_markup(&grid))?;
        Ok(ProcessingResult::Table(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acronym::{AcronymConfig, AcronymResolver};
    use crate::error::Error;
    use crate::markup::TableMaterializer;
    use crate::source::{ItemFields, QueryColumn, QueryDefinition};
    use std::collections::HashMap;

    struct MockSource {
        definition: QueryDefinition,
        results: Vec<u64>,
        items: Vec<ItemFields>,
        fail_execute: bool,
    }

    impl DataSource for MockSource {
        fn get_query_definition(&self, _id: &str) -> Result<QueryDefinition> {
            Ok(self.definition.clone())
        }

        fn execute_query(&self, id: &str) -> Result<Vec<u64>> {
            if self.fail_execute {
                return Err(Error::Collaborator(format!("query {} unavailable", id)));
            }
            Ok(self.results.clone())
        }

        fn get_item_fields(&self, _ids: &[u64], _fields: &[String]) -> Result<Vec<ItemFields>> {
            Ok(self.items.clone())
        }

        fn get_item_document_text(&self, _id: u64) -> Result<Option<String>> {
            Ok(None)
        }
    }

    fn two_column_definition() -> QueryDefinition {
        QueryDefinition {
            columns: vec![
                QueryColumn::new("title", "Title"),
                QueryColumn::new("state", "State"),
            ],
        }
    }

    fn item(id: u64, pairs: &[(&str, &str)]) -> ItemFields {
        ItemFields {
            id,
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn run(source: MockSource) -> Result<ProcessingResult> {
        let resolver = AcronymResolver::new(AcronymConfig::default());
        let materializer = TableMaterializer::new();
        let ctx = ProcessorContext {
            output_dir: None,
            acronyms: &resolver,
            materializer: &materializer,
        };
        QueryProcessor::new(Arc::new(source)).process_tag("Q1", &ctx)
    }

    #[test]
    fn test_no_columns_message_without_execution() {
        let source = MockSource {
            definition: QueryDefinition::default(),
            results: vec![1],
            items: Vec::new(),
            // execute_query would fail; the message must come first
            fail_execute: true,
        };

        match run(source).unwrap() {
            ProcessingResult::Text(t) => assert_eq!(t, "No columns defined in query."),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_no_results_message() {
        let source = MockSource {
            definition: two_column_definition(),
            results: Vec::new(),
            items: Vec::new(),
            fail_execute: false,
        };

        match run(source).unwrap() {
            ProcessingResult::Text(t) => assert_eq!(t, "No results found for query."),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_results_render_as_table() {
        let source = MockSource {
            definition: two_column_definition(),
            results: vec![10, 11],
            items: vec![
                item(10, &[("title", "First"), ("state", "Open")]),
                // Missing `state` renders as an empty cell.
                item(11, &[("title", "Second")]),
            ],
            fail_execute: false,
        };

        match run(source).unwrap() {
            ProcessingResult::Table(table) => {
                assert_eq!(table.row_count(), 3);
                assert_eq!(table.header_rows, 1);
                assert_eq!(table.rows[0].plain_text(), "Title\tState");
                assert_eq!(table.rows[1].plain_text(), "First\tOpen");
                assert_eq!(table.rows[2].plain_text(), "Second\t");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_collaborator_failure_propagates() {
        let source = MockSource {
            definition: two_column_definition(),
            results: Vec::new(),
            items: Vec::new(),
            fail_execute: true,
        };

        assert!(matches!(run(source), Err(Error::Collaborator(_))));
    }

    #[test]
    fn test_empty_fields_hashmap() {
        let source = MockSource {
            definition: two_column_definition(),
            results: vec![1],
            items: vec![ItemFields {
                id: 1,
                fields: HashMap::new(),
            }],
            fail_execute: false,
        };

        match run(source).unwrap() {
            ProcessingResult::Table(table) => {
                assert_eq!(table.rows[1].plain_text(), "\t");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
