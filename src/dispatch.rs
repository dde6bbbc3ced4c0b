//! Per-paragraph tag dispatch and document mutation.
//!
//! The dispatcher owns one processor registry, one table materializer, and
//! one acronym resolver per document-processing session. Paragraphs are
//! visited strictly in document order and each paragraph's tag matches are
//! processed strictly sequentially; a collaborator call blocks the pass
//! until it completes.

use std::ops::Range;
use std::path::PathBuf;
use std::sync::Arc;

use regex::Regex;

use crate::acronym::{AcronymConfig, AcronymResolver};
use crate::error::Result;
use crate::markup::TableMaterializer;
use crate::model::{Block, Document};
use crate::processor::{
    AcronymTableProcessor, ProcessingResult, ProcessorContext, ProcessorRegistry, QueryProcessor,
    TagProcessor, WorkItemProcessor,
};
use crate::source::{DataSource, MarkupConverter, StripTagsConverter};

/// One occurrence of a `[[Name:content]]` tag in source text.
///
/// Matches for a given tag name never overlap; the captured content contains
/// neither newlines nor the literal `]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMatch {
    /// Tag name
    pub name: String,

    /// Raw captured content
    pub content: String,

    /// Half-open offset range of the whole match in the source text
    pub span: Range<usize>,
}

impl TagMatch {
    /// The literal matched substring.
    pub fn literal(&self) -> String {
        format!("[[{}:{}]]", self.name, self.content)
    }
}

/// Builder for a [`TagDispatcher`] session.
#[derive(Default)]
pub struct DispatcherBuilder {
    data_source: Option<Arc<dyn DataSource>>,
    converter: Option<Arc<dyn MarkupConverter>>,
    acronym_config: AcronymConfig,
    output_dir: Option<PathBuf>,
    extensions: Vec<Arc<dyn TagProcessor>>,
}

impl DispatcherBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply the work-item/query data source. Without one, only the
    /// acronym-table processor (and extensions) are wired.
    pub fn with_data_source(mut self, source: Arc<dyn DataSource>) -> Self {
        self.data_source = Some(source);
        self
    }

    /// Supply the HTML conversion collaborator. Defaults to the built-in
    /// tag-stripping converter.
    pub fn with_converter(mut self, converter: Arc<dyn MarkupConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Supply the known-acronym table and ignore set.
    pub fn with_acronym_config(mut self, config: AcronymConfig) -> Self {
        self.acronym_config = config;
        self
    }

    /// Set the session's output location, exposed to context-needing
    /// processors.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Register an extension processor, dispatched after the built-ins in
    /// registration order.
    pub fn register(mut self, processor: Arc<dyn TagProcessor>) -> Self {
        self.extensions.push(processor);
        self
    }

    /// Build the dispatcher, wiring built-in processors in dispatch order:
    /// the acronym-table processor first, then the data-source-backed
    /// processors only if a data source was supplied.
    pub fn build(self) -> TagDispatcher {
        let mut registry = ProcessorRegistry::new();
        registry.register(Arc::new(AcronymTableProcessor::new()));

        if let Some(source) = self.data_source {
            let converter = self
                .converter
                .unwrap_or_else(|| Arc::new(StripTagsConverter::new()));
            registry.register(Arc::new(WorkItemProcessor::new(
                source.clone(),
                converter,
            )));
            registry.register(Arc::new(QueryProcessor::new(source)));
        }

        for processor in self.extensions {
            registry.register(processor);
        }

        let patterns = registry
            .iter()
            .map(|p| (p.name().to_string(), tag_pattern(p.name())))
            .collect();

        TagDispatcher {
            registry,
            patterns,
            materializer: TableMaterializer::new(),
            resolver: AcronymResolver::new(self.acronym_config),
            output_dir: self.output_dir,
        }
    }
}

/// Compile the match pattern for one tag name.
///
/// `.` excludes newlines, so captured content never spans lines; the
/// non-greedy repetition makes the first `]]` close the tag.
fn tag_pattern(name: &str) -> Regex {
    Regex::new(&format!(r"\[\[{}:(.+?)\]\]", regex::escape(name))).unwrap()
}

/// Top-level per-paragraph dispatch loop.
///
/// One dispatcher serves one document-processing session; construct a fresh
/// one per session rather than sharing across concurrent passes.
pub struct TagDispatcher {
    registry: ProcessorRegistry,
    patterns: Vec<(String, Regex)>,
    materializer: TableMaterializer,
    resolver: AcronymResolver,
    output_dir: Option<PathBuf>,
}

impl TagDispatcher {
    /// Start building a dispatcher session.
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Extract all occurrences of the named tag from `text`.
    pub fn extract_tags(&self, text: &str, name: &str) -> Vec<TagMatch> {
        let pattern = match self.patterns.iter().find(|(n, _)| n == name) {
            Some((_, pattern)) => pattern,
            None => return Vec::new(),
        };
        extract_with_pattern(pattern, name, text)
    }

    /// Process one paragraph's text.
    ///
    /// Tag names are walked in registration order and their matches strictly
    /// sequentially. The first table-producing tag classifies the whole
    /// paragraph as a table and returns immediately, leaving any remaining
    /// tags in the paragraph unprocessed. Text outputs replace the literal
    /// matched substring in the running text. A failing tag is replaced by a
    /// visible error marker and never aborts the paragraph.
    ///
    /// If no table short-circuit occurs, the final text is folded through
    /// the acronym resolver (which grows resolver state but never rewrites
    /// the text) and returned as a text result.
    pub fn process_paragraph(&mut self, text: &str) -> Result<ProcessingResult> {
        let mut running = text.to_string();

        for (name, pattern) in &self.patterns {
            let matches = extract_with_pattern(pattern, name, &running);
            for tag in matches {
                // Lookup cannot fail: patterns are derived from the registry.
                let processor = match self.registry.get(name) {
                    Some(p) => p,
                    None => continue,
                };
                let ctx = ProcessorContext {
                    output_dir: self.output_dir.as_deref(),
                    acronyms: &self.resolver,
                    materializer: &self.materializer,
                };

                match processor.process_tag(&tag.content, &ctx) {
                    Ok(ProcessingResult::Table(table)) => {
                        // Short-circuit: remaining tags in this paragraph,
                        // of any name, stay unprocessed.
                        log::debug!("tag {} produced a table; paragraph short-circuits", name);
                        return Ok(ProcessingResult::Table(table));
                    }
                    Ok(ProcessingResult::Text(output)) => {
                        running = running.replacen(&tag.literal(), &output, 1);
                    }
                    Err(e) => {
                        log::warn!("error processing {} tag '{}': {}", name, tag.content, e);
                        let marker = format!("[Error processing {} tag]", name);
                        running = running.replacen(&tag.literal(), &marker, 1);
                    }
                }
            }
        }

        let annotated = self.resolver.resolve_and_annotate(running);
        Ok(ProcessingResult::Text(annotated))
    }

    /// Process every paragraph of a document in order, mutating the tree in
    /// place.
    ///
    /// Text results overwrite the paragraph's inline content with a single
    /// run only when the text actually changed (original run structure is
    /// discarded). Table results replace the paragraph block with the
    /// materialized table at the same position.
    pub fn process_document(&mut self, doc: &mut Document) -> Result<()> {
        for index in 0..doc.blocks.len() {
            let text = match &doc.blocks[index] {
                Block::Paragraph(p) => p.plain_text(),
                Block::Table(_) => continue,
            };

            match self.process_paragraph(&text)? {
                ProcessingResult::Text(new_text) => {
                    if new_text != text {
                        if let Block::Paragraph(p) = &mut doc.blocks[index] {
                            p.set_text(new_text);
                        }
                    }
                }
                ProcessingResult::Table(table) => {
                    doc.replace_block(index, Block::Table(table));
                }
            }
        }
        Ok(())
    }

    /// The session's accumulated acronym state.
    pub fn acronyms(&self) -> &AcronymResolver {
        &self.resolver
    }

    /// Consume the dispatcher, yielding the resolver for post-pass
    /// inspection.
    pub fn into_acronyms(self) -> AcronymResolver {
        self.resolver
    }

    /// Registered tag names in dispatch order.
    pub fn tag_names(&self) -> Vec<&str> {
        self.registry.names()
    }
}

fn extract_with_pattern(pattern: &Regex, name: &str, text: &str) -> Vec<TagMatch> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let content = caps.get(1)?.as_str().to_string();
            Some(TagMatch {
                name: name.to_string(),
                content,
                span: whole.start()..whole.end(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::processor::ProcessingResult;

    struct UpperProcessor;

    impl TagProcessor for UpperProcessor {
        fn name(&self) -> &str {
            "Upper"
        }

        fn process_tag(
            &self,
            content: &str,
            _ctx: &ProcessorContext<'_>,
        ) -> Result<ProcessingResult> {
            Ok(ProcessingResult::Text(content.to_uppercase()))
        }
    }

    struct FailingProcessor;

    impl TagProcessor for FailingProcessor {
        fn name(&self) -> &str {
            "Broken"
        }

        fn process_tag(
            &self,
            _content: &str,
            _ctx: &ProcessorContext<'_>,
        ) -> Result<ProcessingResult> {
            Err(Error::Collaborator("remote unavailable".into()))
        }
    }

    fn dispatcher() -> TagDispatcher {
        TagDispatcher::builder()
            .register(Arc::new(UpperProcessor))
            .register(Arc::new(FailingProcessor))
            .build()
    }

    #[test]
    fn test_extract_tags() {
        let d = dispatcher();
        let matches = d.extract_tags("a [[Upper:one]] b [[Upper:two]] c", "Upper");

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].content, "one");
        assert_eq!(matches[0].span, 2..15);
        assert_eq!(matches[0].literal(), "[[Upper:one]]");
        assert_eq!(matches[1].content, "two");
    }

    #[test]
    fn test_extract_tags_no_newline_in_content() {
        let d = dispatcher();
        let matches = d.extract_tags("[[Upper:a\nb]]", "Upper");
        assert!(matches.is_empty());
    }

    #[test]
    fn test_extract_tags_first_close_wins() {
        let d = dispatcher();
        let matches = d.extract_tags("[[Upper:a]b]] trailing ]]", "Upper");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].content, "a]b");
    }

    #[test]
    fn test_no_tags_is_identity() {
        let mut d = dispatcher();
        match d.process_paragraph("plain text, nothing to do").unwrap() {
            ProcessingResult::Text(t) => assert_eq!(t, "plain text, nothing to do"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_single_tag_substitution() {
        let mut d = dispatcher();
        match d.process_paragraph("before [[Upper:hello]] after").unwrap() {
            ProcessingResult::Text(t) => assert_eq!(t, "before HELLO after"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_failing_tag_becomes_error_marker() {
        let mut d = dispatcher();
        match d
            .process_paragraph("x [[Broken:whatever]] y [[Upper:ok]] z")
            .unwrap()
        {
            ProcessingResult::Text(t) => {
                assert_eq!(t, "x [Error processing Broken tag] y OK z");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_acronyms_accumulate_across_paragraphs() {
        let mut d = dispatcher();
        d.process_paragraph("the Example Definition (ED) appears").unwrap();
        d.process_paragraph("and again (ED) later").unwrap();

        let resolver = d.into_acronyms();
        assert_eq!(resolver.get("ED").unwrap().definition, "Example Definition");
    }

    #[test]
    fn test_builder_without_source_registers_acronym_table_only() {
        let d = TagDispatcher::builder().build();
        assert_eq!(d.tag_names(), vec!["AcronymTable"]);
    }
}
