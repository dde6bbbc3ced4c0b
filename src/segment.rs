//! Standalone text segmentation into Text/Table/List blocks.
//!
//! Splits a raw text blob into ordered blocks so compatible clients can
//! route table and list regions to structured handling and everything else
//! to plain paragraphs. Independent of the tag pipeline; it only shares the
//! boundary-matching technique.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// The kind of a segmented block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// Plain prose
    Text,
    /// A `<table>...</table>` region
    Table,
    /// A `<ul>...</ul>` or `<ol>...</ol>` region
    List,
}

/// One segmented block, order preserved from the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Block kind
    pub kind: BlockKind,

    /// Raw (trimmed) substring of the source
    pub content: String,
}

impl TextBlock {
    fn new(kind: BlockKind, content: &str) -> Self {
        Self {
            kind,
            content: content.trim().to_string(),
        }
    }
}

/// Splits a raw text blob into ordered Text/Table/List blocks.
#[derive(Debug)]
pub struct TextSegmenter {
    table_pattern: Regex,
    list_pattern: Regex,
}

impl TextSegmenter {
    /// Create a segmenter with the standard region patterns.
    pub fn new() -> Self {
        Self {
            // Non-nested shortest match; (?s) so regions may span newlines.
            table_pattern: Regex::new(r"(?si)<table\b.*?</table>").unwrap(),
            list_pattern: Regex::new(r"(?si)<ul\b.*?</ul>|<ol\b.*?</ol>").unwrap(),
        }
    }

    /// Segment text into an eagerly computed, ordered block sequence.
    ///
    /// Table and List regions are matched independently and merged by start
    /// offset; intervening and trailing text is trimmed and emitted only
    /// when non-blank. Overlapping regions of different kinds are not
    /// deduplicated; well-formed input does not produce genuine overlaps.
    pub fn segment(&self, text: &str) -> Vec<TextBlock> {
        let mut regions: Vec<(usize, usize, BlockKind)> = Vec::new();
        for m in self.table_pattern.find_iter(text) {
            regions.push((m.start(), m.end(), BlockKind::Table));
        }
        for m in self.list_pattern.find_iter(text) {
            regions.push((m.start(), m.end(), BlockKind::List));
        }
        regions.sort_by_key(|&(start, _, _)| start);

        let mut blocks = Vec::new();
        let mut cursor = 0;
        for (start, end, kind) in regions {
            if start > cursor {
                let leading = &text[cursor..start];
                if !leading.trim().is_empty() {
                    blocks.push(TextBlock::new(BlockKind::Text, leading));
                }
            }
            blocks.push(TextBlock::new(kind, &text[start..end]));
            cursor = end;
        }

        if cursor < text.len() {
            let trailing = &text[cursor..];
            if !trailing.trim().is_empty() {
                blocks.push(TextBlock::new(BlockKind::Text, trailing));
            }
        }

        blocks
    }
}

impl Default for TextSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_interleaved() {
        let segmenter = TextSegmenter::new();
        let blocks = segmenter.segment("lead <table>X</table> mid <ul>Y</ul> tail");

        assert_eq!(blocks.len(), 5);
        assert_eq!(blocks[0], TextBlock::new(BlockKind::Text, "lead"));
        assert_eq!(blocks[1], TextBlock::new(BlockKind::Table, "<table>X</table>"));
        assert_eq!(blocks[2], TextBlock::new(BlockKind::Text, "mid"));
        assert_eq!(blocks[3], TextBlock::new(BlockKind::List, "<ul>Y</ul>"));
        assert_eq!(blocks[4], TextBlock::new(BlockKind::Text, "tail"));
    }

    #[test]
    fn test_segment_plain_text_only() {
        let segmenter = TextSegmenter::new();
        let blocks = segmenter.segment("no regions here at all");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::Text);
        assert_eq!(blocks[0].content, "no regions here at all");
    }

    #[test]
    fn test_segment_multiline_region() {
        let segmenter = TextSegmenter::new();
        let blocks = segmenter.segment("before\n<table>\n<tr><td>a</td></tr>\n</table>\nafter");
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[1].kind, BlockKind::Table);
        assert!(blocks[1].content.contains("<td>a</td>"));
    }

    #[test]
    fn test_segment_blank_interstitial_dropped() {
        let segmenter = TextSegmenter::new();
        let blocks = segmenter.segment("<table>a</table>   \n  <ol><li>b</li></ol>");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].kind, BlockKind::Table);
        assert_eq!(blocks[1].kind, BlockKind::List);
    }

    #[test]
    fn test_segment_shortest_match_per_region() {
        let segmenter = TextSegmenter::new();
        let blocks = segmenter.segment("<table>a</table> x <table>b</table>");
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].content, "<table>a</table>");
        assert_eq!(blocks[2].content, "<table>b</table>");
    }

    #[test]
    fn test_segment_empty_input() {
        let segmenter = TextSegmenter::new();
        assert!(segmenter.segment("").is_empty());
        assert!(segmenter.segment("   \n  ").is_empty());
    }
}
