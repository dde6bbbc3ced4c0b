//! Document-level types.

use super::{Paragraph, Table};
use serde::{Deserialize, Serialize};

/// A structured document: metadata plus an ordered sequence of blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata (title, author)
    pub metadata: Metadata,

    /// Content blocks in document order
    pub blocks: Vec<Block>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            metadata: Metadata::default(),
            blocks: Vec::new(),
        }
    }

    /// Add a block to the document.
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Add a paragraph block.
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.blocks.push(Block::Paragraph(paragraph));
    }

    /// Add a table block.
    pub fn add_table(&mut self, table: Table) {
        self.blocks.push(Block::Table(table));
    }

    /// Replace the block at `index`, keeping its position in the tree.
    pub fn replace_block(&mut self, index: usize, block: Block) {
        self.blocks[index] = block;
    }

    /// Number of blocks in the document.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the document has any blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|block| match block {
                Block::Paragraph(p) => p.plain_text(),
                Block::Table(t) => t.plain_text(),
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// A content block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A paragraph of text
    Paragraph(Paragraph),

    /// A table
    Table(Table),
}

/// Document metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_blocks() {
        let mut doc = Document::new();
        assert!(doc.is_empty());

        doc.add_paragraph(Paragraph::with_text("one"));
        doc.add_paragraph(Paragraph::with_text("two"));
        assert_eq!(doc.block_count(), 2);
        assert_eq!(doc.plain_text(), "one\n\ntwo");
    }

    #[test]
    fn test_replace_block() {
        let mut doc = Document::new();
        doc.add_paragraph(Paragraph::with_text("before"));
        doc.replace_block(0, Block::Table(Table::default()));
        assert!(matches!(doc.blocks[0], Block::Table(_)));
    }
}
