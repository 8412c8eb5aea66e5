use crate::book::{BlockKind, ContentBlock};

/// The kind of a derived outline node. Page breaks never make it into the
/// outline, so there is no variant for them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutlineKind {
    Chapter,
    Section,
    Text,
}

impl OutlineKind {
    pub fn label(self) -> &'static str {
        match self {
            OutlineKind::Chapter => "chapter",
            OutlineKind::Section => "section",
            OutlineKind::Text => "text",
        }
    }
}

/// One node of the derived outline forest. Nodes are plain values rebuilt
/// from the flat block list on every call; the only tie back to the
/// manuscript is the copied block id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineNode {
    pub id: String,
    pub kind: OutlineKind,
    /// The block's raw content. May be empty; display fallbacks are a
    /// renderer concern, not a builder concern.
    pub title: String,
    /// For text nodes, this node's own count. For chapters and sections, the
    /// sum over all text descendants (sections roll up into their chapter).
    pub word_count: usize,
    /// Child sections, in document order. Only chapters carry these.
    pub sections: Vec<OutlineNode>,
    /// Text nodes attached directly under this node, in document order.
    pub direct_text: Vec<OutlineNode>,
}

impl OutlineNode {
    fn heading(id: &str, kind: OutlineKind, title: &str) -> Self {
        Self {
            id: id.to_string(),
            kind,
            title: title.to_string(),
            word_count: 0,
            sections: Vec::new(),
            direct_text: Vec::new(),
        }
    }

    fn text(id: &str, title: &str, word_count: usize) -> Self {
        Self {
            id: id.to_string(),
            kind: OutlineKind::Text,
            title: title.to_string(),
            word_count,
            sections: Vec::new(),
            direct_text: Vec::new(),
        }
    }

    pub fn has_children(&self) -> bool {
        !self.sections.is_empty() || !self.direct_text.is_empty()
    }
}

/// Counts whitespace-delimited tokens. Runs of whitespace collapse, so
/// whitespace-only content counts as zero words, not one.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Total word count of the manuscript, i.e. the sum over all text blocks.
pub fn total_words(blocks: &[ContentBlock]) -> usize {
    blocks
        .iter()
        .filter(|block| block.kind == BlockKind::Text)
        .map(|block| count_words(&block.content))
        .sum()
}

/// Derives the outline forest from the flat block list in one left-to-right
/// scan. Total over any input: never fails, never reorders, and skips blocks
/// that have no structural meaning (page breaks).
pub fn build_outline(blocks: &[ContentBlock]) -> Vec<OutlineNode> {
    let mut builder = OutlineBuilder::new();
    for block in blocks {
        builder.push(block);
    }
    builder.finish()
}

/// Where the most recently seen section lives, so later text blocks can be
/// attached to it. Sections sit either inside a chapter or at top level
/// (orphan promotion).
#[derive(Clone, Copy)]
struct SectionCursor {
    chapter: Option<usize>,
    index: usize,
}

struct OutlineBuilder {
    roots: Vec<OutlineNode>,
    current_chapter: Option<usize>,
    current_section: Option<SectionCursor>,
}

impl OutlineBuilder {
    fn new() -> Self {
        Self {
            roots: Vec::new(),
            current_chapter: None,
            current_section: None,
        }
    }

    fn push(&mut self, block: &ContentBlock) {
        match block.kind {
            BlockKind::PageBreak => {}
            BlockKind::Chapter => self.push_chapter(block),
            BlockKind::Section => self.push_section(block),
            BlockKind::Text => self.push_text(block),
        }
    }

    fn push_chapter(&mut self, block: &ContentBlock) {
        self.roots.push(OutlineNode::heading(
            &block.id,
            OutlineKind::Chapter,
            &block.content,
        ));
        self.current_chapter = Some(self.roots.len() - 1);
        self.current_section = None;
    }

    fn push_section(&mut self, block: &ContentBlock) {
        let node = OutlineNode::heading(&block.id, OutlineKind::Section, &block.content);
        // A section becomes the current section whether it was attached to a
        // chapter or promoted to top level.
        match self.current_chapter {
            Some(chapter) => {
                let sections = &mut self.roots[chapter].sections;
                sections.push(node);
                self.current_section = Some(SectionCursor {
                    chapter: Some(chapter),
                    index: sections.len() - 1,
                });
            }
            None => {
                self.roots.push(node);
                self.current_section = Some(SectionCursor {
                    chapter: None,
                    index: self.roots.len() - 1,
                });
            }
        }
    }

    fn push_text(&mut self, block: &ContentBlock) {
        let word_count = count_words(&block.content);
        let node = OutlineNode::text(&block.id, &block.content, word_count);
        if let Some(cursor) = self.current_section {
            let section = match cursor.chapter {
                Some(chapter) => &mut self.roots[chapter].sections[cursor.index],
                None => &mut self.roots[cursor.index],
            };
            section.direct_text.push(node);
            section.word_count += word_count;
            if let Some(chapter) = cursor.chapter {
                self.roots[chapter].word_count += word_count;
            }
        } else if let Some(chapter) = self.current_chapter {
            let chapter = &mut self.roots[chapter];
            chapter.direct_text.push(node);
            chapter.word_count += word_count;
        } else {
            self.roots.push(node);
        }
    }

    fn finish(self) -> Vec<OutlineNode> {
        self.roots
    }
}

#[cfg(test)]
#[path = "outline_tests.rs"]
mod outline_tests;
