use serde::{Deserialize, Serialize};

/// The kind of a content block in the flat manuscript.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Text,
    Chapter,
    Section,
    PageBreak,
}

impl BlockKind {
    pub fn label(self) -> &'static str {
        match self {
            BlockKind::Text => "text",
            BlockKind::Chapter => "chapter",
            BlockKind::Section => "section",
            BlockKind::PageBreak => "page break",
        }
    }
}

/// One atomic unit of the manuscript, stored in linear order. For chapter and
/// section blocks `content` is the title text; page breaks ignore it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub id: String,
    pub kind: BlockKind,
    pub content: String,
}

impl ContentBlock {
    pub fn new(id: impl Into<String>, kind: BlockKind, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            content: content.into(),
        }
    }
}

/// The host-owned manuscript: an ordered list of blocks plus a selection and
/// a character cursor inside the selected block. All mutators report whether
/// they changed anything so the caller can maintain its dirty flag.
pub struct Book {
    blocks: Vec<ContentBlock>,
    selected: usize,
    cursor: usize,
    next_id: u64,
}

impl Book {
    pub fn new() -> Self {
        Self::from_blocks(Vec::new())
    }

    pub fn from_blocks(blocks: Vec<ContentBlock>) -> Self {
        let next_id = blocks
            .iter()
            .filter_map(|block| block.id.parse::<u64>().ok())
            .max()
            .map(|max| max + 1)
            .unwrap_or(1);
        let mut book = Self {
            blocks,
            selected: 0,
            cursor: 0,
            next_id,
        };
        book.ensure_initialized();
        book.cursor = book.selected_len();
        book
    }

    fn ensure_initialized(&mut self) {
        if self.blocks.is_empty() {
            let id = self.alloc_id();
            self.blocks.push(ContentBlock::new(id, BlockKind::Text, ""));
        }
        if self.selected >= self.blocks.len() {
            self.selected = self.blocks.len() - 1;
        }
    }

    fn alloc_id(&mut self) -> String {
        let id = self.next_id;
        self.next_id += 1;
        id.to_string()
    }

    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_block(&self) -> &ContentBlock {
        &self.blocks[self.selected]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn selected_len(&self) -> usize {
        self.blocks[self.selected].content.chars().count()
    }

    fn clamp_cursor(&mut self) {
        let len = self.selected_len();
        if self.cursor > len {
            self.cursor = len;
        }
    }

    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.blocks.len() || index == self.selected {
            return false;
        }
        self.selected = index;
        self.cursor = self.selected_len();
        true
    }

    /// Selects the first block with the given id, in document order. Ids are
    /// allocated monotonically here, but hand-edited files may contain
    /// duplicates; the first match wins.
    pub fn select_by_id(&mut self, id: &str) -> bool {
        match self.blocks.iter().position(|block| block.id == id) {
            Some(index) => {
                self.selected = index;
                self.cursor = self.selected_len();
                true
            }
            None => false,
        }
    }

    pub fn select_previous(&mut self) -> bool {
        if self.selected == 0 {
            return false;
        }
        self.select(self.selected - 1)
    }

    pub fn select_next(&mut self) -> bool {
        self.select(self.selected + 1)
    }

    /// Inserts a new empty block of the given kind after the selection and
    /// selects it.
    pub fn insert_after(&mut self, kind: BlockKind) -> &ContentBlock {
        let id = self.alloc_id();
        let index = self.selected + 1;
        self.blocks.insert(index, ContentBlock::new(id, kind, ""));
        self.selected = index;
        self.cursor = 0;
        &self.blocks[index]
    }

    pub fn delete_selected(&mut self) -> bool {
        if self.blocks.len() <= 1 {
            // Keep one block around so there is always an edit target; just
            // clear it instead of removing it.
            let block = &mut self.blocks[0];
            if block.content.is_empty() && block.kind == BlockKind::Text {
                return false;
            }
            block.content.clear();
            block.kind = BlockKind::Text;
            self.cursor = 0;
            return true;
        }
        self.blocks.remove(self.selected);
        if self.selected >= self.blocks.len() {
            self.selected = self.blocks.len() - 1;
        }
        self.cursor = self.selected_len();
        true
    }

    pub fn move_selected_up(&mut self) -> bool {
        if self.selected == 0 {
            return false;
        }
        self.blocks.swap(self.selected, self.selected - 1);
        self.selected -= 1;
        true
    }

    pub fn move_selected_down(&mut self) -> bool {
        if self.selected + 1 >= self.blocks.len() {
            return false;
        }
        self.blocks.swap(self.selected, self.selected + 1);
        self.selected += 1;
        true
    }

    pub fn set_kind(&mut self, kind: BlockKind) -> bool {
        let block = &mut self.blocks[self.selected];
        if block.kind == kind {
            return false;
        }
        block.kind = kind;
        self.clamp_cursor();
        true
    }

    pub fn insert_char(&mut self, ch: char) -> bool {
        if self.blocks[self.selected].kind == BlockKind::PageBreak {
            return false;
        }
        let offset = self.byte_offset(self.cursor);
        self.blocks[self.selected].content.insert(offset, ch);
        self.cursor += 1;
        true
    }

    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let offset = self.byte_offset(self.cursor - 1);
        self.blocks[self.selected].content.remove(offset);
        self.cursor -= 1;
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.selected_len() {
            return false;
        }
        let offset = self.byte_offset(self.cursor);
        self.blocks[self.selected].content.remove(offset);
        true
    }

    pub fn move_cursor_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn move_cursor_right(&mut self) -> bool {
        if self.cursor >= self.selected_len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn move_cursor_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor = self.selected_len();
    }

    /// Replaces the manuscript wholesale, e.g. after loading a file.
    pub fn replace_blocks(&mut self, blocks: Vec<ContentBlock>) {
        *self = Self::from_blocks(blocks);
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        let content = &self.blocks[self.selected].content;
        content
            .char_indices()
            .nth(char_index)
            .map(|(idx, _)| idx)
            .unwrap_or(content.len())
    }
}

impl Default for Book {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "book_tests.rs"]
mod book_tests;
