use serde::{Deserialize, Serialize};

/// One checklist entry in the notes popup. Persisted with the manuscript.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

impl Note {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            done: false,
        }
    }
}

/// State of the floating notes popup: the notes themselves plus a selection
/// and an optional in-progress input line.
pub struct NotesState {
    notes: Vec<Note>,
    selected: usize,
    input: Option<String>,
}

impl NotesState {
    pub fn new(notes: Vec<Note>) -> Self {
        Self {
            notes,
            selected: 0,
            input: None,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn move_selection(&mut self, delta: i32) {
        if self.notes.is_empty() {
            return;
        }
        let len = self.notes.len() as i32;
        self.selected = (self.selected as i32 + delta).rem_euclid(len) as usize;
    }

    pub fn toggle_selected(&mut self) -> bool {
        match self.notes.get_mut(self.selected) {
            Some(note) => {
                note.done = !note.done;
                true
            }
            None => false,
        }
    }

    pub fn remove_selected(&mut self) -> bool {
        if self.selected >= self.notes.len() {
            return false;
        }
        self.notes.remove(self.selected);
        if self.selected >= self.notes.len() && self.selected > 0 {
            self.selected -= 1;
        }
        true
    }

    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    pub fn is_editing(&self) -> bool {
        self.input.is_some()
    }

    pub fn start_input(&mut self) {
        self.input = Some(String::new());
    }

    pub fn push_input_char(&mut self, ch: char) {
        if let Some(input) = self.input.as_mut() {
            input.push(ch);
        }
    }

    pub fn backspace_input(&mut self) {
        if let Some(input) = self.input.as_mut() {
            input.pop();
        }
    }

    /// Finishes the input line. Whitespace-only input is discarded.
    pub fn commit_input(&mut self) -> bool {
        let Some(input) = self.input.take() else {
            return false;
        };
        let text = input.trim();
        if text.is_empty() {
            return false;
        }
        self.notes.push(Note::new(text));
        self.selected = self.notes.len() - 1;
        true
    }

    pub fn cancel_input(&mut self) {
        self.input = None;
    }
}

impl Default for NotesState {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
#[path = "notes_tests.rs"]
mod notes_tests;
