use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::book::{BlockKind, ContentBlock};

const CHAT_BASE_URL: &str = "https://chatgpt.com/?q=";

/// A writing prompt composed from one block and its position in the book.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssistPrompt {
    pub prompt: String,
}

impl AssistPrompt {
    /// The pre-filled external chat URL. Composing the URL is all the
    /// "assistance" this tool does; opening it is left to the author.
    pub fn url(&self) -> String {
        format!(
            "{CHAT_BASE_URL}{}",
            utf8_percent_encode(&self.prompt, NON_ALPHANUMERIC)
        )
    }
}

/// Builds a prompt for the first block matching `id`, including the titles of
/// the enclosing chapter and section found by the same left-to-right scan the
/// outline uses. Page breaks have nothing to prompt about.
pub fn compose_prompt(blocks: &[ContentBlock], id: &str) -> Option<AssistPrompt> {
    let mut chapter: Option<&str> = None;
    let mut section: Option<&str> = None;

    for block in blocks {
        let is_target = block.id == id;
        match block.kind {
            BlockKind::Chapter => {
                if is_target {
                    return Some(heading_prompt("chapter", &block.content, None, None));
                }
                chapter = Some(&block.content);
                section = None;
            }
            BlockKind::Section => {
                if is_target {
                    return Some(heading_prompt("section", &block.content, chapter, None));
                }
                section = Some(&block.content);
            }
            BlockKind::Text => {
                if is_target {
                    return Some(text_prompt(&block.content, chapter, section));
                }
            }
            BlockKind::PageBreak => {
                if is_target {
                    return None;
                }
            }
        }
    }
    None
}

fn context_sentence(chapter: Option<&str>, section: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(title) = chapter {
        let title = title.trim();
        if !title.is_empty() {
            out.push_str(&format!(" The current chapter is \"{title}\"."));
        }
    }
    if let Some(title) = section {
        let title = title.trim();
        if !title.is_empty() {
            out.push_str(&format!(" The current section is \"{title}\"."));
        }
    }
    out
}

fn heading_prompt(
    kind: &str,
    title: &str,
    chapter: Option<&str>,
    section: Option<&str>,
) -> AssistPrompt {
    let title = title.trim();
    let subject = if title.is_empty() {
        format!("an untitled {kind}")
    } else {
        format!("a {kind} titled \"{title}\"")
    };
    AssistPrompt {
        prompt: format!(
            "I am writing a book. Suggest an opening for {subject}.{}",
            context_sentence(chapter, section)
        ),
    }
}

fn text_prompt(content: &str, chapter: Option<&str>, section: Option<&str>) -> AssistPrompt {
    let context = context_sentence(chapter, section);
    let content = content.trim();
    let prompt = if content.is_empty() {
        format!("I am writing a book.{context} Suggest a first paragraph for this passage.")
    } else {
        format!("I am writing a book.{context} Continue this passage:\n\n{content}")
    };
    AssistPrompt { prompt }
}

#[cfg(test)]
#[path = "assist_tests.rs"]
mod assist_tests;
