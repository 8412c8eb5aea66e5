use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::book::{BlockKind, ContentBlock};
use crate::notes::Note;

/// On-disk shape of a manuscript: the authoritative flat block list plus the
/// notes and the theme preset name. The derived outline is never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookFile {
    pub blocks: Vec<ContentBlock>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_theme() -> String {
    "dark".to_string()
}

impl BookFile {
    pub fn empty() -> Self {
        Self {
            blocks: Vec::new(),
            notes: Vec::new(),
            theme: default_theme(),
        }
    }
}

/// Loads a manuscript file. A missing file starts a new book, and a file that
/// fails to parse starts a new book with a message instead of aborting; the
/// second tuple element carries the status message for either case.
pub fn load_book(path: &Path) -> Result<(BookFile, Option<String>)> {
    if !path.exists() {
        return Ok((BookFile::empty(), Some("New book".to_string())));
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    match serde_json::from_str::<BookFile>(&content) {
        Ok(file) => Ok((file, None)),
        Err(err) => {
            let message = format!("Parse error: {err}. Starting with empty book.");
            Ok((BookFile::empty(), Some(message)))
        }
    }
}

pub fn save_book(path: &Path, file: &BookFile) -> Result<()> {
    let contents = serde_json::to_string_pretty(file).context("failed to serialize book")?;
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Renders the manuscript as plain text: chapter titles underlined with `=`,
/// section titles with `-`, text blocks as paragraphs, page breaks as form
/// feeds.
pub fn export_text(blocks: &[ContentBlock]) -> String {
    let mut out = String::new();
    for block in blocks {
        match block.kind {
            BlockKind::Chapter => push_heading(&mut out, block.content.trim(), '='),
            BlockKind::Section => push_heading(&mut out, block.content.trim(), '-'),
            BlockKind::Text => {
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(&block.content);
                out.push('\n');
            }
            BlockKind::PageBreak => {
                out.push('\u{c}');
                out.push('\n');
            }
        }
    }
    out
}

fn push_heading(out: &mut String, title: &str, underline: char) {
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(title);
    out.push('\n');
    let width = title.chars().count().max(1);
    out.extend(std::iter::repeat(underline).take(width));
    out.push('\n');
}

pub fn export_to(path: &Path, blocks: &[ContentBlock]) -> Result<()> {
    fs::write(path, export_text(blocks))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "storage_tests.rs"]
mod storage_tests;
