//! In-memory editor over a file on disk
//!
//! `FileEditor` backs the CLI and the test suite: it loads a buffer into a
//! line vector, applies edits, and can write the result back. Messages and
//! goto requests are recorded so the caller can relay them.

use std::path::{Path, PathBuf};

use crate::editor::Editor;
use crate::error::{ImportError, ImportResult};

pub struct FileEditor {
    path: PathBuf,
    lines: Vec<String>,
    trailing_newline: bool,
    cursor: (usize, usize),
    word_override: Option<String>,
    selection: Option<usize>,
    messages: Vec<String>,
    goto_target: Option<PathBuf>,
    max_line_length: usize,
    tab: String,
}

impl FileEditor {
    /// Load a buffer from disk
    pub fn open(path: impl AsRef<Path>) -> ImportResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ImportError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_content(path, &content))
    }

    /// Build a buffer from in-memory content
    pub fn from_content(path: impl AsRef<Path>, content: &str) -> Self {
        let trailing_newline = content.ends_with('\n');
        let mut lines: Vec<String> = content.split('\n').map(str::to_string).collect();
        if trailing_newline {
            lines.pop();
        }
        Self {
            path: path.as_ref().to_path_buf(),
            lines,
            trailing_newline,
            cursor: (1, 0),
            word_override: None,
            selection: None,
            messages: Vec::new(),
            goto_target: None,
            max_line_length: 80,
            tab: "  ".to_string(),
        }
    }

    /// Pretend the cursor sits on this word (CLI usage)
    pub fn with_word(mut self, word: impl Into<String>) -> Self {
        self.word_override = Some(word.into());
        self
    }

    /// Pre-answer the next disambiguation prompt with a 0-based index
    pub fn with_selection(mut self, index: Option<usize>) -> Self {
        self.selection = index;
        self
    }

    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    /// Write the current buffer back to its file
    pub fn save(&self) -> ImportResult<()> {
        std::fs::write(&self.path, self.current_file_content()).map_err(|source| {
            ImportError::FileWrite {
                path: self.path.clone(),
                source,
            }
        })
    }

    /// Messages emitted during the last operation
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// File requested by a goto, if any
    pub fn goto_target(&self) -> Option<&Path> {
        self.goto_target.as_deref()
    }

    fn word_at_cursor(&self) -> String {
        let (row, col) = self.cursor;
        let Some(line) = self.lines.get(row.saturating_sub(1)) else {
            return String::new();
        };
        let chars: Vec<char> = line.chars().collect();
        let is_word = |c: char| c.is_alphanumeric() || c == '_' || c == '$';

        let mut start = col.min(chars.len().saturating_sub(1));
        if chars.get(start).copied().map(is_word) != Some(true) {
            return String::new();
        }
        while start > 0 && chars.get(start - 1).copied().is_some_and(is_word) {
            start -= 1;
        }
        let mut end = start;
        while chars.get(end).copied().is_some_and(is_word) {
            end += 1;
        }
        chars[start..end].iter().collect()
    }
}

impl Editor for FileEditor {
    fn current_word(&self) -> String {
        match &self.word_override {
            Some(word) => word.clone(),
            None => self.word_at_cursor(),
        }
    }

    fn path_to_current_file(&self) -> PathBuf {
        self.path.clone()
    }

    fn current_file_content(&self) -> String {
        let mut content = self.lines.join("\n");
        if self.trailing_newline {
            content.push('\n');
        }
        content
    }

    fn count_lines(&self) -> usize {
        self.lines.len()
    }

    fn read_line(&self, line_number: usize) -> Option<String> {
        if line_number == 0 {
            return None;
        }
        self.lines.get(line_number - 1).cloned()
    }

    fn append_line(&mut self, after_line_number: usize, text: &str) {
        let index = after_line_number.min(self.lines.len());
        self.lines.insert(index, text.to_string());
    }

    fn delete_line(&mut self, line_number: usize) {
        if line_number == 0 || line_number > self.lines.len() {
            return;
        }
        self.lines.remove(line_number - 1);
    }

    fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    fn set_cursor(&mut self, row: usize, col: usize) {
        self.cursor = (row, col);
    }

    fn open_file(&mut self, path: &Path) {
        self.goto_target = Some(path.to_path_buf());
    }

    fn message(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }

    fn ask_for_selection(&mut self, word: &str, alternatives: &[String]) -> Option<usize> {
        match self.selection {
            Some(index) if index < alternatives.len() => Some(index),
            _ => {
                let listing = alternatives
                    .iter()
                    .enumerate()
                    .map(|(i, name)| format!("  {}: {name}", i + 1))
                    .collect::<Vec<_>>()
                    .join("\n");
                self.messages
                    .push(format!("ImportJS: Multiple modules for `{word}`:\n{listing}"));
                None
            }
        }
    }

    fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    fn tab(&self) -> String {
        self.tab.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_round_trip() {
        let editor = FileEditor::from_content("a.js", "one\ntwo\n");
        assert_eq!(editor.count_lines(), 2);
        assert_eq!(editor.read_line(1).as_deref(), Some("one"));
        assert_eq!(editor.read_line(3), None);
        assert_eq!(editor.current_file_content(), "one\ntwo\n");
    }

    #[test]
    fn test_append_and_delete() {
        let mut editor = FileEditor::from_content("a.js", "one\ntwo\n");
        editor.append_line(0, "zero");
        assert_eq!(editor.read_line(1).as_deref(), Some("zero"));
        editor.delete_line(2);
        assert_eq!(editor.current_file_content(), "zero\ntwo\n");
    }

    #[test]
    fn test_word_at_cursor() {
        let mut editor = FileEditor::from_content("a.js", "const fooBar = 1;\n");
        editor.set_cursor(1, 8);
        assert_eq!(editor.current_word(), "fooBar");
        editor.set_cursor(1, 14);
        assert_eq!(editor.current_word(), "");
    }
}
