//! Editor abstraction
//!
//! The engine never touches a buffer directly; it goes through this
//! capability interface, implemented by concrete adapters. Line numbers are
//! 1-based throughout, matching editor conventions.

pub mod file;

pub use file::FileEditor;

use std::path::{Path, PathBuf};

/// Capabilities the engine requires from a host editor
pub trait Editor {
    /// Word under the cursor, empty when the cursor is not on a word
    fn current_word(&self) -> String;

    fn path_to_current_file(&self) -> PathBuf;

    fn current_file_content(&self) -> String;

    fn count_lines(&self) -> usize;

    /// Read one line (1-based); None past the end of the buffer
    fn read_line(&self, line_number: usize) -> Option<String>;

    /// Insert `text` after the given line (1-based); 0 prepends
    fn append_line(&mut self, after_line_number: usize, text: &str);

    fn delete_line(&mut self, line_number: usize);

    /// Cursor position as (row, col), 1-based row
    fn cursor(&self) -> (usize, usize);

    fn set_cursor(&mut self, row: usize, col: usize);

    fn open_file(&mut self, path: &Path);

    fn message(&mut self, text: &str);

    /// Let the user pick between alternatives; None when dismissed
    fn ask_for_selection(&mut self, word: &str, alternatives: &[String]) -> Option<usize>;

    fn max_line_length(&self) -> usize {
        80
    }

    fn tab(&self) -> String {
        "  ".to_string()
    }
}
