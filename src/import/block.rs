//! Import prologue location, parsing and rewriting
//!
//! The prologue is the contiguous span of import declarations at the top of
//! a file, after any file-level directive, comments and blank lines. Only
//! the prologue is parsed; the first unparseable candidate stops the scan so
//! post-prologue code is never consumed.

use regex::Regex;
use std::sync::LazyLock;

use crate::editor::Editor;
use crate::import::ImportStatement;

static USE_STRICT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*(?:'use strict'|"use strict");?\s*$"#).expect("Invalid use strict regex")
});

/// Shortest run of text ending in `;`, anchored at a line start
static STATEMENT_CANDIDATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?ms)^.*?;").expect("Invalid candidate regex"));

/// Parsed form of a buffer's import prologue
#[derive(Debug)]
pub struct ImportBlock {
    /// One statement per unique path, in the order first seen
    pub imports: Vec<ImportStatement>,
    /// Zero-based line index where the block begins
    pub imports_start_at: usize,
    /// Total line count consumed by the existing imports
    pub newline_count: usize,
}

impl ImportBlock {
    /// Locate and parse the import prologue of the editor's buffer
    pub fn find_in(editor: &dyn Editor) -> Self {
        let content = editor.current_file_content();
        let lines: Vec<&str> = content.split('\n').collect();
        let imports_start_at = prologue_start(&lines);

        // Gather consecutive non-blank lines into the scan buffer
        let import_lines: Vec<&str> = lines[imports_start_at.min(lines.len())..]
            .iter()
            .take_while(|line| !line.trim().is_empty())
            .copied()
            .collect();
        let joined = import_lines.join("\n");

        let mut imports: Vec<ImportStatement> = Vec::new();
        let mut newline_count = 0;
        let mut scan_from = 0;

        while let Some(found) = STATEMENT_CANDIDATE.find_at(&joined, scan_from) {
            let candidate = found.as_str();
            let Some(statement) = ImportStatement::parse(candidate) else {
                // First unparseable candidate ends the prologue
                break;
            };

            match imports.iter_mut().find(|s| s.path == statement.path) {
                Some(existing) => existing.merge(&statement),
                None => imports.push(statement),
            }
            newline_count += 1 + candidate.matches('\n').count();
            scan_from = found.end();
        }

        Self {
            imports,
            imports_start_at,
            newline_count,
        }
    }

    /// Drop statements that no longer bind anything
    pub fn prune_empty(&mut self) {
        self.imports.retain(|statement| !statement.is_empty());
    }

    /// Deduplicate statements by normalized form, keeping the first
    pub fn dedupe(&mut self) {
        let mut seen = Vec::new();
        self.imports.retain(|statement| {
            let normalized = statement.to_normalized();
            if seen.contains(&normalized) {
                false
            } else {
                seen.push(normalized);
                true
            }
        });
    }

    /// Replace the buffer's prologue with the canonical rendering.
    ///
    /// Returns false without touching the buffer when the rendered block is
    /// identical to what is already there.
    pub fn rewrite(&self, editor: &mut dyn Editor) -> bool {
        // The line after the block must be blank to separate it from code
        let following = self.imports_start_at + self.newline_count;
        if let Some(line) = editor.read_line(following + 1) {
            if !line.trim().is_empty() {
                editor.append_line(following, "");
            }
        }

        let max_line_length = editor.max_line_length();
        let tab = editor.tab();
        let mut rendered: Vec<String> = self
            .imports
            .iter()
            .filter(|statement| !statement.is_empty())
            .flat_map(|statement| statement.to_import_strings(max_line_length, &tab))
            .collect();
        rendered.sort();

        let new_lines: Vec<String> = rendered
            .iter()
            .flat_map(|rendered_import| rendered_import.split('\n'))
            .map(|line| line.to_string())
            .collect();

        let old_lines: Vec<String> = (0..self.newline_count)
            .filter_map(|offset| editor.read_line(self.imports_start_at + offset + 1))
            .collect();
        if old_lines == new_lines {
            return false;
        }

        // Pop the old block top-down, then insert bottom-up so computed
        // indices stay valid
        for _ in 0..self.newline_count {
            editor.delete_line(self.imports_start_at + 1);
        }
        for line in new_lines.iter().rev() {
            editor.append_line(self.imports_start_at, line);
        }

        true
    }
}

/// Zero-based index of the first prologue line.
///
/// Directives, comments and blank lines before the imports are skipped. The
/// block starts after the last skipped line, but a purely-blank prefix is
/// not itself a reason to offset.
fn prologue_start(lines: &[&str]) -> usize {
    let mut in_block_comment = false;
    let mut last_skipped = None;
    let mut matched_non_blank = false;

    for (index, line) in lines.iter().enumerate() {
        if in_block_comment {
            last_skipped = Some(index);
            if line.contains("*/") {
                in_block_comment = false;
            }
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            last_skipped = Some(index);
        } else if USE_STRICT.is_match(line) || trimmed.starts_with("//") {
            last_skipped = Some(index);
            matched_non_blank = true;
        } else if trimmed.starts_with("/*") {
            last_skipped = Some(index);
            matched_non_blank = true;
            if !trimmed.contains("*/") {
                in_block_comment = true;
            }
        } else {
            break;
        }
    }

    if matched_non_blank {
        last_skipped.map(|index| index + 1).unwrap_or(0)
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::FileEditor;

    fn block_for(content: &str) -> ImportBlock {
        let editor = FileEditor::from_content("test.js", content);
        ImportBlock::find_in(&editor)
    }

    #[test]
    fn test_prologue_start_after_directives_and_comments() {
        let content = "'use strict';\n// c\n/* multi\n   line */\n\nimport a from 'a';\n\nrest\n";
        let block = block_for(content);
        assert_eq!(block.imports_start_at, 5);
        assert_eq!(block.imports.len(), 1);
        assert_eq!(block.newline_count, 1);
    }

    #[test]
    fn test_prologue_start_defaults_to_zero() {
        let block = block_for("import a from 'a';\n\ncode();\n");
        assert_eq!(block.imports_start_at, 0);

        // A purely blank prefix does not offset the block
        let blank_prefix = block_for("\n\nimport a from 'a';\n");
        assert_eq!(blank_prefix.imports_start_at, 0);
    }

    #[test]
    fn test_parse_stops_at_first_non_import() {
        let content = "import a from 'a';\nconst b = a.thing;\nimport c from 'c';\n\ncode();\n";
        let block = block_for(content);
        assert_eq!(block.imports.len(), 1);
        assert_eq!(block.newline_count, 1);
    }

    #[test]
    fn test_parse_merges_same_path() {
        let content = "import { foo } from 'p';\nimport { bar } from 'p';\n\ncode();\n";
        let block = block_for(content);
        assert_eq!(block.imports.len(), 1);
        assert_eq!(
            block.imports[0].named_imports.as_deref(),
            Some(["bar".to_string(), "foo".to_string()].as_slice())
        );
        // Both physical lines are accounted for
        assert_eq!(block.newline_count, 2);
    }

    #[test]
    fn test_multiline_statement_newline_accounting() {
        let content = "import {\n  foo,\n  bar,\n} from 'p';\n\ncode();\n";
        let block = block_for(content);
        assert_eq!(block.imports.len(), 1);
        assert_eq!(block.newline_count, 4);
    }

    #[test]
    fn test_rewrite_is_noop_for_unchanged_block() {
        let content = "import a from 'a';\n\ncode();\n";
        let mut editor = FileEditor::from_content("test.js", content);
        let block = ImportBlock::find_in(&editor);
        assert!(!block.rewrite(&mut editor));
        assert_eq!(editor.current_file_content(), content);
    }

    #[test]
    fn test_rewrite_sorts_and_separates_block() {
        let content = "import b from 'b';\nimport a from 'a';\ncode();\n";
        let mut editor = FileEditor::from_content("test.js", content);
        let block = ImportBlock::find_in(&editor);
        assert!(block.rewrite(&mut editor));
        assert_eq!(
            editor.current_file_content(),
            "import a from 'a';\nimport b from 'b';\n\ncode();\n"
        );
    }

    #[test]
    fn test_rewrite_drops_empty_statements() {
        let content = "import a, { b } from 'a';\n\ncode();\n";
        let mut editor = FileEditor::from_content("test.js", content);
        let mut block = ImportBlock::find_in(&editor);
        block.imports[0].delete_variable("a");
        block.imports[0].delete_variable("b");
        block.prune_empty();
        assert!(block.rewrite(&mut editor));
        assert_eq!(editor.current_file_content(), "\ncode();\n");
    }

    #[test]
    fn test_dedupe_keeps_first_of_normalized_twins() {
        let content = "import a from 'a';\n\ncode();\n";
        let editor = FileEditor::from_content("test.js", content);
        let mut block = ImportBlock::find_in(&editor);
        let duplicate = block.imports[0].clone();
        block.imports.push(duplicate);
        block.dedupe();
        assert_eq!(block.imports.len(), 1);
    }
}
