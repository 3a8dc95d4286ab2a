//! Operation orchestration
//!
//! The `Importer` exposes the three user operations: import the variable
//! under the cursor, goto its definition, and fix-imports from linter
//! diagnostics. It composes the resolver, the import block model and the
//! lint reader, and keeps the cursor stable across buffer edits.

use std::path::Path;
use std::time::Instant;

use crate::config::Settings;
use crate::editor::Editor;
use crate::error::ImportResult;
use crate::import::ImportBlock;
use crate::lint::{LintDiagnostics, LintDiagnosticsReader};
use crate::resolver::{JsModule, ModuleResolver};

pub struct Importer<'a> {
    settings: &'a Settings,
}

impl<'a> Importer<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Bind the variable under the cursor to a resolved module
    pub fn import_word(&self, editor: &mut dyn Editor) -> ImportResult<()> {
        let word = editor.current_word();
        if word.is_empty() {
            editor.message(
                "ImportJS: No variable to import. Place your cursor on a variable, then try again.",
            );
            return Ok(());
        }
        let current_file = editor.path_to_current_file();
        let resolver = ModuleResolver::new(self.settings);

        let started = Instant::now();
        let candidates = resolver.find_js_modules(&word, &current_file)?;
        let elapsed = started.elapsed().as_secs_f64();

        if candidates.is_empty() {
            editor.message(&format!(
                "ImportJS: No JS module to import for variable `{word}` ({elapsed:.2}s)"
            ));
            return Ok(());
        }
        let Some(module) = resolver.resolve_one(candidates, &word, editor) else {
            return Ok(());
        };

        let confirmation = if module.has_named_exports {
            format!(
                "ImportJS: Imported `{word}` from `{}` ({elapsed:.2}s)",
                module.display_name
            )
        } else {
            format!("ImportJS: Imported `{}` ({elapsed:.2}s)", module.display_name)
        };

        maintaining_cursor(editor, |editor| {
            let mut block = ImportBlock::find_in(editor);
            self.inject(&word, &module, &mut block, &current_file);
            block.rewrite(editor);
        });
        editor.message(&confirmation);
        Ok(())
    }

    /// Open the file defining the variable under the cursor
    pub fn goto(&self, editor: &mut dyn Editor) -> ImportResult<()> {
        let word = editor.current_word();
        if word.is_empty() {
            editor.message(
                "ImportJS: No variable to import. Place your cursor on a variable, then try again.",
            );
            return Ok(());
        }
        let current_file = editor.path_to_current_file();
        let resolver = ModuleResolver::new(self.settings);

        let candidates = resolver.find_js_modules(&word, &current_file)?;
        let block = ImportBlock::find_in(editor);
        match resolver.resolve_goto(candidates, &word, &block.imports, editor) {
            Some(module) => {
                let target = module.open_file_path(&current_file);
                editor.open_file(&target);
            }
            None => {
                editor.message(&format!("ImportJS: Could not resolve a module for `{word}`"));
            }
        }
        Ok(())
    }

    /// Remove unused imports and add undefined ones, per the linter
    pub fn fix_imports(&self, editor: &mut dyn Editor) -> ImportResult<()> {
        let current_file = editor.path_to_current_file();
        let reader = LintDiagnosticsReader::new(&self.settings.lint.eslint_executable);
        let diagnostics = reader.run(&current_file, &editor.current_file_content())?;
        self.apply_fixes(editor, &diagnostics)
    }

    /// The mutation half of fix-imports, driven by precomputed diagnostics.
    ///
    /// Resolution happens before any buffer edit so errors cannot leave a
    /// partially rewritten prologue behind.
    pub fn apply_fixes(
        &self,
        editor: &mut dyn Editor,
        diagnostics: &LintDiagnostics,
    ) -> ImportResult<()> {
        let current_file = editor.path_to_current_file();
        let resolver = ModuleResolver::new(self.settings);

        let mut additions: Vec<(String, JsModule)> = Vec::new();
        for name in &diagnostics.undefined {
            let candidates = resolver.find_js_modules(name, &current_file)?;
            if candidates.is_empty() {
                editor.message(&format!("ImportJS: Could not resolve a module for `{name}`"));
                continue;
            }
            if let Some(module) = resolver.resolve_one(candidates, name, editor) {
                additions.push((name.clone(), module));
            }
        }

        maintaining_cursor(editor, |editor| {
            let mut block = ImportBlock::find_in(editor);
            for statement in &mut block.imports {
                for unused in &diagnostics.unused {
                    statement.delete_variable(unused);
                }
            }
            block.prune_empty();
            for (name, module) in &additions {
                self.inject(name, module, &mut block, &current_file);
            }
            block.rewrite(editor);
        });
        Ok(())
    }

    /// Fold a resolved module into the statement list: reuse a same-path
    /// statement when one exists, otherwise prepend a synthesized one
    fn inject(
        &self,
        variable_name: &str,
        module: &JsModule,
        block: &mut ImportBlock,
        current_file: &Path,
    ) {
        let config_file = module.file_path.as_deref().unwrap_or(current_file);
        let module_config = self.settings.for_file(config_file);

        match block
            .imports
            .iter_mut()
            .find(|statement| statement.path == module.import_path)
        {
            Some(existing) => {
                existing.set_declaration_keyword(module_config.declaration_keyword);
                existing.set_import_function(&module_config.import_function);
                if module.has_named_exports {
                    existing.inject_named_import(variable_name);
                } else {
                    existing.set_default_import(variable_name);
                }
            }
            None => {
                block
                    .imports
                    .insert(0, module.to_import_statement(variable_name, &module_config));
            }
        }
        block.dedupe();
    }
}

/// Run a block-rewriting body, then shift the cursor by the net line delta
fn maintaining_cursor(editor: &mut dyn Editor, body: impl FnOnce(&mut dyn Editor)) {
    let (row, col) = editor.cursor();
    let before = editor.count_lines() as i64;
    body(editor);
    let delta = editor.count_lines() as i64 - before;
    if delta != 0 {
        let row = (row as i64 + delta).max(1) as usize;
        editor.set_cursor(row, col);
    }
}
