//! Module resolution
//!
//! Maps a variable name to the modules that could define it, consulting in
//! order: user-defined aliases, the named-export registry, the filesystem
//! under the configured lookup paths, and package.json dependencies.
//! Candidates are deduplicated and ordered for display.

pub mod js_module;
pub mod manifest;
pub mod name_pattern;

pub use js_module::JsModule;

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::{ImportConfig, Settings};
use crate::editor::Editor;
use crate::error::{ImportError, ImportResult};
use crate::import::ImportStatement;

pub struct ModuleResolver<'a> {
    settings: &'a Settings,
    root: PathBuf,
}

impl<'a> ModuleResolver<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        let root = settings
            .workspace_root
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        Self { settings, root }
    }

    /// All modules that could satisfy `variable_name`, ranked for display.
    ///
    /// Aliases and the named-export registry short-circuit with exactly one
    /// candidate; otherwise the filesystem and the package manifest are
    /// searched.
    pub fn find_js_modules(
        &self,
        variable_name: &str,
        current_file: &Path,
    ) -> ImportResult<Vec<JsModule>> {
        if let Some(specifier) = self.settings.resolve_alias(variable_name, current_file) {
            let mut module = JsModule::bare(specifier);
            module.has_named_exports = self.registry_lists(&module.import_path, variable_name);
            return Ok(vec![module]);
        }
        if let Some(specifier) = self.settings.resolve_named_exports(variable_name) {
            let mut module = JsModule::bare(specifier);
            module.has_named_exports = true;
            return Ok(vec![module]);
        }

        let config = self.settings.for_file(current_file);
        let pattern = name_pattern::formatted_to_regex(variable_name);
        debug_print!(self, "matching '{variable_name}' with pattern '{pattern}'");

        let mut modules = self.find_in_lookup_paths(&pattern, &config, current_file)?;
        modules.extend(self.find_package_dependencies(&pattern, &config)?);

        // Shortest import path first, dedup, then rank for display
        modules.sort_by_key(|module| module.import_path.len());
        let mut seen = HashSet::new();
        modules.retain(|module| {
            seen.insert(format!(
                "{}/{}",
                module.lookup_path.as_deref().unwrap_or_default(),
                module.import_path
            ))
        });
        modules.sort_by(|a, b| a.display_name.cmp(&b.display_name));

        for module in &mut modules {
            if !module.has_named_exports {
                module.has_named_exports = self.registry_lists(&module.import_path, variable_name);
            }
        }

        Ok(modules)
    }

    /// Narrow candidates to one, asking the user when necessary
    pub fn resolve_one(
        &self,
        candidates: Vec<JsModule>,
        variable_name: &str,
        editor: &mut dyn Editor,
    ) -> Option<JsModule> {
        match candidates.len() {
            0 => None,
            1 => candidates.into_iter().next(),
            _ => {
                let alternatives: Vec<String> = candidates
                    .iter()
                    .map(|module| module.display_name.clone())
                    .collect();
                let index = editor.ask_for_selection(variable_name, &alternatives)?;
                candidates.into_iter().nth(index)
            }
        }
    }

    /// Narrow candidates for a goto, preferring whatever the current import
    /// block already binds the name to
    pub fn resolve_goto(
        &self,
        candidates: Vec<JsModule>,
        variable_name: &str,
        imports: &[ImportStatement],
        editor: &mut dyn Editor,
    ) -> Option<JsModule> {
        if candidates.len() == 1 {
            return candidates.into_iter().next();
        }

        let imported = imports.iter().find(|statement| {
            statement.default_import.as_deref() == Some(variable_name)
                || statement
                    .named_imports
                    .as_ref()
                    .is_some_and(|named| named.iter().any(|n| n == variable_name))
        });

        if let Some(statement) = imported {
            if candidates.is_empty() {
                return Some(JsModule::bare(statement.path.clone()));
            }
            if let Some(matching) = candidates
                .iter()
                .find(|candidate| candidate.import_path == statement.path)
            {
                return Some(matching.clone());
            }
        }

        self.resolve_one(candidates, variable_name, editor)
    }

    fn find_in_lookup_paths(
        &self,
        pattern: &str,
        config: &ImportConfig,
        current_file: &Path,
    ) -> ImportResult<Vec<JsModule>> {
        let path_re = Regex::new(&format!(
            r"(?i)(?:/|^){pattern}(?:/index)?(?:/package)?\.js.*$"
        ))
        .map_err(|e| ImportError::config(format!("Invalid search pattern: {e}")))?;
        let excludes = build_globset(&config.excludes)?;

        let mut modules = Vec::new();
        for lookup_path in &config.lookup_paths {
            if lookup_path.is_empty() {
                return Err(ImportError::EmptyLookupPath);
            }
            let dir = self.root.join(lookup_path);
            if !dir.is_dir() {
                return Err(ImportError::search_failed(
                    dir,
                    "lookup path is not a directory",
                ));
            }

            let walker = WalkBuilder::new(&dir)
                .standard_filters(false)
                .filter_entry(|entry| entry.file_name() != "node_modules")
                .build();

            let mut found: Vec<String> = walker
                .filter_map(Result::ok)
                .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
                .filter_map(|entry| {
                    let name = entry.file_name().to_string_lossy().into_owned();
                    if !name.contains(".js") {
                        return None;
                    }
                    let relative = entry.path().strip_prefix(&self.root).ok()?;
                    Some(relative.to_string_lossy().replace('\\', "/"))
                })
                .filter(|relative| path_re.is_match(relative))
                .filter(|relative| !excludes.is_match(relative.as_str()))
                .collect();
            found.sort();

            for relative in found {
                if let Some(module) =
                    JsModule::from_relative_path(&relative, lookup_path, config, current_file)
                {
                    modules.push(module);
                }
            }
        }

        Ok(modules)
    }

    fn find_package_dependencies(
        &self,
        pattern: &str,
        config: &ImportConfig,
    ) -> ImportResult<Vec<JsModule>> {
        let dep_re = if config.ignore_package_prefixes.is_empty() {
            Regex::new(&format!("(?i)^{pattern}$"))
        } else {
            let prefixes = config
                .ignore_package_prefixes
                .iter()
                .map(|prefix| regex::escape(prefix))
                .collect::<Vec<_>>()
                .join("|");
            Regex::new(&format!("(?i)^(?:{prefixes})?{pattern}$"))
        }
        .map_err(|e| ImportError::config(format!("Invalid dependency pattern: {e}")))?;

        Ok(self
            .settings
            .package_dependencies()?
            .into_iter()
            .filter(|dependency| dep_re.is_match(dependency))
            .map(|dependency| JsModule::from_package(&dependency, &self.root))
            .collect())
    }

    fn registry_lists(&self, import_path: &str, variable_name: &str) -> bool {
        self.settings
            .named_exports
            .get(import_path)
            .is_some_and(|exported| exported.iter().any(|n| n == variable_name))
    }
}

fn build_globset(patterns: &[String]) -> ImportResult<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| ImportError::config(format!("Invalid exclude glob '{pattern}': {e}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| ImportError::config(format!("Invalid exclude globs: {e}")))
}
