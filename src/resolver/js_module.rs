//! Resolved module candidates
//!
//! A `JsModule` is one way to satisfy a variable name: a file found under a
//! lookup path, a package dependency, or a bare specifier from an alias or
//! named-export registry. Construction turns a file path into the specifier
//! that will be written into the import statement.

use regex::Regex;
use std::path::{Path, PathBuf};

use crate::config::ImportConfig;
use crate::import::ImportStatement;
use crate::resolver::manifest::PackageManifest;

#[derive(Debug, Clone)]
pub struct JsModule {
    /// Specifier written inside the quotes
    pub import_path: String,
    /// Label shown when the user has to pick between candidates
    pub display_name: String,
    /// Backing file, when the module was found on disk
    pub file_path: Option<PathBuf>,
    /// Whether the variable should be bound as a named import
    pub has_named_exports: bool,
    /// Root under which the module was discovered
    pub lookup_path: Option<String>,
}

impl JsModule {
    /// Module known only by its specifier (aliases, goto fallback)
    pub fn bare(import_path: impl Into<String>) -> Self {
        let import_path = import_path.into();
        Self {
            display_name: import_path.clone(),
            import_path,
            file_path: None,
            has_named_exports: false,
            lookup_path: None,
        }
    }

    /// Module backed by a file discovered under a lookup path.
    ///
    /// `relative_file_path` is relative to the project root and includes the
    /// lookup path prefix. Returns None when stripping leaves nothing to
    /// import.
    pub fn from_relative_path(
        relative_file_path: &str,
        lookup_path: &str,
        config: &ImportConfig,
        current_file: &Path,
    ) -> Option<Self> {
        let mut import_path = strip_terminal_segments(relative_file_path, config)?;

        if lookup_path != "." {
            if let Some(stripped) = import_path.strip_prefix(&format!("{lookup_path}/")) {
                import_path = stripped.to_string();
            }
        }
        if import_path.is_empty() {
            return None;
        }

        let current = current_file.to_string_lossy().replace('\\', "/");
        if config.use_relative_paths && file_is_under(&current, lookup_path) {
            let target = if lookup_path == "." {
                import_path.clone()
            } else {
                format!("{lookup_path}/{import_path}")
            };
            import_path = relative_specifier(&current, &target);
        } else if let Some(prefix) = &config.strip_from_path {
            if let Some(stripped) = import_path.strip_prefix(prefix.as_str()) {
                import_path = stripped.to_string();
            }
        }

        Some(Self {
            display_name: import_path.clone(),
            import_path,
            file_path: Some(PathBuf::from(relative_file_path)),
            has_named_exports: false,
            lookup_path: Some(lookup_path.to_string()),
        })
    }

    /// Module backed by a package.json dependency. No extension stripping.
    pub fn from_package(dependency: &str, root: &Path) -> Self {
        Self {
            import_path: dependency.to_string(),
            display_name: dependency.to_string(),
            file_path: Some(root.join(format!("node_modules/{dependency}/package.json"))),
            has_named_exports: false,
            lookup_path: Some("node_modules".to_string()),
        }
    }

    /// Synthesize the import statement binding `variable_name` to this module
    pub fn to_import_statement(
        &self,
        variable_name: &str,
        config: &ImportConfig,
    ) -> ImportStatement {
        let mut statement = ImportStatement::new(
            self.import_path.clone(),
            config.declaration_keyword,
            config.import_function.clone(),
        );
        if self.has_named_exports {
            statement.inject_named_import(variable_name);
        } else {
            statement.set_default_import(variable_name);
        }
        statement
    }

    /// Path to open for a goto on this module.
    ///
    /// Package dependencies resolve through their manifest's `main` entry;
    /// bare relative specifiers resolve against the current file.
    pub fn open_file_path(&self, current_file: &Path) -> PathBuf {
        if let Some(file_path) = &self.file_path {
            if file_path.file_name().is_some_and(|name| name == "package.json") {
                if let Ok(manifest) = PackageManifest::read(file_path) {
                    if let Some(main) = manifest.main {
                        let package_dir =
                            file_path.parent().unwrap_or_else(|| Path::new("."));
                        return package_dir.join(main);
                    }
                }
                return file_path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| file_path.clone());
            }
            return file_path.clone();
        }

        if self.import_path.starts_with('.') {
            let base = current_file.parent().unwrap_or_else(|| Path::new("."));
            return base.join(self.import_path.trim_start_matches("./"));
        }
        PathBuf::from(&self.import_path)
    }
}

/// Strip a terminal `/index` or `/package` segment and a configured
/// extension from the end of a path
fn strip_terminal_segments(path: &str, config: &ImportConfig) -> Option<String> {
    let extensions = config
        .strip_file_extensions
        .iter()
        .map(|ext| regex::escape(ext))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = if extensions.is_empty() {
        r"(?:/(?:index|package))?$".to_string()
    } else {
        format!(r"(?:/(?:index|package))?(?:{extensions})?$")
    };
    let re = Regex::new(&pattern).ok()?;
    Some(re.replace(path, "").into_owned())
}

fn file_is_under(current_file: &str, lookup_path: &str) -> bool {
    lookup_path == "." || current_file.starts_with(&format!("{lookup_path}/"))
}

/// Specifier for `target` relative to the directory of `current_file`,
/// always prefixed with `./` or `../`
fn relative_specifier(current_file: &str, target: &str) -> String {
    let current_dir: Vec<&str> = match current_file.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    let target_parts: Vec<&str> = target.split('/').collect();

    let common = current_dir
        .iter()
        .zip(target_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..current_dir.len() {
        parts.push("..".to_string());
    }
    for part in &target_parts[common..] {
        parts.push(part.to_string());
    }

    let joined = parts.join("/");
    if joined.starts_with("../") {
        joined
    } else {
        format!("./{joined}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::DeclarationKeyword;

    fn config() -> ImportConfig {
        ImportConfig::default()
    }

    #[test]
    fn test_construct_strips_extension_and_lookup_path() {
        let module = JsModule::from_relative_path(
            "app/lib/foo_bar.js",
            "app",
            &config(),
            Path::new("app/main.js"),
        )
        .unwrap();
        assert_eq!(module.import_path, "lib/foo_bar");
        assert_eq!(module.display_name, "lib/foo_bar");
        assert_eq!(module.lookup_path.as_deref(), Some("app"));
    }

    #[test]
    fn test_construct_collapses_index_and_package() {
        let index = JsModule::from_relative_path(
            "app/components/button/index.js",
            "app",
            &config(),
            Path::new("app/main.js"),
        )
        .unwrap();
        assert_eq!(index.import_path, "components/button");

        let package = JsModule::from_relative_path(
            "app/widgets/nav/package.json",
            "app",
            &config(),
            Path::new("app/main.js"),
        )
        .unwrap();
        assert_eq!(package.import_path, "widgets/nav");
    }

    #[test]
    fn test_construct_relative_paths() {
        let mut relative_config = config();
        relative_config.use_relative_paths = true;

        let sibling = JsModule::from_relative_path(
            "app/lib/util.js",
            "app",
            &relative_config,
            Path::new("app/lib/main.js"),
        )
        .unwrap();
        assert_eq!(sibling.import_path, "./util");

        let cousin = JsModule::from_relative_path(
            "app/lib/util.js",
            "app",
            &relative_config,
            Path::new("app/components/button.js"),
        )
        .unwrap();
        assert_eq!(cousin.import_path, "../lib/util");
    }

    #[test]
    fn test_construct_strip_from_path() {
        let mut strip_config = config();
        strip_config.strip_from_path = Some("lib/".to_string());

        let module = JsModule::from_relative_path(
            "app/lib/util.js",
            "app",
            &strip_config,
            Path::new("app/main.js"),
        )
        .unwrap();
        assert_eq!(module.import_path, "util");
    }

    #[test]
    fn test_to_import_statement() {
        let mut module = JsModule::bare("lib/util");
        let statement = module.to_import_statement("util", &config());
        assert_eq!(statement.default_import.as_deref(), Some("util"));
        assert_eq!(statement.declaration_keyword, DeclarationKeyword::Import);

        module.has_named_exports = true;
        let named = module.to_import_statement("debounce", &config());
        assert!(named.default_import.is_none());
        assert_eq!(
            named.named_imports.as_deref(),
            Some(["debounce".to_string()].as_slice())
        );
    }

    #[test]
    fn test_open_file_path_for_relative_specifier() {
        let module = JsModule::bare("./util");
        assert_eq!(
            module.open_file_path(Path::new("app/lib/main.js")),
            PathBuf::from("app/lib/util")
        );
    }
}
