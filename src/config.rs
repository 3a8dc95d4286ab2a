//! Configuration module for the import management engine.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - Environment variable overrides
//! - Per-file overrides via glob patterns
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `IMPORTJS_` and use double
//! underscores to separate nested levels:
//! - `IMPORTJS_IMPORTS__DECLARATION_KEYWORD=const` sets `imports.declaration_keyword`
//! - `IMPORTJS_LINT__ESLINT_EXECUTABLE=eslint_d` sets `lint.eslint_executable`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use globset::Glob;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{ImportError, ImportResult};
use crate::import::DeclarationKeyword;
use crate::resolver::manifest::PackageManifest;

static GLOBAL_DEBUG: AtomicBool = AtomicBool::new(false);

/// Enable or disable debug output globally (set when settings load)
pub fn set_global_debug(enabled: bool) {
    GLOBAL_DEBUG.store(enabled, Ordering::Relaxed);
}

pub fn is_global_debug_enabled() -> bool {
    GLOBAL_DEBUG.load(Ordering::Relaxed)
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Workspace root directory (where .importjs is located)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,

    /// Global debug mode
    #[serde(default = "default_false")]
    pub debug: bool,

    /// Import construction and module search settings
    #[serde(default)]
    pub imports: ImportConfig,

    /// Linter integration settings
    #[serde(default)]
    pub lint: LintConfig,

    /// Variable name to module specifier mappings.
    ///
    /// The target may contain `{filename}`, replaced with the current
    /// file's basename without extension.
    #[serde(default)]
    pub aliases: HashMap<String, String>,

    /// Module specifier to exported identifier mappings
    #[serde(default)]
    pub named_exports: BTreeMap<String, Vec<String>>,

    /// Per-file overrides, applied in order when `pattern` matches
    #[serde(default)]
    pub overrides: Vec<OverrideConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ImportConfig {
    /// Syntactic family for synthesized imports
    #[serde(default = "default_declaration_keyword")]
    pub declaration_keyword: DeclarationKeyword,

    /// Call target used when the keyword is not `import`
    #[serde(default = "default_import_function")]
    pub import_function: String,

    /// Filesystem roots searched for modules
    #[serde(default = "default_lookup_paths")]
    pub lookup_paths: Vec<String>,

    /// Glob patterns for paths that must never be offered as candidates
    #[serde(default)]
    pub excludes: Vec<String>,

    /// Extensions stripped when deriving an import path from a file path
    #[serde(default = "default_strip_file_extensions")]
    pub strip_file_extensions: Vec<String>,

    /// Write `./foo` style specifiers for modules under the current file's
    /// lookup path
    #[serde(default = "default_false")]
    pub use_relative_paths: bool,

    /// Leading fragment removed from derived import paths
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strip_from_path: Option<String>,

    /// Package name prefixes ignored when matching dependencies
    #[serde(default)]
    pub ignore_package_prefixes: Vec<String>,

    /// Include devDependencies in the package manifest search
    #[serde(default = "default_false")]
    pub import_dev_dependencies: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LintConfig {
    /// Executable invoked for fix-imports diagnostics
    #[serde(default = "default_eslint_executable")]
    pub eslint_executable: String,
}

/// Partial `ImportConfig` applied when `pattern` matches the current file
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct OverrideConfig {
    /// Glob matched against the current file path
    pub pattern: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub declaration_keyword: Option<DeclarationKeyword>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_function: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup_paths: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excludes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strip_file_extensions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_relative_paths: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strip_from_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_package_prefixes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_dev_dependencies: Option<bool>,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_false() -> bool {
    false
}
fn default_declaration_keyword() -> DeclarationKeyword {
    DeclarationKeyword::Import
}
fn default_import_function() -> String {
    "require".to_string()
}
fn default_lookup_paths() -> Vec<String> {
    vec![".".to_string()]
}
fn default_strip_file_extensions() -> Vec<String> {
    vec![".js".to_string(), ".jsx".to_string(), ".json".to_string()]
}
fn default_eslint_executable() -> String {
    "eslint".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            workspace_root: None,
            debug: false,
            imports: ImportConfig::default(),
            lint: LintConfig::default(),
            aliases: HashMap::new(),
            named_exports: BTreeMap::new(),
            overrides: Vec::new(),
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            declaration_keyword: default_declaration_keyword(),
            import_function: default_import_function(),
            lookup_paths: default_lookup_paths(),
            excludes: Vec::new(),
            strip_file_extensions: default_strip_file_extensions(),
            use_relative_paths: false,
            strip_from_path: None,
            ignore_package_prefixes: Vec::new(),
            import_dev_dependencies: false,
        }
    }
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            eslint_executable: default_eslint_executable(),
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(".importjs/settings.toml"));

        Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Settings::default()))
            // Layer in config file if it exists
            .merge(Toml::file(config_path))
            // Layer in environment variables with IMPORTJS_ prefix
            // Double underscore separates nested levels
            .merge(Env::prefixed("IMPORTJS_").map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
            .extract()
            .map_err(Box::new)
            .map(|mut settings: Settings| {
                if settings.workspace_root.is_none() {
                    settings.workspace_root = Self::workspace_root();
                }
                set_global_debug(settings.debug);
                settings
            })
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("IMPORTJS_").map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
            .extract()
            .map_err(Box::new)
            .map(|settings: Settings| {
                set_global_debug(settings.debug);
                settings
            })
    }

    /// Find the workspace config by looking for a .importjs directory,
    /// searching from the current directory up to root
    fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        for ancestor in current.ancestors() {
            let config_dir = ancestor.join(".importjs");
            if config_dir.exists() && config_dir.is_dir() {
                return Some(config_dir.join("settings.toml"));
            }
        }

        None
    }

    /// Get the workspace root directory (where .importjs is located)
    pub fn workspace_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        for ancestor in current.ancestors() {
            let config_dir = ancestor.join(".importjs");
            if config_dir.exists() && config_dir.is_dir() {
                return Some(ancestor.to_path_buf());
            }
        }

        None
    }

    /// Effective import settings for one file.
    ///
    /// Overrides whose glob matches the file path are merged over the base
    /// configuration in declaration order.
    pub fn for_file(&self, file: &Path) -> ImportConfig {
        let mut effective = self.imports.clone();
        let candidate = file.to_string_lossy();

        for override_config in &self.overrides {
            let matches = Glob::new(&override_config.pattern)
                .map(|glob| glob.compile_matcher().is_match(candidate.as_ref()))
                .unwrap_or(false);
            if !matches {
                continue;
            }
            effective.apply(override_config);
        }

        effective
    }

    /// Resolve a variable name through the alias registry.
    ///
    /// Returns the module specifier with `{filename}` substituted.
    pub fn resolve_alias(&self, name: &str, current_file: &Path) -> Option<String> {
        let target = self.aliases.get(name)?;
        if !target.contains("{filename}") {
            return Some(target.clone());
        }
        let filename = current_file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Some(target.replace("{filename}", &filename))
    }

    /// Resolve a variable name through the named-export registry.
    ///
    /// Returns the specifier of the first module listing the name.
    pub fn resolve_named_exports(&self, name: &str) -> Option<String> {
        self.named_exports
            .iter()
            .find(|(_, exported)| exported.iter().any(|n| n == name))
            .map(|(specifier, _)| specifier.clone())
    }

    /// Dependency names from the project's package.json
    pub fn package_dependencies(&self) -> ImportResult<Vec<String>> {
        let root = self
            .workspace_root
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        let manifest_path = root.join("package.json");
        if !manifest_path.exists() {
            return Ok(Vec::new());
        }

        let manifest = PackageManifest::read(&manifest_path)?;
        let mut dependencies = manifest.dependencies;
        if self.imports.import_dev_dependencies {
            dependencies.extend(manifest.dev_dependencies);
        }
        Ok(dependencies)
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> ImportResult<()> {
        let path = path.as_ref();
        let parent = path
            .parent()
            .ok_or_else(|| ImportError::config("Invalid settings path"))?;
        std::fs::create_dir_all(parent).map_err(|source| ImportError::FileWrite {
            path: parent.to_path_buf(),
            source,
        })?;

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ImportError::config(format!("Failed to serialize settings: {e}")))?;
        std::fs::write(path, toml_string).map_err(|source| ImportError::FileWrite {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Create a default settings file with helpful comments
    pub fn init_config_file(force: bool) -> ImportResult<PathBuf> {
        let config_path = PathBuf::from(".importjs/settings.toml");

        if !force && config_path.exists() {
            return Err(ImportError::config(
                "Configuration file already exists. Use --force to overwrite",
            ));
        }

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ImportError::FileWrite {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let template = r#"# ImportJS Configuration File

# Version of the configuration schema
version = 1

# Global debug mode
debug = false

[imports]
# Syntactic family for synthesized imports: "import", "const", "var", "let"
declaration_keyword = "import"

# Call target used when declaration_keyword is not "import"
import_function = "require"

# Filesystem roots searched for modules
lookup_paths = ["."]

# Glob patterns excluded from the search
# excludes = ["**/*.spec.js"]

# Extensions stripped when deriving an import path
strip_file_extensions = [".js", ".jsx", ".json"]

# Write "./foo" specifiers for modules sharing the current file's lookup path
use_relative_paths = false

# Leading fragment removed from derived import paths
# strip_from_path = "app/"

# Package name prefixes ignored when matching dependencies
# ignore_package_prefixes = ["my-company-"]

# Include devDependencies in the package manifest search
import_dev_dependencies = false

[lint]
# Executable used to compute unused/undefined variables for fix-imports
eslint_executable = "eslint"

# Variable name to module specifier mappings
# "{filename}" is replaced with the current file's basename
[aliases]
# "$" = "jquery"
# "styles" = "./{filename}.scss"

# Module specifier to exported identifier mappings
[named_exports]
# "underscore" = ["memoize", "debounce"]

# Per-file overrides, matched against the current file path
# [[overrides]]
# pattern = "spec/**"
# declaration_keyword = "var"
"#;

        std::fs::write(&config_path, template).map_err(|source| ImportError::FileWrite {
            path: config_path.clone(),
            source,
        })?;

        Ok(config_path)
    }
}

impl ImportConfig {
    fn apply(&mut self, override_config: &OverrideConfig) {
        if let Some(keyword) = override_config.declaration_keyword {
            self.declaration_keyword = keyword;
        }
        if let Some(function) = &override_config.import_function {
            self.import_function = function.clone();
        }
        if let Some(lookup_paths) = &override_config.lookup_paths {
            self.lookup_paths = lookup_paths.clone();
        }
        if let Some(excludes) = &override_config.excludes {
            self.excludes = excludes.clone();
        }
        if let Some(extensions) = &override_config.strip_file_extensions {
            self.strip_file_extensions = extensions.clone();
        }
        if let Some(relative) = override_config.use_relative_paths {
            self.use_relative_paths = relative;
        }
        if let Some(strip) = &override_config.strip_from_path {
            self.strip_from_path = Some(strip.clone());
        }
        if let Some(prefixes) = &override_config.ignore_package_prefixes {
            self.ignore_package_prefixes = prefixes.clone();
        }
        if let Some(dev) = override_config.import_dev_dependencies {
            self.import_dev_dependencies = dev;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.version, 1);
        assert_eq!(
            settings.imports.declaration_keyword,
            DeclarationKeyword::Import
        );
        assert_eq!(settings.imports.lookup_paths, vec!["."]);
        assert_eq!(settings.lint.eslint_executable, "eslint");
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("settings.toml");

        let toml_content = r#"
[imports]
declaration_keyword = "const"
lookup_paths = ["app", "lib"]

[aliases]
"_" = "underscore"

[named_exports]
"lib/utils" = ["debounce", "memoize"]
"#;

        fs::write(&config_path, toml_content).unwrap();

        let settings = Settings::load_from(&config_path).unwrap();
        assert_eq!(
            settings.imports.declaration_keyword,
            DeclarationKeyword::Const
        );
        assert_eq!(settings.imports.lookup_paths, vec!["app", "lib"]);
        // Defaults survive partial configuration
        assert_eq!(settings.imports.import_function, "require");
        assert_eq!(
            settings.resolve_alias("_", Path::new("app/main.js")),
            Some("underscore".to_string())
        );
        assert_eq!(
            settings.resolve_named_exports("debounce"),
            Some("lib/utils".to_string())
        );
        assert_eq!(settings.resolve_named_exports("unknown"), None);
    }

    #[test]
    fn test_alias_filename_substitution() {
        let mut settings = Settings::default();
        settings
            .aliases
            .insert("styles".to_string(), "./{filename}.scss".to_string());

        assert_eq!(
            settings.resolve_alias("styles", Path::new("app/components/Button.js")),
            Some("./Button.scss".to_string())
        );
    }

    #[test]
    fn test_per_file_overrides() {
        let mut settings = Settings::default();
        settings.overrides.push(OverrideConfig {
            pattern: "spec/**".to_string(),
            declaration_keyword: Some(DeclarationKeyword::Var),
            ..Default::default()
        });

        let base = settings.for_file(Path::new("app/main.js"));
        assert_eq!(base.declaration_keyword, DeclarationKeyword::Import);

        let spec = settings.for_file(Path::new("spec/main_spec.js"));
        assert_eq!(spec.declaration_keyword, DeclarationKeyword::Var);
        // Untouched fields keep base values
        assert_eq!(spec.import_function, "require");
    }

    #[test]
    fn test_package_dependencies() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("package.json"),
            r#"{
  "name": "test",
  "dependencies": { "lodash": "^4.0.0", "react": "^18.0.0" },
  "devDependencies": { "eslint": "^9.0.0" }
}"#,
        )
        .unwrap();

        let mut settings = Settings::default();
        settings.workspace_root = Some(temp_dir.path().to_path_buf());

        let deps = settings.package_dependencies().unwrap();
        assert!(deps.contains(&"lodash".to_string()));
        assert!(deps.contains(&"react".to_string()));
        assert!(!deps.contains(&"eslint".to_string()));

        settings.imports.import_dev_dependencies = true;
        let with_dev = settings.package_dependencies().unwrap();
        assert!(with_dev.contains(&"eslint".to_string()));
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("settings.toml");

        let mut settings = Settings::default();
        settings.imports.use_relative_paths = true;
        settings.save(&config_path).unwrap();

        let loaded = Settings::load_from(&config_path).unwrap();
        assert!(loaded.imports.use_relative_paths);
    }
}
