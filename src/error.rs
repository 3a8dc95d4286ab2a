//! Error types for the import management engine
//!
//! This module provides structured error types using thiserror for better
//! error handling and actionable error messages.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for import operations
#[derive(Error, Debug)]
pub enum ImportError {
    /// File system errors
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A configured lookup path is empty
    #[error(
        "lookup_paths contains an empty string, which would search the whole file system"
    )]
    EmptyLookupPath,

    /// Filesystem traversal failed under a lookup path
    #[error("Failed to search for modules under '{path}': {message}")]
    SearchFailed { path: PathBuf, message: String },

    /// The linter reported a fatal problem with the buffer
    #[error("Linter reported a fatal problem with the buffer:\n{output}")]
    LintParse { output: String },

    /// The linter process itself could not run
    #[error("Linter invocation failed:\n{stderr}")]
    LintInvocation { stderr: String },

    #[error("Failed to spawn linter '{executable}': {source}")]
    LintSpawn {
        executable: String,
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {reason}")]
    ConfigError { reason: String },

    #[error("Failed to read package manifest '{path}': {reason}")]
    ManifestError { path: PathBuf, reason: String },
}

impl ImportError {
    pub fn search_failed(path: PathBuf, message: impl Into<String>) -> Self {
        Self::SearchFailed {
            path,
            message: message.into(),
        }
    }

    pub fn config(reason: impl Into<String>) -> Self {
        Self::ConfigError {
            reason: reason.into(),
        }
    }

    /// Get a stable status code for this error type.
    ///
    /// Returns a string identifier that can be used in JSON responses
    /// for programmatic error handling.
    pub fn status_code(&self) -> String {
        match self {
            Self::FileRead { .. } => "FILE_READ_ERROR",
            Self::FileWrite { .. } => "FILE_WRITE_ERROR",
            Self::EmptyLookupPath => "EMPTY_LOOKUP_PATH",
            Self::SearchFailed { .. } => "SEARCH_FAILED",
            Self::LintParse { .. } => "LINT_PARSE_ERROR",
            Self::LintInvocation { .. } => "LINT_INVOCATION_ERROR",
            Self::LintSpawn { .. } => "LINT_SPAWN_ERROR",
            Self::ConfigError { .. } => "CONFIG_ERROR",
            Self::ManifestError { .. } => "MANIFEST_ERROR",
        }
        .to_string()
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::EmptyLookupPath => vec![
                "Remove the empty entry from lookup_paths in .importjs/settings.toml",
                "Use \".\" to search from the project root",
            ],
            Self::LintParse { .. } => {
                vec!["Fix the syntax error in the buffer, then run fix-imports again"]
            }
            Self::LintInvocation { .. } | Self::LintSpawn { .. } => vec![
                "Check that eslint_executable points to an installed eslint",
                "Run the configured eslint command by hand to see the full error",
            ],
            Self::ConfigError { .. } => {
                vec!["Run 'importjs init --force' to regenerate the configuration"]
            }
            Self::FileRead { .. } => {
                vec!["Check that the file exists and you have read permissions"]
            }
            Self::ManifestError { .. } => vec!["Check that package.json is valid JSON"],
            _ => vec![],
        }
    }
}

/// Result type alias for import operations
pub type ImportResult<T> = Result<T, ImportError>;
