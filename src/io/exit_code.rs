//! Exit codes the CLI hands back to the shell.
//!
//! Zero means the operation ran to completion, including the boring cases:
//! an already-canonical import block or a variable nobody can satisfy are
//! not failures. Non-zero codes distinguish the ways an operation can die
//! before it touches the buffer, so editor plugins and scripts can decide
//! whether retrying, fixing configuration, or fixing the source is the
//! right move. Codes 126 and up stay reserved for the shell.

use crate::error::ImportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Operation ran to completion (code 0)
    Success = 0,

    /// Unspecified failure (code 1)
    GeneralError = 1,

    /// The linter could not parse the buffer (code 4)
    ParseError = 4,

    /// Reading or writing a file failed (code 5)
    IoError = 5,

    /// The configuration is unusable as given (code 6)
    ConfigError = 6,

    /// The module search itself failed (code 7)
    SearchError = 7,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl ExitCode {
    /// Exit code for a failed operation.
    ///
    /// Lint failures split by blame: an unparseable buffer is the user's
    /// source (`ParseError`), a linter that would not run is environment
    /// (`GeneralError`). Everything configuration-shaped lands on
    /// `ConfigError` so plugins can prompt for a settings fix.
    pub fn from_error(error: &ImportError) -> Self {
        match error {
            ImportError::FileRead { .. } | ImportError::FileWrite { .. } => ExitCode::IoError,

            ImportError::LintParse { .. } => ExitCode::ParseError,

            ImportError::LintInvocation { .. } | ImportError::LintSpawn { .. } => {
                ExitCode::GeneralError
            }

            ImportError::EmptyLookupPath
            | ImportError::ConfigError { .. }
            | ImportError::ManifestError { .. } => ExitCode::ConfigError,

            ImportError::SearchFailed { .. } => ExitCode::SearchError,
        }
    }
}
