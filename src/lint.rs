//! Linter integration for fix-imports
//!
//! Runs eslint over the current buffer (piped on stdin) with only the
//! `no-undef` and `no-unused-vars` rules enabled, and classifies each
//! diagnostic as an unused or an undefined variable. Fatal linter output is
//! surfaced as an error before any buffer mutation happens.

use regex::Regex;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::LazyLock;

use crate::error::{ImportError, ImportResult};

static FATAL_STDOUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Parsing error:|Unrecoverable syntax error|:0:0:\s*Cannot find module '")
        .expect("Invalid fatal stdout regex")
});

static FATAL_STDERR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"SyntaxError:|eslint: command not found|Cannot read config package:|Cannot find module '|No such file or directory",
    )
    .expect("Invalid fatal stderr regex")
});

static DIAGNOSTIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"["'](?P<name>[^"']+)["'] (?P<message>is defined but never used|is not defined|must be in scope when using JSX)"#,
    )
    .expect("Invalid diagnostic regex")
});

/// Variable names extracted from linter diagnostics, first-seen order
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LintDiagnostics {
    pub unused: Vec<String>,
    pub undefined: Vec<String>,
}

pub struct LintDiagnosticsReader<'a> {
    executable: &'a str,
}

impl<'a> LintDiagnosticsReader<'a> {
    pub fn new(executable: &'a str) -> Self {
        Self { executable }
    }

    /// Lint `content` as if it were the file at `path`
    pub fn run(&self, path: &Path, content: &str) -> ImportResult<LintDiagnostics> {
        let mut child = Command::new(self.executable)
            .arg("--stdin")
            .arg("--stdin-filename")
            .arg(path)
            .arg("--format")
            .arg("unix")
            .arg("--rule")
            .arg("no-undef: 2")
            .arg("--rule")
            .arg(r#"no-unused-vars: [2, { "vars": "all", "args": "none" }]"#)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ImportError::LintSpawn {
                executable: self.executable.to_string(),
                source,
            })?;

        child
            .stdin
            .take()
            .expect("stdin was piped")
            .write_all(content.as_bytes())
            .map_err(|source| ImportError::LintSpawn {
                executable: self.executable.to_string(),
                source,
            })?;

        let output = child
            .wait_with_output()
            .map_err(|source| ImportError::LintSpawn {
                executable: self.executable.to_string(),
                source,
            })?;

        classify_output(
            &String::from_utf8_lossy(&output.stdout),
            &String::from_utf8_lossy(&output.stderr),
        )
    }
}

/// Classify raw linter output into unused and undefined variable sets.
///
/// Fatal patterns in stdout or stderr fail fast; everything else that is
/// not a recognized diagnostic line is ignored.
pub fn classify_output(stdout: &str, stderr: &str) -> ImportResult<LintDiagnostics> {
    if FATAL_STDOUT.is_match(stdout) {
        return Err(ImportError::LintParse {
            output: stdout.to_string(),
        });
    }
    if FATAL_STDERR.is_match(stderr) {
        return Err(ImportError::LintInvocation {
            stderr: stderr.to_string(),
        });
    }

    let mut diagnostics = LintDiagnostics::default();
    for line in stdout.lines() {
        let Some(caps) = DIAGNOSTIC.captures(line) else {
            continue;
        };
        let name = caps["name"].to_string();
        match &caps["message"] {
            "is defined but never used" => {
                if !diagnostics.unused.contains(&name) {
                    diagnostics.unused.push(name);
                }
            }
            _ => {
                if !diagnostics.undefined.contains(&name) {
                    diagnostics.undefined.push(name);
                }
            }
        }
    }

    Ok(diagnostics)
}
