//! Operation reports
//!
//! Every CLI command funnels into one result shape: which buffer was
//! operated on, whether its import block changed, the `ImportJS:` messages
//! to surface, and (for goto) the file to jump to. The shape prints two
//! ways. In text mode the rewritten buffer goes to stdout and everything
//! else to stderr, so `importjs word main.js foo > main.js.new` stays a
//! clean filter. In JSON mode the whole report becomes a single object an
//! editor plugin parses off stdout; failures appear in-band as objects
//! tagged `ok: false`.

use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::error::ImportError;
use crate::io::exit_code::ExitCode;

/// What one operation did to a buffer
#[derive(Debug, Serialize)]
pub struct OperationReport {
    /// Buffer the operation ran against
    pub file: PathBuf,

    /// True when the import block was rewritten
    pub changed: bool,

    /// Messages the editor should surface to the user
    pub messages: Vec<String>,

    /// Where a goto resolved to, if anywhere
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goto: Option<PathBuf>,

    /// The rewritten buffer, present unless it was saved in place
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_content: Option<String>,
}

/// Success half of the protocol: the report flattened under an `ok` tag so
/// plugins can branch without probing for fields
#[derive(Serialize)]
struct ReportEnvelope<'a> {
    ok: bool,
    #[serde(flatten)]
    report: &'a OperationReport,
}

/// Failure half of the protocol
#[derive(Serialize)]
struct ErrorEnvelope {
    ok: bool,
    error: String,
    details: String,
    suggestions: Vec<String>,
    exit_code: u8,
}

impl OperationReport {
    /// Print for a terminal.
    ///
    /// Only the payload (rewritten buffer or goto target) lands on `out`;
    /// messages and status lines go to `err`.
    pub fn print_text(&self, out: &mut dyn Write, err: &mut dyn Write) -> io::Result<()> {
        for message in &self.messages {
            writeln!(err, "{message}")?;
        }
        if let Some(goto) = &self.goto {
            return writeln!(out, "{}", goto.display());
        }
        if let Some(content) = &self.file_content {
            write!(out, "{content}")
        } else if self.changed {
            writeln!(err, "updated {}", self.file.display())
        } else {
            writeln!(err, "{} already up to date", self.file.display())
        }
    }

    /// Print as one JSON object for editor plugins
    pub fn print_json(&self, out: &mut dyn Write) -> io::Result<()> {
        let envelope = ReportEnvelope {
            ok: true,
            report: self,
        };
        writeln!(out, "{}", serde_json::to_string(&envelope)?)
    }
}

/// Print a failed operation and return the exit code it maps to.
///
/// Text mode writes the error and its recovery hints to stderr. JSON mode
/// writes an `ok: false` object to stdout so a plugin reading the protocol
/// sees the failure where it expects the report.
pub fn print_error(
    error: &ImportError,
    json: bool,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> io::Result<ExitCode> {
    let code = ExitCode::from_error(error);
    if json {
        let envelope = ErrorEnvelope {
            ok: false,
            error: error.status_code(),
            details: error.to_string(),
            suggestions: error
                .recovery_suggestions()
                .into_iter()
                .map(String::from)
                .collect(),
            exit_code: code as u8,
        };
        writeln!(stdout, "{}", serde_json::to_string(&envelope)?)?;
    } else {
        writeln!(stderr, "importjs: {error}")?;
        for hint in error.recovery_suggestions() {
            writeln!(stderr, "  hint: {hint}")?;
        }
    }
    Ok(code)
}
