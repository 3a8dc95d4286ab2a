//! CLI entry point for the import management engine.
//!
//! Provides commands for importing a variable, fixing imports from linter
//! diagnostics, jumping to a module, and managing configuration.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use importjs::io::{ExitCode, OperationReport, report};
use importjs::{Editor, FileEditor, ImportError, ImportResult, Importer, Settings};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Import management for JavaScript source files
#[derive(Parser)]
#[command(
    name = "importjs",
    version = env!("CARGO_PKG_VERSION"),
    about = "Import management for JavaScript source files",
    long_about = "Resolves the module a variable comes from and keeps the import block \
at the top of the file canonical: deduplicated, sorted, and wrapped.",
    styles = clap_cargo_style()
)]
struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit JSON for editor integration
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Import one variable into a file
    #[command(about = "Resolve a variable and add or extend its import")]
    Word {
        /// File to operate on
        file: PathBuf,

        /// Variable name to import
        variable: String,

        /// Pick the Nth candidate (1-based) when several modules match
        #[arg(long)]
        select: Option<usize>,

        /// Write the result back instead of printing it
        #[arg(short, long)]
        write: bool,
    },

    /// Remove unused imports and add undefined ones
    #[command(about = "Run the linter and fix the import block to match")]
    Fix {
        /// File to operate on
        file: PathBuf,

        /// Write the result back instead of printing it
        #[arg(short, long)]
        write: bool,
    },

    /// Resolve a variable and print the file that defines it
    Goto {
        /// File the variable appears in
        file: PathBuf,

        /// Variable name to resolve
        variable: String,
    },

    /// Initialize project configuration
    #[command(about = "Set up .importjs directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Display active settings
    Config,
}

fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    let code = match run(cli) {
        Ok(code) => code,
        Err(error) => {
            report::print_error(&error, json, &mut io::stdout(), &mut io::stderr())
                .unwrap_or(ExitCode::GeneralError)
        }
    };
    std::process::exit(code.into());
}

fn run(cli: Cli) -> ImportResult<ExitCode> {
    match cli.command {
        Commands::Word {
            file,
            variable,
            select,
            write,
        } => {
            let settings = load_settings(cli.config.as_deref())?;
            let mut editor = FileEditor::open(&file)?
                .with_word(variable)
                .with_selection(select.map(|n| n.saturating_sub(1)));
            let before = editor.current_file_content();
            Importer::new(&settings).import_word(&mut editor)?;
            finish(editor, &file, &before, write, cli.json)
        }

        Commands::Fix { file, write } => {
            let settings = load_settings(cli.config.as_deref())?;
            let mut editor = FileEditor::open(&file)?;
            let before = editor.current_file_content();
            Importer::new(&settings).fix_imports(&mut editor)?;
            finish(editor, &file, &before, write, cli.json)
        }

        Commands::Goto { file, variable } => {
            let settings = load_settings(cli.config.as_deref())?;
            let mut editor = FileEditor::open(&file)?.with_word(variable);
            Importer::new(&settings).goto(&mut editor)?;
            let report = OperationReport {
                file,
                changed: false,
                messages: editor.messages().to_vec(),
                goto: editor.goto_target().map(Path::to_path_buf),
                file_content: None,
            };
            emit(&report, cli.json)
        }

        Commands::Init { force } => {
            let config_path = Settings::init_config_file(force)?;
            println!("Created default configuration at: {}", config_path.display());
            Ok(ExitCode::Success)
        }

        Commands::Config => {
            let settings = load_settings(cli.config.as_deref())?;
            if cli.json {
                let envelope = SettingsEnvelope {
                    ok: true,
                    settings: &settings,
                };
                let rendered = serde_json::to_string_pretty(&envelope)
                    .map_err(|e| ImportError::config(e.to_string()))?;
                println!("{rendered}");
            } else {
                let rendered = toml::to_string_pretty(&settings)
                    .map_err(|e| ImportError::config(e.to_string()))?;
                print!("{rendered}");
            }
            Ok(ExitCode::Success)
        }
    }
}

fn finish(
    editor: FileEditor,
    file: &Path,
    before: &str,
    write: bool,
    json: bool,
) -> ImportResult<ExitCode> {
    let after = editor.current_file_content();
    let changed = after != before;
    if write && changed {
        editor.save()?;
    }

    let report = OperationReport {
        file: file.to_path_buf(),
        changed,
        messages: editor.messages().to_vec(),
        goto: None,
        file_content: if write { None } else { Some(after) },
    };
    emit(&report, json)
}

fn emit(report: &OperationReport, json: bool) -> ImportResult<ExitCode> {
    let mut stdout = io::stdout().lock();
    let printed = if json {
        report.print_json(&mut stdout)
    } else {
        report.print_text(&mut stdout, &mut io::stderr().lock())
    };
    printed.map_err(|source| ImportError::FileWrite {
        path: PathBuf::from("<stdout>"),
        source,
    })?;
    Ok(ExitCode::Success)
}

fn load_settings(config: Option<&Path>) -> ImportResult<Settings> {
    let loaded = match config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    loaded.map_err(|e| ImportError::config(e.to_string()))
}

#[derive(Serialize)]
struct SettingsEnvelope<'a> {
    ok: bool,
    settings: &'a Settings,
}
