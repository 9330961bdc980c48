//! CLI module for the cpybind binding generator
//!
//! ## Commands
//!
//! - `gen <metadata> [output_dir]` - Generate one `<pkg>.c` per package
//! - `check <metadata>` - Run generation and report diagnostics, writing nothing
//! - `--emit <metadata>` - Print generated C to stdout (debug)
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use crate::config::GenConfig;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Generate CPython C extension bindings from package metadata
#[derive(Parser, Debug)]
#[command(name = "cpybind")]
#[command(version = VERSION)]
#[command(about = "Generate CPython C extension bindings from package metadata", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    // Debug/development flags
    /// Print generated C for every package to stdout (debug)
    #[arg(long = "emit", value_name = "METADATA")]
    pub emit_file: Option<PathBuf>,

    #[command(flatten)]
    pub layout: LayoutArgs,
}

/// Options shaping the generated text.
#[derive(Args, Debug, Clone, Default)]
pub struct LayoutArgs {
    /// Base name of the cgo-exported header to include (default: package name)
    #[arg(long, global = true, value_name = "NAME")]
    pub header: Option<String>,

    /// Spaces per indentation level
    #[arg(long, global = true, value_name = "WIDTH")]
    pub indent: Option<usize>,

    /// Omit the banner and #include block
    #[arg(long = "no-preamble", global = true)]
    pub no_preamble: bool,
}

impl LayoutArgs {
    pub fn to_config(&self) -> GenConfig {
        let mut config = GenConfig::new();
        if let Some(header) = &self.header {
            config = config.with_header(header.clone());
        }
        if let Some(width) = self.indent {
            config = config.with_indent_width(width);
        }
        if self.no_preamble {
            config = config.without_preamble();
        }
        config
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate C extension sources
    Gen {
        /// Package metadata (JSON)
        #[arg(value_name = "METADATA")]
        metadata: PathBuf,
        /// Output directory (default: cpybind_output)
        #[arg(value_name = "OUTPUT_DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Check that metadata can be bound without diagnostics
    Check {
        /// Package metadata (JSON)
        #[arg(value_name = "METADATA")]
        metadata: PathBuf,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let config = cli.layout.to_config();

    if let Some(file) = cli.emit_file {
        return commands::emit_c(&file, &config);
    }

    match cli.command {
        Some(Command::Gen { metadata, output_dir }) => {
            commands::generate_files(&metadata, output_dir.as_deref(), &config)
        }
        Some(Command::Check { metadata }) => commands::check_metadata(&metadata, &config),
        // No command - show help
        None => Err(CliError::failure("Usage: cpybind <gen|check> <METADATA> (see --help)")),
    }
}

// ============================================================================
// Tests
// ============================================================================
