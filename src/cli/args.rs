use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::ConfigAction;
use crate::core::method_context::{Cursor, Position};

/// Main CLI structure for explain-bridge.
///
/// Extracts a Python function and the definitions it depends on, then asks a
/// language model to explain it in plain English.
///
/// # Examples
///
/// ```bash
/// # Explain the function around byte offset 120
/// explain-bridge explain src/app.py --offset 120
///
/// # Show the prompt that would be sent, without calling the model
/// explain-bridge explain src/app.py --line 14 --column 8 --dry-run
///
/// # Dump the context of every function as JSON
/// explain-bridge context src/app.py --all
/// ```
#[derive(Parser)]
#[command(name = "explain-bridge")]
#[command(about = "Explain Python functions with just enough surrounding context")]
#[command(version)]
pub struct Cli {
    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available CLI commands for explain-bridge.
#[derive(Subcommand)]
pub enum Commands {
    /// Explain the function under the cursor
    Explain {
        /// Python source file; read from stdin when omitted
        file: Option<PathBuf>,

        #[command(flatten)]
        cursor: CursorArgs,

        /// Print the prompt instead of calling the model
        #[arg(long)]
        dry_run: bool,
    },

    /// Print extracted context without calling the model
    Context {
        /// Python source file; read from stdin when omitted
        file: Option<PathBuf>,

        #[command(flatten)]
        cursor: CursorArgs,

        /// Extract every function in the file
        #[arg(long, conflicts_with_all = ["offset", "line", "column"])]
        all: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Cursor location, either a byte offset or a zero-based line/column pair
#[derive(Args, Debug, Clone, Default)]
pub struct CursorArgs {
    /// Byte offset into the file
    #[arg(long, conflicts_with_all = ["line", "column"])]
    pub offset: Option<usize>,

    /// Zero-based line
    #[arg(long, requires = "column")]
    pub line: Option<u32>,

    /// Zero-based column, in characters
    #[arg(long, requires = "line")]
    pub column: Option<u32>,
}

impl CursorArgs {
    pub fn cursor(&self) -> Result<Cursor> {
        match (self.offset, self.line, self.column) {
            (Some(offset), _, _) => Ok(Cursor::Offset(offset)),
            (None, Some(line), Some(character)) => Ok(Cursor::Position(Position { line, character })),
            _ => bail!("A cursor is required: pass --offset or --line with --column"),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Prompt,
}
