pub mod args;
pub mod commands;

pub use args::{Cli, Commands, CursorArgs, OutputFormat};

use anyhow::Result;
use clap::Parser;

use commands::config::ConfigCommand;
use commands::context::{ContextCommand, Selection};
use commands::explain::ExplainCommand;
use commands::Command;

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(format!("explain_bridge={}", log_level))
        .with_writer(std::io::stderr)
        .init();

    let command: Box<dyn Command + Send + Sync> = match cli.command {
        Commands::Explain { file, cursor, dry_run } => {
            Box::new(ExplainCommand::new(file, cursor.cursor()?, dry_run, cli.config))
        }

        Commands::Context {
            file,
            cursor,
            all,
            format,
        } => {
            let selection = if all {
                Selection::All
            } else {
                Selection::At(cursor.cursor()?)
            };
            Box::new(ContextCommand::new(file, selection, format, cli.config))
        }

        Commands::Config { action } => Box::new(ConfigCommand::new(action, cli.config)),
    };

    command.execute().await
}
