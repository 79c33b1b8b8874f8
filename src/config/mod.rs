pub mod paths;

pub use paths::{config_dir, config_file, key_file_for};

use clap::Subcommand;

/// Configuration actions for explain-bridge
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Show the effective configuration with secrets masked
    Show,
}
