use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;

use super::utils::load_config;
use crate::cli::commands::Command;
use crate::config::{paths, ConfigAction};
use crate::core::config::ExplainConfig;
use crate::core::utils::{FileUtils, SerdeUtils};

pub struct ConfigCommand {
    action: ConfigAction,
    config_path: Option<PathBuf>,
}

impl ConfigCommand {
    pub fn new(action: ConfigAction, config_path: Option<PathBuf>) -> Self {
        Self { action, config_path }
    }
}

#[async_trait]
impl Command for ConfigCommand {
    async fn execute(&self) -> Result<()> {
        match &self.action {
            ConfigAction::Init { force } => {
                let config_path = match &self.config_path {
                    Some(path) => path.clone(),
                    None => paths::config_file()?,
                };
                FileUtils::ensure_writable(&config_path, *force)?;
                ExplainConfig::default().save(&config_path).await?;
                println!("Configuration initialized at {}", config_path.display());
            }

            ConfigAction::Show => {
                let (config, config_path) = load_config(self.config_path.as_deref()).await?;
                println!("# {}", config_path.display());
                println!("{}", SerdeUtils::to_toml_pretty(&config.redacted())?);
            }
        }

        Ok(())
    }
}
