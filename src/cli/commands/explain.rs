use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;

use super::utils::{load_config, read_source};
use crate::cli::commands::Command;
use crate::core::constants::messages;
use crate::core::explanation_service::prepare_prompt;
use crate::core::method_context::Cursor;

pub struct ExplainCommand {
    file: Option<PathBuf>,
    cursor: Cursor,
    dry_run: bool,
    config_path: Option<PathBuf>,
}

impl ExplainCommand {
    pub fn new(file: Option<PathBuf>, cursor: Cursor, dry_run: bool, config_path: Option<PathBuf>) -> Self {
        Self {
            file,
            cursor,
            dry_run,
            config_path,
        }
    }

    #[cfg(feature = "network")]
    async fn explain(
        &self,
        source: String,
        config: &crate::core::config::ExplainConfig,
        config_path: &std::path::Path,
    ) -> Result<String> {
        use crate::config::key_file_for;
        use crate::core::explanation_service::ExplanationService;
        use crate::inference::OpenAiClient;

        let api_key = config.resolve_api_key(&key_file_for(config_path)).await;
        let client = OpenAiClient::new(config.inference.clone(), api_key)?;
        let service = ExplanationService::from_config(client, config);

        let explanation = service.submit(source, self.cursor).await;
        Ok(explanation.message().to_string())
    }

    #[cfg(not(feature = "network"))]
    async fn explain(
        &self,
        _source: String,
        _config: &crate::core::config::ExplainConfig,
        _config_path: &std::path::Path,
    ) -> Result<String> {
        anyhow::bail!("explain-bridge was built without the `network` feature; use --dry-run")
    }
}

#[async_trait]
impl Command for ExplainCommand {
    async fn execute(&self) -> Result<()> {
        let (config, config_path) = load_config(self.config_path.as_deref()).await?;
        let source = read_source(self.file.as_deref(), config.analysis.max_file_size_kb).await?;

        let output = if self.dry_run {
            match prepare_prompt(source, self.cursor, &config.prompt).await? {
                Some(prepared) => prepared.prompt,
                None => messages::NO_METHOD_FOUND.to_string(),
            }
        } else {
            self.explain(source, &config, &config_path).await?
        };

        println!("{}", output);
        Ok(())
    }
}
