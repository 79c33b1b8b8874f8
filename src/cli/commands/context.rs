use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Write;
use std::path::PathBuf;

use super::utils::{load_config, read_source};
use crate::cli::args::OutputFormat;
use crate::cli::commands::Command;
use crate::core::constants::messages;
use crate::core::method_context::{render_prompt, ContextExtractor, ContextPayload, Cursor};
use crate::core::utils::SerdeUtils;

/// Which functions to extract
#[derive(Debug, Clone, Copy)]
pub enum Selection {
    At(Cursor),
    All,
}

pub struct ContextCommand {
    file: Option<PathBuf>,
    selection: Selection,
    format: OutputFormat,
    config_path: Option<PathBuf>,
}

impl ContextCommand {
    pub fn new(
        file: Option<PathBuf>,
        selection: Selection,
        format: OutputFormat,
        config_path: Option<PathBuf>,
    ) -> Self {
        Self {
            file,
            selection,
            format,
            config_path,
        }
    }
}

#[async_trait]
impl Command for ContextCommand {
    async fn execute(&self) -> Result<()> {
        let (config, _) = load_config(self.config_path.as_deref()).await?;
        let source = read_source(self.file.as_deref(), config.analysis.max_file_size_kb).await?;
        let selection = self.selection;

        let payloads = tokio::task::spawn_blocking(move || {
            let extractor = ContextExtractor::new();
            match selection {
                Selection::At(cursor) => extractor
                    .extract(&source, cursor)
                    .map(|found| found.into_iter().collect::<Vec<_>>()),
                Selection::All => extractor.extract_all(&source),
            }
        })
        .await??;

        if payloads.is_empty() && matches!(self.selection, Selection::At(_)) {
            tracing::info!("{}", messages::NO_METHOD_FOUND);
        }

        let output = match (self.format, self.selection) {
            (OutputFormat::Json, Selection::At(_)) => SerdeUtils::to_json_pretty(&payloads.first())?,
            (OutputFormat::Json, Selection::All) => SerdeUtils::to_json_pretty(&payloads)?,
            (OutputFormat::Markdown, _) => render_all(&payloads, to_markdown),
            (OutputFormat::Prompt, _) => render_all(&payloads, |payload| render_prompt(payload, &config.prompt)),
        };

        println!("{}", output);
        Ok(())
    }
}

fn render_all(payloads: &[ContextPayload], render: impl Fn(&ContextPayload) -> String) -> String {
    if payloads.is_empty() {
        return messages::NO_METHOD_FOUND.to_string();
    }
    payloads.iter().map(render).collect::<Vec<_>>().join("\n\n")
}

/// Render a payload as a Markdown section
pub fn to_markdown(payload: &ContextPayload) -> String {
    let mut out = String::new();
    let name = payload.function_name.as_deref().unwrap_or("<anonymous>");

    let _ = writeln!(out, "## `{}`\n", name);
    let _ = writeln!(out, "```python\n{}\n```", payload.function_text);

    if payload.has_external_references() {
        let _ = writeln!(out, "\n### External references");
        for reference in &payload.external_references {
            let _ = writeln!(out, "\n#### `{}`\n\n```python\n{}\n```", reference.name, reference.text);
        }
    }

    out.trim_end().to_string()
}
