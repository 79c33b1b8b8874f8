//! # Explanation Service
//!
//! Runs the whole pipeline for one request as a single tokio task: parsing,
//! locating and assembling on the blocking pool, then one inference call
//! bounded by a timeout. Every failure becomes a fixed result message.
//!
//! ## Usage Examples
//!
//! ```rust,ignore
//! use explain_bridge::core::explanation_service::ExplanationService;
//! use explain_bridge::core::method_context::Cursor;
//!
//! let service = ExplanationService::from_config(client, &config);
//! let task = service.submit(source, Cursor::Offset(42));
//! println!("{}", task.await);
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::{timeout, Duration};

use super::config::ExplainConfig;
use super::constants::messages;
use super::errors::{InferenceError, InferenceFailure};
use super::method_context::{render_prompt, ContextExtractor, ContextPayload, Cursor, PromptTemplate};
use crate::inference::InferenceClient;

/// Final result of one explanation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum Explanation {
    /// Text returned by the model
    Generated(String),
    /// The cursor was not inside a function; no inference call was made
    NoMethodFound,
    /// Extraction or inference failed; the cause was logged
    Failed,
}

impl Explanation {
    /// Text shown to the user
    pub fn message(&self) -> &str {
        match self {
            Explanation::Generated(text) => text,
            Explanation::NoMethodFound => messages::NO_METHOD_FOUND,
            Explanation::Failed => messages::GENERATION_FAILED,
        }
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Extracted context and the prompt that would be sent for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedPrompt {
    pub payload: ContextPayload,
    pub prompt: String,
}

/// Extract the context for `cursor` on the blocking pool and render its prompt.
///
/// `Ok(None)` when the cursor is outside every function.
pub async fn prepare_prompt(
    source: String,
    cursor: Cursor,
    template: &PromptTemplate,
) -> anyhow::Result<Option<PreparedPrompt>> {
    let payload =
        tokio::task::spawn_blocking(move || ContextExtractor::new().extract(&source, cursor)).await??;

    Ok(payload.map(|payload| {
        let prompt = render_prompt(&payload, template);
        PreparedPrompt { payload, prompt }
    }))
}

/// Explanation pipeline over an inference client
pub struct ExplanationService<C> {
    client: Arc<C>,
    template: Arc<PromptTemplate>,
    timeout: Duration,
}

impl<C> Clone for ExplanationService<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            template: Arc::clone(&self.template),
            timeout: self.timeout,
        }
    }
}

impl<C: InferenceClient + 'static> ExplanationService<C> {
    pub fn new(client: C, template: PromptTemplate, timeout: Duration) -> Self {
        Self {
            client: Arc::new(client),
            template: Arc::new(template),
            timeout,
        }
    }

    pub fn from_config(client: C, config: &ExplainConfig) -> Self {
        Self::new(
            client,
            config.prompt.clone(),
            Duration::from_secs(config.inference.timeout_seconds),
        )
    }

    /// Run the full pipeline on the current task
    pub async fn explain(&self, source: String, cursor: Cursor) -> Explanation {
        let prepared = match prepare_prompt(source, cursor, &self.template).await {
            Ok(Some(prepared)) => prepared,
            Ok(None) => {
                tracing::debug!(?cursor, "Cursor is not inside a function");
                return Explanation::NoMethodFound;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Context extraction failed");
                return Explanation::Failed;
            }
        };

        tracing::debug!(prompt = %prepared.prompt, "Rendered prompt");

        match timeout(self.timeout, self.client.infer(&prepared.prompt)).await {
            Ok(Ok(text)) if !text.trim().is_empty() => Explanation::Generated(text),
            Ok(Ok(_)) => {
                tracing::warn!(error = %InferenceError::EmptyResponse, "Inference request failed");
                Explanation::Failed
            }
            Ok(Err(InferenceFailure)) => Explanation::Failed,
            Err(_) => {
                let error = InferenceError::Timeout {
                    seconds: self.timeout.as_secs(),
                };
                tracing::warn!(error = %error, "Inference request failed");
                Explanation::Failed
            }
        }
    }

    /// Run the pipeline as a background task
    pub fn submit(&self, source: String, cursor: Cursor) -> ExplanationTask {
        let service = self.clone();
        ExplanationTask {
            handle: tokio::spawn(async move { service.explain(source, cursor).await }),
        }
    }
}

/// Handle to a submitted explanation.
///
/// Awaiting it yields the [`Explanation`]. Dropping or cancelling it aborts the
/// pipeline; a cancelled task resolves to [`Explanation::Failed`].
#[derive(Debug)]
pub struct ExplanationTask {
    handle: JoinHandle<Explanation>,
}

impl ExplanationTask {
    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Future for ExplanationTask {
    type Output = Explanation;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle).poll(cx).map(|joined| {
            joined.unwrap_or_else(|e| {
                if e.is_cancelled() {
                    tracing::debug!("Explanation task cancelled");
                } else {
                    tracing::warn!(error = %e, "Explanation task panicked");
                }
                Explanation::Failed
            })
        })
    }
}

impl Drop for ExplanationTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
