//! Language model access.
//!
//! The explanation pipeline only sees [`InferenceClient`]; the HTTP
//! implementation lives behind the `network` feature.

use async_trait::async_trait;
use std::sync::Arc;

use crate::core::errors::InferenceFailure;

#[cfg(feature = "network")]
pub mod openai;

#[cfg(feature = "network")]
pub use openai::OpenAiClient;

/// Sends one prompt to a model and returns its reply.
///
/// Implementations make at most one round trip per call, log the cause of any
/// failure themselves and report it only as [`InferenceFailure`].
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn infer(&self, prompt: &str) -> Result<String, InferenceFailure>;
}

#[async_trait]
impl<C: InferenceClient + ?Sized> InferenceClient for Arc<C> {
    async fn infer(&self, prompt: &str) -> Result<String, InferenceFailure> {
        (**self).infer(prompt).await
    }
}

#[async_trait]
impl<C: InferenceClient + ?Sized> InferenceClient for Box<C> {
    async fn infer(&self, prompt: &str) -> Result<String, InferenceFailure> {
        (**self).infer(prompt).await
    }
}
