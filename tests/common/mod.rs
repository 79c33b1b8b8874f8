use anyhow::Result;
use async_trait::async_trait;
use explain_bridge::core::errors::InferenceFailure;
use explain_bridge::inference::InferenceClient;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;
use tokio::fs;

/// Shared test utilities to reduce duplication across test files
pub mod test_helpers {
    use super::*;

    /// Create a test file in a specific directory
    pub async fn create_test_file_in_dir(dir: &TempDir, name: &str, content: &str) -> Result<PathBuf> {
        let file_path = dir.path().join(name);
        fs::write(&file_path, content).await?;
        Ok(file_path)
    }

    /// Byte offset of the first occurrence of `needle`
    pub fn offset_of(source: &str, needle: &str) -> usize {
        source
            .find(needle)
            .unwrap_or_else(|| panic!("{needle:?} not found in test source"))
    }

    /// A small but realistic module: imports, constants, a decorator, a class
    pub fn python_module() -> &'static str {
        r#"import json
from pathlib import Path as P

MAX_RETRIES = 3  # attempts
DEFAULTS = {
    "timeout": 30,
}


def memoize(func):
    cache = {}

    def wrapper(*args):
        if args not in cache:
            cache[args] = func(*args)
        return cache[args]

    return wrapper


@memoize
def load_settings(name):
    """Load settings from disk.

    Falls back to DEFAULTS.
    """
    path = P(name)
    for attempt in range(MAX_RETRIES):
        if path.exists():
            return json.loads(path.read_text())
    return dict(DEFAULTS)


class Client:
    retries = MAX_RETRIES

    def connect(self, host):
        settings = load_settings(host)
        return Client, settings, self.retries
"#
    }
}

/// Inference client returning a fixed reply and recording prompts
#[derive(Default)]
pub struct FixedReply {
    pub reply: String,
    pub prompts: Mutex<Vec<String>>,
}

impl FixedReply {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl InferenceClient for FixedReply {
    async fn infer(&self, prompt: &str) -> Result<String, InferenceFailure> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

/// Inference client that always fails
#[derive(Default)]
pub struct AlwaysFails {
    pub calls: AtomicUsize,
}

#[async_trait]
impl InferenceClient for AlwaysFails {
    async fn infer(&self, _prompt: &str) -> Result<String, InferenceFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(InferenceFailure)
    }
}

/// Inference client that takes `delay` before answering
pub struct Slow {
    pub delay: Duration,
    pub started: AtomicBool,
    pub finished: AtomicBool,
}

impl Slow {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            started: AtomicBool::new(false),
            finished: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl InferenceClient for Slow {
    async fn infer(&self, _prompt: &str) -> Result<String, InferenceFailure> {
        self.started.store(true, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.finished.store(true, Ordering::SeqCst);
        Ok("late answer".to_string())
    }
}
