/// Configuration for explain-bridge
///
/// A single TOML document, loaded with `load_or_default` and validated on
/// every load and save.
pub mod explain_config;

pub use explain_config::{AnalysisConfig, ExplainConfig, InferenceConfig};
