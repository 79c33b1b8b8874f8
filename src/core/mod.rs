pub mod config;
pub mod constants;
pub mod errors;
pub mod explanation_service;
pub mod method_context;
pub mod utils;

pub use config::{AnalysisConfig, ExplainConfig, InferenceConfig};
pub use errors::{ConfigError, ExplainError, FileError, InferenceError, InferenceFailure, ParseError};
pub use explanation_service::{prepare_prompt, Explanation, ExplanationService, ExplanationTask, PreparedPrompt};
pub use method_context::{
    assemble, locate, normalize, render_prompt, resolve, ContextExtractor, ContextPayload, Cursor,
    ExternalReference, Position, PromptTemplate, PythonTree, TreeProvider,
};
