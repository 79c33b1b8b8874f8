//! # explain-bridge
//!
//! Explains a single Python function with a language model, sending only the
//! function itself and the definitions of the names it borrows from the rest
//! of the file.
//!
//! ## Core Features
//!
//! - **Enclosing-function lookup**: cursor offset or line/column to the innermost `def`
//! - **Deterministic normalization**: comments, docstrings and redundant whitespace removed
//! - **Free-variable resolution**: single-file Python scoping, first resolution wins
//! - **Async pipeline**: extraction off the runtime, bounded inference, fixed failure messages
//!
//! ## Quick Start
//!
//! ```rust
//! use explain_bridge::core::method_context::{render_prompt, ContextExtractor, PromptTemplate};
//!
//! let source = "OFFSET = 10\n\ndef add(a, b):\n    return a + b + OFFSET\n";
//! let payload = ContextExtractor::new()
//!     .extract_at(source, source.find("return").unwrap())?
//!     .expect("cursor is inside add");
//!
//! let prompt = render_prompt(&payload, &PromptTemplate::default());
//! assert!(prompt.contains("OFFSET=10"));
//! # Ok::<(), explain_bridge::core::errors::ParseError>(())
//! ```
//!
//! ## Module Overview
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration paths and actions
//! - [`core`] - Context extraction, configuration and the explanation service
//! - [`inference`] - Language model clients
//! - [`security`] - Input path validation

/// Command-line interface and argument parsing
pub mod cli;
/// Configuration paths and CLI actions
pub mod config;
/// Context extraction, configuration and the explanation service
pub mod core;
/// Language model clients
pub mod inference;
/// Input validation
pub mod security;

// Re-export core functionality for easy access
pub use crate::core::*;
