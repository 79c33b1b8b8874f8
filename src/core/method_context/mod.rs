//! # Method Context Extraction
//!
//! Turns one Python function into a compact, self-contained context for a
//! language model: its normalized text plus the definitions of every name it
//! uses but does not bind itself.
//!
//! ## Key Components
//!
//! - **Locator**: cursor offset to innermost enclosing function
//! - **Normalizer**: comment, docstring and whitespace stripping
//! - **Resolver**: free-variable collection against single-file Python scoping
//! - **ContextExtractor**: parse, locate and assemble in one call
//!
//! ## Usage Examples
//!
//! ```rust
//! use explain_bridge::core::method_context::ContextExtractor;
//!
//! let source = "OFFSET = 10\n\ndef add(a, b):\n    return a + b + OFFSET\n";
//! let payload = ContextExtractor::new()
//!     .extract_at(source, source.find("return").unwrap())?
//!     .expect("cursor is inside add");
//!
//! assert_eq!(payload.external_references[0].text, "OFFSET=10");
//! # Ok::<(), explain_bridge::core::errors::ParseError>(())
//! ```

pub mod extractors;
pub mod locator;
pub mod normalizer;
pub mod prompt;
pub mod resolver;
pub mod types;

pub use extractors::{python::PythonTree, TreeProvider};
pub use locator::{functions, locate, locate_position, position_to_offset};
pub use normalizer::normalize;
pub use prompt::{render_prompt, PromptTemplate};
pub use resolver::{reference_sites, resolve};
pub use types::*;

use rayon::prelude::*;

use crate::core::errors::ParseError;

/// Build the payload for a located function
pub fn assemble<'t, T: TreeProvider>(tree: &'t T, function: &FunctionNode<T::Node<'t>>) -> ContextPayload {
    let function_text = tree
        .text_of(function.span)
        .map(normalize)
        .unwrap_or_default();

    ContextPayload {
        function_name: tree.name_of(function.node).map(str::to_string),
        function_text,
        external_references: resolve(tree, function),
    }
}

/// Parse-locate-assemble entry point over Python source text
#[derive(Debug, Default, Clone, Copy)]
pub struct ContextExtractor;

impl ContextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Payload for the function enclosing `offset`, `None` outside any function
    pub fn extract_at(&self, source: &str, offset: usize) -> Result<Option<ContextPayload>, ParseError> {
        let tree = PythonTree::parse(source)?;
        if tree.has_syntax_errors() {
            tracing::debug!("Source contains syntax errors, extracting from recovered tree");
        }

        let payload = locate(&tree, offset).map(|function| assemble(&tree, &function));
        match &payload {
            Some(payload) => tracing::debug!(
                function = payload.function_name.as_deref().unwrap_or("<anonymous>"),
                references = payload.external_references.len(),
                "Assembled method context"
            ),
            None => tracing::debug!(offset, "No enclosing function"),
        }

        Ok(payload)
    }

    /// Payload for the function enclosing `cursor`
    pub fn extract(&self, source: &str, cursor: Cursor) -> Result<Option<ContextPayload>, ParseError> {
        match cursor {
            Cursor::Offset(offset) => self.extract_at(source, offset),
            Cursor::Position(position) => self.extract_at_position(source, position),
        }
    }

    /// Same as [`extract_at`](Self::extract_at) for a line/character position
    pub fn extract_at_position(
        &self,
        source: &str,
        position: Position,
    ) -> Result<Option<ContextPayload>, ParseError> {
        match position_to_offset(source, position) {
            Some(offset) => self.extract_at(source, offset),
            None => Ok(None),
        }
    }

    /// Payloads for every function in the file, nested ones included, in source order
    pub fn extract_all(&self, source: &str) -> Result<Vec<ContextPayload>, ParseError> {
        let tree = PythonTree::parse(source)?;
        let spans: Vec<Span> = functions(&tree).iter().map(|function| function.span).collect();

        // nodes are not Send; each worker re-locates its function from the span
        let payloads = spans
            .par_iter()
            .filter_map(|span| {
                let function = locate(&tree, span.start).filter(|found| found.span == *span)?;
                Some(assemble(&tree, &function))
            })
            .collect();

        Ok(payloads)
    }
}
