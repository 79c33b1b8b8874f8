use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Half-open byte range `[start, end)` into the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Whether `other` lies entirely within this span
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// Zero-based cursor position, `character` counted in Unicode scalar values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

/// Where the user's cursor sits in a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cursor {
    Offset(usize),
    Position(Position),
}

/// Classification of a syntax node as seen by the extraction core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Module,
    /// A function definition, including its decorators when it has any
    FunctionDefinition,
    /// A bare identifier in a load position (`x`, not `obj.x`)
    NameReference,
    Other,
}

/// A located function definition
#[derive(Debug, Clone, Copy)]
pub struct FunctionNode<N> {
    pub node: N,
    pub span: Span,
}

/// How a name is introduced at its binding site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BindingKind {
    /// Simple `name = <expr>`; `value` is the span of the assigned expression
    Assignment { value: Span },
    Function,
    Class,
    Import,
    Parameter,
    /// Loop targets, `with`/`except` aliases, walrus, unpacking and the like
    Other,
}

/// The construct a name reference resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingTarget {
    /// Span of the identifier that introduces the name
    pub site: Span,
    /// Span of the whole defining construct
    pub definition: Span,
    pub kind: BindingKind,
}

impl BindingTarget {
    pub fn is_internal(&self, function: Span) -> bool {
        function.contains(&self.site)
    }
}

/// An unqualified name occurrence inside a function body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSite {
    pub name: String,
    pub span: Span,
    pub binding: Option<BindingTarget>,
}

/// A free variable of the selected function together with its definition text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalReference {
    pub name: String,
    pub text: String,
}

/// Everything the model needs to explain one function
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContextPayload {
    /// Name of the function, when the definition carries one
    pub function_name: Option<String>,
    pub function_text: String,
    pub external_references: Vec<ExternalReference>,
}

impl ContextPayload {
    pub fn has_external_references(&self) -> bool {
        !self.external_references.is_empty()
    }
}
