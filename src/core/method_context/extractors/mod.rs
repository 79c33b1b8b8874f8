use super::types::{BindingTarget, NodeKind, Span};

pub mod python;

/// Read-only access to a parsed source tree.
///
/// The extraction core only walks and inspects nodes through this trait, so any
/// parser that can answer these questions can back it.
pub trait TreeProvider {
    /// Cheap, copyable handle to a node borrowed from the tree
    type Node<'t>: Copy
    where
        Self: 't;

    /// The root (module) node
    fn root(&self) -> Self::Node<'_>;

    /// Smallest node whose span contains `offset`
    fn node_at(&self, offset: usize) -> Option<Self::Node<'_>>;

    /// Parent of a node, `None` at the root
    fn parent_of<'t>(&'t self, node: Self::Node<'t>) -> Option<Self::Node<'t>>;

    /// Direct children of a node in source order
    fn children_of<'t>(&'t self, node: Self::Node<'t>) -> Vec<Self::Node<'t>>;

    /// Classification of a node
    fn kind_of<'t>(&'t self, node: Self::Node<'t>) -> NodeKind;

    /// Byte span of a node
    fn span_of<'t>(&'t self, node: Self::Node<'t>) -> Span;

    /// Source text of a span, `None` when it falls outside the file
    fn text_of(&self, span: Span) -> Option<&str>;

    /// Declared name of a function or class definition
    fn name_of<'t>(&'t self, node: Self::Node<'t>) -> Option<&'t str>;

    /// Binding site of an unqualified name reference, `None` when unresolved
    fn resolve_reference<'t>(&'t self, node: Self::Node<'t>) -> Option<BindingTarget>;
}

/// Pre-order iterator over a subtree, root included
pub struct Descendants<'t, T: TreeProvider + ?Sized + 't> {
    tree: &'t T,
    stack: Vec<T::Node<'t>>,
}

impl<'t, T: TreeProvider + ?Sized + 't> Descendants<'t, T> {
    pub fn new(tree: &'t T, root: T::Node<'t>) -> Self {
        Self {
            tree,
            stack: vec![root],
        }
    }
}

impl<'t, T: TreeProvider + ?Sized + 't> Iterator for Descendants<'t, T> {
    type Item = T::Node<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let children = self.tree.children_of(node);
        self.stack.extend(children.into_iter().rev());
        Some(node)
    }
}

/// Common utilities for tree-sitter backed providers
pub mod utils {
    use tree_sitter::Node;

    /// Get the text content of a node
    pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
        &source[node.byte_range()]
    }

    /// Whether `node` is the child stored under `field` in `parent`
    pub fn is_field_of(node: &Node, parent: &Node, field: &str) -> bool {
        let mut cursor = parent.walk();
        let found = parent
            .children_by_field_name(field, &mut cursor)
            .any(|child| child.id() == node.id());
        found
    }

    /// Visit all nodes below `root` with a callback; returning `false` skips the
    /// node's children
    pub fn visit_nodes<'tree, F>(root: Node<'tree>, mut callback: F)
    where
        F: FnMut(&Node<'tree>) -> bool,
    {
        let mut cursor = root.walk();
        let mut descend = callback(&cursor.node());

        loop {
            if descend && cursor.goto_first_child() {
                descend = callback(&cursor.node());
                continue;
            }

            loop {
                if cursor.node().id() == root.id() {
                    return;
                }
                if cursor.goto_next_sibling() {
                    descend = callback(&cursor.node());
                    break;
                }
                if !cursor.goto_parent() {
                    return;
                }
            }
        }
    }
}
