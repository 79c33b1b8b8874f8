use super::extractors::{Descendants, TreeProvider};
use super::types::{FunctionNode, NodeKind, Position};

/// Innermost function definition enclosing `offset`.
///
/// Walks parent links from the smallest node at the offset until a function
/// or the module is reached. `None` at module level, inside a class body
/// outside any method, or past the end of the file. A cursor on a decorator
/// selects the function it decorates.
pub fn locate<T: TreeProvider>(tree: &T, offset: usize) -> Option<FunctionNode<T::Node<'_>>> {
    let mut current = tree.node_at(offset);

    while let Some(node) = current {
        match tree.kind_of(node) {
            NodeKind::FunctionDefinition => {
                return Some(FunctionNode {
                    node,
                    span: tree.span_of(node),
                })
            }
            NodeKind::Module => return None,
            _ => current = tree.parent_of(node),
        }
    }

    None
}

/// Every function definition in the tree, nested ones included, in source order
pub fn functions<T: TreeProvider>(tree: &T) -> Vec<FunctionNode<T::Node<'_>>> {
    Descendants::new(tree, tree.root())
        .filter(|node| tree.kind_of(*node) == NodeKind::FunctionDefinition)
        .map(|node| FunctionNode {
            node,
            span: tree.span_of(node),
        })
        .collect()
}

/// Same as [`locate`], from a zero-based line/character position
pub fn locate_position<'t, T: TreeProvider>(
    tree: &'t T,
    source: &str,
    position: Position,
) -> Option<FunctionNode<T::Node<'t>>> {
    let offset = position_to_offset(source, position)?;
    locate(tree, offset)
}

/// Convert a line/character position into a byte offset.
///
/// Characters count Unicode scalar values. A character past the end of its
/// line clamps to the line end; a line past the end of the file is `None`.
pub fn position_to_offset(source: &str, position: Position) -> Option<usize> {
    let mut line_start = 0;

    for (index, line) in source.split('\n').enumerate() {
        if index == position.line as usize {
            let within = line
                .char_indices()
                .nth(position.character as usize)
                .map(|(byte, _)| byte)
                .unwrap_or(line.len());
            return Some(line_start + within);
        }
        line_start += line.len() + 1;
    }

    None
}
