use tree_sitter::{Node, Parser, Tree};

use super::{utils, TreeProvider};
use crate::core::errors::ParseError;
use crate::core::method_context::types::{BindingKind, BindingTarget, NodeKind, Span};

/// Node kinds that only regroup assignment targets
const PATTERN_CONTAINERS: &[&str] = &["pattern_list", "tuple_pattern", "list_pattern", "list_splat_pattern"];

const PARAMETER_LISTS: &[&str] = &["parameters", "lambda_parameters", "typed_parameter"];

/// A parsed Python source file.
///
/// Owns the source text and its tree-sitter tree; every node handed out borrows
/// from it. Name resolution follows Python's scoping rules within this one file.
pub struct PythonTree {
    source: String,
    tree: Tree,
}

impl std::fmt::Debug for PythonTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PythonTree")
            .field("bytes", &self.source.len())
            .field("has_errors", &self.tree.root_node().has_error())
            .finish()
    }
}

impl PythonTree {
    /// Parse Python source text
    pub fn parse(source: impl Into<String>) -> Result<Self, ParseError> {
        let source = source.into();
        let mut parser = Parser::new();
        parser
            .set_language(tree_sitter_python::language())
            .map_err(|e| ParseError::Language {
                message: e.to_string(),
            })?;

        let tree = parser
            .parse(&source, None)
            .ok_or(ParseError::ParseFailed)?;

        Ok(Self { source, tree })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether tree-sitter had to recover from syntax errors
    pub fn has_syntax_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    fn text(&self, node: &Node) -> &str {
        utils::node_text(node, &self.source)
    }

    fn resolve_name(&self, reference: Node, name: &str) -> Option<BindingTarget> {
        let reference_span = Span::from(reference.byte_range());
        let mut module_only = false;

        for (depth, scope) in scope_chain(reference).into_iter().enumerate() {
            let is_module = scope.kind() == "module";
            if module_only && !is_module {
                continue;
            }
            // class bodies are not visible from nested scopes
            if scope.kind() == "class_definition" && depth > 0 {
                continue;
            }
            if !is_module {
                if self.declares(scope, "global_statement", name) {
                    module_only = true;
                    continue;
                }
                if self.declares(scope, "nonlocal_statement", name) {
                    continue;
                }
            }

            let bindings = self.bindings_in_scope(scope, name);
            if let Some(binding) = pick_binding(&bindings, reference_span) {
                return Some(binding);
            }
        }

        None
    }

    /// All bindings of `name` introduced directly in `scope`, in source order
    fn bindings_in_scope(&self, scope: Node, name: &str) -> Vec<BindingTarget> {
        let mut bindings = Vec::new();

        for region in scope_regions(scope) {
            utils::visit_nodes(region, |node| {
                if node.id() != scope.id() && is_scope(node) {
                    if let Some(binding) = self.definition_binding(*node, name) {
                        bindings.push(binding);
                    }
                    return false;
                }

                match node.kind() {
                    "import_statement" | "import_from_statement" => {
                        bindings.extend(self.import_bindings(*node, name));
                        false
                    }
                    "global_statement" | "nonlocal_statement" => false,
                    "identifier" => {
                        if self.text(node) == name {
                            bindings.extend(self.binding_of(*node));
                        }
                        false
                    }
                    _ => true,
                }
            });
        }

        bindings
    }

    fn declares(&self, scope: Node, statement_kind: &str, name: &str) -> bool {
        let mut declared = false;

        for region in scope_regions(scope) {
            utils::visit_nodes(region, |node| {
                if declared || (node.id() != scope.id() && is_scope(node)) {
                    return false;
                }
                if node.kind() == statement_kind {
                    let mut cursor = node.walk();
                    declared = node
                        .named_children(&mut cursor)
                        .any(|child| child.kind() == "identifier" && self.text(&child) == name);
                    return false;
                }
                true
            });
        }

        declared
    }

    /// Binding introduced by a nested `def`/`class` in its enclosing scope
    fn definition_binding(&self, node: Node, name: &str) -> Option<BindingTarget> {
        let kind = match node.kind() {
            "function_definition" => BindingKind::Function,
            "class_definition" => BindingKind::Class,
            _ => return None,
        };

        let name_node = node.child_by_field_name("name")?;
        if self.text(&name_node) != name {
            return None;
        }

        let definition = node
            .parent()
            .filter(|parent| parent.kind() == "decorated_definition")
            .unwrap_or(node);

        Some(BindingTarget {
            site: Span::from(name_node.byte_range()),
            definition: Span::from(definition.byte_range()),
            kind,
        })
    }

    fn import_bindings(&self, statement: Node, name: &str) -> Vec<BindingTarget> {
        let mut cursor = statement.walk();
        let imported: Vec<Node> = statement.children_by_field_name("name", &mut cursor).collect();

        imported
            .into_iter()
            .filter_map(|item| match item.kind() {
                "aliased_import" => item.child_by_field_name("alias"),
                "dotted_name" if statement.kind() == "import_statement" => item.named_child(0),
                "dotted_name" => item
                    .named_child_count()
                    .checked_sub(1)
                    .and_then(|last| item.named_child(last)),
                _ => None,
            })
            .filter(|bound| self.text(bound) == name)
            .map(|bound| BindingTarget {
                site: Span::from(bound.byte_range()),
                definition: Span::from(statement.byte_range()),
                kind: BindingKind::Import,
            })
            .collect()
    }

    /// The binding an identifier introduces, if it sits in a binding position
    fn binding_of(&self, ident: Node) -> Option<BindingTarget> {
        let parent = ident.parent()?;
        let site = Span::from(ident.byte_range());
        let binding = |definition: Span, kind: BindingKind| Some(BindingTarget { site, definition, kind });

        match parent.kind() {
            "parameters" | "lambda_parameters" => binding(site, BindingKind::Parameter),
            "typed_parameter" => binding(Span::from(parent.byte_range()), BindingKind::Parameter),
            "default_parameter" | "typed_default_parameter" if utils::is_field_of(&ident, &parent, "name") => {
                binding(Span::from(parent.byte_range()), BindingKind::Parameter)
            }
            "list_splat_pattern" | "dictionary_splat_pattern" if in_parameter_list(parent) => {
                binding(Span::from(parent.byte_range()), BindingKind::Parameter)
            }
            "augmented_assignment" if utils::is_field_of(&ident, &parent, "left") => {
                binding(Span::from(parent.byte_range()), BindingKind::Other)
            }
            "named_expression" if utils::is_field_of(&ident, &parent, "name") => {
                binding(Span::from(parent.byte_range()), BindingKind::Other)
            }
            "as_pattern" | "with_item" if utils::is_field_of(&ident, &parent, "alias") => {
                binding(Span::from(parent.byte_range()), BindingKind::Other)
            }
            "as_pattern_target" => {
                let pattern = parent.parent().unwrap_or(parent);
                binding(Span::from(pattern.byte_range()), BindingKind::Other)
            }
            "except_clause" if follows_as(ident) => {
                binding(Span::new(parent.start_byte(), ident.end_byte()), BindingKind::Other)
            }
            _ => {
                let (owner, target) = assignment_owner(ident)?;
                match owner.kind() {
                    "assignment" => {
                        let value = assigned_value(owner).filter(|_| target.id() == ident.id());
                        let kind = match value {
                            Some(value) => BindingKind::Assignment { value },
                            None => BindingKind::Other,
                        };
                        binding(Span::from(owner.byte_range()), kind)
                    }
                    _ => {
                        // loop header only: `for x in items`
                        let end = owner
                            .child_by_field_name("right")
                            .map(|right| right.end_byte())
                            .unwrap_or_else(|| owner.end_byte());
                        binding(Span::new(owner.start_byte(), end), BindingKind::Other)
                    }
                }
            }
        }
    }
}

impl TreeProvider for PythonTree {
    type Node<'t> = Node<'t>;

    fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    fn node_at(&self, offset: usize) -> Option<Node<'_>> {
        if offset > self.source.len() {
            return None;
        }
        self.tree.root_node().descendant_for_byte_range(offset, offset)
    }

    fn parent_of<'t>(&'t self, node: Node<'t>) -> Option<Node<'t>> {
        node.parent()
    }

    fn children_of<'t>(&'t self, node: Node<'t>) -> Vec<Node<'t>> {
        let mut cursor = node.walk();
        let children = node.children(&mut cursor).collect();
        children
    }

    fn kind_of<'t>(&'t self, node: Node<'t>) -> NodeKind {
        match node.kind() {
            "module" => NodeKind::Module,
            // a decorated function is selected together with its decorators
            "function_definition" if !is_decorated(node) => NodeKind::FunctionDefinition,
            "decorated_definition" if decorated_function(node).is_some() => NodeKind::FunctionDefinition,
            "identifier" if is_name_reference(node) => NodeKind::NameReference,
            _ => NodeKind::Other,
        }
    }

    fn span_of<'t>(&'t self, node: Node<'t>) -> Span {
        Span::from(node.byte_range())
    }

    fn text_of(&self, span: Span) -> Option<&str> {
        self.source.get(span.start..span.end)
    }

    fn name_of<'t>(&'t self, node: Node<'t>) -> Option<&'t str> {
        let node = decorated_function(node).unwrap_or(node);
        match node.kind() {
            "function_definition" | "class_definition" => node
                .child_by_field_name("name")
                .map(|name| utils::node_text(&name, &self.source)),
            _ => None,
        }
    }

    fn resolve_reference<'t>(&'t self, node: Node<'t>) -> Option<BindingTarget> {
        if node.kind() != "identifier" || !is_name_reference(node) {
            return None;
        }
        let name = self.text(&node);
        self.resolve_name(node, name)
    }
}

fn is_scope(node: &Node) -> bool {
    matches!(
        node.kind(),
        "module"
            | "function_definition"
            | "lambda"
            | "class_definition"
            | "list_comprehension"
            | "dictionary_comprehension"
            | "set_comprehension"
            | "generator_expression"
    )
}

/// Parts of a scope node whose code runs inside that scope
fn scope_regions(scope: Node) -> Vec<Node> {
    match scope.kind() {
        "function_definition" | "lambda" => ["parameters", "body"]
            .iter()
            .filter_map(|field| scope.child_by_field_name(field))
            .collect(),
        "class_definition" => scope.child_by_field_name("body").into_iter().collect(),
        _ => vec![scope],
    }
}

/// Scopes a node is evaluated in, innermost first, module last.
///
/// Decorators, defaults, annotations and base classes run in the enclosing
/// scope, so only the `body` of a def/lambda/class counts as inside it.
fn scope_chain(node: Node) -> Vec<Node> {
    let mut chain = Vec::new();
    let mut child = node;

    while let Some(parent) = child.parent() {
        if is_scope(&parent) {
            let inside = match parent.kind() {
                "function_definition" | "lambda" | "class_definition" => {
                    utils::is_field_of(&child, &parent, "body")
                }
                _ => true,
            };
            if inside {
                chain.push(parent);
            }
        }
        child = parent;
    }

    chain
}

/// Last binding already in effect at the reference, else the first one in the
/// scope. A `def` or `class` is in effect inside its own body.
fn pick_binding(bindings: &[BindingTarget], reference: Span) -> Option<BindingTarget> {
    bindings
        .iter()
        .rev()
        .find(|binding| {
            let encloses = matches!(binding.kind, BindingKind::Function | BindingKind::Class)
                && binding.definition.contains(&reference);
            binding.definition.end <= reference.start || encloses
        })
        .or_else(|| bindings.first())
        .copied()
}

fn is_decorated(definition: Node) -> bool {
    definition
        .parent()
        .map(|parent| parent.kind() == "decorated_definition")
        .unwrap_or(false)
}

/// The function wrapped by a `decorated_definition`
fn decorated_function(node: Node) -> Option<Node> {
    if node.kind() != "decorated_definition" {
        return None;
    }
    node.child_by_field_name("definition")
        .filter(|definition| definition.kind() == "function_definition")
}

fn in_parameter_list(splat: Node) -> bool {
    splat
        .parent()
        .map(|parent| PARAMETER_LISTS.contains(&parent.kind()))
        .unwrap_or(false)
}

fn follows_as(node: Node) -> bool {
    node.prev_sibling()
        .map(|sibling| sibling.kind() == "as")
        .unwrap_or(false)
}

/// Statement that assigns to `ident`, with the top-level target it sits in
fn assignment_owner(ident: Node) -> Option<(Node, Node)> {
    let mut current = ident;

    while let Some(parent) = current.parent() {
        match parent.kind() {
            kind if PATTERN_CONTAINERS.contains(&kind) => current = parent,
            "assignment" | "for_statement" | "for_in_clause" => {
                return utils::is_field_of(&current, &parent, "left").then_some((parent, current));
            }
            _ => return None,
        }
    }

    None
}

/// Right-hand side of `name = value`, looking through chained assignments
fn assigned_value(assignment: Node) -> Option<Span> {
    let mut right = assignment.child_by_field_name("right")?;
    while right.kind() == "assignment" {
        right = right.child_by_field_name("right")?;
    }
    Some(Span::from(right.byte_range()))
}

/// Whether an identifier is a bare name read, as opposed to an attribute
/// name, a declaration, an import name or an assignment target
fn is_name_reference(node: Node) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };

    match parent.kind() {
        "attribute" => !utils::is_field_of(&node, &parent, "attribute"),
        "function_definition" | "class_definition" => !utils::is_field_of(&node, &parent, "name"),
        "parameters" | "lambda_parameters" | "typed_parameter" => false,
        "default_parameter" | "typed_default_parameter" => !utils::is_field_of(&node, &parent, "name"),
        "list_splat_pattern" | "dictionary_splat_pattern" if in_parameter_list(parent) => false,
        "keyword_argument" => !utils::is_field_of(&node, &parent, "name"),
        "named_expression" => !utils::is_field_of(&node, &parent, "name"),
        "as_pattern" | "with_item" => !utils::is_field_of(&node, &parent, "alias"),
        "except_clause" => !follows_as(node),
        "dotted_name"
        | "aliased_import"
        | "relative_import"
        | "import_statement"
        | "import_from_statement"
        | "future_import_statement"
        | "global_statement"
        | "nonlocal_statement"
        | "as_pattern_target" => false,
        _ => assignment_owner(node).is_none(),
    }
}
