//! Free-variable collection for a located function.

use std::collections::HashSet;

use super::extractors::{Descendants, TreeProvider};
use super::normalizer::normalize;
use super::types::{BindingKind, ExternalReference, FunctionNode, NodeKind, ReferenceSite, Span};

/// Lazy pre-order sequence of the unqualified name references in a function
pub fn reference_sites<'t, T: TreeProvider>(
    tree: &'t T,
    function: &FunctionNode<T::Node<'t>>,
) -> impl Iterator<Item = ReferenceSite> + 't {
    Descendants::new(tree, function.node)
        .filter(move |node| tree.kind_of(*node) == NodeKind::NameReference)
        .filter_map(move |node| {
            let span = tree.span_of(node);
            let name = tree.text_of(span)?.to_string();
            Some(ReferenceSite {
                name,
                span,
                binding: tree.resolve_reference(node),
            })
        })
}

/// External references of `function`, one per name, in order of first use
pub fn resolve<'t, T: TreeProvider>(
    tree: &'t T,
    function: &FunctionNode<T::Node<'t>>,
) -> Vec<ExternalReference> {
    let (references, _) = reference_sites(tree, function).fold(
        (Vec::new(), HashSet::new()),
        |(mut references, mut seen), site| {
            if let Some(reference) = external_reference(tree, function.span, &seen, site) {
                seen.insert(reference.name.clone());
                references.push(reference);
            }
            (references, seen)
        },
    );

    tracing::debug!(
        function = ?function.span,
        count = references.len(),
        "Resolved external references"
    );

    references
}

fn external_reference<T: TreeProvider>(
    tree: &T,
    function: Span,
    seen: &HashSet<String>,
    site: ReferenceSite,
) -> Option<ExternalReference> {
    let binding = site.binding?;
    if binding.is_internal(function) || seen.contains(&site.name) {
        return None;
    }

    let text = match binding.kind {
        BindingKind::Assignment { value } => {
            let value = normalize(tree.text_of(value)?);
            format!("{}={}", site.name, value)
        }
        _ => normalize(tree.text_of(binding.definition)?),
    };

    if text.is_empty() {
        return None;
    }

    Some(ExternalReference {
        name: site.name,
        text,
    })
}
