use crate::dom::{DocumentTree, NodeId};
use crate::format::FormatDescriptor;

/// Ordered chain of enclosing elements from `node` up to and including
/// `root`. Text nodes contribute their parent as the first entry. The chain
/// is never empty and the root is always last, which the locator relies on
/// as its search boundary.
pub fn ancestor_chain(tree: &DocumentTree, node: NodeId, root: NodeId) -> Vec<NodeId> {
    let mut chain = Vec::new();
    let mut current = if tree.is_text(node) {
        tree.parent(node)
    } else {
        Some(node)
    };
    while let Some(element) = current {
        if element == root {
            break;
        }
        chain.push(element);
        current = tree.parent(element);
    }
    chain.push(root);
    chain
}

/// Index of the nearest chain element matching the descriptor, scanning
/// from the selection outward and skipping the root slot. Returns the
/// root's index when no enclosing level carries the format. An element with
/// the right tag but the wrong class is skipped, not matched.
pub fn locate_format(
    tree: &DocumentTree,
    chain: &[NodeId],
    descriptor: &FormatDescriptor,
) -> usize {
    let last = chain.len().saturating_sub(1);
    for (index, &element) in chain.iter().enumerate().take(last) {
        if descriptor.matches(tree, element) {
            return index;
        }
    }
    last
}
