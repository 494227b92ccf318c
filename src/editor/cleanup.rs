use crate::dom::{DocumentTree, NodeId};
use crate::format::{FormatDescriptor, is_format_tag};

/// Post-edit normalization of the region returned by the surgeon. Pass
/// order matters: unwrapping nested duplicates first creates the immediate
/// siblings that the merge pass compares.
pub fn normalize(tree: &mut DocumentTree, region: NodeId, descriptor: &FormatDescriptor) {
    unwrap_redundant_nesting(tree, region, descriptor);
    merge_adjacent(tree, region, descriptor);
    prune_empty(tree, region);
}

/// A matching element nested inside another matching element is redundant;
/// unwrap every such descendant of the region's matching direct children.
fn unwrap_redundant_nesting(tree: &mut DocumentTree, region: NodeId, descriptor: &FormatDescriptor) {
    let top_level: Vec<NodeId> = tree
        .children(region)
        .iter()
        .copied()
        .filter(|&child| descriptor.matches(tree, child))
        .collect();
    for element in top_level {
        for nested in tree.descendant_elements(element) {
            if descriptor.matches(tree, nested) {
                tree.unwrap_element(nested);
            }
        }
    }
}

/// Coalesces matching elements the surgeon artificially split: when only
/// whitespace-only text (or nothing) separates a matching element from the
/// previously accepted one, its children move into the latter. The emptied
/// element is left for the pruning pass.
fn merge_adjacent(tree: &mut DocumentTree, region: NodeId, descriptor: &FormatDescriptor) {
    let mut previous: Option<NodeId> = None;
    for element in tree.descendant_elements(region) {
        if !descriptor.matches(tree, element) {
            continue;
        }
        if let Some(prev) = previous {
            if truly_adjacent(tree, prev, element) {
                let children: Vec<NodeId> = tree.children(element).to_vec();
                for child in children {
                    tree.append_child(prev, child);
                }
                continue;
            }
        }
        previous = Some(element);
    }
}

/// Merge only truly adjacent same-format elements: `prev` must be the
/// nearest preceding element sibling, with nothing but whitespace-only text
/// in between.
fn truly_adjacent(tree: &DocumentTree, prev: NodeId, element: NodeId) -> bool {
    let (Some(parent), Some(prev_parent)) = (tree.parent(element), tree.parent(prev)) else {
        return false;
    };
    if parent != prev_parent {
        return false;
    }
    let (Some(prev_index), Some(index)) = (tree.child_index(prev), tree.child_index(element))
    else {
        return false;
    };
    if prev_index >= index {
        return false;
    }
    tree.children(parent)[prev_index + 1..index]
        .iter()
        .all(|&between| {
            tree.text(between)
                .map(|text| text.trim().is_empty())
                .unwrap_or(false)
        })
}

/// Any element with a known format tag and no text content left is removed
/// entirely, wherever it sits in the region.
fn prune_empty(tree: &mut DocumentTree, region: NodeId) {
    for element in tree.descendant_elements(region) {
        let Some(tag) = tree.tag(element) else {
            continue;
        };
        if is_format_tag(tag) && tree.text_content(element).is_empty() {
            tree.detach(element);
        }
    }
}
