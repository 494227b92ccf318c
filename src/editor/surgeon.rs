use crate::dom::{DocumentTree, NodeId};
use crate::format::{FormatDescriptor, FormatKind};

use super::chain::{ancestor_chain, locate_format};
use super::cleanup;
use super::selection::{Boundary, Range};

/// Applies, removes, or toggles an inline format on the selected content.
///
/// The located chain position decides between three structural edits:
/// stripping an enclosing format element, unwrapping matching descendants
/// when the selection is already fully covered, or wrapping the selection
/// in a fresh format element. The edited region is normalized afterwards
/// and the range is left collapsed. Requests on an empty document are
/// silently ignored.
pub fn toggle_format(tree: &mut DocumentTree, range: &mut Range, kind: FormatKind) -> bool {
    if tree.text_content(tree.root()).is_empty() {
        return false;
    }
    let descriptor = kind.descriptor();
    let chain = ancestor_chain(tree, range.common_ancestor(tree), tree.root());
    let position = locate_format(tree, &chain, descriptor);

    let region = if position < chain.len() - 1 {
        strip_enclosing(tree, range, &chain, position)
    } else if fully_covered(tree, range, descriptor) {
        unwrap_descendants(tree, range, descriptor)
    } else {
        wrap_selection(tree, range, descriptor)
    };

    cleanup::normalize(tree, region, descriptor);
    true
}

/// The selection sits inside a matching element at `position`. The selected
/// content loses that one format but is rewrapped in copies of every level
/// below it, so intermediate formatting still applies; content of the
/// element before and after the selection keeps its formatting untouched.
fn strip_enclosing(
    tree: &mut DocumentTree,
    range: &mut Range,
    chain: &[NodeId],
    position: usize,
) -> NodeId {
    // Shells of the levels between the selection and the stripped element,
    // captured before any surgery rearranges the chain.
    let shells: Vec<(String, Option<String>)> = chain[..position]
        .iter()
        .map(|&element| {
            (
                tree.tag(element).unwrap_or("span").to_string(),
                tree.class(element).map(str::to_string),
            )
        })
        .collect();
    let element = chain[position];

    let selected = range.extract(tree);

    let parent = tree.parent(element).unwrap_or_else(|| tree.root());
    let element_index = tree.child_index(element).unwrap_or(0);

    // Content of the stripped element ahead of the collapse point, detached
    // with its own formatting intact (including a split-off copy of the
    // element itself). What stays behind is the after-content.
    let mut before = Range::new(
        Boundary {
            node: parent,
            offset: element_index,
        },
        range.start,
    );
    let preserved = before.extract(tree);

    let mut wrapped = selected;
    for (tag, class) in &shells {
        let shell = tree.create_element(tag, class.as_deref());
        for node in wrapped {
            tree.append_child(shell, node);
        }
        wrapped = vec![shell];
    }

    let mut fragment = preserved;
    fragment.extend(wrapped);
    before.insert(tree, fragment);
    *range = before;

    parent
}

/// Full-coverage probe: every non-whitespace character of the selection
/// must lie within some matching element. Works on a clone of the tree so
/// the live document stays untouched.
fn fully_covered(tree: &DocumentTree, range: &Range, descriptor: &FormatDescriptor) -> bool {
    let (probe, fragment) = range.extract_probe(tree);
    let mut formatted = String::new();
    let mut total = String::new();
    for &node in &fragment {
        total.push_str(&probe.text_content(node));
        if probe.is_element(node) && descriptor.matches(&probe, node) {
            formatted.push_str(&probe.text_content(node));
        }
        for descendant in probe.descendant_elements(node) {
            if descriptor.matches(&probe, descendant) {
                formatted.push_str(&probe.text_content(descendant));
            }
        }
    }
    strip_whitespace(&formatted) == strip_whitespace(&total)
}

/// The selection is fully covered by matching elements that may be nested
/// or discontiguous. Every matching element inside the extracted fragment
/// is replaced by its children; the text itself survives.
fn unwrap_descendants(
    tree: &mut DocumentTree,
    range: &mut Range,
    descriptor: &FormatDescriptor,
) -> NodeId {
    let mut fragment = range.extract(tree);
    let mut index = 0;
    while index < fragment.len() {
        let node = fragment[index];
        if tree.is_element(node) && descriptor.matches(tree, node) {
            let children: Vec<NodeId> = tree.children(node).to_vec();
            for &child in &children {
                tree.detach(child);
            }
            // Re-examine the spliced-in children; they may match too.
            fragment.splice(index..index + 1, children);
            continue;
        }
        for descendant in tree.descendant_elements(node) {
            if descriptor.matches(tree, descendant) {
                tree.unwrap_element(descendant);
            }
        }
        index += 1;
    }
    range.insert(tree, fragment);
    enclosing_region(tree, range.start.node)
}

/// Neither removal state applies: wrap the extracted selection in a new
/// element for the requested format.
fn wrap_selection(
    tree: &mut DocumentTree,
    range: &mut Range,
    descriptor: &FormatDescriptor,
) -> NodeId {
    let fragment = range.extract(tree);
    let element = tree.create_element(descriptor.tag, Some(descriptor.class));
    for node in fragment {
        tree.append_child(element, node);
    }
    range.insert(tree, vec![element]);
    tree.parent(element).unwrap_or_else(|| tree.root())
}

/// Deletes the covered content and puts a link element in its place whose
/// visible text is `text` and whose target is `url` as entered; URLs are not
/// validated. Returns the new element.
pub fn insert_link(tree: &mut DocumentTree, range: &mut Range, text: &str, url: &str) -> NodeId {
    let _removed = range.extract(tree);
    let descriptor = FormatKind::Link.descriptor();
    let element = tree.create_element(descriptor.tag, Some(descriptor.class));
    tree.set_link_target(element, Some(url.to_string()));
    let label = tree.create_text(text);
    tree.append_child(element, label);
    range.insert(tree, vec![element]);
    element
}

fn enclosing_region(tree: &DocumentTree, node: NodeId) -> NodeId {
    if node == tree.root() {
        return node;
    }
    tree.parent(node).unwrap_or_else(|| tree.root())
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|ch| !ch.is_whitespace()).collect()
}
