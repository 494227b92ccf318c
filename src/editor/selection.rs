use crate::dom::{DocumentTree, NodeId};

/// One end of a selection. For text nodes `offset` is a character offset,
/// for elements it is a child index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Boundary {
    pub node: NodeId,
    pub offset: usize,
}

/// Detached subtrees removed from the document, pending reinsertion.
pub type Fragment = Vec<NodeId>;

/// A pair of boundary points with `start` at or before `end` in document
/// order. Ranges are ephemeral: one is built per formatting operation and
/// discarded once the edit completes.
#[derive(Clone, Copy, Debug)]
pub struct Range {
    pub start: Boundary,
    pub end: Boundary,
}

impl Range {
    pub fn new(start: Boundary, end: Boundary) -> Self {
        Self { start, end }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    pub fn collapse(&mut self, to_start: bool) {
        if to_start {
            self.end = self.start;
        } else {
            self.start = self.end;
        }
    }

    /// Nearest node enclosing both boundary points.
    pub fn common_ancestor(&self, tree: &DocumentTree) -> NodeId {
        lowest_common_ancestor(tree, self.start.node, self.end.node)
    }

    /// Removes the covered content from the tree and returns it as a
    /// detached fragment. Text nodes holding a boundary are split at the
    /// boundary offset; partially covered elements are split into
    /// same-shaped siblings so both boundaries can be raised to the common
    /// ancestor. Nothing outside the covered region is touched. The range
    /// collapses to the extraction point.
    pub fn extract(&mut self, tree: &mut DocumentTree) -> Fragment {
        // Normalize the end first: splitting the start's text node may
        // otherwise shift the end inside the very same node. From here the
        // end is tracked by the node that follows it, which stays stable
        // while the start side splits elements before it.
        let (end_parent, end_index) = element_position(tree, self.end);
        let mut end_next = tree.children(end_parent).get(end_index).copied();
        let (start_parent, start_index) = element_position(tree, self.start);

        let ancestor = lowest_common_ancestor(tree, start_parent, end_parent);

        // Raise the start boundary to a child index of the common ancestor.
        let (mut parent, mut index) = (start_parent, start_index);
        while parent != ancestor {
            let Some(grandparent) = tree.parent(parent) else {
                break;
            };
            let parent_index = tree.child_index(parent).unwrap_or(0);
            let child_count = tree.children(parent).len();
            if index == 0 {
                index = parent_index;
            } else if index >= child_count {
                index = parent_index + 1;
            } else {
                tree.split_element(parent, index);
                index = parent_index + 1;
            }
            parent = grandparent;
        }
        let start_index = index;

        // Raise the end boundary the same way, by following-node identity.
        let mut parent = end_parent;
        while parent != ancestor {
            let Some(grandparent) = tree.parent(parent) else {
                break;
            };
            let index = boundary_index(tree, parent, end_next);
            let child_count = tree.children(parent).len();
            if index == 0 {
                end_next = Some(parent);
            } else if index >= child_count {
                end_next = following_sibling(tree, parent);
            } else {
                end_next = Some(tree.split_element(parent, index));
            }
            parent = grandparent;
        }
        let end_index = boundary_index(tree, ancestor, end_next).max(start_index);

        let covered: Fragment = tree.children(ancestor)[start_index..end_index].to_vec();
        for &node in &covered {
            tree.detach(node);
        }

        self.start = Boundary {
            node: ancestor,
            offset: start_index,
        };
        self.end = self.start;
        covered
    }

    /// Splices a detached fragment in at the start boundary.
    pub fn insert(&mut self, tree: &mut DocumentTree, fragment: Fragment) {
        let (parent, index) = element_position(tree, self.start);
        for (offset, node) in fragment.into_iter().enumerate() {
            tree.insert_child(parent, index + offset, node);
        }
        self.start = Boundary {
            node: parent,
            offset: index,
        };
        self.end = self.start;
    }

    /// Extracts the covered content from a clone of the tree, leaving the
    /// live document untouched. Node ids carry over because cloning the
    /// arena preserves them.
    pub fn extract_probe(&self, tree: &DocumentTree) -> (DocumentTree, Fragment) {
        let mut probe = tree.clone();
        let mut range = *self;
        let fragment = range.extract(&mut probe);
        (probe, fragment)
    }

    /// Text covered by the range, computed non-destructively.
    pub fn text(&self, tree: &DocumentTree) -> String {
        let (probe, fragment) = self.extract_probe(tree);
        let mut text = String::new();
        for &node in &fragment {
            text.push_str(&probe.text_content(node));
        }
        text
    }
}

/// Turns a boundary into an element/child-index position, splitting the
/// text node it points into when the offset falls mid-text.
fn element_position(tree: &mut DocumentTree, boundary: Boundary) -> (NodeId, usize) {
    if !tree.is_text(boundary.node) {
        let child_count = tree.children(boundary.node).len();
        return (boundary.node, boundary.offset.min(child_count));
    }
    let Some(parent) = tree.parent(boundary.node) else {
        return (tree.root(), 0);
    };
    let index = tree.child_index(boundary.node).unwrap_or(0);
    let length = tree
        .text(boundary.node)
        .map(|text| text.chars().count())
        .unwrap_or(0);
    if boundary.offset == 0 {
        (parent, index)
    } else if boundary.offset >= length {
        (parent, index + 1)
    } else {
        tree.split_text_node(boundary.node, boundary.offset);
        (parent, index + 1)
    }
}

fn boundary_index(tree: &DocumentTree, parent: NodeId, next: Option<NodeId>) -> usize {
    match next {
        Some(node) => tree
            .children(parent)
            .iter()
            .position(|&c| c == node)
            .unwrap_or(tree.children(parent).len()),
        None => tree.children(parent).len(),
    }
}

fn following_sibling(tree: &DocumentTree, node: NodeId) -> Option<NodeId> {
    let parent = tree.parent(node)?;
    let index = tree.child_index(node)?;
    tree.children(parent).get(index + 1).copied()
}

pub(crate) fn lowest_common_ancestor(tree: &DocumentTree, a: NodeId, b: NodeId) -> NodeId {
    let mut ancestors = Vec::new();
    let mut current = Some(a);
    while let Some(node) = current {
        ancestors.push(node);
        current = tree.parent(node);
    }
    let mut current = Some(b);
    while let Some(node) = current {
        if ancestors.contains(&node) {
            return node;
        }
        current = tree.parent(node);
    }
    tree.root()
}
