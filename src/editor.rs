use std::fmt;

use crate::dom::{DocumentTree, NodeId, char_to_byte_idx};
use crate::format::FormatKind;
use crate::history::History;

mod chain;
mod cleanup;
mod selection;
mod surgeon;

pub use selection::{Boundary, Fragment, Range};

/// A non-empty text node in document order; the flattened list of these is
/// the coordinate space for the cursor and the selection.
#[derive(Clone, Copy, Debug)]
pub struct SegmentRef {
    pub node: NodeId,
    pub len: usize,
}

/// Raised when link insertion is requested without any selected text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkError {
    EmptySelection,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::EmptySelection => write!(f, "nothing selected"),
        }
    }
}

impl std::error::Error for LinkError {}

/// One editable document with its cursor, selection, and undo history.
///
/// The cursor and the selection anchor are character positions in the
/// flattened text, which keeps them meaningful across structural edits:
/// formatting never alters characters, so positions survive a toggle.
pub struct Editor {
    tree: DocumentTree,
    segments: Vec<SegmentRef>,
    cursor: usize,
    anchor: Option<usize>,
    history: History,
}

impl Editor {
    pub fn new(tree: DocumentTree) -> Self {
        let mut editor = Self {
            tree,
            segments: Vec::new(),
            cursor: 0,
            anchor: None,
            history: History::new(),
        };
        editor.rebuild_segments();
        editor
    }

    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    pub fn serialize(&self) -> String {
        self.tree.serialize_children(self.tree.root())
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn text_len(&self) -> usize {
        self.segments.iter().map(|segment| segment.len).sum()
    }

    /// Ordered, non-empty selection bounds, if any.
    pub fn selection(&self) -> Option<(usize, usize)> {
        let anchor = self.anchor?;
        if anchor == self.cursor {
            return None;
        }
        Some((anchor.min(self.cursor), anchor.max(self.cursor)))
    }

    pub fn clear_selection(&mut self) {
        self.anchor = None;
    }

    pub fn selected_text(&self) -> String {
        let Some((from, to)) = self.selection() else {
            return String::new();
        };
        let mut text = String::new();
        let mut position = 0;
        for segment in &self.segments {
            if let Some(node_text) = self.tree.text(segment.node) {
                for ch in node_text.chars() {
                    if position >= from && position < to {
                        text.push(ch);
                    }
                    position += 1;
                }
            }
        }
        text
    }

    /// Moves the caret by `delta` characters. With `extend` the selection
    /// anchor stays (or is planted) so the selection grows; without it any
    /// selection collapses.
    pub fn move_cursor(&mut self, delta: isize, extend: bool) {
        let position = self.cursor.saturating_add_signed(delta).min(self.text_len());
        self.move_to(position, extend);
    }

    pub fn move_to(&mut self, position: usize, extend: bool) {
        if extend {
            if self.anchor.is_none() {
                self.anchor = Some(self.cursor);
            }
        } else {
            self.anchor = None;
        }
        self.cursor = position.min(self.text_len());
    }

    /// The live selection as a tree range, rebuilt per operation.
    pub fn selection_range(&self) -> Option<Range> {
        let (from, to) = self.selection()?;
        let start = self.pointer_for_start(from)?;
        let end = self.pointer_for_end(to)?;
        Some(Range::new(start, end))
    }

    /// Toggles an inline format on the current selection. Link requests go
    /// through [`insert_link`](Self::insert_link) instead. Returns whether
    /// the document changed; the selection is cleared afterwards either way.
    pub fn toggle_format(&mut self, kind: FormatKind) -> bool {
        if kind == FormatKind::Link {
            return false;
        }
        if self.text_len() == 0 {
            return false;
        }
        let Some(mut range) = self.selection_range() else {
            return false;
        };
        self.checkpoint();
        let changed = surgeon::toggle_format(&mut self.tree, &mut range, kind);
        self.anchor = None;
        self.rebuild_segments();
        self.cursor = self.cursor.min(self.text_len());
        changed
    }

    /// Replaces the selected content with a link whose visible text is
    /// `text` (captured before any prompt interaction consumed the
    /// selection) and whose target is `url`, taken as entered.
    pub fn insert_link(&mut self, text: &str, url: &str) -> Result<(), LinkError> {
        if text.is_empty() {
            return Err(LinkError::EmptySelection);
        }
        let mut range = match self.selection_range() {
            Some(range) => range,
            None => {
                // Selection consumed meanwhile; fall back to the caret.
                let boundary = self.pointer_for_start(self.cursor).unwrap_or(Boundary {
                    node: self.tree.root(),
                    offset: 0,
                });
                Range::new(boundary, boundary)
            }
        };
        self.checkpoint();
        surgeon::insert_link(&mut self.tree, &mut range, text, url);
        self.anchor = None;
        self.rebuild_segments();
        self.cursor = self.cursor.min(self.text_len());
        Ok(())
    }

    pub fn insert_char(&mut self, ch: char) -> bool {
        self.checkpoint();
        self.delete_selection_contents();
        if self.segments.is_empty() {
            let node = self.tree.create_text(&ch.to_string());
            let root = self.tree.root();
            self.tree.append_child(root, node);
            self.rebuild_segments();
            self.cursor = 1;
            return true;
        }
        let Some(boundary) = self.insertion_point(self.cursor) else {
            self.history_discard_last();
            return false;
        };
        let Some(text) = self.tree.text_mut(boundary.node) else {
            self.history_discard_last();
            return false;
        };
        let byte_idx = char_to_byte_idx(text, boundary.offset);
        text.insert(byte_idx, ch);
        self.rebuild_segments();
        self.cursor += 1;
        true
    }

    pub fn backspace(&mut self) -> bool {
        if self.selection().is_some() {
            self.checkpoint();
            self.delete_selection_contents();
            return true;
        }
        if self.cursor == 0 {
            return false;
        }
        let target = self.cursor - 1;
        let Some(boundary) = self.pointer_for_start(target) else {
            return false;
        };
        self.checkpoint();
        let emptied = {
            let Some(text) = self.tree.text_mut(boundary.node) else {
                self.history_discard_last();
                return false;
            };
            let start = char_to_byte_idx(text, boundary.offset);
            let end = char_to_byte_idx(text, boundary.offset + 1);
            text.drain(start..end);
            text.is_empty()
        };
        if emptied {
            self.tree.detach(boundary.node);
        }
        self.rebuild_segments();
        self.cursor = target;
        true
    }

    pub fn undo(&mut self) -> bool {
        let current = self.serialize();
        match self.history.undo(current) {
            Some(snapshot) => {
                self.restore(&snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        let current = self.serialize();
        match self.history.redo(current) {
            Some(snapshot) => {
                self.restore(&snapshot);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Pushes a pre-mutation snapshot; called before every content edit.
    fn checkpoint(&mut self) {
        let snapshot = self.serialize();
        self.history.record(snapshot);
    }

    fn history_discard_last(&mut self) {
        // A checkpoint was taken but the edit turned out to be a no-op.
        let current = self.serialize();
        let _ = self.history.undo(current);
    }

    fn restore(&mut self, snapshot: &str) {
        if let Ok(tree) = DocumentTree::parse(snapshot) {
            self.tree = tree;
            self.anchor = None;
            self.rebuild_segments();
            self.cursor = self.cursor.min(self.text_len());
        }
    }

    fn delete_selection_contents(&mut self) -> bool {
        let Some((from, _)) = self.selection() else {
            return false;
        };
        let Some(mut range) = self.selection_range() else {
            return false;
        };
        let _removed = range.extract(&mut self.tree);
        self.anchor = None;
        self.rebuild_segments();
        self.cursor = from.min(self.text_len());
        true
    }

    fn rebuild_segments(&mut self) {
        self.segments.clear();
        let root = self.tree.root();
        collect_segments(&self.tree, root, &mut self.segments);
    }

    /// Boundary for a range start: at a segment seam, the following
    /// segment's offset zero.
    fn pointer_for_start(&self, position: usize) -> Option<Boundary> {
        let mut cumulative = 0;
        for segment in &self.segments {
            if position < cumulative + segment.len {
                return Some(Boundary {
                    node: segment.node,
                    offset: position - cumulative,
                });
            }
            cumulative += segment.len;
        }
        self.segments.last().map(|segment| Boundary {
            node: segment.node,
            offset: segment.len,
        })
    }

    /// Boundary for a range end: at a segment seam, the preceding segment's
    /// trailing offset, so the range never leaks into the next segment.
    fn pointer_for_end(&self, position: usize) -> Option<Boundary> {
        let mut cumulative = 0;
        for segment in &self.segments {
            if position > cumulative && position <= cumulative + segment.len {
                return Some(Boundary {
                    node: segment.node,
                    offset: position - cumulative,
                });
            }
            cumulative += segment.len;
        }
        if position == 0 {
            return self.segments.first().map(|segment| Boundary {
                node: segment.node,
                offset: 0,
            });
        }
        None
    }

    /// Where a typed character lands: appended to the preceding segment at
    /// a seam, so typing continues the formatting it follows.
    fn insertion_point(&self, position: usize) -> Option<Boundary> {
        if position == 0 {
            return self.segments.first().map(|segment| Boundary {
                node: segment.node,
                offset: 0,
            });
        }
        self.pointer_for_end(position)
    }
}

fn collect_segments(tree: &DocumentTree, id: NodeId, segments: &mut Vec<SegmentRef>) {
    if let Some(text) = tree.text(id) {
        let len = text.chars().count();
        if len > 0 {
            segments.push(SegmentRef { node: id, len });
        }
        return;
    }
    for &child in tree.children(id) {
        collect_segments(tree, child, segments);
    }
}

#[cfg(test)]
#[path = "editor_tests.rs"]
mod editor_tests;


#[cfg(test)]
#[path = "editor/surgeon_tests.rs"]
mod surgeon_tests;

#[cfg(test)]
#[path = "editor/cleanup_tests.rs"]
mod cleanup_tests;
