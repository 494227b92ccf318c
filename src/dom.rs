use std::fmt;

/// Index of a node inside a [`DocumentTree`] arena. Ids stay valid for the
/// lifetime of the tree; detached nodes keep their slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeData {
    Text(String),
    Element {
        tag: String,
        class: Option<String>,
        link_target: Option<String>,
    },
}

#[derive(Clone, Debug)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Mutable ordered tree of text and element nodes, stored in an arena so
/// that structural edits never invalidate outstanding [`NodeId`]s. Cloning
/// the tree preserves ids, which the selection code relies on when probing
/// content non-destructively.
#[derive(Clone, Debug)]
pub struct DocumentTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl DocumentTree {
    pub fn new() -> Self {
        let root = Node {
            data: NodeData::Element {
                tag: "div".to_string(),
                class: None,
                link_target: None,
            },
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.node(id).data
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.node(id).data, NodeData::Element { .. })
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.node(id).data, NodeData::Text(_))
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).data {
            NodeData::Element { tag, .. } => Some(tag),
            NodeData::Text(_) => None,
        }
    }

    pub fn class(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).data {
            NodeData::Element { class, .. } => class.as_deref(),
            NodeData::Text(_) => None,
        }
    }

    pub fn link_target(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).data {
            NodeData::Element { link_target, .. } => link_target.as_deref(),
            NodeData::Text(_) => None,
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).data {
            NodeData::Text(text) => Some(text),
            NodeData::Element { .. } => None,
        }
    }

    pub fn text_mut(&mut self, id: NodeId) -> Option<&mut String> {
        match &mut self.node_mut(id).data {
            NodeData::Text(text) => Some(text),
            NodeData::Element { .. } => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Position of `id` within its parent's child list.
    pub fn child_index(&self, id: NodeId) -> Option<usize> {
        let parent = self.node(id).parent?;
        self.node(parent).children.iter().position(|&c| c == id)
    }

    /// Whether `id` lies in the subtree rooted at `ancestor` (inclusive).
    pub fn is_in_subtree(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.node(node).parent;
        }
        false
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push_node(NodeData::Text(text.to_string()))
    }

    pub fn create_element(&mut self, tag: &str, class: Option<&str>) -> NodeId {
        self.push_node(NodeData::Element {
            tag: tag.to_string(),
            class: class.map(|c| c.to_string()),
            link_target: None,
        })
    }

    pub fn set_link_target(&mut self, id: NodeId, target: Option<String>) {
        if let NodeData::Element { link_target, .. } = &mut self.node_mut(id).data {
            *link_target = target;
        }
    }

    fn push_node(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Removes `id` from its parent's child list. No-op for detached nodes.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).parent else {
            return;
        };
        self.node_mut(parent).children.retain(|&c| c != id);
        self.node_mut(id).parent = None;
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let index = self.node(parent).children.len();
        self.insert_child(parent, index, child);
    }

    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        let index = index.min(self.node(parent).children.len());
        self.node_mut(parent).children.insert(index, child);
        self.node_mut(child).parent = Some(parent);
    }

    /// Replaces `id` with its own children, preserving document order.
    /// `id` ends up detached and childless.
    pub fn unwrap_element(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).parent else {
            return;
        };
        let Some(index) = self.child_index(id) else {
            return;
        };
        let children = std::mem::take(&mut self.node_mut(id).children);
        self.detach(id);
        for (offset, child) in children.into_iter().enumerate() {
            self.node_mut(child).parent = None;
            self.insert_child(parent, index + offset, child);
        }
    }

    /// Splits an attached text node at a character offset, leaving
    /// `[..offset]` in place and returning a new following sibling holding
    /// the rest.
    pub fn split_text_node(&mut self, id: NodeId, char_offset: usize) -> NodeId {
        let remainder = match self.text_mut(id) {
            Some(text) => {
                let byte_idx = char_to_byte_idx(text, char_offset);
                text.split_off(byte_idx)
            }
            None => String::new(),
        };
        let new_id = self.create_text(&remainder);
        if let (Some(parent), Some(index)) = (self.parent(id), self.child_index(id)) {
            self.insert_child(parent, index + 1, new_id);
        }
        new_id
    }

    /// Splits an attached element before `child_idx`: a new element with the
    /// same tag, class, and link target takes over the trailing children and
    /// is inserted right after the original.
    pub fn split_element(&mut self, id: NodeId, child_idx: usize) -> NodeId {
        let (tag, class, link_target) = match &self.node(id).data {
            NodeData::Element {
                tag,
                class,
                link_target,
            } => (tag.clone(), class.clone(), link_target.clone()),
            NodeData::Text(_) => (String::new(), None, None),
        };
        let new_id = self.create_element(&tag, class.as_deref());
        self.set_link_target(new_id, link_target);

        let trailing = self.node_mut(id).children.split_off(child_idx);
        for child in &trailing {
            self.node_mut(*child).parent = Some(new_id);
        }
        self.node_mut(new_id).children = trailing;

        if let (Some(parent), Some(index)) = (self.parent(id), self.child_index(id)) {
            self.insert_child(parent, index + 1, new_id);
        }
        new_id
    }

    /// All element nodes strictly below `id`, in document order.
    pub fn descendant_elements(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        self.collect_descendant_elements(id, &mut result);
        result
    }

    fn collect_descendant_elements(&self, id: NodeId, result: &mut Vec<NodeId>) {
        for &child in &self.node(id).children {
            if self.is_element(child) {
                result.push(child);
            }
            self.collect_descendant_elements(child, result);
        }
    }

    /// Concatenated text of the subtree rooted at `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut buffer = String::new();
        self.collect_text(id, &mut buffer);
        buffer
    }

    fn collect_text(&self, id: NodeId, buffer: &mut String) {
        match &self.node(id).data {
            NodeData::Text(text) => buffer.push_str(text),
            NodeData::Element { .. } => {
                for &child in &self.node(id).children {
                    self.collect_text(child, buffer);
                }
            }
        }
    }

    /// Serializes the children of `id` as compact HTML-like markup, the
    /// format used for file storage and history snapshots.
    pub fn serialize_children(&self, id: NodeId) -> String {
        let mut buffer = String::new();
        for &child in &self.node(id).children {
            self.serialize_node(child, &mut buffer);
        }
        buffer
    }

    fn serialize_node(&self, id: NodeId, buffer: &mut String) {
        match &self.node(id).data {
            NodeData::Text(text) => escape_text(text, buffer),
            NodeData::Element {
                tag,
                class,
                link_target,
            } => {
                buffer.push('<');
                buffer.push_str(tag);
                if let Some(class) = class {
                    buffer.push_str(" class=\"");
                    escape_attr(class, buffer);
                    buffer.push('"');
                }
                if let Some(target) = link_target {
                    buffer.push_str(" href=\"");
                    escape_attr(target, buffer);
                    buffer.push('"');
                }
                buffer.push('>');
                for &child in &self.node(id).children {
                    self.serialize_node(child, buffer);
                }
                buffer.push_str("</");
                buffer.push_str(tag);
                buffer.push('>');
            }
        }
    }

    /// Parses document content in the markup emitted by
    /// [`serialize_children`](Self::serialize_children) into a fresh tree.
    pub fn parse(markup: &str) -> Result<Self, ParseError> {
        let mut tree = Self::new();
        let mut parser = Parser {
            chars: markup.chars().collect(),
            pos: 0,
        };
        let root = tree.root;
        parser.parse_content(&mut tree, root)?;
        if parser.pos < parser.chars.len() {
            return Err(parser.error("unexpected closing tag"));
        }
        Ok(tree)
    }
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn char_to_byte_idx(text: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    for (count, (byte_idx, _)) in text.char_indices().enumerate() {
        if count == char_idx {
            return byte_idx;
        }
    }
    text.len()
}

fn escape_text(text: &str, buffer: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => buffer.push_str("&amp;"),
            '<' => buffer.push_str("&lt;"),
            '>' => buffer.push_str("&gt;"),
            _ => buffer.push(ch),
        }
    }
}

fn escape_attr(value: &str, buffer: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => buffer.push_str("&amp;"),
            '<' => buffer.push_str("&lt;"),
            '>' => buffer.push_str("&gt;"),
            '"' => buffer.push_str("&quot;"),
            _ => buffer.push(ch),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    message: String,
    position: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message, self.position)
    }
}

impl std::error::Error for ParseError {}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn error(&self, message: &str) -> ParseError {
        ParseError {
            message: message.to_string(),
            position: self.pos,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    /// Parses text and elements into `parent` until a closing tag or the end
    /// of input. Stops *before* a closing tag so the caller can match it.
    fn parse_content(&mut self, tree: &mut DocumentTree, parent: NodeId) -> Result<(), ParseError> {
        let mut text = String::new();
        loop {
            match self.peek() {
                None => break,
                Some('<') if self.peek_at(1) == Some('/') => break,
                Some('<') => {
                    if !text.is_empty() {
                        let node = tree.create_text(&text);
                        tree.append_child(parent, node);
                        text.clear();
                    }
                    let element = self.parse_element(tree)?;
                    tree.append_child(parent, element);
                }
                Some('&') => text.push(self.parse_entity()?),
                Some(ch) => {
                    self.pos += 1;
                    text.push(ch);
                }
            }
        }
        if !text.is_empty() {
            let node = tree.create_text(&text);
            tree.append_child(parent, node);
        }
        Ok(())
    }

    fn parse_element(&mut self, tree: &mut DocumentTree) -> Result<NodeId, ParseError> {
        self.expect('<')?;
        let tag = self.parse_name()?;
        let mut class = None;
        let mut link_target = None;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('>') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => {
                    let name = self.parse_name()?;
                    self.expect('=')?;
                    let value = self.parse_quoted_value()?;
                    match name.as_str() {
                        "class" => class = Some(value),
                        "href" => link_target = Some(value),
                        _ => return Err(self.error("unsupported attribute")),
                    }
                }
                None => return Err(self.error("unterminated tag")),
            }
        }

        let element = tree.create_element(&tag, class.as_deref());
        tree.set_link_target(element, link_target);
        self.parse_content(tree, element)?;

        self.expect('<')?;
        self.expect('/')?;
        let closing = self.parse_name()?;
        if closing != tag {
            return Err(self.error("mismatched closing tag"));
        }
        self.expect('>')?;
        Ok(element)
    }

    fn parse_name(&mut self) -> Result<String, ParseError> {
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '-' {
                name.push(ch);
                self.pos += 1;
            } else {
                break;
            }
        }
        if name.is_empty() {
            return Err(self.error("expected a name"));
        }
        Ok(name)
    }

    fn parse_quoted_value(&mut self) -> Result<String, ParseError> {
        self.expect('"')?;
        let mut value = String::new();
        loop {
            match self.peek() {
                Some('"') => {
                    self.pos += 1;
                    return Ok(value);
                }
                Some('&') => value.push(self.parse_entity()?),
                Some(_) => {
                    if let Some(ch) = self.bump() {
                        value.push(ch);
                    }
                }
                None => return Err(self.error("unterminated attribute value")),
            }
        }
    }

    fn parse_entity(&mut self) -> Result<char, ParseError> {
        // Only the entities the serializer emits; a bare ampersand that is
        // not one of them is taken literally.
        let entities = [
            ("&amp;", '&'),
            ("&lt;", '<'),
            ("&gt;", '>'),
            ("&quot;", '"'),
        ];
        for (entity, ch) in entities {
            if self.matches_ahead(entity) {
                self.pos += entity.chars().count();
                return Ok(ch);
            }
        }
        self.pos += 1;
        Ok('&')
    }

    fn matches_ahead(&self, literal: &str) -> bool {
        literal
            .chars()
            .enumerate()
            .all(|(offset, ch)| self.peek_at(offset) == Some(ch))
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error("unexpected character"))
        }
    }
}

#[cfg(test)]
#[path = "dom_tests.rs"]
mod dom_tests;
