use crate::dom::{DocumentTree, NodeId};

/// The fixed set of inline formats the editor offers. All of them except
/// [`Link`](FormatKind::Link) go through the generic toggle pipeline; links
/// have their own insertion path driven by the URL prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatKind {
    Bold,
    Italic,
    Underline,
    Important,
    Subscript,
    Superscript,
    Link,
}

impl FormatKind {
    pub const ALL: [FormatKind; 7] = [
        FormatKind::Bold,
        FormatKind::Italic,
        FormatKind::Underline,
        FormatKind::Important,
        FormatKind::Subscript,
        FormatKind::Superscript,
        FormatKind::Link,
    ];

    pub fn descriptor(self) -> &'static FormatDescriptor {
        match self {
            FormatKind::Bold => &BOLD,
            FormatKind::Italic => &ITALIC,
            FormatKind::Underline => &UNDERLINE,
            FormatKind::Important => &IMPORTANT,
            FormatKind::Subscript => &SUBSCRIPT,
            FormatKind::Superscript => &SUPERSCRIPT,
            FormatKind::Link => &LINK,
        }
    }
}

/// Immutable description of one inline format: the element it produces and
/// the glyph shown on its toolbar control.
#[derive(Clone, Copy, Debug)]
pub struct FormatDescriptor {
    pub kind: FormatKind,
    pub tag: &'static str,
    pub class: &'static str,
    pub glyph: &'static str,
}

impl FormatDescriptor {
    /// Tag must match exactly; the class constraint makes an element with
    /// the right tag but a different class a non-match.
    pub fn matches(&self, tree: &DocumentTree, id: NodeId) -> bool {
        tree.tag(id) == Some(self.tag) && tree.class(id) == Some(self.class)
    }
}

static BOLD: FormatDescriptor = FormatDescriptor {
    kind: FormatKind::Bold,
    tag: "strong",
    class: "bold",
    glyph: "B",
};

static ITALIC: FormatDescriptor = FormatDescriptor {
    kind: FormatKind::Italic,
    tag: "em",
    class: "italic",
    glyph: "I",
};

static UNDERLINE: FormatDescriptor = FormatDescriptor {
    kind: FormatKind::Underline,
    tag: "span",
    class: "underline",
    glyph: "U",
};

static IMPORTANT: FormatDescriptor = FormatDescriptor {
    kind: FormatKind::Important,
    tag: "span",
    class: "imp",
    glyph: "imp",
};

static SUBSCRIPT: FormatDescriptor = FormatDescriptor {
    kind: FormatKind::Subscript,
    tag: "sub",
    class: "sub",
    glyph: "x₂",
};

static SUPERSCRIPT: FormatDescriptor = FormatDescriptor {
    kind: FormatKind::Superscript,
    tag: "sup",
    class: "sup",
    glyph: "x²",
};

static LINK: FormatDescriptor = FormatDescriptor {
    kind: FormatKind::Link,
    tag: "a",
    class: "a-link",
    glyph: "🔗",
};

/// Tags that can only come from a format descriptor. The cleanup pass
/// removes any such element once its text content is empty.
pub fn is_format_tag(tag: &str) -> bool {
    FormatKind::ALL
        .iter()
        .any(|kind| kind.descriptor().tag == tag)
}

/// Human-readable name for a format, used in status messages.
pub fn format_label(kind: FormatKind) -> &'static str {
    match kind {
        FormatKind::Bold => "Bold",
        FormatKind::Italic => "Italic",
        FormatKind::Underline => "Underline",
        FormatKind::Important => "Important",
        FormatKind::Subscript => "Subscript",
        FormatKind::Superscript => "Superscript",
        FormatKind::Link => "Link",
    }
}
