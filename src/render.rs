use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthChar;

use crate::dom::{DocumentTree, NodeData, NodeId};
use crate::editor::Editor;
use crate::format::FormatKind;
use crate::theme::Theme;

#[derive(Clone, Copy, Debug)]
pub struct CursorVisualPosition {
    pub line: usize,
    pub column: u16,
}

#[derive(Debug)]
pub struct RenderResult {
    pub lines: Vec<Line<'static>>,
    pub cursor: Option<CursorVisualPosition>,
    pub total_lines: usize,
}

/// Flattens the document tree into styled, wrapped terminal lines. Format
/// elements map to modifiers and theme colors; the selection overrides the
/// styling of the characters it covers.
pub fn render_document(editor: &Editor, width: usize, theme: &Theme) -> RenderResult {
    let mut renderer = Renderer::new(width.max(1), editor.selection(), editor.cursor(), theme);
    let tree = editor.tree();
    renderer.render_children(tree, tree.root(), Style::default());
    renderer.finish()
}

struct Renderer<'a> {
    wrap_width: usize,
    selection: Option<(usize, usize)>,
    cursor: usize,
    theme: &'a Theme,
    lines: Vec<Line<'static>>,
    current_spans: Vec<Span<'static>>,
    current_width: usize,
    pending: String,
    pending_style: Style,
    position: usize,
    cursor_position: Option<CursorVisualPosition>,
}

impl<'a> Renderer<'a> {
    fn new(
        wrap_width: usize,
        selection: Option<(usize, usize)>,
        cursor: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            wrap_width,
            selection,
            cursor,
            theme,
            lines: Vec::new(),
            current_spans: Vec::new(),
            current_width: 0,
            pending: String::new(),
            pending_style: Style::default(),
            position: 0,
            cursor_position: None,
        }
    }

    fn render_children(&mut self, tree: &DocumentTree, id: NodeId, style: Style) {
        for &child in tree.children(id) {
            self.render_node(tree, child, style);
        }
    }

    fn render_node(&mut self, tree: &DocumentTree, id: NodeId, style: Style) {
        match tree.data(id) {
            NodeData::Text(text) => {
                for ch in text.chars() {
                    self.emit_char(ch, style);
                }
            }
            NodeData::Element { .. } => {
                let child_style = self.element_style(tree, id, style);
                self.render_children(tree, id, child_style);
            }
        }
    }

    fn element_style(&self, tree: &DocumentTree, id: NodeId, style: Style) -> Style {
        for kind in FormatKind::ALL {
            if !kind.descriptor().matches(tree, id) {
                continue;
            }
            return match kind {
                FormatKind::Bold => style.add_modifier(Modifier::BOLD),
                FormatKind::Italic => style.add_modifier(Modifier::ITALIC),
                FormatKind::Underline => style.add_modifier(Modifier::UNDERLINED),
                FormatKind::Important => style.patch(self.theme.important_style()),
                FormatKind::Subscript => style.patch(self.theme.subscript_style()),
                FormatKind::Superscript => style.patch(self.theme.superscript_style()),
                FormatKind::Link => style.patch(self.theme.link_style()),
            };
        }
        style
    }

    fn emit_char(&mut self, ch: char, style: Style) {
        let style = match self.selection {
            Some((from, to)) if self.position >= from && self.position < to => {
                self.theme.selection_style()
            }
            _ => style,
        };
        if self.position == self.cursor {
            self.track_cursor();
        }
        self.position += 1;

        if ch == '\n' {
            self.flush_line();
            return;
        }
        let char_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if self.current_width + char_width > self.wrap_width {
            self.flush_line();
        }
        if style != self.pending_style && !self.pending.is_empty() {
            self.flush_pending();
        }
        self.pending_style = style;
        self.pending.push(ch);
        self.current_width += char_width;
    }

    fn track_cursor(&mut self) {
        self.cursor_position = Some(CursorVisualPosition {
            line: self.lines.len(),
            column: self.current_width.min(u16::MAX as usize) as u16,
        });
    }

    fn flush_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.pending);
        self.current_spans.push(Span::styled(text, self.pending_style));
    }

    fn flush_line(&mut self) {
        self.flush_pending();
        let spans = std::mem::take(&mut self.current_spans);
        self.lines.push(Line::from(spans));
        self.current_width = 0;
    }

    fn finish(mut self) -> RenderResult {
        if self.cursor_position.is_none() && self.cursor >= self.position {
            self.track_cursor();
        }
        self.flush_line();
        let total_lines = self.lines.len();
        RenderResult {
            lines: self.lines,
            cursor: self.cursor_position,
            total_lines,
        }
    }
}
