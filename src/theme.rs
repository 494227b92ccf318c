use ratatui::style::{Color, Modifier, Style};

/// Theme configuration for the editor
#[derive(Clone, Debug)]
pub struct Theme {
    /// Background color for the editor
    pub background: Color,

    /// Foreground (text) color for the status bar
    pub status_bar_fg: Color,

    /// Background color for the status bar
    pub status_bar_bg: Color,

    /// Color for the current file name in the status bar
    pub filename_color: Color,

    /// Foreground color for active selection
    pub selection_fg: Color,

    /// Background color for active selection
    pub selection_bg: Color,

    /// Foreground color for important (highlighted) text
    pub important_fg: Color,

    /// Background color for important (highlighted) text
    pub important_bg: Color,

    /// Color for links
    pub link_color: Color,

    /// Color for subscript text
    pub subscript_color: Color,

    /// Color for superscript text
    pub superscript_color: Color,

    /// Foreground color for the toolbar strip
    pub toolbar_fg: Color,

    /// Background color for the toolbar strip
    pub toolbar_bg: Color,

    /// Foreground color for disabled toolbar controls
    pub toolbar_disabled_fg: Color,

    /// Foreground color for the link prompt popup
    pub prompt_fg: Color,

    /// Background color for the link prompt popup
    pub prompt_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Reset,
            status_bar_fg: Color::White,
            status_bar_bg: Color::Blue,
            filename_color: Color::LightYellow,
            selection_fg: Color::White,
            selection_bg: Color::LightBlue,
            important_fg: Color::Black,
            important_bg: Color::LightYellow,
            link_color: Color::Blue,
            subscript_color: Color::LightGreen,
            superscript_color: Color::LightMagenta,
            toolbar_fg: Color::White,
            toolbar_bg: Color::Black,
            toolbar_disabled_fg: Color::DarkGray,
            prompt_fg: Color::White,
            prompt_bg: Color::Black,
        }
    }
}

impl Theme {
    /// Create a new theme with default colors
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the style for the status bar
    pub fn status_bar_style(&self) -> Style {
        Style::default()
            .fg(self.status_bar_fg)
            .bg(self.status_bar_bg)
    }

    /// Get the style for the filename in the status bar
    pub fn filename_style(&self) -> Style {
        Style::default().fg(self.filename_color)
    }

    /// Get the style for selected text
    pub fn selection_style(&self) -> Style {
        Style::default().fg(self.selection_fg).bg(self.selection_bg)
    }

    /// Get the style for important text
    pub fn important_style(&self) -> Style {
        Style::default().fg(self.important_fg).bg(self.important_bg)
    }

    /// Get the style for links
    pub fn link_style(&self) -> Style {
        Style::default()
            .fg(self.link_color)
            .add_modifier(Modifier::UNDERLINED)
    }

    /// Get the style for subscript text
    pub fn subscript_style(&self) -> Style {
        Style::default().fg(self.subscript_color)
    }

    /// Get the style for superscript text
    pub fn superscript_style(&self) -> Style {
        Style::default().fg(self.superscript_color)
    }

    /// Get the style for the toolbar strip
    pub fn toolbar_style(&self) -> Style {
        Style::default().fg(self.toolbar_fg).bg(self.toolbar_bg)
    }

    /// Get the style for a disabled toolbar control
    pub fn toolbar_disabled_style(&self) -> Style {
        Style::default()
            .fg(self.toolbar_disabled_fg)
            .bg(self.toolbar_bg)
    }

    /// Get the style for the link prompt popup
    pub fn prompt_style(&self) -> Style {
        Style::default().fg(self.prompt_fg).bg(self.prompt_bg)
    }
}
