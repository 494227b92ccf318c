use std::{
    env, fs, io,
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use scribe_tui::dom::DocumentTree;
use scribe_tui::editor::{Editor, LinkError};
use scribe_tui::format::{FormatKind, format_label};
use scribe_tui::render::render_document;
use scribe_tui::theme::Theme;

const STATUS_TIMEOUT: Duration = Duration::from_secs(4);

fn main() -> Result<()> {
    run()
}

fn run() -> Result<()> {
    let mut args = env::args().skip(1);
    let Some(path_arg) = args.next() else {
        eprintln!("Usage: cargo run -- <file>");
        return Ok(());
    };
    let path = PathBuf::from(path_arg);

    let (tree, initial_status) = load_document(&path)?;
    let mut app = App::new(tree, path, initial_status);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;
    terminal.clear().ok();

    let res = run_app(&mut terminal, &mut app).context("application error");

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    res
}

fn load_document(path: &PathBuf) -> Result<(DocumentTree, Option<String>)> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        match DocumentTree::parse(content.trim_end()) {
            Ok(tree) => Ok((tree, None)),
            Err(err) => {
                let message = format!("Parse error: {err}. Starting with empty document.");
                Ok((DocumentTree::new(), Some(message)))
            }
        }
    } else {
        Ok((DocumentTree::new(), Some("New document".to_string())))
    }
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    while !app.should_quit() {
        terminal
            .draw(|frame| app.draw(frame))
            .context("failed to draw frame")?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout).context("event poll failed")? {
            let evt = event::read().context("failed to read event")?;
            app.handle_event(evt)?;
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}

/// One keyboard-dispatched editor operation; each format in the fixed set
/// maps to its own toggle variant, links to the prompt flow.
#[derive(Clone, Copy)]
enum EditorCommand {
    ToggleFormat(FormatKind),
    OpenLinkPrompt,
    Undo,
    Redo,
    Save,
    Quit,
}

fn command_for_key(code: KeyCode, modifiers: KeyModifiers) -> Option<EditorCommand> {
    if !modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match code {
        KeyCode::Char('b') => Some(EditorCommand::ToggleFormat(FormatKind::Bold)),
        KeyCode::Char('i') => Some(EditorCommand::ToggleFormat(FormatKind::Italic)),
        KeyCode::Char('u') => Some(EditorCommand::ToggleFormat(FormatKind::Underline)),
        KeyCode::Char('e') => Some(EditorCommand::ToggleFormat(FormatKind::Important)),
        KeyCode::Char('d') => Some(EditorCommand::ToggleFormat(FormatKind::Subscript)),
        KeyCode::Char('t') => Some(EditorCommand::ToggleFormat(FormatKind::Superscript)),
        KeyCode::Char('k') => Some(EditorCommand::OpenLinkPrompt),
        KeyCode::Char('z') => Some(EditorCommand::Undo),
        KeyCode::Char('y') => Some(EditorCommand::Redo),
        KeyCode::Char('s') => Some(EditorCommand::Save),
        KeyCode::Char('q') | KeyCode::Char('c') => Some(EditorCommand::Quit),
        _ => None,
    }
}

fn shortcut_hint(kind: FormatKind) -> &'static str {
    match kind {
        FormatKind::Bold => "^B",
        FormatKind::Italic => "^I",
        FormatKind::Underline => "^U",
        FormatKind::Important => "^E",
        FormatKind::Subscript => "^D",
        FormatKind::Superscript => "^T",
        FormatKind::Link => "^K",
    }
}

/// The inline URL prompt; captures the selected text when it opens so link
/// insertion survives the selection being consumed meanwhile.
struct LinkPrompt {
    url: String,
    captured_text: String,
}

struct App {
    editor: Editor,
    theme: Theme,
    file_path: PathBuf,
    scroll_top: usize,
    last_view_height: usize,
    should_quit: bool,
    dirty: bool,
    status_message: Option<(String, Instant)>,
    prompt: Option<LinkPrompt>,
}

impl App {
    fn new(tree: DocumentTree, path: PathBuf, initial_status: Option<String>) -> Self {
        Self {
            editor: Editor::new(tree),
            theme: Theme::new(),
            file_path: path,
            scroll_top: 0,
            last_view_height: 1,
            should_quit: false,
            dirty: false,
            status_message: initial_status.map(|msg| (msg, Instant::now())),
            prompt: None,
        }
    }

    fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if area.height == 0 || area.width == 0 {
            return;
        }

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);
        let toolbar_area = vertical[0];
        let text_area = vertical[1];
        let status_area = vertical[2];

        frame.render_widget(
            Paragraph::new(self.toolbar_line()).style(self.theme.toolbar_style()),
            toolbar_area,
        );

        let render = render_document(&self.editor, text_area.width.max(1) as usize, &self.theme);
        let viewport_height = text_area.height as usize;
        self.last_view_height = viewport_height.max(1);
        if let Some(cursor) = render.cursor {
            if cursor.line < self.scroll_top {
                self.scroll_top = cursor.line;
            } else if cursor.line >= self.scroll_top + viewport_height.max(1) {
                self.scroll_top = cursor.line + 1 - viewport_height.max(1);
            }
        }

        let paragraph = Paragraph::new(Text::from(render.lines))
            .style(Style::default().bg(self.theme.background))
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::NONE))
            .scroll((self.scroll_top as u16, 0));
        frame.render_widget(paragraph, text_area);

        if self.prompt.is_none() {
            if let Some(cursor) = render.cursor {
                if cursor.line >= self.scroll_top
                    && cursor.line < self.scroll_top + viewport_height
                    && text_area.width > 0
                {
                    let cursor_y = text_area.y + (cursor.line - self.scroll_top) as u16;
                    let cursor_x = text_area.x + cursor.column.min(text_area.width - 1);
                    frame.set_cursor_position(Position::new(cursor_x, cursor_y));
                }
            }
        }

        frame.render_widget(
            Paragraph::new(self.status_line()).style(self.theme.status_bar_style()),
            status_area,
        );

        if let Some(prompt) = &self.prompt {
            self.draw_prompt(frame, area, prompt);
        }
    }

    fn toolbar_line(&self) -> Line<'static> {
        let mut spans: Vec<Span<'static>> = Vec::new();
        for kind in FormatKind::ALL {
            let descriptor = kind.descriptor();
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                format!("{} {}", descriptor.glyph, shortcut_hint(kind)),
                self.theme.toolbar_style(),
            ));
            spans.push(Span::raw(" │"));
        }
        let undo_style = if self.editor.can_undo() {
            self.theme.toolbar_style()
        } else {
            self.theme.toolbar_disabled_style()
        };
        let redo_style = if self.editor.can_redo() {
            self.theme.toolbar_style()
        } else {
            self.theme.toolbar_disabled_style()
        };
        spans.push(Span::styled(" undo ^Z".to_string(), undo_style));
        spans.push(Span::raw(" │"));
        spans.push(Span::styled(" redo ^Y".to_string(), redo_style));
        Line::from(spans)
    }

    fn status_line(&self) -> Line<'static> {
        if let Some((message, _)) = &self.status_message {
            return Line::from(Span::raw(format!(" {message}")));
        }
        let marker = if self.dirty { " *" } else { "" };
        Line::from(vec![
            Span::styled(
                format!(" {}", self.file_path.display()),
                self.theme.filename_style(),
            ),
            Span::raw(format!("{marker}  ^S save  ^Q quit")),
        ])
    }

    fn draw_prompt(&self, frame: &mut Frame, area: Rect, prompt: &LinkPrompt) {
        let popup = centered_rect(area, 60, 3);
        frame.render_widget(Clear, popup);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Link target ")
            .style(self.theme.prompt_style());
        let text = Text::from(vec![Line::from(vec![
            Span::styled(
                format!("{}: ", prompt.captured_text),
                Style::default().add_modifier(ratatui::style::Modifier::BOLD),
            ),
            Span::raw(prompt.url.clone()),
        ])]);
        frame.render_widget(Paragraph::new(text).block(block), popup);
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        {
            if self.prompt.is_some() {
                self.handle_prompt_key(code, modifiers);
                return Ok(());
            }

            if let Some(command) = command_for_key(code, modifiers) {
                self.execute_command(command);
                return Ok(());
            }

            match (code, modifiers) {
                (KeyCode::Left, m) => {
                    self.editor.move_cursor(-1, m.contains(KeyModifiers::SHIFT));
                }
                (KeyCode::Right, m) => {
                    self.editor.move_cursor(1, m.contains(KeyModifiers::SHIFT));
                }
                (KeyCode::Home, m) => {
                    self.editor.move_to(0, m.contains(KeyModifiers::SHIFT));
                }
                (KeyCode::End, m) => {
                    let end = self.editor.text_len();
                    self.editor.move_to(end, m.contains(KeyModifiers::SHIFT));
                }
                (KeyCode::Backspace, _) => {
                    if self.editor.backspace() {
                        self.mark_dirty();
                    }
                }
                (KeyCode::Enter, _) => {
                    if self.editor.insert_char('\n') {
                        self.mark_dirty();
                    }
                }
                (KeyCode::Tab, _) => {
                    if self.editor.insert_char('\t') {
                        self.mark_dirty();
                    }
                }
                (KeyCode::Char(ch), m)
                    if !m.contains(KeyModifiers::CONTROL) && !m.contains(KeyModifiers::ALT) =>
                {
                    if self.editor.insert_char(ch) {
                        self.mark_dirty();
                    }
                }
                (KeyCode::PageUp, _) => {
                    self.scroll_top = self.scroll_top.saturating_sub(self.last_view_height.max(1));
                }
                (KeyCode::PageDown, _) => {
                    self.scroll_top += self.last_view_height.max(1);
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn execute_command(&mut self, command: EditorCommand) {
        match command {
            EditorCommand::ToggleFormat(kind) => {
                if self.editor.toggle_format(kind) {
                    self.mark_dirty();
                    self.set_status(format!("Toggled {}", format_label(kind)));
                } else {
                    self.set_status("Select some text first".to_string());
                }
            }
            EditorCommand::OpenLinkPrompt => {
                let captured = self.editor.selected_text();
                if captured.is_empty() {
                    self.set_status("Select the text to link first".to_string());
                } else {
                    self.prompt = Some(LinkPrompt {
                        url: String::new(),
                        captured_text: captured,
                    });
                }
            }
            EditorCommand::Undo => {
                if !self.editor.undo() {
                    self.set_status("Nothing to undo".to_string());
                } else {
                    self.mark_dirty();
                }
            }
            EditorCommand::Redo => {
                if !self.editor.redo() {
                    self.set_status("Nothing to redo".to_string());
                } else {
                    self.mark_dirty();
                }
            }
            EditorCommand::Save => self.save(),
            EditorCommand::Quit => self.should_quit = true,
        }
    }

    fn handle_prompt_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match code {
            KeyCode::Esc => {
                self.prompt = None;
            }
            KeyCode::Enter => {
                if let Some(prompt) = self.prompt.take() {
                    match self.editor.insert_link(&prompt.captured_text, &prompt.url) {
                        Ok(()) => {
                            self.mark_dirty();
                            self.set_status(format!(
                                "Linked \"{}\"",
                                truncate(&prompt.captured_text, 24)
                            ));
                        }
                        Err(LinkError::EmptySelection) => {
                            self.set_status("Select the text to link first".to_string());
                        }
                    }
                }
            }
            KeyCode::Backspace => {
                if let Some(prompt) = &mut self.prompt {
                    prompt.url.pop();
                }
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(prompt) = &mut self.prompt {
                    prompt.url.push(ch);
                }
            }
            _ => {}
        }
    }

    fn on_tick(&mut self) {
        if let Some((_, shown_at)) = &self.status_message {
            if shown_at.elapsed() >= STATUS_TIMEOUT {
                self.status_message = None;
            }
        }
    }

    fn save(&mut self) {
        let contents = self.editor.serialize();
        match fs::write(&self.file_path, contents) {
            Ok(()) => {
                self.dirty = false;
                self.set_status("Saved".to_string());
            }
            Err(err) => {
                self.set_status(format!("Save failed: {err}"));
            }
        }
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn set_status(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let shortened: String = text.chars().take(max_chars).collect();
    format!("{shortened}…")
}
