//! Main TUI application state and logic

use super::panes::{
    outline, render_source_pane, render_status_bar, render_tokens_pane, render_tree_pane,
    OutlineRow, SourceRenderData, SourceScrollState, StatusRenderData, TokenLineIndex,
    TokensRenderData, TreeRenderData,
};
use crate::parser::ast::Program;
use crate::parser::lexer::{LexError, Lexer, Token};
use crate::parser::parse::{ParseError, Parser, ParserConfig};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;
use tracing::debug;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Tokens,
    Tree,
}

impl FocusedPane {
    /// Move focus to the next pane (source -> tokens -> tree)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Tokens,
            FocusedPane::Tokens => FocusedPane::Tree,
            FocusedPane::Tree => FocusedPane::Source,
        }
    }

    /// Move focus to the previous pane
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Tree,
            FocusedPane::Tokens => FocusedPane::Source,
            FocusedPane::Tree => FocusedPane::Tokens,
        }
    }
}

/// Lex as far as possible, keeping the tokens produced before a failure
fn lex_all(source: &str) -> (Vec<Token>, Option<LexError>) {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        match lexer.next_token() {
            Ok(token) => {
                let done = token.is_eof();
                tokens.push(token);
                if done {
                    return (tokens, None);
                }
            }
            Err(err) => return (tokens, Some(err)),
        }
    }
}

/// The main application state
pub struct App {
    /// The source being inspected
    pub source: String,

    /// Tokens up to the end of input or the first lexical error
    pub tokens: Vec<Token>,
    pub lex_error: Option<LexError>,

    /// Result of parsing the whole source
    pub parse_result: Result<Program, ParseError>,

    /// Flattened syntax tree, empty when parsing failed
    pub outline: Vec<OutlineRow>,

    pub line_index: TokenLineIndex,

    /// Index into `tokens` of the selected token
    pub selected: Option<usize>,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll state
    pub source_scroll: SourceScrollState,
    pub tokens_scroll: usize,
    pub tree_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    /// Create a new app, lexing and parsing `source` up front
    pub fn new(source: String, config: ParserConfig) -> Self {
        let (tokens, lex_error) = lex_all(&source);
        let parse_result =
            Parser::with_config(&source, config).and_then(|mut parser| parser.parse_program());
        debug!(
            tokens = tokens.len(),
            parsed = parse_result.is_ok(),
            "inspector loaded source"
        );

        let outline = match &parse_result {
            Ok(program) => outline(program, &source),
            Err(_) => Vec::new(),
        };
        let line_index = TokenLineIndex::new(&source, &tokens);
        let selected = if tokens.is_empty() { None } else { Some(0) };

        let status_message = match &parse_result {
            Ok(program) => format!("Parsed {} statement(s)", program.len()),
            Err(err) => err.to_string(),
        };

        App {
            source,
            tokens,
            lex_error,
            parse_result,
            outline,
            line_index,
            selected,
            focused_pane: FocusedPane::Source,
            source_scroll: SourceScrollState {
                offset: 0,
                target_line_row: None, // Centered on first render
            },
            tokens_scroll: 0,
            tree_scroll: 0,
            should_quit: false,
            status_message,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Byte offset of the error to mark in the source pane
    fn error_offset(&self) -> Option<usize> {
        match &self.parse_result {
            Err(err) => err.position(),
            Ok(_) => self.lex_error.as_ref().and_then(LexError::position),
        }
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Panes on top, status bar at the bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_chunks[0]);

        // Right column: Tokens (top) | Tree (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[1]);

        let error_offset = self.error_offset();

        render_source_pane(
            frame,
            columns[0],
            SourceRenderData {
                source: &self.source,
                tokens: &self.tokens,
                index: &self.line_index,
                selected: self.selected,
                error_offset,
            },
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        render_tokens_pane(
            frame,
            right_rows[0],
            TokensRenderData {
                source: &self.source,
                tokens: &self.tokens,
                selected: self.selected,
            },
            self.focused_pane == FocusedPane::Tokens,
            &mut self.tokens_scroll,
        );

        render_tree_pane(
            frame,
            right_rows[1],
            TreeRenderData {
                source: &self.source,
                rows: &self.outline,
                error: self.parse_result.as_ref().err(),
            },
            self.focused_pane == FocusedPane::Tree,
            &mut self.tree_scroll,
        );

        render_status_bar(
            frame,
            main_chunks[1],
            StatusRenderData {
                message: &self.status_message,
                selected: self.selected,
                total_tokens: self.tokens.len(),
                has_error: self.parse_result.is_err(),
            },
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => self.select_prev(),
            KeyCode::Right => self.select_next(),
            KeyCode::Home => self.select_first(),
            KeyCode::End => self.select_last(),
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => {
                    // Scrolling up makes the current line move down visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Tokens => self.select_prev(),
                FocusedPane::Tree => {
                    self.tree_scroll = self.tree_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => {
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Tokens => self.select_next(),
                FocusedPane::Tree => {
                    self.tree_scroll = self.tree_scroll.saturating_add(1);
                }
            },
            _ => {}
        }
    }

    fn select(&mut self, idx: usize) {
        self.selected = Some(idx);
        if let Some(token) = self.tokens.get(idx) {
            self.status_message = format!("{} at byte {}", token.kind, token.span.offset);
        }
    }

    /// Select the next token, stopping at the last one
    pub fn select_next(&mut self) {
        match self.selected {
            Some(idx) if idx + 1 < self.tokens.len() => self.select(idx + 1),
            Some(_) => self.status_message = "Already at the last token".to_string(),
            None => {}
        }
    }

    /// Select the previous token, stopping at the first one
    pub fn select_prev(&mut self) {
        match self.selected {
            Some(idx) if idx > 0 => self.select(idx - 1),
            Some(_) => self.status_message = "Already at the first token".to_string(),
            None => {}
        }
    }

    pub fn select_first(&mut self) {
        if !self.tokens.is_empty() {
            self.select(0);
        }
    }

    pub fn select_last(&mut self) {
        if let Some(last) = self.tokens.len().checked_sub(1) {
            self.select(last);
        }
    }
}
