//! Source code pane rendering with token highlighting
//!
//! This module renders the source code pane, which displays the program being
//! inspected with each token coloured by its kind.
//!
//! # Features
//!
//! - Token-accurate highlighting (colours come from the lexer, not a guess)
//! - Selected token shown with a highlighted background
//! - The line holding the selected token is kept at a fixed row while stepping
//! - Line numbering
//!
//! # Rendering
//!
//! Tokens never span lines, so a [`TokenLineIndex`] groups token indices by
//! line once up front and each visible line is styled in a single pass.

use crate::parser::lexer::{Token, TokenKind};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use rustc_hash::FxHashMap;

/// Line starts of a source plus the tokens that begin on each line.
pub struct TokenLineIndex {
    line_starts: Vec<usize>,
    tokens_by_line: FxHashMap<usize, Vec<usize>>,
}

impl TokenLineIndex {
    pub fn new(source: &str, tokens: &[Token]) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .char_indices()
                .filter(|(_, ch)| *ch == '\n')
                .map(|(idx, _)| idx + 1),
        );

        let mut index = Self {
            line_starts,
            tokens_by_line: FxHashMap::default(),
        };

        for (token_idx, token) in tokens.iter().enumerate() {
            if token.kind == TokenKind::EndOfInput {
                continue;
            }
            let line = index.line_of(token.span.offset);
            index.tokens_by_line.entry(line).or_default().push(token_idx);
        }

        index
    }

    /// Number of lines in the source (at least one).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 0-based line containing `offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        self.line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1)
    }

    /// Token indices beginning on `line`, in source order.
    pub fn tokens_on(&self, line: usize) -> &[usize] {
        self.tokens_by_line
            .get(&line)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Byte range of `line`, without its line terminator.
    fn line_range(&self, source: &str, line: usize) -> (usize, usize) {
        let start = self.line_starts[line];
        let mut end = self
            .line_starts
            .get(line + 1)
            .map(|next| next - 1)
            .unwrap_or(source.len());
        if end > start && source.as_bytes()[end - 1] == b'\r' {
            end -= 1;
        }
        (start, end)
    }
}

/// Colour for a token kind
pub(crate) fn token_style(kind: &TokenKind) -> Style {
    match kind {
        TokenKind::IntLiteral(_) => Style::default().fg(DEFAULT_THEME.number),
        TokenKind::Identifier => Style::default().fg(DEFAULT_THEME.identifier),
        TokenKind::Keyword(_) => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        TokenKind::OpenParen
        | TokenKind::CloseParen
        | TokenKind::OpenBrace
        | TokenKind::CloseBrace => Style::default().fg(DEFAULT_THEME.primary), // Brackets
        TokenKind::Plus
        | TokenKind::Minus
        | TokenKind::Star
        | TokenKind::Slash
        | TokenKind::Equals => Style::default().fg(DEFAULT_THEME.operator),
        TokenKind::EndOfInput => Style::default(),
    }
}

/// Style one source line using the tokens that start on it
fn highlight_line<'a>(
    source: &'a str,
    index: &TokenLineIndex,
    tokens: &[Token],
    line: usize,
    selected: Option<usize>,
) -> Vec<Span<'a>> {
    let (start, end) = index.line_range(source, line);
    let mut spans = Vec::new();
    let mut cursor = start;

    for &token_idx in index.tokens_on(line) {
        let token = &tokens[token_idx];
        if token.span.offset > cursor {
            spans.push(Span::raw(&source[cursor..token.span.offset]));
        }

        let mut style = token_style(&token.kind);
        if selected == Some(token_idx) {
            style = style
                .bg(DEFAULT_THEME.selected_token_bg)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        spans.push(Span::styled(token.lexeme(source), style));
        cursor = token.span.end();
    }

    // Trailing whitespace, or the unlexed remainder after a lexer error
    if cursor < end {
        let rest = &source[cursor..end];
        let style = if rest.trim().is_empty() {
            Style::default()
        } else {
            Style::default().fg(DEFAULT_THEME.error)
        };
        spans.push(Span::styled(rest, style));
    }

    spans
}

/// Scroll state for the source pane
pub struct SourceScrollState {
    pub offset: usize,
    pub target_line_row: Option<usize>,
}

/// Data needed to render the source pane
pub struct SourceRenderData<'a> {
    pub source: &'a str,
    pub tokens: &'a [Token],
    pub index: &'a TokenLineIndex,
    pub selected: Option<usize>,
    /// Byte offset of an error to mark, if any
    pub error_offset: Option<usize>,
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    data: SourceRenderData,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Source Code ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let total_lines = data.index.line_count();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders (2), min 1

    // Initialize target_line_row to center if not set
    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    let current_line = data
        .selected
        .and_then(|idx| data.tokens.get(idx))
        .map(|token| data.index.line_of(token.span.offset));
    let error_line = data.error_offset.map(|offset| data.index.line_of(offset));

    // Keep the current line at the target visual row
    if let Some(line) = current_line.or(error_line) {
        scroll_state.offset = line.saturating_sub(target_row);
    }
    if total_lines > visible_height {
        scroll_state.offset = scroll_state.offset.min(total_lines - visible_height);
    } else {
        scroll_state.offset = 0;
    }

    let visible_lines: Vec<Line> = (scroll_state.offset..total_lines)
        .take(visible_height)
        .map(|line| {
            let is_current = current_line == Some(line);
            let is_error = error_line == Some(line);

            let num_style = if is_error {
                Style::default()
                    .fg(DEFAULT_THEME.error)
                    .add_modifier(Modifier::BOLD)
            } else if is_current {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment) // Line numbers
            };

            let mut content =
                highlight_line(data.source, data.index, data.tokens, line, data.selected);
            if is_current {
                for span in &mut content {
                    span.style = Style::default()
                        .bg(DEFAULT_THEME.current_line_bg)
                        .patch(span.style);
                }
            }

            let mut spans = vec![Span::styled(format!("{:4} ", line + 1), num_style)];
            spans.extend(content);
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}
