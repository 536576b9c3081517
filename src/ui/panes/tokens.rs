//! Token list pane rendering

use super::source::token_style;
use crate::parser::lexer::Token;
use crate::parser::scanner::SourceLocation;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Data needed to render the token pane
pub struct TokensRenderData<'a> {
    pub source: &'a str,
    pub tokens: &'a [Token],
    pub selected: Option<usize>,
}

/// One row of the token list: index, position, kind tag and lexeme
pub(crate) fn token_row<'a>(source: &'a str, idx: usize, token: &Token) -> Line<'a> {
    let loc = SourceLocation::from_offset(source, token.span.offset);

    Line::from(vec![
        Span::styled(
            format!("{:>4} ", idx),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            format!("{:>4}:{:<3} ", loc.line, loc.column),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
        Span::styled(format!("{:<12}", token.kind.tag()), token_style(&token.kind)),
        Span::styled(token.lexeme(source), Style::default().fg(DEFAULT_THEME.fg)),
    ])
}

/// Render the token list pane, keeping the selected row in view
pub fn render_tokens_pane(
    frame: &mut Frame,
    area: Rect,
    data: TokensRenderData,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(format!(" Tokens ({}) ", data.tokens.len()))
        .borders(Borders::ALL)
        .border_style(border_style);

    if data.tokens.is_empty() {
        let paragraph = Paragraph::new("(no tokens)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let total_items = data.tokens.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1

    // Scroll just enough to show the selected row
    if let Some(selected) = data.selected {
        if selected < *scroll_offset {
            *scroll_offset = selected;
        } else if selected >= *scroll_offset + visible_height {
            *scroll_offset = selected + 1 - visible_height;
        }
    }
    if total_items > visible_height {
        *scroll_offset = (*scroll_offset).min(total_items - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let items: Vec<ListItem> = data
        .tokens
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(idx, token)| {
            let item = ListItem::new(token_row(data.source, idx, token));
            if data.selected == Some(idx) {
                item.style(Style::default().bg(DEFAULT_THEME.current_line_bg))
            } else {
                item
            }
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}
