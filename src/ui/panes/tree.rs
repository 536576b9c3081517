//! Syntax tree pane rendering
//!
//! Shows the parsed program as an indented outline, or the parse error when
//! parsing failed.

use crate::parser::ast::{Expression, Program, Statement};
use crate::parser::parse::ParseError;
use crate::parser::scanner::SourceLocation;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// What an outline row describes, used for colouring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Statement,
    Section,
    Operator,
    Literal,
}

/// One row of the outline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineRow {
    pub depth: usize,
    pub kind: NodeKind,
    pub text: String,
}

/// Flatten a program into outline rows
pub fn outline(program: &Program, source: &str) -> Vec<OutlineRow> {
    let mut rows = Vec::new();
    push_block(&mut rows, program, source, 0);
    rows
}

fn push_row(rows: &mut Vec<OutlineRow>, depth: usize, kind: NodeKind, text: String) {
    rows.push(OutlineRow { depth, kind, text });
}

fn push_block(rows: &mut Vec<OutlineRow>, block: &Program, source: &str, depth: usize) {
    for statement in &block.statements {
        push_statement(rows, statement, source, depth);
    }
}

fn push_statement(rows: &mut Vec<OutlineRow>, statement: &Statement, source: &str, depth: usize) {
    match statement {
        Statement::Assign { target, value } => {
            push_row(
                rows,
                depth,
                NodeKind::Statement,
                format!("Assign {}", target.text(source)),
            );
            push_expression(rows, value, depth + 1);
        }
        Statement::If {
            condition,
            then_branch,
            else_branch,
        } => {
            push_row(rows, depth, NodeKind::Statement, "If".to_string());
            push_row(rows, depth + 1, NodeKind::Section, "condition".to_string());
            push_expression(rows, condition, depth + 2);
            push_row(rows, depth + 1, NodeKind::Section, "then".to_string());
            push_block(rows, then_branch, source, depth + 2);
            if let Some(else_branch) = else_branch {
                push_row(rows, depth + 1, NodeKind::Section, "else".to_string());
                push_block(rows, else_branch, source, depth + 2);
            }
        }
    }
}

fn push_expression(rows: &mut Vec<OutlineRow>, expr: &Expression, depth: usize) {
    match expr {
        Expression::IntLiteral(n) => {
            push_row(rows, depth, NodeKind::Literal, n.to_string());
        }
        Expression::BinaryOp { op, left, right } => {
            push_row(rows, depth, NodeKind::Operator, format!("{:?} {}", op, op.symbol()));
            push_expression(rows, left, depth + 1);
            push_expression(rows, right, depth + 1);
        }
    }
}

fn row_style(kind: NodeKind) -> Style {
    match kind {
        NodeKind::Statement => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        NodeKind::Section => Style::default().fg(DEFAULT_THEME.comment),
        NodeKind::Operator => Style::default().fg(DEFAULT_THEME.tree_node),
        NodeKind::Literal => Style::default().fg(DEFAULT_THEME.number),
    }
}

/// Data needed to render the tree pane
pub struct TreeRenderData<'a> {
    pub source: &'a str,
    pub rows: &'a [OutlineRow],
    pub error: Option<&'a ParseError>,
}

/// Render the syntax tree pane
pub fn render_tree_pane(
    frame: &mut Frame,
    area: Rect,
    data: TreeRenderData,
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
        .title(" Syntax Tree ")
        .borders(Borders::ALL)
        .border_style(border_style);

    if let Some(err) = data.error {
        let mut lines = vec![Line::from(Span::styled(
            if err.is_internal() {
                "Internal parser error"
            } else {
                "Parse error"
            },
            Style::default()
                .fg(DEFAULT_THEME.error)
                .add_modifier(Modifier::BOLD),
        ))];
        if let Some(offset) = err.position() {
            let loc = SourceLocation::from_offset(data.source, offset);
            lines.push(Line::from(Span::styled(
                format!("at line {}, column {}", loc.line, loc.column),
                Style::default().fg(DEFAULT_THEME.comment),
            )));
        }
        lines.push(Line::from(err.to_string()));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    if data.rows.is_empty() {
        let paragraph = Paragraph::new("(empty program)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    if data.rows.len() > visible_height {
        *scroll_offset = (*scroll_offset).min(data.rows.len() - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let items: Vec<ListItem> = data
        .rows
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|row| {
            ListItem::new(Line::from(vec![
                Span::raw("  ".repeat(row.depth)),
                Span::styled(row.text.clone(), row_style(row.kind)),
            ]))
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}
