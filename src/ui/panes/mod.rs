//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Source text with token highlighting and the current line indicator
//! - [`tokens`]: The token stream, one row per token
//! - [`tree`]: Syntax tree outline, or the parse error
//! - [`status`]: Status bar with keybindings and position
//!
//! Each pane module exports a primary `render_*` function and the
//! `*RenderData` struct it draws from.

pub mod source;
pub mod status;
pub mod tokens;
pub mod tree;

pub use source::{render_source_pane, SourceRenderData, SourceScrollState, TokenLineIndex};
pub use status::{render_status_bar, StatusRenderData};
pub use tokens::{render_tokens_pane, TokensRenderData};
pub use tree::{outline, render_tree_pane, OutlineRow, TreeRenderData};
