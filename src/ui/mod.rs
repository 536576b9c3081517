//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus, token selection
//! - **[`panes`]**: render functions for each visible pane (source, tokens,
//!   syntax tree, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point is [`App`]: construct it with the source text and a
//! [`ParserConfig`] and call [`App::run`] to start the event loop.
//!
//! [`ParserConfig`]: crate::parser::parse::ParserConfig
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
