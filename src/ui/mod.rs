//! Terminal viewer built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The viewer replays a finished (or halted) [`DemoRunner`] stage by stage:
//!
//! - **[`app`]**: viewer state and the keyboard event loop
//! - **[`panes`]**: stateless render functions for the narration pane, the heap
//!   pane and the status bar
//! - **[`theme`]**: colour palette shared by the panes
//!
//! [`DemoRunner`]: crate::runner::DemoRunner

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
