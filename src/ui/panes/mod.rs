//! Pane rendering for the viewer
//!
//! Each pane is a free function taking the frame, its area and the data to draw.
//! Scroll offsets are owned by the [`App`](crate::ui::App) and clamped here.

mod heap;
mod narration;
mod status;

pub use heap::render_heap_pane;
pub use narration::render_narration_pane;
pub use status::render_status_bar;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::style::{Modifier, Style};

fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    }
}

/// Clamp `offset` so the last page stays full, then return the visible window
fn visible_window<T>(items: Vec<T>, height: usize, offset: &mut usize) -> Vec<T> {
    let height = height.max(1);
    if items.len() > height {
        *offset = (*offset).min(items.len() - height);
    } else {
        *offset = 0;
    }
    items.into_iter().skip(*offset).take(height).collect()
}
