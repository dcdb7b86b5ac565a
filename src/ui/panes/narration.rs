//! Narration pane rendering

use super::{border_style, visible_window};
use crate::narration::{LineKind, NarrationLine};
use crate::runner::Stage;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the narration recorded up to the selected stage
pub fn render_narration_pane(
    frame: &mut Frame,
    area: Rect,
    lines: &[NarrationLine],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(" Narration ")
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    if lines.is_empty() {
        let paragraph = Paragraph::new("(no output)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let mut items = Vec::new();
    let mut current: Option<Stage> = None;

    for line in lines {
        // Stage heading whenever the attribution changes
        if current != Some(line.stage) {
            if current.is_some() {
                items.push(ListItem::new(""));
            }
            items.push(
                ListItem::new(format!("── {} ──", line.stage.title())).style(
                    Style::default()
                        .fg(DEFAULT_THEME.heading)
                        .add_modifier(Modifier::BOLD),
                ),
            );
            current = Some(line.stage);
        }

        let style = match line.kind {
            LineKind::Observed => Style::default().fg(DEFAULT_THEME.fg),
            LineKind::Explanation => Style::default()
                .fg(DEFAULT_THEME.comment)
                .add_modifier(Modifier::ITALIC),
            LineKind::Address => Style::default().fg(DEFAULT_THEME.primary),
            LineKind::Indeterminate => Style::default().fg(DEFAULT_THEME.secondary),
        };
        items.push(ListItem::new(line.text.as_str()).style(style));
    }

    let visible_height = area.height.saturating_sub(2) as usize; // borders
    let visible = visible_window(items, visible_height, scroll_offset);
    frame.render_widget(List::new(visible).block(block), area);
}
