//! Heap pane rendering
//!
//! One entry per ledger record: a header with id, size, owner and state,
//! followed by a hex dump of the bytes as last observed. Bytes that were never
//! written show as `??`. Freed blocks are kept as tombstones so the pane shows
//! the whole lifetime of each allocation.

use super::{border_style, visible_window};
use crate::constants::HEX_ROW_BYTES;
use crate::memory::heap::{BlockRecord, BlockState};
use crate::memory::view::format_hex;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

fn state_style(state: BlockState) -> Style {
    match state {
        BlockState::Live => Style::default().fg(DEFAULT_THEME.success),
        BlockState::Released => Style::default().fg(DEFAULT_THEME.comment),
        BlockState::Abandoned => Style::default()
            .fg(DEFAULT_THEME.error)
            .add_modifier(Modifier::BOLD),
    }
}

/// Render the ledger as captured after the selected stage
pub fn render_heap_pane(
    frame: &mut Frame,
    area: Rect,
    records: &[BlockRecord],
    bytes_in_use: usize,
    heap_limit: usize,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(format!(
            " Heap Memory ({} of {} bytes held) ",
            bytes_in_use, heap_limit
        ))
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let mut items = Vec::new();

    if records.is_empty() {
        items.push(
            ListItem::new("(no allocations)").style(Style::default().fg(DEFAULT_THEME.comment)),
        );
    }

    for record in records {
        let header = Line::from(vec![
            Span::styled(
                format!("#{:<3}", record.id),
                Style::default().fg(DEFAULT_THEME.comment),
            ),
            Span::raw(" | "),
            Span::styled(
                format!("{} bytes", record.size_bytes()),
                Style::default().fg(DEFAULT_THEME.primary),
            ),
            Span::raw(" | "),
            Span::styled(record.owner, Style::default().fg(DEFAULT_THEME.fg)),
            Span::raw(" "),
            Span::styled(
                format!("[{}]", record.state.label()),
                state_style(record.state),
            ),
        ]);
        items.push(ListItem::new(header));

        if record.reallocations > 0 {
            items.push(
                ListItem::new(format!("  reallocated {} time(s)", record.reallocations))
                    .style(Style::default().fg(DEFAULT_THEME.secondary)),
            );
        }

        let dump_style = if record.state == BlockState::Released {
            Style::default().fg(DEFAULT_THEME.comment)
        } else {
            Style::default().fg(DEFAULT_THEME.fg)
        };
        for (row, chunk) in record.image.chunks(HEX_ROW_BYTES).enumerate() {
            items.push(
                ListItem::new(format!(
                    "  +0x{:02x}: {}",
                    row * HEX_ROW_BYTES,
                    format_hex(chunk)
                ))
                .style(dump_style),
            );
        }
    }

    let visible_height = area.height.saturating_sub(2) as usize;
    let visible = visible_window(items, visible_height, scroll_offset);
    frame.render_widget(List::new(visible).block(block), area);
}
