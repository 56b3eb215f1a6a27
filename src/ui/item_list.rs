// ui/item_list.rs
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, StatefulWidget},
};

use crate::item::ItemId;
use crate::store::RecordStore;

// One row per record: name, type tag and owning actor when there is one.
pub fn item_rows(store: &RecordStore, item_ids: &[ItemId]) -> Vec<Line<'static>> {
    item_ids
        .iter()
        .filter_map(|id| store.item(*id).ok())
        .map(|item| {
            let mut spans = vec![
                Span::raw(item.name.clone()),
                Span::styled(
                    format!(" [{}]", item.type_tag()),
                    Style::default().fg(Color::Green),
                ),
            ];
            if let Some(actor) = item.owner.and_then(|owner| store.actor(owner).ok()) {
                spans.push(Span::styled(
                    format!(" {}", actor.name),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Line::from(spans)
        })
        .collect()
}

pub fn draw_item_list(
    buffer: &mut Buffer,
    store: &RecordStore,
    item_ids: &[ItemId],
    area: Rect,
    state: &mut ListState,
) {
    let items: Vec<ListItem> = item_rows(store, item_ids)
        .into_iter()
        .map(ListItem::new)
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .border_type(BorderType::Rounded)
                .borders(Borders::ALL)
                .title(" Items "),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    StatefulWidget::render(list, area, buffer, state);
}
