use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .log_entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let line = Line::from(vec![
                Span::styled(
                    format!(" {:<19} ", entry.timestamp_display()),
                    styles::muted_style(),
                ),
                Span::styled(
                    format!("{:<1} ", entry.level),
                    styles::log_level_style(&entry.level),
                ),
                Span::styled(format!("{:<12} ", entry.tag), styles::highlight_style()),
                Span::raw(entry.message.clone()),
            ]);

            let style = if i == app.log_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            ListItem::new(line).style(style)
        })
        .collect();

    let block = Block::default()
        .title(format!(" Device log ({} entries) ", app.log_entries.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    if !app.log_entries.is_empty() {
        state.select(Some(app.log_selection));
    }

    frame.render_stateful_widget(list, area, &mut state);
}
