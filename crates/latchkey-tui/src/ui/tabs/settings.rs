use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let rows = app.settings.display_rows();

    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .map(|(i, (key, value))| {
            let line = Line::from(vec![
                Span::styled(format!(" {:<24}", key), styles::highlight_style()),
                Span::raw(value.clone()),
            ]);

            let style = if i == app.settings_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            ListItem::new(line).style(style)
        })
        .collect();

    let block = Block::default()
        .title(" Device settings ([Space] toggles booleans) ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    state.select(Some(app.settings_selection));

    frame.render_stateful_widget(list, area, &mut state);
}
