use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_record_list(frame, app, chunks[0]);
    render_detail(frame, app, chunks[1]);
}

fn render_record_list(frame: &mut Frame, app: &App, area: Rect) {
    let records = app.visible_enrollments();

    let items: Vec<ListItem> = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let marker = if record.enabled { "●" } else { "○" };
            let line = Line::from(format!(
                " {} {:>4}  {:<24} {:>5} uses",
                marker,
                record.id,
                truncate(&record.name, 24),
                record.usage_count
            ));

            let style = if i == app.enroll_selection {
                styles::selected_style()
            } else if !record.enabled {
                styles::disabled_style()
            } else {
                styles::list_item_style()
            };

            ListItem::new(line).style(style)
        })
        .collect();

    let block = Block::default()
        .title(format!(
            " {} records ({}) ",
            app.enroll_kind.display_name(),
            records.len()
        ))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    if !records.is_empty() {
        state.select(Some(app.enroll_selection));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![];

    // Running enrollment takes priority in the panel
    if app.enroll_status.is_active() {
        lines.push(Line::from(Span::styled(
            "Enrollment in progress",
            styles::highlight_style(),
        )));
        lines.push(Line::from(""));
        if let Some(ref name) = app.enroll_status.user_name {
            lines.push(Line::from(vec![
                Span::styled("Name: ", styles::muted_style()),
                Span::raw(name.clone()),
            ]));
        }
        lines.push(Line::from(vec![
            Span::styled("Step: ", styles::muted_style()),
            Span::raw(app.enroll_status.progress_display()),
        ]));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[x] cancel enrollment",
            styles::muted_style(),
        )));
    } else if let Some(record) = app.selected_enrollment() {
        lines.push(Line::from(Span::styled(
            record.name.clone(),
            styles::title_style(),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Record id:  ", styles::muted_style()),
            Span::raw(record.id.to_string()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Status:     ", styles::muted_style()),
            if record.enabled {
                Span::styled("enabled", Style::default().fg(styles::SUCCESS))
            } else {
                Span::styled("disabled", Style::default().fg(styles::ERROR))
            },
        ]));
        lines.push(Line::from(vec![
            Span::styled("Times used: ", styles::muted_style()),
            Span::raw(record.usage_count.to_string()),
        ]));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[Space] toggle  [d] delete  [n] new",
            styles::muted_style(),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "No records",
            styles::muted_style(),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[n] enroll a new record",
            styles::muted_style(),
        )));
    }

    let block = Block::default()
        .title(" Detail ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}
