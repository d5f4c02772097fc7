use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use latchkey_core::models::EnrollmentKind;

use crate::app::{App, AppState, LoginFocus, Tab};
use crate::notify::Severity;

use super::styles;
use super::tabs::{activity, enrollments, settings, system};

/// Cap on simultaneously visible notices; older ones wait underneath.
const MAX_VISIBLE_NOTICES: u16 = 4;

pub fn render(frame: &mut Frame, app: &App) {
    let notice_rows = (app.notices.len() as u16).min(MAX_VISIBLE_NOTICES);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(notice_rows), // Notice stack (top of the frame)
            Constraint::Length(3),           // Title bar
            Constraint::Length(3),           // Tabs
            Constraint::Min(10),             // Main content
            Constraint::Length(2),           // Status bar
        ])
        .split(frame.area());

    if !app.notices.is_empty() {
        render_notices(frame, app, chunks[0]);
    }
    render_title_bar(frame, app, chunks[1]);
    render_tabs(frame, app, chunks[2]);
    render_main_content(frame, app, chunks[3]);
    render_status_bar(frame, app, chunks[4]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::LoggingIn => render_login_overlay(frame, app),
        AppState::EnteringName => render_name_overlay(frame, app),
        AppState::ConfirmingQuit => render_confirm_overlay(
            frame,
            "Are you sure you want to quit?",
        ),
        AppState::ConfirmingClear => render_confirm_overlay(
            frame,
            "Delete ALL records of this kind from the device?",
        ),
        AppState::Normal | AppState::Quitting => {}
    }
}

/// Newest notice renders first, each as one full-width row.
fn render_notices(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = app
        .notices
        .iter()
        .take(area.height as usize)
        .map(|notice| {
            let style = match notice.severity {
                Severity::Success => styles::success_style(),
                Severity::Error => styles::error_style(),
            };
            let text = format!(" {:<width$}", notice.message, width = area.width as usize);
            Line::from(Span::styled(text, style))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let device = app
        .config
        .device_name
        .as_deref()
        .unwrap_or("door controller");
    let title = format!("  Latchkey - {}", device);
    let help_hint = "[?] Help";

    let title_line = Line::from(vec![
        Span::styled(title.clone(), styles::title_style()),
        Span::raw(" ".repeat(
            area.width
                .saturating_sub(title.len() as u16 + help_hint.len() as u16 + 4)
                as usize,
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let main_tabs = [Tab::Enrollments, Tab::Activity, Tab::Settings, Tab::System];

    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in main_tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        spans.push(Span::styled(
            format!("[{}] {}", i + 1, tab.title()),
            styles::tab_style(*tab == app.current_tab),
        ));
    }

    // On the Enrollments tab, show the record-kind toggle on the right
    if app.current_tab == Tab::Enrollments {
        let kind_tabs = [
            ("fingerprint", app.enroll_kind == EnrollmentKind::Fingerprint),
            ("face", app.enroll_kind == EnrollmentKind::Face),
        ];

        let main_width: usize = spans.iter().map(|s| s.content.len()).sum();
        let kind_width: usize =
            "[t] ".len() + kind_tabs.iter().map(|(l, _)| l.len()).sum::<usize>() + 3;
        let padding = (area.width as usize).saturating_sub(main_width + kind_width + 2);

        spans.push(Span::raw(" ".repeat(padding)));
        spans.push(Span::styled("[t] ", styles::muted_style()));
        for (i, (label, selected)) in kind_tabs.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", styles::muted_style()));
            }
            spans.push(Span::styled(*label, styles::tab_style(*selected)));
        }
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_tab {
        Tab::Enrollments => enrollments::render(frame, app, area),
        Tab::Activity => activity::render(frame, app, area),
        Tab::Settings => settings::render(frame, app, area),
        Tab::System => system::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let auth = if app.client.has_token() {
        "authenticated"
    } else {
        "anonymous"
    };
    let left_text = if app.refreshing {
        format!(" {} | refreshing... ", app.client.base_url())
    } else {
        format!(" {} | {} ", app.client.base_url(), auth)
    };
    let right_text = " [r]efresh | [q]uit ";

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.len())
        .saturating_sub(right_text.len());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);

    frame.render_widget(
        Paragraph::new(status_line).style(styles::status_bar_style()),
        area,
    );
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 22, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let key = styles::help_key_style();
    let desc = styles::help_desc_style();

    let help_text = vec![
        Line::from(Span::styled("  Latchkey", styles::title_style())),
        Line::from(Span::styled(
            format!("  version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        Line::from(vec![
            Span::styled("  1-4       ", key),
            Span::styled("Switch tabs", desc),
        ]),
        Line::from(vec![
            Span::styled("  ←/→       ", key),
            Span::styled("Prev/next tab", desc),
        ]),
        Line::from(vec![
            Span::styled("  ↑/↓ j/k   ", key),
            Span::styled("Navigate list", desc),
        ]),
        Line::from(""),
        Line::from(Span::styled(" Enrollments", styles::highlight_style())),
        Line::from(vec![
            Span::styled("  t         ", key),
            Span::styled("Toggle fingerprint / face", desc),
        ]),
        Line::from(vec![
            Span::styled("  n         ", key),
            Span::styled("Enroll a new record", desc),
        ]),
        Line::from(vec![
            Span::styled("  Space     ", key),
            Span::styled("Enable/disable selected record", desc),
        ]),
        Line::from(vec![
            Span::styled("  d         ", key),
            Span::styled("Delete selected record", desc),
        ]),
        Line::from(vec![
            Span::styled("  x         ", key),
            Span::styled("Cancel running enrollment", desc),
        ]),
        Line::from(""),
        Line::from(Span::styled(" Session", styles::highlight_style())),
        Line::from(vec![
            Span::styled("  L         ", key),
            Span::styled("Login  ·  ", desc),
            Span::styled("O ", key),
            Span::styled("Logout  ·  ", desc),
            Span::styled("B ", key),
            Span::styled("Reboot device", desc),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", key),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", key),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_login_overlay(frame: &mut Frame, app: &App) {
    let height = if app.login_error.is_some() { 11 } else { 9 };
    let area = centered_rect_fixed(46, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled("  Device login", styles::title_style())),
        Line::from(""),
    ];

    let field = |label: &'static str, value: String, focused: bool| {
        let style = if focused {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };
        let cursor = if focused { "▌" } else { "" };
        Line::from(vec![
            Span::raw("      "),
            Span::styled(format!("{}: [", label), styles::muted_style()),
            Span::styled(format!("{:<16}{}", value, cursor), style),
            Span::styled("]", styles::muted_style()),
        ])
    };

    lines.push(field(
        "Username",
        app.login_username.clone(),
        app.login_focus == LoginFocus::Username,
    ));
    lines.push(field(
        "Password",
        "*".repeat(app.login_password.len().min(16)),
        app.login_focus == LoginFocus::Password,
    ));

    lines.push(Line::from(""));
    let button_focused = app.login_focus == LoginFocus::Button;
    let button = if button_focused { " ▶ Login ◀ " } else { "   Login   " };
    let button_style = if button_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    lines.push(Line::from(vec![
        Span::raw("            ["),
        Span::styled(button, button_style),
        Span::raw("]"),
    ]));

    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            Style::default().fg(styles::ERROR),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_name_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(46, 8, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(
            format!("  New {} enrollment", app.enroll_kind.display_name().to_lowercase()),
            styles::title_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("    "),
            Span::styled("Name: [", styles::muted_style()),
            Span::styled(
                format!("{:<24}▌", app.enroll_name_input),
                styles::selected_style(),
            ),
            Span::styled("]", styles::muted_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("    Press ", styles::muted_style()),
            Span::styled("Enter", styles::help_key_style()),
            Span::styled(" to start, ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_confirm_overlay(frame: &mut Frame, question: &str) {
    let area = centered_rect_fixed(56, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("   {}", question),
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to confirm, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
