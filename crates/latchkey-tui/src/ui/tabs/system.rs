use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let fw = &app.firmware;

    let row = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!(" {:<16}", label), styles::muted_style()),
            Span::raw(value),
        ])
    };

    let lines = vec![
        Line::from(Span::styled(" Firmware", styles::title_style())),
        Line::from(""),
        row("Version:", fw.fw_version.clone()),
        row("SDK:", fw.idf_version.clone()),
        row("Built:", fw.build_display()),
        row("Git hash:", fw.git_hash.clone()),
        Line::from(""),
        Line::from(Span::styled(" Connection", styles::title_style())),
        Line::from(""),
        row("Device:", app.client.base_url().to_string()),
        row(
            "Auth:",
            if app.client.has_token() {
                "authenticated".to_string()
            } else {
                "anonymous".to_string()
            },
        ),
        Line::from(""),
        Line::from(Span::styled(
            " [B] reboot device   [P] snapshot   [L] login   [O] logout",
            styles::muted_style(),
        )),
    ];

    let block = Block::default()
        .title(" System ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
