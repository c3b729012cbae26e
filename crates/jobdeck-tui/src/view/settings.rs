use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let body = super::with_footer(
        f,
        area,
        &app.theme,
        "j/k switch field | digits edit | Enter open | Esc cancel",
    );
    let theme = &app.theme;
    let settings = &app.open_settings;

    let max = app
        .current_profile()
        .map(|p| p.probe_targets())
        .unwrap_or(0);

    let field = |label: &str, value: &str, selected: bool| {
        let marker = if selected { "> " } else { "  " };
        let style = if selected {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.text)
        };
        Line::from(vec![
            Span::styled(format!("  {marker}{label:<18}"), style),
            Span::styled(format!("[{value}]"), style),
        ])
    };

    let lines = vec![
        Line::default(),
        Line::styled(
            format!("  {max} links available"),
            Style::default().fg(theme.dim),
        ),
        Line::default(),
        field("Max tabs", &settings.tab_limit_input, settings.cursor == 0),
        field("Delay (ms)", &settings.delay_input, settings.cursor == 1),
    ];

    let block = Block::default()
        .title(" Configure Tab Opening ")
        .borders(Borders::ALL)
        .border_style(theme.border_style());
    f.render_widget(Paragraph::new(lines).block(block), body);
}
