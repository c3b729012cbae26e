use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let body = super::with_footer(f, area, &app.theme, "fetching...");
    let theme = &app.theme;

    let specs = app
        .current_profile()
        .and_then(|p| p.search_specs.as_ref())
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    let lines = vec![
        Line::default(),
        Line::from(vec![
            Span::styled(
                format!("  {} ", super::spinner_char(app.tick)),
                Style::default().fg(theme.spinner),
            ),
            Span::styled("Fetching from providers", Style::default().fg(theme.text)),
        ]),
        Line::styled(format!("    {specs}"), Style::default().fg(theme.dim)),
    ];

    let block = Block::default()
        .title(" Fetching Jobs ")
        .borders(Borders::ALL)
        .border_style(theme.border_style());
    f.render_widget(Paragraph::new(lines).block(block), body);
}
