use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use jobdeck_core::EntryStatus;

use crate::app::App;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let body = super::with_footer(
        f,
        area,
        &app.theme,
        "press a key to choose an action | ? help",
    );
    let theme = &app.theme;

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::default());

    for (key, label) in [
        ("o", "Open links in browser"),
        ("f", "Fetch from providers"),
        ("v", "Validate links"),
        ("p", "Switch profile"),
        ("q", "Quit"),
    ] {
        lines.push(Line::from(vec![
            Span::styled(format!("   {key}  "), Style::default().fg(theme.accent)),
            Span::styled(label, Style::default().fg(theme.text)),
        ]));
    }

    // Status summary from the last run, if the entries carry one.
    if let Some(profile) = app.current_profile() {
        let count = |status: EntryStatus| {
            profile
                .entries
                .iter()
                .filter(|e| e.status == status)
                .count()
        };
        let valid = count(EntryStatus::Valid);
        let invalid = count(EntryStatus::Invalid);
        let errors = count(EntryStatus::Error);
        if valid + invalid + errors > 0 {
            lines.push(Line::default());
            lines.push(Line::from(vec![
                Span::styled("   last run  ", Style::default().fg(theme.dim)),
                Span::styled(
                    format!("valid {valid}  "),
                    Style::default().fg(theme.status_color(&EntryStatus::Valid)),
                ),
                Span::styled(
                    format!("invalid {invalid}  "),
                    Style::default().fg(theme.status_color(&EntryStatus::Invalid)),
                ),
                Span::styled(
                    format!("error {errors}"),
                    Style::default().fg(theme.status_color(&EntryStatus::Error)),
                ),
            ]));
        }
    }

    if !app.message.is_empty() {
        lines.push(Line::default());
        lines.push(Line::styled(
            format!("   {}", app.message),
            Style::default().fg(theme.skipped),
        ));
    }

    let block = Block::default()
        .title(" Actions ")
        .borders(Borders::ALL)
        .border_style(theme.border_style());
    f.render_widget(Paragraph::new(lines).block(block), body);
}
