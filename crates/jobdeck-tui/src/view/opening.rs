use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Gauge};

use crate::app::App;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let body = super::with_footer(f, area, &app.theme, "opening tabs...");
    let theme = &app.theme;
    let (attempted, total) = app.open_progress;

    let block = Block::default()
        .title(" Opening Tabs ")
        .borders(Borders::ALL)
        .border_style(theme.border_style());
    let inner = block.inner(body);
    f.render_widget(block, body);

    let chunks =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

    let ratio = if total > 0 {
        attempted as f64 / total as f64
    } else {
        0.0
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(theme.accent))
        .ratio(ratio)
        .label(format!("{attempted}/{total}"));
    f.render_widget(gauge, chunks[1]);
}
