use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

use crate::app::App;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let body = super::with_footer(
        f,
        area,
        &app.theme,
        "j/k navigate | Enter select | Esc back",
    );
    let theme = &app.theme;

    let items: Vec<ListItem> = app
        .profiles
        .iter()
        .map(|p| {
            ListItem::new(Line::from(vec![
                Span::styled(p.name.clone(), Style::default().fg(theme.text)),
                Span::styled(
                    format!("  {} links", p.probe_targets()),
                    Style::default().fg(theme.dim),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Select Profile ")
                .borders(Borders::ALL)
                .border_style(theme.border_style()),
        )
        .highlight_style(theme.highlight_style())
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selection_idx));
    f.render_stateful_widget(list, body, &mut state);
}
