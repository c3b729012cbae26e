use ratatui::Frame;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::theme::Theme;

const BINDINGS: &[(&str, &str)] = &[
    ("o", "open links in browser"),
    ("f", "fetch from providers"),
    ("v", "validate links"),
    ("p", "switch profile"),
    ("c", "cancel validation"),
    ("j/k", "navigate"),
    ("Enter", "select / confirm"),
    ("Esc/b", "back"),
    ("?", "toggle this help"),
    ("q", "quit"),
];

pub fn render(f: &mut Frame, theme: &Theme) {
    let area = super::centered_rect(f.area(), 44, BINDINGS.len() as u16 + 4);
    f.render_widget(Clear, area);

    let mut lines = vec![Line::default()];
    for (key, desc) in BINDINGS {
        lines.push(Line::from(vec![
            Span::styled(format!("  {key:>6}  "), Style::default().fg(theme.accent)),
            Span::styled(*desc, Style::default().fg(theme.text)),
        ]));
    }

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(theme.border_style());
    f.render_widget(Paragraph::new(lines).block(block), area);
}
