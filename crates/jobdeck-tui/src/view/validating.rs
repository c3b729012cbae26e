use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};

use crate::app::{App, RunPhase};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    match app.run_phase {
        RunPhase::Running => render_running(f, area, app),
        RunPhase::Done => render_summary(f, area, app, "Validation Complete"),
        RunPhase::Cancelled => render_summary(f, area, app, "Validation Cancelled"),
        RunPhase::Idle => {}
    }
}

fn render_running(f: &mut Frame, area: Rect, app: &App) {
    let body = super::with_footer(f, area, &app.theme, "c cancel | q quit");
    let theme = &app.theme;
    let run = &app.run;

    let block = Block::default()
        .title(" Validating Links ")
        .borders(Borders::ALL)
        .border_style(theme.border_style());
    let inner = block.inner(body);
    f.render_widget(block, body);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .split(inner);

    let ratio = if run.total > 0 {
        run.completed as f64 / run.total as f64
    } else {
        0.0
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(theme.accent))
        .ratio(ratio)
        .label(format!("{}/{}", run.completed, run.total));
    f.render_widget(gauge, chunks[1]);

    let counters = Line::from(vec![
        Span::styled(
            format!("  valid {}  ", run.valid),
            Style::default().fg(theme.valid),
        ),
        Span::styled(
            format!("invalid {}  ", run.invalid),
            Style::default().fg(theme.invalid),
        ),
        Span::styled(
            format!("error {}", run.errors),
            Style::default().fg(theme.error),
        ),
    ]);
    f.render_widget(Paragraph::new(counters), chunks[2]);

    if !app.last_checked.is_empty() {
        let width = chunks[3].width.saturating_sub(6) as usize;
        let line = Line::from(vec![
            Span::styled(
                format!("  {} ", super::spinner_char(app.tick)),
                Style::default().fg(theme.spinner),
            ),
            Span::styled(
                super::truncate(&app.last_checked, width),
                Style::default().fg(theme.dim),
            ),
        ]);
        f.render_widget(Paragraph::new(line), chunks[3]);
    }
}

fn render_summary(f: &mut Frame, area: Rect, app: &App, title: &str) {
    let body = super::with_footer(f, area, &app.theme, "Enter/Esc back to menu");
    let theme = &app.theme;
    let run = &app.run;

    let mut lines = vec![
        Line::default(),
        Line::from(vec![
            Span::styled(
                format!("   checked {}/{}   ", run.completed, run.total),
                Style::default().fg(theme.text),
            ),
            Span::styled(
                format!("valid {}  ", run.valid),
                Style::default().fg(theme.valid),
            ),
            Span::styled(
                format!("invalid {}  ", run.invalid),
                Style::default().fg(theme.invalid),
            ),
            Span::styled(
                format!("error {}", run.errors),
                Style::default().fg(theme.error),
            ),
        ]),
    ];

    if let Some(paths) = &app.artifacts {
        lines.push(Line::default());
        for (label, path) in [
            ("clean", &paths.clean),
            ("validated", &paths.validated),
            ("report", &paths.report),
        ] {
            lines.push(Line::from(vec![
                Span::styled(format!("   {label:<10}"), Style::default().fg(theme.dim)),
                Span::styled(path.display().to_string(), Style::default().fg(theme.text)),
            ]));
        }
    }

    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(theme.border_style());
    f.render_widget(Paragraph::new(lines).block(block), body);
}
