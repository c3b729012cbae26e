pub mod fetching;
pub mod help;
pub mod menu;
pub mod opening;
pub mod profile_select;
pub mod settings;
pub mod validating;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::App;
use crate::theme::Theme;

/// Spinner frames for animated progress indication.
const SPINNER_FRAMES: &[char] = &[
    '\u{280B}', '\u{2819}', '\u{2839}', '\u{2838}', '\u{283C}', '\u{2834}', '\u{2826}', '\u{2827}',
    '\u{2807}', '\u{280F}',
];

/// Get the current spinner character based on a tick counter.
pub fn spinner_char(tick: usize) -> char {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Truncate a string to fit in `max_width` columns, appending "…" if truncated.
pub fn truncate(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if s.chars().count() <= max_width {
        return s.to_string();
    }
    let mut truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    truncated.push('\u{2026}');
    truncated
}

/// Render the persistent one-line header; returns the remaining area.
pub fn title_bar(f: &mut Frame, area: Rect, app: &App) -> Rect {
    if area.height == 0 {
        return area;
    }
    let header = Rect { height: 1, ..area };

    let profile_part = match app.current_profile() {
        Some(p) => format!(
            " {}  ({} links, {} entries)",
            p.name,
            p.probe_targets(),
            p.entries.len()
        ),
        None => " no profiles".to_string(),
    };
    let line = Line::from(vec![
        Span::styled(" JOBDECK ", app.theme.header_style()),
        Span::styled(profile_part, Style::default().fg(app.theme.text)),
    ]);
    f.render_widget(Paragraph::new(line), header);

    Rect {
        y: area.y + 1,
        height: area.height - 1,
        ..area
    }
}

/// Render the hint line at the bottom of `area`; returns the body above it.
pub fn with_footer(f: &mut Frame, area: Rect, theme: &Theme, hints: &str) -> Rect {
    if area.height == 0 {
        return area;
    }
    let footer = Rect {
        x: area.x,
        y: area.y + area.height - 1,
        width: area.width,
        height: 1,
    };
    f.render_widget(
        Paragraph::new(Line::styled(format!(" {hints}"), theme.footer_style())),
        footer,
    );
    Rect {
        height: area.height - 1,
        ..area
    }
}

/// A centered sub-rectangle for overlays.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
