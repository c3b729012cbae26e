use ratatui::style::{Color, Modifier, Style};

use jobdeck_core::EntryStatus;

/// Color theme for the TUI.
pub struct Theme {
    pub valid: Color,
    pub invalid: Color,
    pub error: Color,
    pub skipped: Color,

    pub header_fg: Color,
    pub header_bg: Color,
    pub border: Color,
    pub text: Color,
    pub dim: Color,
    pub highlight_bg: Color,
    pub accent: Color,
    pub spinner: Color,
    pub footer_fg: Color,
}

impl Theme {
    /// Hacker-green terminal theme.
    pub fn hacker() -> Self {
        Self {
            valid: Color::Rgb(0, 210, 0),
            invalid: Color::Red,
            error: Color::Magenta,
            skipped: Color::Yellow,

            header_fg: Color::Black,
            header_bg: Color::Rgb(0, 210, 0),
            border: Color::DarkGray,
            text: Color::White,
            dim: Color::DarkGray,
            highlight_bg: Color::Rgb(30, 50, 30),
            accent: Color::Cyan,
            spinner: Color::Cyan,
            footer_fg: Color::DarkGray,
        }
    }

    /// Modern theme: white text, electric blue accents.
    pub fn modern() -> Self {
        Self {
            valid: Color::Rgb(0, 200, 80),
            invalid: Color::Rgb(255, 80, 80),
            error: Color::Rgb(200, 50, 200),
            skipped: Color::Rgb(255, 200, 0),

            header_fg: Color::White,
            header_bg: Color::Rgb(30, 60, 120),
            border: Color::Rgb(60, 60, 80),
            text: Color::White,
            dim: Color::Rgb(120, 120, 140),
            highlight_bg: Color::Rgb(30, 40, 80),
            accent: Color::Rgb(60, 140, 255),
            spinner: Color::Rgb(60, 140, 255),
            footer_fg: Color::Rgb(120, 120, 140),
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "modern" => Self::modern(),
            _ => Self::hacker(),
        }
    }

    pub fn status_color(&self, status: &EntryStatus) -> Color {
        match status {
            EntryStatus::Pending => self.dim,
            EntryStatus::Valid => self.valid,
            EntryStatus::Invalid => self.invalid,
            EntryStatus::Skipped => self.skipped,
            EntryStatus::Error => self.error,
        }
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .bg(self.header_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn highlight_style(&self) -> Style {
        Style::default()
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn footer_style(&self) -> Style {
        Style::default().fg(self.footer_fg)
    }
}
