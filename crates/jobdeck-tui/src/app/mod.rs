mod backend_events;
mod update;

use std::sync::Arc;

use tokio::sync::mpsc;

use jobdeck_core::ValidationRun;
use jobdeck_core::profile::Profile;
use jobdeck_core::report::ReportPaths;
use jobdeck_core::ProgressTracker;

use crate::config_file::Settings;
use crate::theme::Theme;
use crate::tui_event::BackendCommand;

/// Which screen is currently displayed.
///
/// `MainMenu` is initial, `Quit` is terminal. Only the foreground update
/// loop ever assigns this; backend tasks communicate through events and
/// the shared progress tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    ProfileSelect,
    OpenSettings,
    Opening,
    Validating,
    Fetching,
    Quit,
}

/// Where the current (or last) validation run stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Running,
    Done,
    Cancelled,
}

/// Edit state for the tab-opening settings screen.
#[derive(Debug, Clone)]
pub struct OpenSettingsState {
    /// 0 = tab limit, 1 = delay between tabs.
    pub cursor: usize,
    pub tab_limit_input: String,
    pub delay_input: String,
}

impl OpenSettingsState {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            cursor: 0,
            tab_limit_input: settings.tab_limit.to_string(),
            delay_input: settings.delay_ms.to_string(),
        }
    }

    /// Parse the tab limit, clamped to `1..=max`. Empty input falls back to
    /// the default.
    pub fn tab_limit(&self, max: usize) -> usize {
        self.tab_limit_input
            .parse::<usize>()
            .unwrap_or(Settings::default().tab_limit)
            .clamp(1, max.max(1))
    }

    /// Parse the inter-tab delay in milliseconds, capped at five seconds.
    pub fn delay_ms(&self) -> u64 {
        self.delay_input
            .parse::<u64>()
            .unwrap_or(Settings::default().delay_ms)
            .min(5_000)
    }

    pub fn active_input_mut(&mut self) -> &mut String {
        if self.cursor == 0 {
            &mut self.tab_limit_input
        } else {
            &mut self.delay_input
        }
    }
}

/// Main application state. Owned exclusively by the foreground loop.
pub struct App {
    pub screen: Screen,
    pub profiles: Vec<Profile>,
    pub profile_idx: usize,
    /// Cursor within the profile-select list.
    pub selection_idx: usize,
    /// One-shot status line shown on the menu; cleared after rendering.
    pub message: String,
    pub settings: Settings,
    pub theme: Theme,
    pub tick: usize,
    pub show_help: bool,

    pub open_settings: OpenSettingsState,
    /// (attempted, total) while the Opening screen is live.
    pub open_progress: (usize, usize),

    pub run_phase: RunPhase,
    /// Latest snapshot from the progress tracker, refreshed on tick.
    pub run: ValidationRun,
    /// URL most recently picked up by a pool worker.
    pub last_checked: String,
    pub artifacts: Option<ReportPaths>,

    /// Tracker for the in-flight run; polled on tick while validating.
    pub tracker: Option<Arc<ProgressTracker>>,
    /// Channel to the backend listener.
    pub backend_cmd_tx: Option<mpsc::UnboundedSender<BackendCommand>>,
}

impl App {
    pub fn new(profiles: Vec<Profile>, settings: Settings, theme: Theme) -> Self {
        let open_settings = OpenSettingsState::from_settings(&settings);
        Self {
            screen: Screen::MainMenu,
            profiles,
            profile_idx: 0,
            selection_idx: 0,
            message: String::new(),
            settings,
            theme,
            tick: 0,
            show_help: false,
            open_settings,
            open_progress: (0, 0),
            run_phase: RunPhase::Idle,
            run: ValidationRun::default(),
            last_checked: String::new(),
            artifacts: None,
            tracker: None,
            backend_cmd_tx: None,
        }
    }

    pub fn current_profile(&self) -> Option<&Profile> {
        self.profiles.get(self.profile_idx)
    }

    pub(crate) fn send(&self, cmd: BackendCommand) {
        if let Some(tx) = &self.backend_cmd_tx {
            let _ = tx.send(cmd);
        }
    }

    /// Render the current screen.
    pub fn view(&mut self, f: &mut ratatui::Frame) {
        let content = crate::view::title_bar(f, f.area(), self);

        match self.screen {
            Screen::MainMenu => crate::view::menu::render(f, content, self),
            Screen::ProfileSelect => crate::view::profile_select::render(f, content, self),
            Screen::OpenSettings => crate::view::settings::render(f, content, self),
            Screen::Opening => crate::view::opening::render(f, content, self),
            Screen::Validating => crate::view::validating::render(f, content, self),
            Screen::Fetching => crate::view::fetching::render(f, content, self),
            Screen::Quit => {}
        }

        if self.show_help {
            crate::view::help::render(f, &self.theme);
        }
    }
}
