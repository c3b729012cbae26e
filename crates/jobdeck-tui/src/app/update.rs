use std::sync::Arc;
use std::time::Duration;

use jobdeck_core::{CheckConfig, ProgressTracker, ValidationRun};

use super::{App, OpenSettingsState, RunPhase, Screen};
use crate::action::Action;
use crate::tui_event::BackendCommand;

impl App {
    /// Process a user action and update state. Returns true if the app
    /// should quit.
    pub fn update(&mut self, action: Action) -> bool {
        // Help overlay intercepts everything except quit.
        if self.show_help {
            match action {
                Action::Quit => {
                    self.quit();
                    return true;
                }
                Action::ToggleHelp | Action::Back | Action::Select => {
                    self.show_help = false;
                }
                Action::Tick => self.tick = self.tick.wrapping_add(1),
                _ => {}
            }
            return false;
        }

        match action {
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
                self.poll_progress();
                return false;
            }
            Action::Quit => {
                self.quit();
                return true;
            }
            Action::ToggleHelp => {
                self.show_help = true;
                return false;
            }
            Action::None | Action::Resize(..) => return false,
            _ => {}
        }

        match self.screen {
            Screen::MainMenu => self.update_main_menu(action),
            Screen::ProfileSelect => self.update_profile_select(action),
            Screen::OpenSettings => self.update_open_settings(action),
            Screen::Validating => self.update_validating(action),
            // Opening and Fetching run to completion on their own; input is
            // ignored until the backend reports back.
            Screen::Opening | Screen::Fetching | Screen::Quit => {}
        }
        false
    }

    /// Quit from any screen: cancel an in-flight run, then leave.
    fn quit(&mut self) {
        if self.run_phase == RunPhase::Running {
            self.send(BackendCommand::CancelValidation);
        }
        self.screen = Screen::Quit;
    }

    /// Refresh the run snapshot from the shared tracker.
    fn poll_progress(&mut self) {
        if self.run_phase == RunPhase::Running
            && let Some(tracker) = &self.tracker
        {
            self.run = tracker.snapshot();
        }
    }

    fn update_main_menu(&mut self, action: Action) {
        match action {
            Action::OpenTabs => {
                let has_urls = self
                    .current_profile()
                    .is_some_and(|p| p.probe_targets() > 0);
                if has_urls {
                    self.open_settings = OpenSettingsState::from_settings(&self.settings);
                    self.screen = Screen::OpenSettings;
                } else {
                    self.message = "No URLs to open".to_string();
                }
            }
            Action::Fetch => {
                let Some(profile) = self.current_profile() else {
                    self.message = "No profile selected".to_string();
                    return;
                };
                let Some(specs_path) = profile.search_specs.clone() else {
                    self.message = "No search_specs.json in profile".to_string();
                    return;
                };
                self.send(BackendCommand::Fetch {
                    specs_path,
                    jobs_file: profile.jobs_file.clone(),
                });
                self.screen = Screen::Fetching;
            }
            Action::Validate => self.start_validation(),
            Action::SwitchProfile => {
                if self.profiles.is_empty() {
                    self.message = "No profiles available".to_string();
                    return;
                }
                self.selection_idx = self.profile_idx;
                self.screen = Screen::ProfileSelect;
            }
            _ => {}
        }
    }

    fn update_profile_select(&mut self, action: Action) {
        match action {
            Action::MoveDown => {
                self.selection_idx =
                    (self.selection_idx + 1).min(self.profiles.len().saturating_sub(1));
            }
            Action::MoveUp => {
                self.selection_idx = self.selection_idx.saturating_sub(1);
            }
            Action::Select => {
                self.profile_idx = self.selection_idx;
                if let Some(profile) = self.profiles.get_mut(self.profile_idx)
                    && let Err(e) = profile.reload()
                {
                    self.message = format!("Failed to reload profile: {e}");
                }
                self.screen = Screen::MainMenu;
            }
            // The highlighted profile can be acted on directly.
            Action::Validate => {
                self.profile_idx = self.selection_idx;
                self.start_validation();
            }
            Action::OpenTabs => {
                self.profile_idx = self.selection_idx;
                let has_urls = self
                    .current_profile()
                    .is_some_and(|p| p.probe_targets() > 0);
                if has_urls {
                    self.open_settings = OpenSettingsState::from_settings(&self.settings);
                    self.screen = Screen::OpenSettings;
                } else {
                    self.message = "No URLs to open".to_string();
                }
            }
            Action::Back => self.screen = Screen::MainMenu,
            _ => {}
        }
    }

    fn update_open_settings(&mut self, action: Action) {
        match action {
            Action::MoveDown | Action::MoveUp => {
                self.open_settings.cursor = 1 - self.open_settings.cursor;
            }
            Action::Digit(c) => {
                let input = self.open_settings.active_input_mut();
                if input.len() < 5 {
                    input.push(c);
                }
            }
            Action::Backspace => {
                self.open_settings.active_input_mut().pop();
            }
            Action::Select => self.start_opening(),
            Action::Back => self.screen = Screen::MainMenu,
            _ => {}
        }
    }

    fn update_validating(&mut self, action: Action) {
        match (&self.run_phase, action) {
            (RunPhase::Running, Action::Cancel) => {
                // Signal and return to the menu; workers wind down on their
                // own, bounded by the per-request timeout.
                self.send(BackendCommand::CancelValidation);
                self.message = "Cancelling validation...".to_string();
                self.screen = Screen::MainMenu;
            }
            (RunPhase::Done | RunPhase::Cancelled, Action::Back | Action::Select) => {
                self.screen = Screen::MainMenu;
            }
            _ => {}
        }
    }

    /// Spawn a validation run for the current profile.
    fn start_validation(&mut self) {
        if self.run_phase == RunPhase::Running {
            self.message = "A validation run is still winding down".to_string();
            return;
        }
        let Some(profile) = self.profiles.get(self.profile_idx).cloned() else {
            self.message = "No profile selected".to_string();
            return;
        };
        let targets = profile.probe_targets();
        if targets == 0 {
            self.message = "No URLs to validate".to_string();
            return;
        }

        let tracker = Arc::new(ProgressTracker::new(targets));
        let config = CheckConfig {
            concurrency: self.settings.concurrency,
            timeout: Duration::from_secs(self.settings.timeout_secs),
            ..CheckConfig::default()
        };

        self.run = ValidationRun {
            total: targets,
            ..ValidationRun::default()
        };
        self.run_phase = RunPhase::Running;
        self.artifacts = None;
        self.last_checked.clear();
        self.tracker = Some(Arc::clone(&tracker));

        self.send(BackendCommand::Validate {
            profile,
            config,
            tracker,
        });
        self.screen = Screen::Validating;
    }

    /// Confirm the open settings and start opening tabs.
    fn start_opening(&mut self) {
        let Some(profile) = self.current_profile() else {
            self.screen = Screen::MainMenu;
            return;
        };
        let urls: Vec<url::Url> = profile
            .entries
            .iter()
            .filter_map(|e| e.normalized.clone())
            .collect();
        if urls.is_empty() {
            self.message = "No URLs to open".to_string();
            self.screen = Screen::MainMenu;
            return;
        }

        let tab_limit = self.open_settings.tab_limit(urls.len());
        let delay_ms = self.open_settings.delay_ms();
        self.settings.tab_limit = tab_limit;
        self.settings.delay_ms = delay_ms;

        let urls: Vec<url::Url> = urls.into_iter().take(tab_limit).collect();
        self.open_progress = (0, urls.len());
        self.send(BackendCommand::OpenTabs {
            urls,
            delay: Duration::from_millis(delay_ms),
        });
        self.screen = Screen::Opening;
    }
}
