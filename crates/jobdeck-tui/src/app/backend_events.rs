use jobdeck_core::ProbeEvent;

use super::{App, RunPhase, Screen};
use crate::tui_event::BackendEvent;

impl App {
    /// Apply a backend event to the model. Backend tasks never mutate the
    /// screen directly; any screen change in response to their events
    /// happens here, in the foreground loop.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::ValidationProgress(progress) => match progress {
                ProbeEvent::Checking { url, .. } => self.last_checked = url,
                // Counters come from tracker snapshots on tick.
                ProbeEvent::Classified { .. } => {}
            },
            BackendEvent::ValidationFinished {
                entries,
                paths,
                cancelled,
            } => {
                if let Some(profile) = self.profiles.get_mut(self.profile_idx) {
                    profile.entries = entries;
                }
                if let Some(tracker) = &self.tracker {
                    self.run = tracker.snapshot();
                }
                self.run_phase = if cancelled {
                    RunPhase::Cancelled
                } else {
                    RunPhase::Done
                };
                self.artifacts = Some(paths.clone());
                // A cancelled run usually means the user is already back on
                // the menu; make the outcome visible there.
                if self.screen != Screen::Validating {
                    self.message = format!(
                        "Validation {}: report at {}",
                        if cancelled { "cancelled" } else { "complete" },
                        paths.report.display()
                    );
                }
            }
            BackendEvent::ValidationWriteFailed { entries, error } => {
                if let Some(profile) = self.profiles.get_mut(self.profile_idx) {
                    profile.entries = entries;
                }
                self.run_phase = RunPhase::Idle;
                self.message = format!("Could not write artifacts: {error}");
                if self.screen == Screen::Validating {
                    self.screen = Screen::MainMenu;
                }
            }
            BackendEvent::FetchFinished { written, warnings } => {
                if let Some(profile) = self.profiles.get_mut(self.profile_idx) {
                    if let Err(e) = profile.reload() {
                        self.message = format!("Fetched {written} jobs but reload failed: {e}");
                    } else if warnings.is_empty() {
                        self.message = format!("Fetched {written} jobs");
                    } else {
                        self.message =
                            format!("Fetched {written} jobs ({} warnings)", warnings.len());
                    }
                }
                for warning in &warnings {
                    tracing::warn!(warning = %warning, "fetch warning");
                }
                if self.screen == Screen::Fetching {
                    self.screen = Screen::MainMenu;
                }
            }
            BackendEvent::FetchFailed { error } => {
                self.message = format!("Fetch failed: {error}");
                if self.screen == Screen::Fetching {
                    self.screen = Screen::MainMenu;
                }
            }
            BackendEvent::OpenProgress { attempted, total } => {
                self.open_progress = (attempted, total);
            }
            BackendEvent::OpenFinished { opened } => {
                self.message = format!("Opened {opened} tabs");
                if self.screen == Screen::Opening {
                    self.screen = Screen::MainMenu;
                }
            }
        }
    }
}
