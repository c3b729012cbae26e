use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use jobdeck_core::profile::Profile;
use jobdeck_core::report::ReportPaths;
use jobdeck_core::{CheckConfig, Entry, ProbeEvent, ProgressTracker};

/// Commands sent from the TUI to the backend listener.
pub enum BackendCommand {
    /// Start validating a profile. The profile is a snapshot clone; the
    /// backend returns the classified entries when the run ends.
    Validate {
        profile: Profile,
        config: CheckConfig,
        tracker: Arc<ProgressTracker>,
    },
    /// Cancel the current validation run.
    CancelValidation,
    /// Fetch fresh links from the profile's provider config.
    Fetch {
        specs_path: PathBuf,
        jobs_file: PathBuf,
    },
    /// Open URLs in the browser, one tab at a time.
    OpenTabs {
        urls: Vec<url::Url>,
        delay: Duration,
    },
}

/// Events flowing from backend tasks to the TUI.
#[derive(Debug)]
pub enum BackendEvent {
    /// Progress from the validator pool (forwarded synchronously).
    ValidationProgress(ProbeEvent),
    /// The run ended (complete or cancelled) and artifacts were written.
    ValidationFinished {
        entries: Vec<Entry>,
        paths: ReportPaths,
        cancelled: bool,
    },
    /// The run ended but an artifact could not be written.
    ValidationWriteFailed {
        entries: Vec<Entry>,
        error: String,
    },
    FetchFinished {
        written: usize,
        warnings: Vec<String>,
    },
    FetchFailed {
        error: String,
    },
    OpenProgress {
        attempted: usize,
        total: usize,
    },
    OpenFinished {
        opened: usize,
    },
}
