use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub mod fetch;
pub mod normalize;
pub mod pool;
pub mod profile;
pub mod progress;
pub mod report;
pub mod transport;

// Re-export for convenience
pub use normalize::{RejectReason, normalize};
pub use pool::{ValidationPool, validate_entries};
pub use profile::{Profile, load_profiles};
pub use progress::ProgressTracker;
pub use report::{ReportError, ReportPaths, write_reports};
pub use transport::{HttpTransport, ProbeError, ProbeResponse, Transport};

/// Classification of a single entry.
///
/// Every entry starts `Pending` and transitions exactly once to a terminal
/// value during a validation run. Entries whose raw line failed
/// normalization are `Skipped` from the moment they are loaded and never
/// reach the network stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryStatus {
    Pending,
    Valid,
    Invalid,
    Skipped,
    Error,
}

impl EntryStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Skipped => "skipped",
            Self::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// One candidate URL derived from a raw profile line.
///
/// Blank lines and comment lines never become entries at all; lines that
/// fail normalization for any other reason become `Skipped` entries so the
/// report can account for them.
#[derive(Debug, Clone)]
pub struct Entry {
    pub raw: String,
    /// Canonical URL, set once by the normalizer. `None` means the line was
    /// rejected and `status` is `Skipped`.
    pub normalized: Option<url::Url>,
    pub status: EntryStatus,
    pub detail: Option<String>,
}

impl Entry {
    /// Build an entry from a raw line that already survived blank/comment
    /// filtering.
    pub fn from_raw(raw: &str) -> Self {
        match normalize(raw) {
            Ok(url) => Self {
                raw: raw.trim().to_string(),
                normalized: Some(url),
                status: EntryStatus::Pending,
                detail: None,
            },
            Err(reason) => Self {
                raw: raw.trim().to_string(),
                normalized: None,
                status: EntryStatus::Skipped,
                detail: Some(reason.to_string()),
            },
        }
    }
}

/// Aggregate counters for one validation run.
///
/// Owned by the [`ProgressTracker`]; everything else sees point-in-time
/// copies via [`ProgressTracker::snapshot`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationRun {
    pub total: usize,
    pub completed: usize,
    pub valid: usize,
    pub invalid: usize,
    pub errors: usize,
    pub cancelled: bool,
}

/// Progress events emitted synchronously by pool workers.
#[derive(Debug, Clone)]
pub enum ProbeEvent {
    /// A probe for the URL shared by these entries is starting.
    Checking { index: usize, total: usize, url: String },
    /// An entry reached a terminal status. Duplicate entries of the same
    /// URL each get their own event with an identical classification.
    Classified {
        index: usize,
        status: EntryStatus,
        detail: Option<String>,
    },
}

/// Configuration for a validation run.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Hard upper bound on concurrently in-flight probes.
    pub concurrency: usize,
    /// Per-request timeout; also bounds how long cancellation waits for
    /// in-flight probes.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            concurrency: 10,
            timeout: Duration::from_secs(8),
            user_agent: concat!("jobdeck/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("profile not found: {0}")]
    ProfileNotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
