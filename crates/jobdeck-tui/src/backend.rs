//! Backend tasks: everything that must not block the foreground loop.
//!
//! Each task owns its inputs, reports through [`BackendEvent`]s, and never
//! touches the screen state.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use jobdeck_core::profile::Profile;
use jobdeck_core::transport::{HttpTransport, Transport};
use jobdeck_core::{CheckConfig, ProgressTracker, validate_entries, write_reports};

use crate::tui_event::BackendEvent;

const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Validate a profile snapshot, then persist the three artifacts.
///
/// Artifacts are written on completion and on cancellation alike; entries
/// still pending at a cancellation barrier are the report writer's problem,
/// not ours.
pub async fn run_validation(
    mut profile: Profile,
    config: CheckConfig,
    tracker: Arc<ProgressTracker>,
    tx: mpsc::UnboundedSender<BackendEvent>,
    cancel: CancellationToken,
) {
    tracing::info!(profile = %profile.name, targets = profile.probe_targets(), "validation started");
    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&config));

    let progress_tx = tx.clone();
    validate_entries(
        &mut profile.entries,
        transport,
        &config,
        Arc::clone(&tracker),
        move |event| {
            let _ = progress_tx.send(BackendEvent::ValidationProgress(event));
        },
        cancel.clone(),
    )
    .await;

    let cancelled = cancel.is_cancelled();
    match write_reports(&profile, &profile.entries) {
        Ok(paths) => {
            tracing::info!(profile = %profile.name, cancelled, "validation finished");
            let _ = tx.send(BackendEvent::ValidationFinished {
                entries: profile.entries,
                paths,
                cancelled,
            });
        }
        Err(e) => {
            tracing::error!(profile = %profile.name, error = %e, "artifact write failed");
            let _ = tx.send(BackendEvent::ValidationWriteFailed {
                entries: profile.entries,
                error: e.to_string(),
            });
        }
    }
}

/// Fetch provider sources into the profile's jobs file.
pub async fn run_fetch(
    specs_path: PathBuf,
    jobs_file: PathBuf,
    tx: mpsc::UnboundedSender<BackendEvent>,
) {
    match jobdeck_core::fetch::fetch_profile_jobs(&specs_path, &jobs_file, FETCH_TIMEOUT).await {
        Ok(summary) => {
            let _ = tx.send(BackendEvent::FetchFinished {
                written: summary.written,
                warnings: summary.warnings,
            });
        }
        Err(e) => {
            let _ = tx.send(BackendEvent::FetchFailed {
                error: e.to_string(),
            });
        }
    }
}

/// Open URLs one tab at a time, pausing `delay` between tabs so the browser
/// keeps up. Per-URL failures are logged and skipped.
pub async fn run_open(
    urls: Vec<url::Url>,
    delay: Duration,
    tx: mpsc::UnboundedSender<BackendEvent>,
) {
    let total = urls.len();
    let mut opened = 0usize;

    for (i, url) in urls.into_iter().enumerate() {
        let target = url.clone();
        // Command::status blocks; keep it off the async runtime.
        let result = tokio::task::spawn_blocking(move || crate::browser::open_url(&target)).await;
        match result {
            Ok(Ok(())) => opened += 1,
            Ok(Err(e)) => tracing::warn!(url = %url, error = %e, "failed to open tab"),
            Err(e) => tracing::warn!(url = %url, error = %e, "opener task panicked"),
        }

        let _ = tx.send(BackendEvent::OpenProgress {
            attempted: i + 1,
            total,
        });

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    let _ = tx.send(BackendEvent::OpenFinished { opened });
}
