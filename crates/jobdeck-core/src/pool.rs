//! Bounded worker pool for URL validation.
//!
//! Architecture: one unbounded job queue consumed by exactly `concurrency`
//! worker tasks, so at most `concurrency` probes are in flight at any
//! instant. Each job carries one distinct normalized URL plus the indices of
//! every entry that normalized to it; the single probe's classification is
//! fanned out to all of them. Cancellation is cooperative: workers check the
//! token between jobs and never abort a request already in flight.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::progress::ProgressTracker;
use crate::transport::Transport;
use crate::{CheckConfig, Entry, EntryStatus, ProbeEvent};

/// A probe job for one distinct normalized URL.
pub struct CheckJob {
    pub url: Url,
    /// Indices of every entry sharing this URL, in first-occurrence order.
    pub entry_indices: Vec<usize>,
    pub result_tx: oneshot::Sender<CheckOutcome>,
    /// Total probe targets in the run (for progress events).
    pub total: usize,
    /// Progress callback, invoked synchronously with each classification.
    pub progress: Arc<dyn Fn(ProbeEvent) + Send + Sync>,
}

/// Terminal classification of one probe, applied to every duplicate entry.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub status: EntryStatus,
    pub detail: Option<String>,
}

/// A pool of worker tasks processing [`CheckJob`]s.
///
/// Submit jobs via [`submit()`](ValidationPool::submit), receive outcomes
/// via the oneshot receiver paired with each job. After cancellation the
/// workers drain the queue without probing, dropping result senders so
/// untouched entries stay `Pending`.
pub struct ValidationPool {
    job_tx: async_channel::Sender<CheckJob>,
    pool_handle: JoinHandle<()>,
}

impl ValidationPool {
    pub fn new(
        transport: Arc<dyn Transport>,
        tracker: Arc<ProgressTracker>,
        config: &CheckConfig,
        cancel: CancellationToken,
    ) -> Self {
        let (job_tx, job_rx) = async_channel::unbounded::<CheckJob>();
        let timeout = config.timeout;
        let concurrency = config.concurrency.max(1);

        let pool_handle = tokio::spawn(async move {
            let mut worker_handles = Vec::with_capacity(concurrency);
            for _ in 0..concurrency {
                worker_handles.push(tokio::spawn(worker_loop(
                    job_rx.clone(),
                    Arc::clone(&transport),
                    Arc::clone(&tracker),
                    timeout,
                    cancel.clone(),
                )));
            }
            // Drop our clone so workers are the last receivers.
            drop(job_rx);

            for h in worker_handles {
                let _ = h.await;
            }
        });

        Self {
            job_tx,
            pool_handle,
        }
    }

    /// Submit a job to the pool.
    pub async fn submit(&self, job: CheckJob) {
        let _ = self.job_tx.send(job).await;
    }

    /// Close the queue and wait for every worker to finish. In-flight
    /// probes complete or time out naturally; nothing is force-aborted.
    pub async fn shutdown(self) {
        self.job_tx.close();
        let _ = self.pool_handle.await;
    }
}

/// Worker loop: take a job, probe once, classify, fan out.
async fn worker_loop(
    rx: async_channel::Receiver<CheckJob>,
    transport: Arc<dyn Transport>,
    tracker: Arc<ProgressTracker>,
    timeout: std::time::Duration,
    cancel: CancellationToken,
) {
    while let Ok(job) = rx.recv().await {
        if cancel.is_cancelled() {
            // Drain without probing. Dropping result_tx leaves the job's
            // entries Pending; the report writer renders them as cancelled.
            tracing::debug!(url = %job.url, "skipping: cancelled");
            continue;
        }

        (job.progress)(ProbeEvent::Checking {
            index: job.entry_indices[0],
            total: job.total,
            url: job.url.to_string(),
        });

        let outcome = match transport.probe(&job.url, timeout).await {
            Ok(resp) if resp.is_reachable() => CheckOutcome {
                status: EntryStatus::Valid,
                detail: None,
            },
            Ok(resp) => CheckOutcome {
                status: EntryStatus::Invalid,
                detail: Some(resp.status.to_string()),
            },
            Err(e) => CheckOutcome {
                status: EntryStatus::Error,
                detail: Some(e.to_string()),
            },
        };
        tracing::debug!(
            url = %job.url,
            status = outcome.status.label(),
            detail = outcome.detail.as_deref().unwrap_or("-"),
            fan_out = job.entry_indices.len(),
            "probe classified"
        );

        // Record and emit per entry, synchronously with the classification,
        // so no update can be lost to cancellation.
        for &index in &job.entry_indices {
            tracker.record(&outcome.status);
            (job.progress)(ProbeEvent::Classified {
                index,
                status: outcome.status.clone(),
                detail: outcome.detail.clone(),
            });
        }

        let _ = job.result_tx.send(outcome);
    }
}

/// Reset previously-classified probe entries back to `Pending`.
///
/// Entries that were `Skipped` at normalize time keep their status; they
/// are identified by `normalized` being `None`, not by the status value.
pub fn reset_entries(entries: &mut [Entry]) {
    for entry in entries.iter_mut() {
        if entry.normalized.is_some() {
            entry.status = EntryStatus::Pending;
            entry.detail = None;
        }
    }
}

/// Group probe-able entries by normalized URL, preserving first-occurrence
/// order. Each group becomes one probe whose result every member shares.
fn dedup_targets(entries: &[Entry]) -> Vec<(Url, Vec<usize>)> {
    let mut targets: Vec<(Url, Vec<usize>)> = Vec::new();
    let mut by_url: HashMap<String, usize> = HashMap::new();

    for (i, entry) in entries.iter().enumerate() {
        let Some(url) = &entry.normalized else {
            continue;
        };
        match by_url.get(url.as_str()) {
            Some(&pos) => targets[pos].1.push(i),
            None => {
                by_url.insert(url.as_str().to_string(), targets.len());
                targets.push((url.clone(), vec![i]));
            }
        }
    }
    targets
}

/// Validate a profile's entries in place.
///
/// Resets any stale classifications, probes each distinct URL once through
/// the pool, and applies the terminal statuses. Per-entry failures never
/// escape; they become `EntryStatus::Error`. On cancellation, entries whose
/// probe never started are left `Pending`.
pub async fn validate_entries(
    entries: &mut [Entry],
    transport: Arc<dyn Transport>,
    config: &CheckConfig,
    tracker: Arc<ProgressTracker>,
    progress: impl Fn(ProbeEvent) + Send + Sync + 'static,
    cancel: CancellationToken,
) {
    reset_entries(entries);
    let targets = dedup_targets(entries);
    let total: usize = targets.iter().map(|(_, indices)| indices.len()).sum();
    tracker.begin(total);

    if total == 0 {
        return;
    }

    let pool = ValidationPool::new(transport, Arc::clone(&tracker), config, cancel.clone());
    let progress: Arc<dyn Fn(ProbeEvent) + Send + Sync> = Arc::new(progress);

    // Submit one job per distinct URL and remember which entries it covers.
    let mut receivers = Vec::with_capacity(targets.len());
    for (url, entry_indices) in targets {
        let (result_tx, result_rx) = oneshot::channel();
        pool.submit(CheckJob {
            url,
            entry_indices: entry_indices.clone(),
            result_tx,
            total,
            progress: Arc::clone(&progress),
        })
        .await;
        receivers.push((entry_indices, result_rx));
    }

    // Apply outcomes in entry order. A dropped sender means the job was
    // drained after cancellation; its entries stay Pending.
    for (entry_indices, rx) in receivers {
        if let Ok(outcome) = rx.await {
            for index in entry_indices {
                entries[index].status = outcome.status.clone();
                entries[index].detail = outcome.detail.clone();
            }
        }
    }

    pool.shutdown().await;

    if cancel.is_cancelled() {
        tracker.mark_cancelled();
    }
}
