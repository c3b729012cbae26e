//! Integration tests for the validator pool.
//!
//! All probes go through [`MockTransport`]; no HTTP requests are made.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use jobdeck_core::pool::validate_entries;
use jobdeck_core::profile::{JOBS_FILE, Profile};
use jobdeck_core::transport::{MockOutcome, MockTransport, ProbeError, Transport};
use jobdeck_core::{CheckConfig, Entry, EntryStatus, ProbeEvent, ProgressTracker, write_reports};

fn entries_from(lines: &[&str]) -> Vec<Entry> {
    lines.iter().map(|l| Entry::from_raw(l)).collect()
}

fn config(concurrency: usize) -> CheckConfig {
    CheckConfig {
        concurrency,
        timeout: Duration::from_secs(1),
        ..CheckConfig::default()
    }
}

#[tokio::test]
async fn classifies_by_status_code_and_transport_failure() {
    let transport = Arc::new(
        MockTransport::new(MockOutcome::Status(200))
            .respond("https://a.example/gone", MockOutcome::Status(404))
            .respond("https://a.example/down", MockOutcome::Error(ProbeError::Timeout)),
    );
    let mut entries = entries_from(&[
        "https://a.example/ok",
        "https://a.example/moved", // fallback 200
        "https://a.example/gone",
        "https://a.example/down",
    ]);
    let tracker = Arc::new(ProgressTracker::new(0));

    validate_entries(
        &mut entries,
        transport.clone() as Arc<dyn Transport>,
        &config(4),
        tracker.clone(),
        |_| {},
        CancellationToken::new(),
    )
    .await;

    assert_eq!(entries[0].status, EntryStatus::Valid);
    assert_eq!(entries[1].status, EntryStatus::Valid);
    assert_eq!(entries[2].status, EntryStatus::Invalid);
    assert_eq!(entries[2].detail.as_deref(), Some("404"));
    assert_eq!(entries[3].status, EntryStatus::Error);
    assert_eq!(entries[3].detail.as_deref(), Some("timeout"));

    let snap = tracker.snapshot();
    assert_eq!(snap.total, 4);
    assert_eq!(snap.completed, 4);
    assert_eq!(snap.valid, 2);
    assert_eq!(snap.invalid, 1);
    assert_eq!(snap.errors, 1);
    assert!(!snap.cancelled);
}

#[tokio::test]
async fn never_exceeds_the_concurrency_bound() {
    let transport =
        Arc::new(MockTransport::new(MockOutcome::Status(200)).with_delay(Duration::from_millis(20)));
    let lines: Vec<String> = (0..20).map(|i| format!("https://a.example/job{i}")).collect();
    let mut entries: Vec<Entry> = lines.iter().map(|l| Entry::from_raw(l)).collect();
    let tracker = Arc::new(ProgressTracker::new(0));

    validate_entries(
        &mut entries,
        transport.clone() as Arc<dyn Transport>,
        &config(4),
        tracker.clone(),
        |_| {},
        CancellationToken::new(),
    )
    .await;

    assert_eq!(transport.call_count(), 20);
    assert!(
        transport.max_in_flight() <= 4,
        "bound violated: {} probes in flight",
        transport.max_in_flight()
    );
    assert_eq!(tracker.snapshot().completed, 20);
}

#[tokio::test]
async fn concurrency_of_one_serializes_probes() {
    let transport =
        Arc::new(MockTransport::new(MockOutcome::Status(200)).with_delay(Duration::from_millis(5)));
    let mut entries = entries_from(&["https://a.example/1", "https://a.example/2", "https://a.example/3"]);
    let tracker = Arc::new(ProgressTracker::new(0));

    validate_entries(
        &mut entries,
        transport.clone() as Arc<dyn Transport>,
        &config(1),
        tracker,
        |_| {},
        CancellationToken::new(),
    )
    .await;

    assert_eq!(transport.max_in_flight(), 1);
    assert_eq!(transport.call_count(), 3);
}

#[tokio::test]
async fn duplicate_urls_probe_once_and_share_the_outcome() {
    let transport = Arc::new(
        MockTransport::new(MockOutcome::Status(200))
            .respond("https://a.example/job1", MockOutcome::Status(404)),
    );
    // Second line normalizes to the first's URL via scheme defaulting.
    let mut entries = entries_from(&[
        "https://a.example/job1",
        "a.example/job1",
        "https://b.example/job2",
    ]);
    let tracker = Arc::new(ProgressTracker::new(0));

    let events: Arc<Mutex<Vec<ProbeEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let events_clone = events.clone();

    validate_entries(
        &mut entries,
        transport.clone() as Arc<dyn Transport>,
        &config(2),
        tracker.clone(),
        move |event| events_clone.lock().unwrap().push(event),
        CancellationToken::new(),
    )
    .await;

    // One probe for the duplicated URL, one for the other.
    assert_eq!(transport.call_count(), 2);

    // Both duplicate entries carry the identical classification.
    assert_eq!(entries[0].status, EntryStatus::Invalid);
    assert_eq!(entries[1].status, EntryStatus::Invalid);
    assert_eq!(entries[0].detail, entries[1].detail);
    assert_eq!(entries[2].status, EntryStatus::Valid);

    // Fan-out counts each duplicate entry in the run counters.
    let snap = tracker.snapshot();
    assert_eq!(snap.total, 3);
    assert_eq!(snap.completed, 3);
    assert_eq!(snap.invalid, 2);

    // And each duplicate got its own Classified event.
    let classified_indices: Vec<usize> = events
        .lock()
        .unwrap()
        .iter()
        .filter_map(|e| match e {
            ProbeEvent::Classified { index, .. } => Some(*index),
            _ => None,
        })
        .collect();
    assert!(classified_indices.contains(&0));
    assert!(classified_indices.contains(&1));
}

#[tokio::test]
async fn cancellation_stops_dispatch_and_completes_promptly() {
    let transport = Arc::new(
        MockTransport::new(MockOutcome::Status(200)).with_delay(Duration::from_millis(200)),
    );
    let lines: Vec<String> = (0..10).map(|i| format!("https://a.example/job{i}")).collect();
    let entries: Vec<Entry> = lines.iter().map(|l| Entry::from_raw(l)).collect();
    let tracker = Arc::new(ProgressTracker::new(0));
    let cancel = CancellationToken::new();

    let task_transport = transport.clone() as Arc<dyn Transport>;
    let task_tracker = tracker.clone();
    let task_cancel = cancel.clone();
    let handle = tokio::spawn(async move {
        let mut entries = entries;
        validate_entries(
            &mut entries,
            task_transport,
            &config(2),
            task_tracker,
            |_| {},
            task_cancel,
        )
        .await;
        entries
    });

    // Let the first wave of probes start, then cancel mid-run.
    tokio::time::sleep(Duration::from_millis(50)).await;
    cancel.cancel();

    let started = std::time::Instant::now();
    let entries = handle.await.unwrap();
    // In-flight probes finish naturally; nothing new is dispatched after
    // the signal, so the run winds down within roughly one probe duration.
    assert!(started.elapsed() < Duration::from_secs(2));

    let calls_at_completion = transport.call_count();
    assert!(
        calls_at_completion < 10,
        "cancellation should stop dispatch, saw {calls_at_completion} probes"
    );

    // The call counter has plateaued; nothing is still probing.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(transport.call_count(), calls_at_completion);

    let snap = tracker.snapshot();
    assert!(snap.cancelled);
    let terminal = entries.iter().filter(|e| e.status.is_terminal()).count();
    assert_eq!(snap.completed, terminal);
    assert!(
        entries.iter().any(|e| e.status == EntryStatus::Pending),
        "some entries should remain pending after cancellation"
    );
}

#[tokio::test]
async fn rerun_resets_stale_classifications() {
    let mut entries = entries_from(&["https://a.example/job1", "https://a.example/job2"]);
    let tracker = Arc::new(ProgressTracker::new(0));

    let failing = Arc::new(MockTransport::new(MockOutcome::Status(404)));
    validate_entries(
        &mut entries,
        failing as Arc<dyn Transport>,
        &config(2),
        tracker.clone(),
        |_| {},
        CancellationToken::new(),
    )
    .await;
    assert!(entries.iter().all(|e| e.status == EntryStatus::Invalid));

    // Second run starts from Pending and reclassifies everything.
    let healthy = Arc::new(MockTransport::new(MockOutcome::Status(200)));
    validate_entries(
        &mut entries,
        healthy as Arc<dyn Transport>,
        &config(2),
        tracker.clone(),
        |_| {},
        CancellationToken::new(),
    )
    .await;

    assert!(entries.iter().all(|e| e.status == EntryStatus::Valid));
    assert!(entries.iter().all(|e| e.detail.is_none()));
    let snap = tracker.snapshot();
    assert_eq!(snap.completed, 2);
    assert_eq!(snap.valid, 2);
    assert_eq!(snap.invalid, 0);
}

#[tokio::test]
async fn progress_events_cover_checking_and_classified() {
    let transport = Arc::new(MockTransport::new(MockOutcome::Status(200)));
    let mut entries = entries_from(&["https://a.example/job1"]);
    let tracker = Arc::new(ProgressTracker::new(0));

    let events: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));
    let events_clone = events.clone();

    validate_entries(
        &mut entries,
        transport as Arc<dyn Transport>,
        &config(1),
        tracker,
        move |event| {
            let tag = match event {
                ProbeEvent::Checking { .. } => "checking",
                ProbeEvent::Classified { .. } => "classified",
            };
            events_clone.lock().unwrap().push(tag);
        },
        CancellationToken::new(),
    )
    .await;

    let collected = events.lock().unwrap();
    assert!(collected.contains(&"checking"), "got: {collected:?}");
    assert!(collected.contains(&"classified"), "got: {collected:?}");
}

/// The end-to-end shape from the raw lines down to the three artifacts.
#[tokio::test]
async fn end_to_end_profile_validation_and_artifacts() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(
        tmp.path().join(JOBS_FILE),
        "https://a.example/job1\n\n# comment\nnot a url\na.example/job2\n",
    )
    .unwrap();
    let mut profile = Profile::from_directory(tmp.path()).unwrap().unwrap();

    // Blank and comment lines vanish; "not a url" survives as a skip.
    assert_eq!(profile.entries.len(), 3);
    assert_eq!(profile.probe_targets(), 2);

    let transport = Arc::new(
        MockTransport::new(MockOutcome::Status(200))
            .respond("https://a.example/job2", MockOutcome::Status(404)),
    );
    let tracker = Arc::new(ProgressTracker::new(0));

    validate_entries(
        &mut profile.entries,
        transport.clone() as Arc<dyn Transport>,
        &config(2),
        tracker,
        |_| {},
        CancellationToken::new(),
    )
    .await;
    assert_eq!(transport.call_count(), 2);

    let paths = write_reports(&profile, &profile.entries).unwrap();

    let clean = std::fs::read_to_string(&paths.clean).unwrap();
    assert_eq!(clean, "https://a.example/job1\nhttps://a.example/job2\n");

    let validated = std::fs::read_to_string(&paths.validated).unwrap();
    assert_eq!(validated, "https://a.example/job1\n");

    let report = std::fs::read_to_string(&paths.report).unwrap();
    assert!(report.contains("https://a.example/job2\tinvalid\t404"));
    assert!(report.contains("not a url\tskipped\tcontains whitespace"));
}
