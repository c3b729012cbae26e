//! Thread-safe run counters shared between pool workers and the UI.

use std::sync::Mutex;

use crate::{EntryStatus, ValidationRun};

/// Owner of one run's [`ValidationRun`] counters.
///
/// Workers call [`record`](Self::record) as they classify entries; everyone
/// else only ever sees point-in-time copies from
/// [`snapshot`](Self::snapshot). A poisoned lock is recovered rather than
/// propagated; counters are plain integers and stay usable.
pub struct ProgressTracker {
    inner: Mutex<ValidationRun>,
}

impl ProgressTracker {
    pub fn new(total: usize) -> Self {
        Self {
            inner: Mutex::new(ValidationRun {
                total,
                ..ValidationRun::default()
            }),
        }
    }

    /// Reset the counters for a fresh run over `total` probe targets.
    pub fn begin(&self, total: usize) {
        let mut run = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *run = ValidationRun {
            total,
            ..ValidationRun::default()
        };
    }

    /// Record one entry reaching a terminal classification. Called only by
    /// pool workers, synchronously with the classification.
    pub fn record(&self, status: &EntryStatus) {
        let mut run = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        debug_assert!(run.completed < run.total, "record() past total");
        run.completed = (run.completed + 1).min(run.total);
        match status {
            EntryStatus::Valid => run.valid += 1,
            EntryStatus::Invalid => run.invalid += 1,
            EntryStatus::Error => run.errors += 1,
            EntryStatus::Skipped | EntryStatus::Pending => {}
        }
    }

    pub fn mark_cancelled(&self) {
        let mut run = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        run.cancelled = true;
    }

    /// Consistent point-in-time copy of the run counters.
    pub fn snapshot(&self) -> ValidationRun {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn snapshot_reflects_records() {
        let tracker = ProgressTracker::new(3);
        tracker.record(&EntryStatus::Valid);
        tracker.record(&EntryStatus::Invalid);

        let snap = tracker.snapshot();
        assert_eq!(snap.total, 3);
        assert_eq!(snap.completed, 2);
        assert_eq!(snap.valid, 1);
        assert_eq!(snap.invalid, 1);
        assert_eq!(snap.errors, 0);
        assert!(!snap.cancelled);
    }

    #[test]
    fn concurrent_records_never_lose_updates() {
        let total = 8 * 250;
        let tracker = Arc::new(ProgressTracker::new(total));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tracker = Arc::clone(&tracker);
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        tracker.record(&EntryStatus::Valid);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let snap = tracker.snapshot();
        assert_eq!(snap.completed, total);
        assert_eq!(snap.valid, total);
    }

    #[test]
    fn completed_never_exceeds_total() {
        let tracker = ProgressTracker::new(1);
        tracker.record(&EntryStatus::Valid);
        let snap = tracker.snapshot();
        assert_eq!(snap.completed, 1);
        assert!(snap.completed <= snap.total);
    }

    #[test]
    fn begin_resets_for_a_fresh_run() {
        let tracker = ProgressTracker::new(2);
        tracker.record(&EntryStatus::Error);
        tracker.mark_cancelled();

        tracker.begin(5);
        let snap = tracker.snapshot();
        assert_eq!(snap, ValidationRun {
            total: 5,
            ..ValidationRun::default()
        });
    }
}
