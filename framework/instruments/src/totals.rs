use std::sync::atomic::{AtomicU64, Ordering};

use loadtest_summary_model::Totals;

use crate::RequestOutcome;

/// Counters shared by all workers for the lifetime of a run.
///
/// Each counter is updated with a single atomic increment so concurrent updates are never lost.
/// The three counters are not updated together, so a [RunTotals::snapshot] taken while workers
/// are running may be off by the requests in progress. Once every worker has been joined the
/// snapshot is exact.
#[derive(Debug, Default)]
pub struct RunTotals {
    attempted: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
}

impl RunTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one finished request attempt.
    pub fn record(&self, outcome: &RequestOutcome) {
        self.attempted.fetch_add(1, Ordering::Relaxed);
        if outcome.is_success() {
            self.succeeded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> Totals {
        Totals {
            attempted: self.attempted.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn concurrent_records_are_not_lost() {
        let totals = Arc::new(RunTotals::new());

        let handles = (0..8)
            .map(|i| {
                let totals = totals.clone();
                std::thread::spawn(move || {
                    for n in 0..10_000 {
                        let status = if (i + n) % 4 == 0 { 503 } else { 200 };
                        totals.record(&RequestOutcome::from_status(status, Duration::ZERO));
                    }
                })
            })
            .collect::<Vec<_>>();

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = totals.snapshot();
        assert_eq!(80_000, snapshot.attempted);
        assert_eq!(20_000, snapshot.failed);
        assert_eq!(snapshot.attempted, snapshot.succeeded + snapshot.failed);
    }
}
