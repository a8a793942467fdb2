use std::time::Duration;

use loadtest_summary_model::Totals;

/// What a single worker did during a run. Returned by the worker when it is joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerSummary {
    pub index: usize,
    pub url: String,
    /// The number of requests this worker attempted
    pub iterations: u64,
}

/// The state of a run after every worker has stopped.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// When the workers were started, as a Unix timestamp in seconds
    pub started_at: i64,
    pub totals: Totals,
    /// Latencies of successful requests in milliseconds, sorted ascending
    pub latencies_ms: Vec<f64>,
    /// One entry per worker, in spawn order
    pub workers: Vec<WorkerSummary>,
    pub sample_errors: Vec<String>,
    /// Time from the start of the run until the stop signal was sent
    pub stopped_after: Duration,
    /// Whether the run was stopped early by an interrupt
    pub interrupted: bool,
}

impl RunResult {
    /// The duration rates should be computed against. This is the configured duration unless the
    /// run was cut short.
    pub fn reporting_duration(&self, configured: Duration) -> Duration {
        if self.interrupted {
            self.stopped_after.min(configured)
        } else {
            configured
        }
    }
}
