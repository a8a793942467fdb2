use std::time::Duration;

use loadtest_summary_model::{LatencyPercentiles, Report};

use crate::RunResult;

pub const REPORTED_PERCENTILES: [u32; 3] = [50, 95, 99];

/// Index of percentile `p` in a sorted sequence of length `n`.
///
/// `floor((n - 1) * p / 100)`, clamped to the last element. Returns 0 for an empty sequence.
pub fn percentile_index(n: usize, p: u32) -> usize {
    if n == 0 {
        return 0;
    }

    let idx = (n as u64 - 1) * u64::from(p) / 100;
    (idx as usize).min(n - 1)
}

/// Value at percentile `p` of an ascending `sorted` slice, or `None` if it is empty.
pub fn percentile(sorted: &[f64], p: u32) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    Some(sorted[percentile_index(sorted.len(), p)])
}

/// Compute the throughput and latency statistics for a finished run.
pub fn summarize(result: &RunResult, duration: Duration) -> Report {
    let totals = result.totals;
    let duration_s = duration.as_secs_f64();

    let requests_per_second = if duration_s > 0.0 {
        totals.attempted as f64 / duration_s
    } else {
        0.0
    };

    let (success_rate, failure_rate) = if totals.attempted > 0 {
        (
            totals.succeeded as f64 / totals.attempted as f64 * 100.0,
            totals.failed as f64 / totals.attempted as f64 * 100.0,
        )
    } else {
        (0.0, 0.0)
    };

    let latency = match REPORTED_PERCENTILES.map(|p| percentile(&result.latencies_ms, p)) {
        [Some(p50_ms), Some(p95_ms), Some(p99_ms)] => Some(LatencyPercentiles {
            p50_ms,
            p95_ms,
            p99_ms,
        }),
        _ => None,
    };

    Report {
        totals,
        duration_s,
        requests_per_second,
        success_rate,
        failure_rate,
        latency,
        sample_errors: result.sample_errors.clone(),
    }
}
