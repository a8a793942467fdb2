use serde::{Deserialize, Serialize};
use sha3::Digest;

/// Request counters for a run.
///
/// Every attempt is either a success or a failure, so `attempted == succeeded + failed` once all
/// workers have stopped.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Totals {
    /// Every request that was started, whatever its outcome
    pub attempted: u64,
    /// Requests that got a response with a 2xx status
    pub succeeded: u64,
    /// Transport errors, timeouts and non-2xx responses
    pub failed: u64,
}

/// Latency of successful requests at fixed percentiles, in milliseconds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LatencyPercentiles {
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
}

/// The statistics computed for a finished run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub totals: Totals,
    /// The duration the rates were computed against, in seconds
    pub duration_s: f64,
    pub requests_per_second: f64,
    /// Percentage of attempted requests that succeeded
    pub success_rate: f64,
    /// Percentage of attempted requests that failed
    pub failure_rate: f64,
    /// Not set when no request succeeded
    pub latency: Option<LatencyPercentiles>,
    /// A few transport error messages seen during the run
    #[serde(default)]
    pub sample_errors: Vec<String>,
}

/// Summary of a run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    /// The unique run id
    ///
    /// Chosen by the runner. Unique for each run.
    pub run_id: String,
    /// The API label the run was started with, such as `bolt` or `drf`
    pub api: String,
    pub base_url: String,
    /// The endpoint paths, in worker assignment order
    pub endpoints: Vec<String>,
    /// The time the run started
    ///
    /// This is a Unix timestamp in seconds.
    pub started_at: i64,
    /// The duration that the run was configured with, in milliseconds
    pub run_duration_ms: u64,
    /// The number of workers
    pub concurrency: usize,
    pub request_timeout_ms: u64,
    pub report: Report,
    /// The version of the load generator that produced this summary
    pub loadtest_version: String,
}

impl RunSummary {
    /// Compute a fingerprint for this run summary
    ///
    /// The fingerprint is intended to identify the configuration used for the run, so that runs
    /// against the same target with the same settings can be compared. It uses the
    ///     - API label and base URL
    ///     - Endpoints, in order
    ///     - Run duration, concurrency and request timeout
    ///     - Load generator version
    ///
    /// The fingerprint is computed using [sha3::Sha3_256].
    pub fn fingerprint(&self) -> String {
        let mut hasher = sha3::Sha3_256::new();
        update_str(&mut hasher, &self.api);
        update_str(&mut hasher, &self.base_url);
        Digest::update(&mut hasher, (self.endpoints.len() as u64).to_le_bytes());
        for endpoint in &self.endpoints {
            update_str(&mut hasher, endpoint);
        }
        Digest::update(&mut hasher, self.run_duration_ms.to_le_bytes());
        Digest::update(&mut hasher, (self.concurrency as u64).to_le_bytes());
        Digest::update(&mut hasher, self.request_timeout_ms.to_le_bytes());
        update_str(&mut hasher, &self.loadtest_version);

        format!("{:x}", hasher.finalize())
    }
}

/// Length prefixed so that adjacent fields cannot run into each other.
fn update_str(hasher: &mut sha3::Sha3_256, value: &str) {
    Digest::update(hasher, (value.len() as u64).to_le_bytes());
    Digest::update(hasher, value.as_bytes());
}

/// Serialize the run summary as a single line of JSON, for printing alongside the text report.
pub fn to_json_line(run_summary: &RunSummary) -> anyhow::Result<String> {
    Ok(serde_json::to_string(run_summary)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_summary() -> RunSummary {
        RunSummary {
            run_id: "abc".to_string(),
            api: "bolt".to_string(),
            base_url: "http://localhost:8000".to_string(),
            endpoints: vec!["/health".to_string(), "/ready".to_string()],
            started_at: 1_700_000_000,
            run_duration_ms: 5000,
            concurrency: 20,
            request_timeout_ms: 30_000,
            report: Report {
                totals: Totals {
                    attempted: 10,
                    succeeded: 9,
                    failed: 1,
                },
                duration_s: 5.0,
                requests_per_second: 2.0,
                success_rate: 90.0,
                failure_rate: 10.0,
                latency: Some(LatencyPercentiles {
                    p50_ms: 1.5,
                    p95_ms: 3.0,
                    p99_ms: 3.0,
                }),
                sample_errors: vec!["connection refused".to_string()],
            },
            loadtest_version: "0.1.0".to_string(),
        }
    }

    #[test]
    fn fingerprint_ignores_run_identity_and_results() {
        let first = sample_summary();
        let mut second = sample_summary();
        second.run_id = "def".to_string();
        second.started_at += 60;
        second.report.totals.attempted = 1000;

        assert_eq!(first.fingerprint(), second.fingerprint());
    }

    #[test]
    fn fingerprint_depends_on_endpoint_order() {
        let first = sample_summary();
        let mut second = sample_summary();
        second.endpoints.reverse();

        assert_ne!(first.fingerprint(), second.fingerprint());
    }

    #[test]
    fn fingerprint_separates_endpoint_boundaries() {
        let mut first = sample_summary();
        first.endpoints = vec!["/a".to_string(), "/b".to_string()];
        let mut second = sample_summary();
        second.endpoints = vec!["/a/b".to_string()];

        assert_ne!(first.fingerprint(), second.fingerprint());
    }

    #[test]
    fn fingerprint_separates_adjacent_fields() {
        let mut first = sample_summary();
        first.api = "bolt".to_string();
        first.base_url = "http://x".to_string();
        let mut second = sample_summary();
        second.api = "boltht".to_string();
        second.base_url = "tp://x".to_string();

        assert_ne!(first.fingerprint(), second.fingerprint());
    }

    #[test]
    fn json_line_is_a_single_line() {
        let summary = sample_summary();

        let line = to_json_line(&summary).unwrap();

        assert!(!line.contains('\n'));
        let parsed: RunSummary = serde_json::from_str(&line).unwrap();
        assert_eq!(summary, parsed);
    }
}
