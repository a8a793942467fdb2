use loadtest_instruments::RunResult;
use loadtest_summary_model::{Report, RunSummary};

use crate::config::RunConfig;
use crate::types::LoadTestResult;

/// Describe a finished run for machine-readable output.
pub fn build_run_summary(config: &RunConfig, result: &RunResult, report: Report) -> RunSummary {
    RunSummary {
        run_id: nanoid::nanoid!(),
        api: config.api.clone(),
        base_url: config.base_url.clone(),
        endpoints: config
            .effective_endpoints()
            .iter()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect(),
        started_at: result.started_at,
        run_duration_ms: config.duration.as_millis() as u64,
        concurrency: config.concurrency,
        request_timeout_ms: config.request_timeout.as_millis() as u64,
        report,
        loadtest_version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

/// Turn a high failure rate into an error, for use as a CI gate. Without a limit any failure rate
/// is accepted.
pub fn enforce_max_failure_rate(report: &Report, max_failure_rate: Option<f64>) -> LoadTestResult<()> {
    let Some(max_failure_rate) = max_failure_rate else {
        return Ok(());
    };

    if report.totals.attempted == 0 {
        anyhow::bail!("No requests were attempted, cannot check the failure rate");
    }

    if report.failure_rate > max_failure_rate {
        anyhow::bail!(
            "Failure rate {:.1}% is above the allowed maximum of {:.1}%",
            report.failure_rate,
            max_failure_rate
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadtest_summary_model::Totals;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn report(attempted: u64, failed: u64) -> Report {
        let failure_rate = if attempted > 0 {
            failed as f64 / attempted as f64 * 100.0
        } else {
            0.0
        };
        Report {
            totals: Totals {
                attempted,
                succeeded: attempted - failed,
                failed,
            },
            duration_s: 1.0,
            requests_per_second: attempted as f64,
            success_rate: 100.0 - failure_rate,
            failure_rate,
            latency: None,
            sample_errors: vec![],
        }
    }

    #[test]
    fn no_limit_accepts_any_failure_rate() {
        assert!(enforce_max_failure_rate(&report(10, 10), None).is_ok());
        assert!(enforce_max_failure_rate(&report(0, 0), None).is_ok());
    }

    #[test]
    fn limit_rejects_higher_failure_rate() {
        assert!(enforce_max_failure_rate(&report(100, 5), Some(5.0)).is_ok());
        assert!(enforce_max_failure_rate(&report(100, 6), Some(5.0)).is_err());
        assert!(enforce_max_failure_rate(&report(0, 0), Some(5.0)).is_err());
    }

    #[test]
    fn run_summary_records_configuration() {
        let config = RunConfig::new("http://localhost:8001", vec![])
            .with_api("drf")
            .with_fallback_endpoints(vec!["/drf/health/".to_string()])
            .with_duration(Duration::from_secs(5))
            .with_concurrency(50);

        let result = RunResult {
            started_at: 1_700_000_000,
            totals: Totals::default(),
            latencies_ms: vec![],
            workers: vec![],
            sample_errors: vec![],
            stopped_after: Duration::from_secs(5),
            interrupted: false,
        };

        let summary = build_run_summary(&config, &result, report(10, 1));

        assert_eq!("drf", summary.api);
        assert_eq!(vec!["/drf/health/".to_string()], summary.endpoints);
        assert_eq!(5000, summary.run_duration_ms);
        assert_eq!(50, summary.concurrency);
        assert_eq!(30_000, summary.request_timeout_ms);
        assert!(!summary.run_id.is_empty());

        assert_eq!(1_700_000_000, summary.started_at);

        let again = build_run_summary(&config, &result, report(99, 0));
        assert_ne!(summary.run_id, again.run_id);
        assert_eq!(summary.fingerprint(), again.fingerprint());
    }
}
