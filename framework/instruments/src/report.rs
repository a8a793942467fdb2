mod summary_table;

use std::fmt::Write;

use loadtest_summary_model::Report;
use tabled::settings::Style;
use tabled::Table;

use crate::report::summary_table::SummaryRow;

/// The number of sample errors shown under the summary table.
const PRINTED_ERROR_SAMPLES: usize = 5;
const MAX_ERROR_WIDTH: usize = 80;

/// Render the report as a human readable table, followed by any sample errors.
pub fn render_report(report: &Report) -> String {
    let totals = report.totals;
    let mut rows = vec![
        SummaryRow::new("Total requests", totals.attempted.to_string()),
        SummaryRow::new("Success (2xx)", totals.succeeded.to_string()),
        SummaryRow::new("Fail", totals.failed.to_string()),
        SummaryRow::new("Success rate", format!("{:.1}%", report.success_rate)),
        SummaryRow::new("Fail rate", format!("{:.1}%", report.failure_rate)),
        SummaryRow::new("Requests/sec", format!("{:.1}", report.requests_per_second)),
    ];

    if let Some(latency) = &report.latency {
        rows.push(SummaryRow::new("Latency p50 (ms)", format!("{:.1}", latency.p50_ms)));
        rows.push(SummaryRow::new("Latency p95 (ms)", format!("{:.1}", latency.p95_ms)));
        rows.push(SummaryRow::new("Latency p99 (ms)", format!("{:.1}", latency.p99_ms)));
    }

    let mut table = Table::new(rows);
    table.with(Style::modern());

    let mut out = table.to_string();

    if !report.sample_errors.is_empty() {
        let _ = write!(out, "\n\nSample errors (max {PRINTED_ERROR_SAMPLES}):");
        for error in report.sample_errors.iter().take(PRINTED_ERROR_SAMPLES) {
            let truncated = error.chars().take(MAX_ERROR_WIDTH).collect::<String>();
            let _ = write!(out, "\n  - {truncated}");
        }
    }

    out
}

pub fn print_report(report: &Report) {
    println!("\nSummary of run");
    println!("{}", render_report(report));
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadtest_summary_model::{LatencyPercentiles, Totals};

    fn report(latency: Option<LatencyPercentiles>, sample_errors: Vec<String>) -> Report {
        Report {
            totals: Totals {
                attempted: 200,
                succeeded: 150,
                failed: 50,
            },
            duration_s: 4.0,
            requests_per_second: 50.0,
            success_rate: 75.0,
            failure_rate: 25.0,
            latency,
            sample_errors,
        }
    }

    #[test]
    fn renders_counts_rates_and_latency() {
        let rendered = render_report(&report(
            Some(LatencyPercentiles {
                p50_ms: 1.25,
                p95_ms: 9.0,
                p99_ms: 12.5,
            }),
            vec![],
        ));

        assert!(rendered.contains("Total requests"));
        assert!(rendered.contains("200"));
        assert!(rendered.contains("75.0%"));
        assert!(rendered.contains("25.0%"));
        assert!(rendered.contains("50.0"));
        assert!(rendered.contains("Latency p50 (ms)"));
        assert!(rendered.contains("12.5"));
        assert!(!rendered.contains("Sample errors"));
    }

    #[test]
    fn omits_latency_without_samples() {
        let rendered = render_report(&report(None, vec![]));

        assert!(rendered.contains("Fail rate"));
        assert!(!rendered.contains("Latency"));
    }

    #[test]
    fn lists_a_few_truncated_errors() {
        let errors = (0..8)
            .map(|i| format!("error {i} {}", "x".repeat(200)))
            .collect::<Vec<_>>();
        let rendered = render_report(&report(None, errors));

        assert!(rendered.contains("Sample errors (max 5):"));
        assert!(rendered.contains("error 4"));
        assert!(!rendered.contains("error 5"));
        assert!(!rendered.contains(&"x".repeat(80)));
    }
}
