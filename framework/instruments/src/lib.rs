mod outcome;
mod report;
mod result;
mod samples;
mod stats;
mod totals;

pub use outcome::RequestOutcome;
pub use report::{print_report, render_report};
pub use result::{RunResult, WorkerSummary};
pub use samples::{ErrorSamples, SampleCollector, MAX_ERROR_SAMPLES};
pub use stats::{percentile, percentile_index, summarize, REPORTED_PERCENTILES};
pub use totals::RunTotals;
