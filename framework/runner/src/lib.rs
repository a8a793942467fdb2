mod cli;
mod config;
mod executor;
mod init;
mod monitor;
mod progress;
mod run;
mod shutdown;
mod summary;
mod target;
mod types;
mod worker;

pub mod prelude {
    pub use crate::cli::LoadTestCli;
    pub use crate::config::{api_preset, parse_endpoints, ApiPreset, RunConfig};
    pub use crate::init::init;
    pub use crate::run::run;
    pub use crate::summary::{build_run_summary, enforce_max_failure_rate};
    pub use crate::target::{build_url, resolve};
    pub use crate::types::LoadTestResult;

    pub use loadtest_core::prelude::ConfigurationError;
    pub use loadtest_instruments::{print_report, summarize, RunResult, WorkerSummary};
    pub use loadtest_summary_model::{to_json_line, Report, RunSummary};
}
