use std::time::Duration;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(about, long_about = None)]
pub struct LoadTestCli {
    /// The API under test. Picks the default base URL and endpoints, for example `bolt` or `drf`.
    #[clap(short, long, default_value = "bolt")]
    pub api: String,

    /// Base URL of the service to test, overrides the default for the API
    #[clap(short, long)]
    pub url: Option<String>,

    /// Comma separated endpoint paths, overrides the default for the API.
    ///
    /// Workers are assigned endpoints in order, so with `--endpoints=/a,/b` and 4 workers, two
    /// workers request `/a` and two request `/b`.
    #[clap(short, long)]
    pub endpoints: Option<String>,

    /// How long to run the test for, for example `5s` or `2m`
    #[clap(short, long, default_value = "5s", value_parser = humantime::parse_duration)]
    pub duration: Duration,

    /// The number of concurrent workers
    #[clap(short, long, default_value_t = 20)]
    pub concurrency: usize,

    /// Upper bound for a single request. Requests that take longer are counted as failed.
    #[clap(long, default_value = "30s", value_parser = humantime::parse_duration)]
    pub timeout: Duration,

    /// Do not show a progress bar on the CLI.
    ///
    /// This is recommended for CI/CD environments where the progress bar isn't being looked at by anyone and is just adding noise to the logs.
    #[clap(long, default_value = "false")]
    pub no_progress: bool,

    /// After the text report, print a JSON summary of the run as a single line on stdout
    #[clap(long, default_value = "false")]
    pub json: bool,

    /// Exit with an error if more than this percentage of requests failed. Between 0 and 100.
    ///
    /// By default the exit code does not depend on the failure rate.
    #[clap(long, value_parser = parse_failure_rate)]
    pub max_failure_rate: Option<f64>,
}

fn parse_failure_rate(s: &str) -> anyhow::Result<f64> {
    let rate = s
        .trim()
        .parse::<f64>()
        .map_err(|e| anyhow::anyhow!("Not a number: {e}"))?;

    if !(0.0..=100.0).contains(&rate) {
        anyhow::bail!("Must be a percentage between 0 and 100, got {rate}");
    }

    Ok(rate)
}
