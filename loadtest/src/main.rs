use loadtest_runner::prelude::*;

fn main() -> LoadTestResult<()> {
    let cli = init();

    let config = RunConfig::from_cli(&cli);
    config.validate()?;

    println!("{}", config.describe());

    let result = run(&config)?;
    let report = summarize(&result, result.reporting_duration(config.duration));
    print_report(&report);

    if cli.json {
        let summary = build_run_summary(&config, &result, report.clone());
        log::debug!(
            "Run {} has configuration fingerprint {}",
            summary.run_id,
            summary.fingerprint()
        );
        println!("{}", to_json_line(&summary)?);
    }

    enforce_max_failure_rate(&report, cli.max_failure_rate)?;

    Ok(())
}
