use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use anyhow::Context;
use loadtest_core::prelude::ShutdownHandle;
use loadtest_instruments::{ErrorSamples, RunResult, RunTotals, SampleCollector, WorkerSummary};

use crate::config::RunConfig;
use crate::executor::Executor;
use crate::monitor::start_monitor;
use crate::progress::start_progress;
use crate::shutdown::start_shutdown_listener;
use crate::types::LoadTestResult;
use crate::worker::{Worker, WorkerShared};

/// Room for this many latency samples is reserved up front.
const INITIAL_SAMPLE_CAPACITY: usize = 200_000;

/// Run a load test and return the measurements once every worker has stopped.
///
/// Spawns `concurrency` workers, worker `i` requesting `urls[i % urls.len()]` for the whole run.
/// After the configured duration, or on Ctrl-C, the workers are told to stop and this function
/// waits for all of them. Requests in flight at that point are allowed to finish and are counted.
///
/// Fails with a [loadtest_core::prelude::ConfigurationError] before anything is spawned if the
/// configuration is unusable.
pub fn run(config: &RunConfig) -> LoadTestResult<RunResult> {
    config.validate()?;
    let urls = config.urls();

    log::info!(
        "Running load test against {} with {} workers for {}",
        config.base_url,
        config.concurrency,
        humantime::format_duration(config.duration)
    );

    let runtime = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    let shutdown_handle = ShutdownHandle::default();
    let executor = Arc::new(Executor::new(runtime, shutdown_handle.clone()));
    start_shutdown_listener(&executor, shutdown_handle.clone());

    let client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .context("Failed to create HTTP client")?;

    let shared = WorkerShared {
        client,
        executor: executor.clone(),
        totals: Arc::new(RunTotals::new()),
        samples: Arc::new(SampleCollector::with_capacity(INITIAL_SAMPLE_CAPACITY)),
        errors: Arc::new(ErrorSamples::new()),
    };

    let progress = if config.show_progress {
        start_progress(
            config.duration,
            shared.totals.clone(),
            shutdown_handle.new_listener(),
        )
    } else {
        None
    };

    // Ready to start spawning workers so start the resource monitor to report high usage which
    // might lead to a misleading outcome.
    start_monitor(shutdown_handle.new_listener());

    let started_at = chrono::Utc::now().timestamp();
    let started = Instant::now();
    let mut handles = Vec::with_capacity(config.concurrency);
    for index in 0..config.concurrency {
        let worker = Worker::new(index, urls[index % urls.len()].clone(), shared.clone());
        let shutdown_listener = shutdown_handle.new_listener();

        let spawned = std::thread::Builder::new()
            .name(format!("worker-{index}"))
            .spawn(move || worker.run(shutdown_listener));

        match spawned {
            Ok(handle) => handles.push(handle),
            Err(e) => {
                // Don't leave the workers that did start running against the target
                shutdown_handle.shutdown();
                if let Some(progress) = progress {
                    let _ = progress.join();
                }
                if let Err(join_err) = join_workers(handles) {
                    log::error!("Error stopping workers: {join_err:?}");
                }
                return Err(e).with_context(|| format!("Failed to spawn thread for worker {index}"));
            }
        }
    }

    let interrupted = executor
        .execute_until_shutdown(tokio::time::sleep(config.duration))
        .is_none();
    let stopped_after = started.elapsed();
    shutdown_handle.shutdown();

    if interrupted {
        log::info!(
            "Run interrupted after {}, waiting for workers to stop",
            humantime::format_duration(stopped_after)
        );
    }

    let workers = join_workers(handles)?;

    // The bar must be cleared before the caller prints the report
    if let Some(progress) = progress {
        if let Err(e) = progress.join() {
            log::warn!("Progress thread panicked: {e:?}");
        }
    }

    // Every worker has been joined, nothing writes to the shared state any more
    let result = RunResult {
        started_at,
        totals: shared.totals.snapshot(),
        latencies_ms: shared.samples.drain_sorted(),
        workers,
        sample_errors: shared.errors.take(),
        stopped_after,
        interrupted,
    };

    log::info!(
        "Load test finished, {} requests attempted by {} workers",
        result.totals.attempted,
        result.workers.len()
    );

    Ok(result)
}

/// Join every worker, even if some have panicked, so that none is still writing to the shared
/// state when this returns.
fn join_workers(handles: Vec<JoinHandle<WorkerSummary>>) -> LoadTestResult<Vec<WorkerSummary>> {
    let mut workers = Vec::with_capacity(handles.len());
    let mut panicked = 0;

    for handle in handles {
        match handle.join() {
            Ok(summary) => workers.push(summary),
            Err(e) => {
                log::error!("Worker thread panicked: {e:?}");
                panicked += 1;
            }
        }
    }

    if panicked > 0 {
        anyhow::bail!("{panicked} worker thread(s) panicked");
    }

    Ok(workers)
}
