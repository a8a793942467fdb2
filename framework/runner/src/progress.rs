use std::cmp::min;
use std::fmt::Write;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use loadtest_core::prelude::DelegatedShutdownListener;
use loadtest_instruments::RunTotals;

const REFRESH_INTERVAL: Duration = Duration::from_millis(250);

/// Displays a progress bar while the test is running to show the user how long is left and how
/// many requests have been made so far.
///
/// The returned thread exits within one refresh interval of the shutdown signal. `None` if the
/// thread could not be started.
pub(crate) fn start_progress(
    planned_runtime: Duration,
    totals: Arc<RunTotals>,
    mut shutdown_listener: DelegatedShutdownListener,
) -> Option<JoinHandle<()>> {
    let spawned = std::thread::Builder::new()
        .name("progress".to_string())
        .spawn(move || {
            let start_time = Instant::now();
            let planned_ms = planned_runtime.as_millis() as u64;

            let pb = ProgressBar::new(planned_ms);
            let style = ProgressStyle::with_template(
                "{spinner:.green} [{wide_bar:.cyan/blue}] [{elapsed_precise} / {planned_runtime}] {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .with_key("planned_runtime", {
                let hours = planned_runtime.as_secs() / 3600;
                let minutes = (planned_runtime.as_secs() % 3600) / 60;
                let seconds = planned_runtime.as_secs() % 60;
                move |_state: &ProgressState, w: &mut dyn Write| {
                    let _ = write!(w, "{:02}:{:02}:{:02}", hours, minutes, seconds);
                }
            })
            .progress_chars("#>-");
            pb.set_style(style);

            loop {
                if shutdown_listener.should_shutdown() {
                    log::trace!("Progress thread shutting down");
                    pb.finish_and_clear();
                    break;
                }

                let totals = totals.snapshot();
                pb.set_message(format!(
                    "{} requests, {} ok, {} failed",
                    totals.attempted, totals.succeeded, totals.failed
                ));
                pb.set_position(min(start_time.elapsed().as_millis() as u64, planned_ms));
                std::thread::sleep(REFRESH_INTERVAL);
            }
        });

    match spawned {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::warn!("Failed to start progress thread, continuing without it: {e:?}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadtest_core::prelude::ShutdownHandle;

    #[test]
    fn progress_thread_exits_on_shutdown() {
        let shutdown_handle = ShutdownHandle::new();
        let handle = start_progress(
            Duration::from_secs(3600),
            Arc::new(RunTotals::new()),
            shutdown_handle.new_listener(),
        )
        .unwrap();

        std::thread::sleep(REFRESH_INTERVAL);
        shutdown_handle.shutdown();

        let started = Instant::now();
        handle.join().unwrap();
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
