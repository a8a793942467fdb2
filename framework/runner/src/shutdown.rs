use loadtest_core::prelude::ShutdownHandle;
use tokio::signal;

use crate::executor::Executor;

/// Wire Ctrl-C to the shutdown handle, so an interrupted run still stops its workers cleanly and
/// reports what it measured.
pub(crate) fn start_shutdown_listener(executor: &Executor, handle: ShutdownHandle) {
    executor.spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            log::warn!("Failed to listen for Ctrl-C, the run can only end by timer: {e:?}");
            return;
        }
        println!("Received shutdown signal, shutting down...");
        handle.shutdown();
    });
}
