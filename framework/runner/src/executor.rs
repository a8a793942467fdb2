use std::future::Future;

use loadtest_core::prelude::ShutdownHandle;

#[derive(Debug)]
pub struct Executor {
    runtime: tokio::runtime::Runtime,
    shutdown_handle: ShutdownHandle,
}

impl Executor {
    pub(crate) fn new(runtime: tokio::runtime::Runtime, shutdown_handle: ShutdownHandle) -> Self {
        Self {
            runtime,
            shutdown_handle,
        }
    }

    /// Run async code in place, blocking until it completes.
    ///
    /// The future is not cancelled if the run is shut down, so it must be bounded by its own
    /// timeout. Workers use this so that a request which is in flight when the stop signal
    /// arrives still finishes and gets counted.
    pub fn execute_in_place<T>(&self, fut: impl Future<Output = T>) -> T {
        self.runtime.block_on(fut)
    }

    /// Run async code in place, blocking until it completes or the run is shut down.
    ///
    /// Returns `None` if the shutdown signal arrived first, in which case the future is dropped.
    pub fn execute_until_shutdown<T>(&self, fut: impl Future<Output = T>) -> Option<T> {
        let mut shutdown_listener = self.shutdown_handle.new_listener();
        self.runtime.block_on(async move {
            tokio::select! {
                result = fut => Some(result),
                _ = shutdown_listener.wait_for_shutdown() => None,
            }
        })
    }

    /// Submit async code to be run in the background.
    ///
    /// Note that the future will not be cancelled if the run is shut down. It is also not
    /// guaranteed that the run will wait for the future to complete.
    pub fn spawn(&self, fut: impl Future<Output = ()> + Send + 'static) {
        self.runtime.spawn(fut);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn executor() -> (Executor, ShutdownHandle) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let handle = ShutdownHandle::new();
        (Executor::new(runtime, handle.clone()), handle)
    }

    #[test]
    fn execute_until_shutdown_completes_without_shutdown() {
        let (executor, _handle) = executor();

        assert_eq!(Some(5), executor.execute_until_shutdown(async { 5 }));
    }

    #[test]
    fn execute_until_shutdown_is_cut_short() {
        let (executor, handle) = executor();

        let trigger = handle.clone();
        executor.spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.shutdown();
        });

        let result = executor.execute_until_shutdown(tokio::time::sleep(Duration::from_secs(30)));
        assert_eq!(None, result);
    }

    #[test]
    fn execute_in_place_ignores_shutdown() {
        let (executor, handle) = executor();
        handle.shutdown();

        let value = executor.execute_in_place(async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            "done"
        });
        assert_eq!("done", value);
    }
}
