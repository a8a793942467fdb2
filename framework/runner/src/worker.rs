use std::error::Error as _;
use std::sync::Arc;
use std::time::Instant;

use loadtest_core::prelude::DelegatedShutdownListener;
use loadtest_instruments::{
    ErrorSamples, RequestOutcome, RunTotals, SampleCollector, WorkerSummary,
};

use crate::executor::Executor;

/// State shared by every worker in a run. The client is only used through `&self` so its
/// connection pool is shared, the rest is only ever appended to.
#[derive(Clone)]
pub(crate) struct WorkerShared {
    pub(crate) client: reqwest::Client,
    pub(crate) executor: Arc<Executor>,
    pub(crate) totals: Arc<RunTotals>,
    pub(crate) samples: Arc<SampleCollector>,
    pub(crate) errors: Arc<ErrorSamples>,
}

/// Repeatedly requests one URL until the run is shut down.
pub(crate) struct Worker {
    index: usize,
    url: String,
    shared: WorkerShared,
}

impl Worker {
    pub(crate) fn new(index: usize, url: String, shared: WorkerShared) -> Self {
        Self { index, url, shared }
    }

    /// Run until the shutdown signal is seen. The signal is only checked between requests.
    pub(crate) fn run(self, mut shutdown_listener: DelegatedShutdownListener) -> WorkerSummary {
        log::debug!("Starting worker {} against {}", self.index, self.url);

        let mut iterations = 0;
        loop {
            if shutdown_listener.should_shutdown() {
                log::debug!(
                    "Stopping worker {} after {} requests",
                    self.index,
                    iterations
                );
                break;
            }

            let outcome = self
                .shared
                .executor
                .execute_in_place(send_request(&self.shared.client, &self.url));
            self.record(&outcome);
            iterations += 1;
        }

        WorkerSummary {
            index: self.index,
            url: self.url,
            iterations,
        }
    }

    fn record(&self, outcome: &RequestOutcome) {
        self.shared.totals.record(outcome);

        if outcome.is_success() {
            self.shared.samples.record(outcome.latency_ms());
        } else if let Some(error) = outcome.error() {
            self.shared.errors.record(error);
        }
    }
}

/// Issue one GET and classify the result. The body is read to the end so the latency covers the
/// whole response and the connection goes back to the pool.
pub(crate) async fn send_request(client: &reqwest::Client, url: &str) -> RequestOutcome {
    let started = Instant::now();

    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return RequestOutcome::transport_error(error_chain(&e), started.elapsed()),
    };

    let status = response.status().as_u16();
    match response.bytes().await {
        Ok(_) => RequestOutcome::from_status(status, started.elapsed()),
        Err(e) => RequestOutcome::transport_error(error_chain(&e), started.elapsed()),
    }
}

/// `reqwest` puts the useful part of the message, like "Connection refused", in the source chain.
fn error_chain(e: &reqwest::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn refused_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/health")
    }

    #[tokio::test]
    async fn refused_connection_is_transport_error() {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();

        let outcome = send_request(&client, &refused_url()).await;

        assert!(!outcome.is_success());
        assert_eq!(None, outcome.status());
        assert!(outcome.error().is_some());
    }

    #[test]
    fn worker_stops_before_first_request_when_already_shut_down() {
        let handle = loadtest_core::prelude::ShutdownHandle::new();
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let shared = WorkerShared {
            client: reqwest::Client::new(),
            executor: Arc::new(Executor::new(runtime, handle.clone())),
            totals: Arc::new(RunTotals::new()),
            samples: Arc::new(SampleCollector::new()),
            errors: Arc::new(ErrorSamples::new()),
        };

        handle.shutdown();
        let summary = Worker::new(3, refused_url(), shared.clone()).run(handle.new_listener());

        assert_eq!(3, summary.index);
        assert_eq!(0, summary.iterations);
        assert_eq!(0, shared.totals.snapshot().attempted);
    }
}
