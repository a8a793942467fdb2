/// A run configuration that cannot be executed.
///
/// These are raised before any worker is spawned, so a run that fails with one of these has not
/// sent a single request.
#[derive(derive_more::Error, derive_more::Display, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[display("No endpoints to test, the endpoint list is empty")]
    NoEndpoints,
    #[display("Concurrency must be at least 1")]
    ZeroConcurrency,
    #[display("Test duration must be greater than zero")]
    ZeroDuration,
    #[display("Request timeout must be greater than zero")]
    ZeroTimeout,
    #[display("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
