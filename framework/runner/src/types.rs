/// Recommended error type for anything built on top of the runner. Configuration problems are
/// reported as a [loadtest_core::prelude::ConfigurationError] wrapped in this type.
pub type LoadTestResult<T> = anyhow::Result<T>;
