use std::time::Duration;

use loadtest_core::prelude::ConfigurationError;

use crate::cli::LoadTestCli;
use crate::target::resolve;

/// Default base URL and endpoints for a known API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiPreset {
    pub label: &'static str,
    pub base_url: &'static str,
    pub endpoints: &'static [&'static str],
}

const STANDARD_ENDPOINTS: &[&str] = &["/health", "/health/test", "/ready", "/users", "/roles"];

const API_PRESETS: &[ApiPreset] = &[
    ApiPreset {
        label: "bolt",
        base_url: "http://localhost:8000",
        endpoints: STANDARD_ENDPOINTS,
    },
    ApiPreset {
        label: "drf",
        base_url: "http://localhost:8001",
        endpoints: &[
            "/drf/health/",
            "/drf/health/test/",
            "/drf/ready/",
            "/drf/users/",
            "/drf/roles/",
        ],
    },
    ApiPreset {
        label: "fastapi",
        base_url: "http://localhost:8002",
        endpoints: STANDARD_ENDPOINTS,
    },
    ApiPreset {
        label: "express",
        base_url: "http://localhost:8003",
        endpoints: STANDARD_ENDPOINTS,
    },
    ApiPreset {
        label: "nest",
        base_url: "http://localhost:8004",
        endpoints: STANDARD_ENDPOINTS,
    },
];

/// Look up the preset for an API label. The label is otherwise opaque, unknown labels get the
/// `bolt` preset.
pub fn api_preset(label: &str) -> &'static ApiPreset {
    API_PRESETS
        .iter()
        .find(|preset| preset.label.eq_ignore_ascii_case(label.trim()))
        .unwrap_or(&API_PRESETS[0])
}

/// Split a comma separated endpoint list, dropping blank entries.
pub fn parse_endpoints(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|endpoint| !endpoint.is_empty())
        .map(str::to_string)
        .collect()
}

/// Everything needed to run a load test. Not modified once the run starts.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Label for the API under test, only used for display
    pub api: String,
    pub base_url: String,
    /// Endpoint paths to request, assigned to workers in order
    pub endpoints: Vec<String>,
    /// Used when `endpoints` has no usable entry
    pub fallback_endpoints: Vec<String>,
    pub duration: Duration,
    pub concurrency: usize,
    pub request_timeout: Duration,
    pub show_progress: bool,
}

impl RunConfig {
    pub const DEFAULT_DURATION: Duration = Duration::from_secs(5);
    pub const DEFAULT_CONCURRENCY: usize = 20;
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(base_url: impl Into<String>, endpoints: Vec<String>) -> Self {
        Self {
            api: "custom".to_string(),
            base_url: base_url.into(),
            endpoints,
            fallback_endpoints: Vec::new(),
            duration: Self::DEFAULT_DURATION,
            concurrency: Self::DEFAULT_CONCURRENCY,
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
            show_progress: false,
        }
    }

    /// Build the configuration from the command line, filling in the API preset for anything
    /// that was not given.
    pub fn from_cli(cli: &LoadTestCli) -> Self {
        let preset = api_preset(&cli.api);

        let base_url = cli
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(preset.base_url);
        let endpoints = cli
            .endpoints
            .as_deref()
            .map(parse_endpoints)
            .unwrap_or_default();

        Self::new(base_url, endpoints)
            .with_api(&cli.api)
            .with_fallback_endpoints(preset.endpoints.iter().map(|e| e.to_string()).collect())
            .with_duration(cli.duration)
            .with_concurrency(cli.concurrency)
            .with_request_timeout(cli.timeout)
            .with_progress(!cli.no_progress)
    }

    pub fn with_api(mut self, api: &str) -> Self {
        self.api = api.to_string();
        self
    }

    pub fn with_fallback_endpoints(mut self, fallback_endpoints: Vec<String>) -> Self {
        self.fallback_endpoints = fallback_endpoints;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// The full URL for each endpoint that will be requested, in assignment order.
    pub fn urls(&self) -> Vec<String> {
        resolve(&self.base_url, &self.endpoints, &self.fallback_endpoints)
    }

    /// The endpoint paths that will be requested, after falling back to the defaults.
    pub fn effective_endpoints(&self) -> &[String] {
        if self.endpoints.iter().any(|e| !e.trim().is_empty()) {
            &self.endpoints
        } else {
            &self.fallback_endpoints
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.concurrency == 0 {
            return Err(ConfigurationError::ZeroConcurrency);
        }
        if self.duration.is_zero() {
            return Err(ConfigurationError::ZeroDuration);
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigurationError::ZeroTimeout);
        }

        let parsed = url::Url::parse(&self.base_url).map_err(|e| ConfigurationError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigurationError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        if self.urls().is_empty() {
            return Err(ConfigurationError::NoEndpoints);
        }

        Ok(())
    }

    /// The configuration echo printed before a run starts.
    pub fn describe(&self) -> String {
        let endpoints = self
            .effective_endpoints()
            .iter()
            .map(|e| e.trim())
            .filter(|e| !e.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "Load test: {} @ {}\n  Endpoints: {}\n  Duration: {} | Concurrency: {}\n{}",
            self.api.to_uppercase(),
            self.base_url,
            endpoints,
            humantime::format_duration(self.duration),
            self.concurrency,
            "-".repeat(50),
        )
    }
}
