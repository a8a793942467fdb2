use std::time::Duration;

/// The classified result of a single request attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOutcome {
    success: bool,
    status: Option<u16>,
    latency_ms: f64,
    error: Option<String>,
}

impl RequestOutcome {
    /// A response was received. Only a 2xx status counts as a success.
    pub fn from_status(status: u16, elapsed: Duration) -> Self {
        Self {
            success: (200..300).contains(&status),
            status: Some(status),
            latency_ms: as_millis_f64(elapsed),
            error: None,
        }
    }

    /// No usable response: connection failure, timeout, malformed response or a broken body.
    pub fn transport_error(error: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            success: false,
            status: None,
            latency_ms: as_millis_f64(elapsed),
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn latency_ms(&self) -> f64 {
        self.latency_ms
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

fn as_millis_f64(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_2xx_is_success() {
        let elapsed = Duration::from_millis(3);
        assert!(RequestOutcome::from_status(200, elapsed).is_success());
        assert!(RequestOutcome::from_status(204, elapsed).is_success());
        assert!(RequestOutcome::from_status(299, elapsed).is_success());
        assert!(!RequestOutcome::from_status(199, elapsed).is_success());
        assert!(!RequestOutcome::from_status(301, elapsed).is_success());
        assert!(!RequestOutcome::from_status(404, elapsed).is_success());
        assert!(!RequestOutcome::from_status(500, elapsed).is_success());
    }

    #[test]
    fn transport_error_has_no_status() {
        let outcome = RequestOutcome::transport_error("connection refused", Duration::from_micros(1500));

        assert!(!outcome.is_success());
        assert_eq!(None, outcome.status());
        assert_eq!(Some("connection refused"), outcome.error());
        assert!((outcome.latency_ms() - 1.5).abs() < 1e-9);
    }
}
