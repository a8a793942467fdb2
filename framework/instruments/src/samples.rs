use parking_lot::Mutex;

/// The number of transport error messages kept for a run.
pub const MAX_ERROR_SAMPLES: usize = 20;

/// Latency observations of successful requests, shared by all workers.
///
/// Inserts are serialized with a single lock. The critical section is a `Vec::push`, which is
/// negligible next to a network round trip.
#[derive(Debug, Default)]
pub struct SampleCollector {
    samples: Mutex<Vec<f64>>,
}

impl SampleCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size the collector to avoid growing the buffer while the run is hot.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    pub fn record(&self, latency_ms: f64) {
        self.samples.lock().push(latency_ms);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.samples.lock().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take every recorded value, in ascending order, leaving the collector empty.
    ///
    /// Must only be called once all writers have stopped, otherwise values recorded after the
    /// drain are not part of the result.
    pub fn drain_sorted(&self) -> Vec<f64> {
        let mut samples = std::mem::take(&mut *self.samples.lock());
        samples.sort_unstable_by(f64::total_cmp);
        samples
    }
}

/// The first few transport error messages of a run, kept to give the user a hint about what went
/// wrong when requests fail.
#[derive(Debug, Default)]
pub struct ErrorSamples {
    errors: Mutex<Vec<String>>,
}

impl ErrorSamples {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, error: &str) {
        let mut errors = self.errors.lock();
        if errors.len() < MAX_ERROR_SAMPLES {
            errors.push(error.to_string());
        }
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.errors.lock())
    }
}
