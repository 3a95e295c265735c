//! Atomic counters for formatting observability.
//!
//! All counters use relaxed ordering. They are diagnostic only and never
//! used for synchronization.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::ErrorKind;

/// Global formatting counters.
pub struct FormatMetrics {
    /// Formatting calls started.
    pub calls: AtomicU64,
    /// Directives rendered.
    pub directives: AtomicU64,
    /// Literal units copied from format strings (including `%%` escapes).
    pub literal_units: AtomicU64,
    /// Directive/argument type mismatches.
    pub type_mismatches: AtomicU64,
    /// Too-few or too-many argument failures.
    pub count_mismatches: AtomicU64,
    /// Malformed format strings.
    pub malformed_formats: AtomicU64,
    /// Sink write failures.
    pub sink_failures: AtomicU64,
}

impl FormatMetrics {
    /// Create a new zeroed metrics instance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            calls: AtomicU64::new(0),
            directives: AtomicU64::new(0),
            literal_units: AtomicU64::new(0),
            type_mismatches: AtomicU64::new(0),
            count_mismatches: AtomicU64::new(0),
            malformed_formats: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
        }
    }

    /// Increment a counter by 1.
    pub fn inc(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment a counter by `n`.
    pub fn add(counter: &AtomicU64, n: u64) {
        counter.fetch_add(n, Ordering::Relaxed);
    }

    /// Read a counter value.
    pub fn get(counter: &AtomicU64) -> u64 {
        counter.load(Ordering::Relaxed)
    }

    /// Count one failure under the counter for its kind.
    pub fn record_failure(&self, kind: ErrorKind) {
        let counter = match kind {
            ErrorKind::MalformedFormat => &self.malformed_formats,
            ErrorKind::TypeMismatch => &self.type_mismatches,
            ErrorKind::ArgumentCountMismatch => &self.count_mismatches,
            ErrorKind::Sink => &self.sink_failures,
        };
        Self::inc(counter);
    }

    /// Snapshot all counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            calls: Self::get(&self.calls),
            directives: Self::get(&self.directives),
            literal_units: Self::get(&self.literal_units),
            type_mismatches: Self::get(&self.type_mismatches),
            count_mismatches: Self::get(&self.count_mismatches),
            malformed_formats: Self::get(&self.malformed_formats),
            sink_failures: Self::get(&self.sink_failures),
        }
    }
}

impl Default for FormatMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time snapshot of all formatting counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub calls: u64,
    pub directives: u64,
    pub literal_units: u64,
    pub type_mismatches: u64,
    pub count_mismatches: u64,
    pub malformed_formats: u64,
    pub sink_failures: u64,
}

impl MetricsSnapshot {
    /// Total failures of any kind.
    #[must_use]
    pub const fn failures(&self) -> u64 {
        self.type_mismatches + self.count_mismatches + self.malformed_formats + self.sink_failures
    }
}

/// Global metrics instance.
static GLOBAL_METRICS: FormatMetrics = FormatMetrics::new();

/// Access the global metrics.
#[must_use]
pub fn global_metrics() -> &'static FormatMetrics {
    &GLOBAL_METRICS
}
