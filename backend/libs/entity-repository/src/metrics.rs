//! Repository metrics for observability
//!
//! Failures are swallowed on the request path, so these counters are the
//! only place they show up besides logs.

use prometheus::{CounterVec, Opts, Registry};
use std::sync::OnceLock;

static METRICS: OnceLock<RepositoryMetricsInner> = OnceLock::new();

struct RepositoryMetricsInner {
    store_errors: CounterVec,
    corrupt_records: CounterVec,
    writes: CounterVec,
}

impl RepositoryMetricsInner {
    fn new() -> Self {
        Self {
            store_errors: CounterVec::new(
                Opts::new(
                    "entity_store_errors_total",
                    "Store or encoding failures swallowed by the repository",
                ),
                &["kind", "op"],
            )
            .expect("valid metric definition"),
            corrupt_records: CounterVec::new(
                Opts::new(
                    "entity_corrupt_records_total",
                    "Stored values that failed to deserialize",
                ),
                &["kind"],
            )
            .expect("valid metric definition"),
            writes: CounterVec::new(
                Opts::new("entity_writes_total", "Successful record writes"),
                &["kind"],
            )
            .expect("valid metric definition"),
        }
    }

    fn register(&self, registry: &Registry) -> Result<(), prometheus::Error> {
        registry.register(Box::new(self.store_errors.clone()))?;
        registry.register(Box::new(self.corrupt_records.clone()))?;
        registry.register(Box::new(self.writes.clone()))?;
        Ok(())
    }
}

fn get_metrics() -> &'static RepositoryMetricsInner {
    METRICS.get_or_init(RepositoryMetricsInner::new)
}

#[derive(Clone, Copy, Default)]
pub struct RepositoryMetrics;

impl RepositoryMetrics {
    pub fn new() -> Self {
        Self
    }

    /// Register metrics with a Prometheus registry
    pub fn register(registry: &Registry) -> Result<(), prometheus::Error> {
        get_metrics().register(registry)
    }

    pub fn record_store_error(&self, kind: &str, op: &str) {
        get_metrics()
            .store_errors
            .with_label_values(&[kind, op])
            .inc();
    }

    pub fn record_corrupt(&self, kind: &str) {
        get_metrics().corrupt_records.with_label_values(&[kind]).inc();
    }

    pub fn record_write(&self, kind: &str) {
        get_metrics().writes.with_label_values(&[kind]).inc();
    }

    pub fn store_errors(&self, kind: &str, op: &str) -> f64 {
        get_metrics()
            .store_errors
            .with_label_values(&[kind, op])
            .get()
    }

    pub fn corrupt_records(&self, kind: &str) -> f64 {
        get_metrics().corrupt_records.with_label_values(&[kind]).get()
    }
}
