/*!
 * # Metrics Module
 *
 * In-memory metrics collection for the procurement API.
 *
 * ## Features
 *
 * - HTTP request/response metrics (count, latency, status codes)
 * - Procurement document metrics (requests, RFQs, purchase orders)
 * - Outbound email metrics
 * - Authentication metrics
 *
 * ## Metrics Formats
 *
 * Metrics are exposed in the following formats:
 * - Prometheus text format at `/metrics`
 * - JSON format at `/metrics/json`
 */

use dashmap::DashMap;
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Failed to export metrics: {0}")]
    ExportError(String),
}

#[derive(Debug, Clone, Default)]
pub struct Counter {
    value: Arc<AtomicU64>,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, value: u64) {
        self.value.fetch_add(value, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Gauge {
    value: Arc<AtomicU64>,
}

impl Gauge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, value: f64) {
        self.value.store(value as u64, Ordering::Relaxed);
    }

    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dec(&self) {
        self.value.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> f64 {
        self.value.load(Ordering::Relaxed) as f64
    }
}

#[derive(Debug, Clone, Default)]
pub struct Histogram {
    sum: Arc<AtomicU64>,
    count: Arc<AtomicU64>,
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    // Stored in microseconds so sub-second observations survive the atomic
    pub fn observe(&self, value: f64) {
        self.sum
            .fetch_add((value * 1_000_000.0) as u64, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn get_sum(&self) -> f64 {
        self.sum.load(Ordering::Relaxed) as f64 / 1_000_000.0
    }
}

#[derive(Debug)]
pub struct MetricsRegistry {
    counters: Arc<DashMap<String, Counter>>,
    gauges: Arc<DashMap<String, Gauge>>,
    histograms: Arc<DashMap<String, Histogram>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self {
            counters: Arc::new(DashMap::new()),
            gauges: Arc::new(DashMap::new()),
            histograms: Arc::new(DashMap::new()),
        }
    }

    pub fn get_or_create_counter(&self, name: &str) -> Counter {
        self.counters
            .entry(name.to_string())
            .or_insert_with(Counter::new)
            .clone()
    }

    pub fn get_or_create_gauge(&self, name: &str) -> Gauge {
        self.gauges
            .entry(name.to_string())
            .or_insert_with(Gauge::new)
            .clone()
    }

    pub fn get_or_create_histogram(&self, name: &str) -> Histogram {
        self.histograms
            .entry(name.to_string())
            .or_insert_with(Histogram::new)
            .clone()
    }

    pub async fn export_metrics(&self) -> Result<String, MetricsError> {
        let mut output = String::new();

        for entry in self.counters.iter() {
            let (name, counter) = entry.pair();
            output.push_str(&format!("# TYPE {} counter\n", name));
            output.push_str(&format!("{} {}\n", name, counter.get()));
        }

        for entry in self.gauges.iter() {
            let (name, gauge) = entry.pair();
            output.push_str(&format!("# TYPE {} gauge\n", name));
            output.push_str(&format!("{} {}\n", name, gauge.get()));
        }

        for entry in self.histograms.iter() {
            let (name, histogram) = entry.pair();
            output.push_str(&format!("# TYPE {} histogram\n", name));
            output.push_str(&format!("{}_count {}\n", name, histogram.get_count()));
            output.push_str(&format!("{}_sum {}\n", name, histogram.get_sum()));
        }

        Ok(output)
    }

    pub async fn export_metrics_json(&self) -> Result<serde_json::Value, MetricsError> {
        let mut counters = serde_json::Map::new();
        for entry in self.counters.iter() {
            let (name, counter) = entry.pair();
            counters.insert(name.to_string(), json!(counter.get()));
        }

        let mut gauges = serde_json::Map::new();
        for entry in self.gauges.iter() {
            let (name, gauge) = entry.pair();
            gauges.insert(name.to_string(), json!(gauge.get()));
        }

        let mut histograms = serde_json::Map::new();
        for entry in self.histograms.iter() {
            let (name, histogram) = entry.pair();
            histograms.insert(
                name.to_string(),
                json!({
                    "count": histogram.get_count(),
                    "sum": histogram.get_sum(),
                }),
            );
        }

        Ok(json!({
            "counters": counters,
            "gauges": gauges,
            "histograms": histograms,
        }))
    }
}

// Global metrics registry
lazy_static::lazy_static! {
    pub static ref METRICS: MetricsRegistry = MetricsRegistry::new();
}

// Metrics collection functions
pub fn increment_counter(name: &str) {
    METRICS.get_or_create_counter(name).inc();
}

pub fn increment_counter_by(name: &str, value: u64) {
    METRICS.get_or_create_counter(name).inc_by(value);
}

pub fn set_gauge(name: &str, value: f64) {
    METRICS.get_or_create_gauge(name).set(value);
}

pub fn observe_histogram(name: &str, value: f64) {
    METRICS.get_or_create_histogram(name).observe(value);
}

// Procurement document metrics
pub struct BusinessMetrics {
    pub purchase_requests_created: Counter,
    pub rfqs_created: Counter,
    pub rfqs_sent: Counter,
    pub quotes_recorded: Counter,
    pub purchase_orders_created: Counter,
    pub purchase_orders_sent: Counter,
    pub emails_sent: Counter,
    pub emails_failed: Counter,
    pub tenants_registered: Counter,
}

impl BusinessMetrics {
    pub fn new() -> Self {
        Self {
            purchase_requests_created: METRICS
                .get_or_create_counter("purchase_requests_created_total"),
            rfqs_created: METRICS.get_or_create_counter("rfqs_created_total"),
            rfqs_sent: METRICS.get_or_create_counter("rfqs_sent_total"),
            quotes_recorded: METRICS.get_or_create_counter("quotes_recorded_total"),
            purchase_orders_created: METRICS
                .get_or_create_counter("purchase_orders_created_total"),
            purchase_orders_sent: METRICS.get_or_create_counter("purchase_orders_sent_total"),
            emails_sent: METRICS.get_or_create_counter("emails_sent_total"),
            emails_failed: METRICS.get_or_create_counter("emails_failed_total"),
            tenants_registered: METRICS.get_or_create_counter("tenants_registered_total"),
        }
    }
}

// Authentication metrics
pub struct SecurityMetrics {
    pub auth_success: Counter,
    pub auth_failures: Counter,
    pub token_refreshes: Counter,
}

impl SecurityMetrics {
    pub fn new() -> Self {
        Self {
            auth_success: METRICS.get_or_create_counter("auth_success_total"),
            auth_failures: METRICS.get_or_create_counter("auth_failures_total"),
            token_refreshes: METRICS.get_or_create_counter("token_refreshes_total"),
        }
    }
}

// Global instances
lazy_static::lazy_static! {
    pub static ref BUSINESS_METRICS: BusinessMetrics = BusinessMetrics::new();
    pub static ref SECURITY_METRICS: SecurityMetrics = SecurityMetrics::new();
}

// HTTP endpoint handler for metrics
pub async fn metrics_handler() -> Result<String, MetricsError> {
    METRICS.export_metrics().await
}

pub async fn metrics_json_handler() -> Result<serde_json::Value, MetricsError> {
    METRICS.export_metrics_json().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn export_includes_counter_lines() {
        increment_counter("test_export_counter");
        increment_counter("test_export_counter");

        let exported = METRICS.export_metrics().await.unwrap();
        assert!(exported.contains("# TYPE test_export_counter counter"));
        assert!(exported.contains("test_export_counter 2"));
    }

    #[test]
    fn histogram_preserves_subsecond_observations() {
        let histogram = Histogram::new();
        histogram.observe(0.25);
        histogram.observe(0.5);

        assert_eq!(histogram.get_count(), 2);
        assert!((histogram.get_sum() - 0.75).abs() < 1e-9);
    }
}
