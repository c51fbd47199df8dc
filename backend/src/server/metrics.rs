//! Prometheus metrics middleware exposing `/metrics`.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};

const METRICS_NAMESPACE: &str = "helpdesk";
const METRICS_ENDPOINT: &str = "/metrics";

/// Build the request metrics middleware.
///
/// # Errors
/// Returns [`std::io::Error`] when collector registration fails.
pub(crate) fn build_metrics() -> std::io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new(METRICS_NAMESPACE)
        .endpoint(METRICS_ENDPOINT)
        .build()
        .map_err(|err| std::io::Error::other(format!("metrics registration failed: {err}")))
}
